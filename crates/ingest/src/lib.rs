pub mod reader;
pub mod store;

pub use reader::FileReader;
pub use store::GraphStore;

use anyhow::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

/// Generate a stable document ID from file path
pub fn generate_doc_id(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// One uploaded document, read and ready for extraction.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub doc_id: String,
    pub source: String,
    pub text: String,
}

impl Document {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

pub async fn ingest_file(file_path: &Path) -> Result<Document> {
    let text = FileReader::read_file(file_path).await?;
    let source = file_path.to_string_lossy().to_string();
    let doc_id = generate_doc_id(&source);

    let document = Document { doc_id, source, text };
    debug!(doc_id = %document.doc_id, chars = document.char_count(), "Document ingested");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_stable() {
        let a = generate_doc_id("uploads/notes.txt");
        assert_eq!(a, generate_doc_id("uploads/notes.txt"));
        assert_ne!(a, generate_doc_id("uploads/other.txt"));
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn test_ingest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Pandas uses NumPy.").unwrap();

        let document = ingest_file(&path).await.unwrap();
        assert_eq!(document.text, "Pandas uses NumPy.");
        assert_eq!(document.doc_id, generate_doc_id(&path.to_string_lossy()));
        assert_eq!(document.char_count(), 18);
    }
}
