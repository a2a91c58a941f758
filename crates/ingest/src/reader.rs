use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Upload formats the pipeline accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

pub struct FileReader;

impl FileReader {
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }

    /// Read a plain-text upload as UTF-8, dropping a leading byte-order mark.
    pub async fn read_file(path: &Path) -> Result<String> {
        if !Self::is_supported(path) {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            anyhow::bail!("Unsupported file format: {:?} (expected .txt or .md)", extension);
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(match content.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_markdown_and_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.MD");
        std::fs::write(&path, "\u{feff}# Rust\nRust uses LLVM.").unwrap();

        let text = FileReader::read_file(&path).await.unwrap();
        assert_eq!(text, "# Rust\nRust uses LLVM.");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, "%PDF").unwrap();

        let err = FileReader::read_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[tokio::test]
    async fn test_missing_file_has_context() {
        let err = FileReader::read_file(Path::new("/nonexistent/input.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.txt"));
    }
}
