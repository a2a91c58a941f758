use anyhow::{Context, Result};
use graph::GraphDocument;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// The knowledge base file the query engine reads.
///
/// Single writer, full overwrite: every run replaces the whole document.
/// Writes go to a sibling temp file first and are renamed into place, so a
/// concurrent reader sees either the old document or the new one.
#[derive(Debug, Clone)]
pub struct GraphStore {
    path: PathBuf,
}

impl GraphStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "graph".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub async fn write(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, document)
            .await
            .with_context(|| format!("Failed to write temp file: {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace graph document: {}", self.path.display()))?;

        info!(path = %self.path.display(), bytes = document.len(), "Graph document written");
        Ok(())
    }

    /// `None` when no run has written the document yet.
    pub async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No graph document yet");
                Ok(None)
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read graph document: {}", self.path.display()))
            }
        }
    }

    /// Node names in the current document, sorted. Empty when there is none.
    pub async fn nodes(&self) -> Result<Vec<String>> {
        let Some(text) = self.read().await? else {
            return Ok(Vec::new());
        };
        Ok(GraphDocument::parse_lenient(&text).nodes().iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path().join("kb").join("graph.txt"));

        store.write("NODE: Rust\n").await.unwrap();
        store.write("NODE: LLVM\nNODE: Pandas\n").await.unwrap();

        let text = store.read().await.unwrap().unwrap();
        assert_eq!(text, "NODE: LLVM\nNODE: Pandas\n");
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_empty_document_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path().join("graph.txt"));

        store.write("NODE: Rust\n").await.unwrap();
        store.write("").await.unwrap();

        assert_eq!(store.read().await.unwrap().as_deref(), Some(""));
        assert!(store.nodes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path().join("graph.txt"));

        assert!(store.read().await.unwrap().is_none());
        assert!(store.nodes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nodes_are_sorted_and_tolerant() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path().join("graph.txt"));
        store
            .write("Here is the graph\nNODE: Pandas\nNODE: LLVM\nEDGE: broken\n")
            .await
            .unwrap();

        assert_eq!(store.nodes().await.unwrap(), vec!["LLVM", "Pandas"]);
    }
}
