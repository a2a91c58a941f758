use anyhow::Result;
use extract::{BackendKind, ExtractConfig, ExtractionBackend, select_backend};
use graph::GraphDocument;
use ingest::{GraphStore, ingest_file};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Text in, Graph Document out, through whichever backend was selected at
/// startup. Holds no per-run state, so one pipeline serves any number of
/// runs.
#[derive(Clone)]
pub struct Pipeline {
    backend: Arc<dyn ExtractionBackend>,
}

/// What one `process_file` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub doc_id: String,
    pub source: String,
    pub backend: BackendKind,
    pub nodes: usize,
    pub edges: usize,
    pub graph_path: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} nodes, {} edges via {} backend -> {}",
            self.source,
            self.nodes,
            self.edges,
            self.backend,
            self.graph_path.display()
        )
    }
}

impl Pipeline {
    pub fn new(backend: Arc<dyn ExtractionBackend>) -> Self {
        Self { backend }
    }

    pub async fn from_config(config: &ExtractConfig) -> Self {
        Self::new(select_backend(config).await)
    }

    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Extract and serialize one document. Never fails: model trouble
    /// degrades the result instead.
    pub async fn process(&self, text: &str) -> String {
        self.backend.extract(text).await.into_document()
    }

    /// Read an upload, process it and overwrite the Graph Document.
    pub async fn process_file(&self, input: &Path, store: &GraphStore) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let document = ingest_file(input).await?;
        let span = info_span!("run", %run_id, doc_id = %document.doc_id, backend = %self.backend());

        async {
            info!(source = %document.source, chars = document.char_count(), "Processing document");

            let text = self.process(&document.text).await;
            store.write(&text).await?;

            let graph = GraphDocument::parse_lenient(&text);
            let summary = RunSummary {
                run_id,
                doc_id: document.doc_id.clone(),
                source: document.source.clone(),
                backend: self.backend(),
                nodes: graph.nodes().len(),
                edges: graph.edges().len(),
                graph_path: store.path().to_path_buf(),
            };
            info!(nodes = summary.nodes, edges = summary.edges, "Run complete");
            Ok::<_, anyhow::Error>(summary)
        }
        .instrument(span)
        .await
    }
}
