use async_trait::async_trait;
use extract::{
    BackendKind, ExtractConfig, ExtractError, HostedBackend, HybridBackend, PatternBackend, RetryPolicy,
    TextGenerator,
};
use ingest::GraphStore;
use nexus::Pipeline;
use std::sync::Arc;

struct FixedReply(&'static str);

#[async_trait]
impl TextGenerator for FixedReply {
    async fn generate(&self, _prompt: &str) -> extract::Result<String> {
        Ok(self.0.to_string())
    }
}

struct Offline;

#[async_trait]
impl TextGenerator for Offline {
    async fn generate(&self, _prompt: &str) -> extract::Result<String> {
        Err(ExtractError::EmptyResponse)
    }
}

fn pattern_pipeline() -> Pipeline {
    Pipeline::new(Arc::new(PatternBackend::new()))
}

#[tokio::test]
async fn test_type_of_sentence() {
    let document = pattern_pipeline()
        .process("Python is a type of Programming Language.")
        .await;

    assert_eq!(
        document,
        "NODE: Programming Language\n\
         NODE: Python\n\
         EDGE: Python|is_a|Programming Language\n\
         EDGE: Python|is_type_of|Programming Language\n"
    );
}

#[tokio::test]
async fn test_repeated_facts_are_written_once() {
    let document = pattern_pipeline().process("Rust uses LLVM. Rust uses LLVM.").await;
    assert_eq!(document, "NODE: LLVM\nNODE: Rust\nEDGE: Rust|uses|LLVM\n");
}

#[tokio::test]
async fn test_empty_text_gives_empty_document() {
    assert_eq!(pattern_pipeline().process("").await, "");
    assert_eq!(pattern_pipeline().process("no capitals here").await, "");
}

#[tokio::test]
async fn test_output_parses_back() {
    let text = "Vaccination prevents Disease. Automation improves Productivity. \
        The Internet revolutionized Communication.";
    let document = pattern_pipeline().process(text).await;

    let parsed = graph::GraphDocument::parse(&document).unwrap();
    assert_eq!(parsed.to_text(), document);
    assert!(parsed.edges().iter().any(|t| t.relation == "revolutionized"));
}

#[tokio::test]
async fn test_hybrid_without_models_equals_pattern_only() {
    let text = "Deep Learning is a subset of Machine Learning. \
        Machine Learning enables Automation. NASA uses Python.";
    let hybrid = Pipeline::new(Arc::new(HybridBackend::new(None, None, &ExtractConfig::default())));

    assert_eq!(hybrid.process(text).await, pattern_pipeline().process(text).await);
}

#[tokio::test]
async fn test_hybrid_merges_generator_and_patterns() {
    let hybrid = Pipeline::new(Arc::new(HybridBackend::new(
        None,
        Some(Arc::new(FixedReply("compiles with"))),
        &ExtractConfig::default(),
    )));

    let document = hybrid.process("Rust uses LLVM.").await;
    assert!(document.contains("EDGE: LLVM|compiles_with|Rust\n"));
    assert!(document.contains("EDGE: Rust|uses|LLVM\n"));
}

#[tokio::test]
async fn test_process_file_overwrites_graph() {
    let dir = tempfile::tempdir().unwrap();
    let store = GraphStore::new(dir.path().join("kb").join("graph.txt"));
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.md");
    std::fs::write(&first, "Rust uses LLVM.").unwrap();
    std::fs::write(&second, "# Notes\nVaccination prevents Disease.").unwrap();

    let pipeline = pattern_pipeline();
    let summary = pipeline.process_file(&first, &store).await.unwrap();
    assert_eq!(summary.backend, BackendKind::Pattern);
    assert_eq!((summary.nodes, summary.edges), (2, 1));
    assert_eq!(summary.doc_id, ingest::generate_doc_id(&first.to_string_lossy()));

    let summary = pipeline.process_file(&second, &store).await.unwrap();
    assert_eq!(summary.edges, 1);

    let nodes = store.nodes().await.unwrap();
    assert!(nodes.contains(&"Vaccination".to_string()));
    assert!(!nodes.contains(&"Rust".to_string()));
}

#[tokio::test]
async fn test_unsupported_upload_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = GraphStore::new(dir.path().join("graph.txt"));
    let input = dir.path().join("slides.pptx");
    std::fs::write(&input, "binary").unwrap();

    assert!(pattern_pipeline().process_file(&input, &store).await.is_err());
    assert!(store.read().await.unwrap().is_none());
}

#[tokio::test]
async fn test_hosted_document_is_written_verbatim() {
    let hosted = Pipeline::new(Arc::new(HostedBackend::new(
        Some(Arc::new(FixedReply("NODE: LLVM\nNODE: Rust\nEDGE: Rust|uses|LLVM"))),
        RetryPolicy::none(),
    )));

    assert_eq!(
        hosted.process("Rust uses LLVM.").await,
        "NODE: LLVM\nNODE: Rust\nEDGE: Rust|uses|LLVM\n"
    );
}

#[tokio::test]
async fn test_hosted_outage_clears_previous_graph() {
    let dir = tempfile::tempdir().unwrap();
    let store = GraphStore::new(dir.path().join("graph.txt"));
    store.write("NODE: Stale\n").await.unwrap();
    let input = dir.path().join("doc.txt");
    std::fs::write(&input, "Rust uses LLVM.").unwrap();

    let hosted = Pipeline::new(Arc::new(HostedBackend::new(
        Some(Arc::new(Offline)),
        RetryPolicy::new(1, 1, 1),
    )));
    let summary = hosted.process_file(&input, &store).await.unwrap();

    assert_eq!((summary.nodes, summary.edges), (0, 0));
    assert_eq!(store.read().await.unwrap().as_deref(), Some(""));
}
