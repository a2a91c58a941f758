pub mod backend;
pub mod config;
pub mod entities;
pub mod error;
pub mod hosted;
pub mod llm;
pub mod model;
pub mod ner;
pub mod normalizer;
pub mod patterns;
pub mod prompt;
pub mod retry;
pub mod schema;

pub use backend::{ExtractionBackend, HostedBackend, HybridBackend, PatternBackend, select_backend};
pub use config::{BackendKind, ExtractConfig, MAX_PAIR_ENTITIES};
pub use entities::EntityExtractor;
pub use error::{ExtractError, Result};
pub use hosted::ChatCompletionsClient;
pub use llm::OllamaClient;
pub use model::{NerModel, TextGenerator};
pub use ner::HttpNerClient;
pub use normalizer::{EntityResolver, normalize_relation, resolve};
pub use retry::RetryPolicy;
pub use schema::{Extraction, NerSpan};
