use graph::{EntitySet, Triple};
use serde::{Deserialize, Serialize};

/// One span returned by a token-classification model with simple
/// aggregation (`dslim/bert-base-NER` style).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerSpan {
    #[serde(default)]
    pub entity_group: String,
    pub word: String,
    #[serde(default)]
    pub score: f32,
}

/// What a backend produced for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Entities and raw triples, still to be deduplicated and serialized.
    Graph {
        entities: EntitySet,
        triples: Vec<Triple>,
    },
    /// A Graph Document written by the backend itself (hosted single-shot).
    Document(String),
}

impl Extraction {
    /// Final Graph Document text for this run.
    pub fn into_document(self) -> String {
        match self {
            Extraction::Graph { entities, triples } => graph::serialize(&entities, &triples),
            Extraction::Document(text) => text,
        }
    }
}
