//! Candidate entities from three signals, unioned without precedence:
//! model NER spans, runs of capitalized words, and uppercase acronyms.

use graph::EntitySet;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::model::NerModel;
use crate::normalizer::collapse_whitespace;
use crate::schema::NerSpan;

/// Capitalized function words that start sentences but name nothing.
pub const EXCLUDED_WORDS: [&str; 5] = ["The", "This", "That", "A", "An"];

static CAPITALIZED_RE: OnceLock<Regex> = OnceLock::new();
static ACRONYM_RE: OnceLock<Regex> = OnceLock::new();

// Runs stay on one line; a heading followed by a capitalized sentence start
// is two candidates, not one.
fn capitalized_re() -> &'static Regex {
    CAPITALIZED_RE.get_or_init(|| {
        Regex::new(r"\b[A-Z][a-z]*(?:[ \t]+[A-Z][a-z]*)*\b").expect("static regex is valid")
    })
}

fn acronym_re() -> &'static Regex {
    ACRONYM_RE.get_or_init(|| Regex::new(r"\b[A-Z]{2,}\b").expect("static regex is valid"))
}

/// Longer than two characters after trimming, not a function word, and
/// free of the Graph Document's `|` delimiter.
pub fn is_valid_entity(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    trimmed.chars().count() > 2 && !EXCLUDED_WORDS.contains(&trimmed) && !trimmed.contains('|')
}

/// Rejoin word-piece fragments: `"Py ##Torch"` becomes `"PyTorch"`.
pub fn merge_subwords(word: &str) -> String {
    word.replace(" ##", "").replace("##", "")
}

fn clean_candidate(raw: &str) -> Option<String> {
    let candidate = collapse_whitespace(raw);
    is_valid_entity(&candidate).then_some(candidate)
}

/// Capitalized phrases and acronyms.
pub fn lexical_entities(text: &str) -> EntitySet {
    capitalized_re()
        .find_iter(text)
        .chain(acronym_re().find_iter(text))
        .filter_map(|m| clean_candidate(m.as_str()))
        .collect()
}

pub fn ner_entities(spans: &[NerSpan]) -> EntitySet {
    spans
        .iter()
        .filter_map(|span| clean_candidate(&merge_subwords(&span.word)))
        .collect()
}

/// Entity extraction for one backend. Holds no per-document state.
#[derive(Clone)]
pub struct EntityExtractor {
    ner: Option<Arc<dyn NerModel>>,
    call_timeout: Duration,
}

impl EntityExtractor {
    pub fn new(ner: Option<Arc<dyn NerModel>>, call_timeout: Duration) -> Self {
        Self { ner, call_timeout }
    }

    /// Heuristics only.
    pub fn lexical() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub async fn extract(&self, text: &str) -> EntitySet {
        let mut entities = lexical_entities(text);

        if let Some(ner) = &self.ner {
            match timeout(self.call_timeout, ner.recognize(text)).await {
                Ok(Ok(spans)) => {
                    let found = ner_entities(&spans);
                    debug!(spans = spans.len(), entities = found.len(), "NER spans collected");
                    entities.extend(found);
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "NER model failed, keeping heuristic entities only");
                }
                Err(_) => {
                    warn!(
                        timeout_secs = self.call_timeout.as_secs(),
                        "NER model timed out, keeping heuristic entities only"
                    );
                }
            }
        }

        entities
    }
}
