//! One extraction contract, three interchangeable strategies.
//!
//! | backend   | entities                 | relationships                      |
//! |-----------|--------------------------|------------------------------------|
//! | `hybrid`  | NER + heuristics         | pairwise generator + patterns      |
//! | `pattern` | heuristics               | patterns                           |
//! | `hosted`  | hosted LLM               | hosted LLM, returns the document   |
//!
//! Exactly one backend serves a run. It is chosen once at startup by
//! [`select_backend`]; a hybrid backend whose models are unreachable is
//! replaced by the pattern backend there, not at call sites.

use async_trait::async_trait;
use graph::{EntitySet, GraphDocument, Triple};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{BackendKind, ExtractConfig};
use crate::entities::EntityExtractor;
use crate::error::ExtractError;
use crate::hosted::ChatCompletionsClient;
use crate::llm::OllamaClient;
use crate::model::{NerModel, TextGenerator};
use crate::ner::HttpNerClient;
use crate::normalizer::normalize_relation;
use crate::patterns;
use crate::prompt;
use crate::retry::RetryPolicy;
use crate::schema::Extraction;

#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn extract_entities(&self, text: &str) -> EntitySet;

    async fn extract_relationships(&self, text: &str, entities: &EntitySet) -> Vec<Triple>;

    /// Full run over one document. Entities are extracted first because
    /// relationship extraction resolves spans against them.
    async fn extract(&self, text: &str) -> Extraction {
        let entities = self.extract_entities(text).await;
        let triples = self.extract_relationships(text, &entities).await;
        Extraction::Graph { entities, triples }
    }
}

/// Regex templates over heuristic entities. Needs no model and never fails.
#[derive(Clone)]
pub struct PatternBackend {
    entities: EntityExtractor,
}

impl PatternBackend {
    pub fn new() -> Self {
        Self {
            entities: EntityExtractor::lexical(),
        }
    }
}

impl Default for PatternBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionBackend for PatternBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pattern
    }

    async fn extract_entities(&self, text: &str) -> EntitySet {
        self.entities.extract(text).await
    }

    async fn extract_relationships(&self, text: &str, entities: &EntitySet) -> Vec<Triple> {
        patterns::extract_relationships(text, entities)
    }
}

/// NER-assisted entities, generator-described pairs, pattern supplement.
pub struct HybridBackend {
    entities: EntityExtractor,
    generator: Option<Arc<dyn TextGenerator>>,
    pair_entities: usize,
    context_chars: usize,
    call_timeout: Duration,
}

impl HybridBackend {
    pub fn new(
        ner: Option<Arc<dyn NerModel>>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: &ExtractConfig,
    ) -> Self {
        Self {
            entities: EntityExtractor::new(ner, config.request_timeout()),
            generator,
            pair_entities: config.pair_entities(),
            context_chars: config.context_chars,
            call_timeout: config.request_timeout(),
        }
    }

    /// Ask the generator about every unordered pair among the first
    /// `pair_entities` candidates. A failed or timed-out pair is skipped.
    async fn pairwise_relationships(
        &self,
        generator: &dyn TextGenerator,
        text: &str,
        entities: &EntitySet,
    ) -> Vec<Triple> {
        let candidates: Vec<&String> = entities.iter().take(self.pair_entities).collect();
        let context = truncate_chars(text, self.context_chars);

        let mut triples = Vec::new();
        let mut prompts = 0usize;
        let mut failures = 0usize;

        for (i, source) in candidates.iter().enumerate() {
            for target in &candidates[i + 1..] {
                prompts += 1;
                let prompt = prompt::build_relation_prompt(source, target, context);

                let reply = timeout(self.call_timeout, generator.generate(&prompt))
                    .await
                    .unwrap_or(Err(ExtractError::Timeout(self.call_timeout)));
                let reply = match reply {
                    Ok(reply) => reply,
                    Err(e) => {
                        failures += 1;
                        debug!(source = %source, target = %target, error = %e, "Pair prompt failed, skipping");
                        continue;
                    }
                };

                if let Some(relation) = normalize_relation(&reply, source, target) {
                    debug!(source = %source, relation = %relation, target = %target, "Generator relation");
                    triples.push(Triple::new(source.as_str(), relation, target.as_str()));
                }
            }
        }

        if failures > 0 {
            warn!(prompts, failures, "Some entity pairs were skipped");
        }
        triples
    }
}

#[async_trait]
impl ExtractionBackend for HybridBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hybrid
    }

    async fn extract_entities(&self, text: &str) -> EntitySet {
        self.entities.extract(text).await
    }

    async fn extract_relationships(&self, text: &str, entities: &EntitySet) -> Vec<Triple> {
        let mut triples = match &self.generator {
            Some(generator) => {
                self.pairwise_relationships(generator.as_ref(), text, entities)
                    .await
            }
            None => Vec::new(),
        };

        triples.extend(patterns::extract_relationships(text, entities));
        triples
    }
}

/// One hosted-LLM call that writes the Graph Document itself.
///
/// Never fails: no credentials or an unreachable service yield an empty
/// document, so the query engine sees "no graph" instead of a stale one.
pub struct HostedBackend {
    client: Option<Arc<dyn TextGenerator>>,
    retry: RetryPolicy,
}

impl HostedBackend {
    pub fn new(client: Option<Arc<dyn TextGenerator>>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn from_config(config: &ExtractConfig) -> Self {
        let client = match ChatCompletionsClient::from_config(&config.hosted, config.request_timeout()) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn TextGenerator>),
            Err(e) => {
                warn!(error = %e, "Hosted extraction unavailable, runs will produce an empty graph");
                None
            }
        };
        Self::new(client, RetryPolicy::from_config(&config.retry))
    }

    pub async fn render_document(&self, text: &str) -> String {
        let Some(client) = &self.client else {
            warn!("Hosted extraction has no client, writing an empty graph");
            return String::new();
        };

        let prompt = prompt::build_document_prompt(text);
        match self.retry.retry("hosted_extract", || client.generate(&prompt)).await {
            Ok(reply) => accept_document(&reply),
            Err(e) => {
                warn!(error = %e, "Hosted extraction failed, writing an empty graph");
                String::new()
            }
        }
    }
}

/// Keep the hosted reply as returned (newline-terminated). A reply that
/// does not open with `NODE:`/`EDGE:` is reported but still kept.
fn accept_document(reply: &str) -> String {
    let body = reply.trim();
    if body.is_empty() {
        warn!("Hosted extraction returned an empty document");
        return String::new();
    }
    if !(body.starts_with(graph::document::NODE_PREFIX) || body.starts_with(graph::document::EDGE_PREFIX)) {
        let preview: String = body.chars().take(60).collect();
        warn!(preview = %preview, "Hosted reply does not start with NODE: or EDGE:, keeping it as returned");
    }

    let mut document = body.to_string();
    document.push('\n');
    document
}

#[async_trait]
impl ExtractionBackend for HostedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hosted
    }

    async fn extract_entities(&self, text: &str) -> EntitySet {
        let document = GraphDocument::parse_lenient(&self.render_document(text).await);
        document.nodes().clone()
    }

    /// Edges from the hosted document whose endpoints are both in
    /// `entities`, so the result always agrees with the node set the caller
    /// already holds.
    async fn extract_relationships(&self, text: &str, entities: &EntitySet) -> Vec<Triple> {
        let document = GraphDocument::parse_lenient(&self.render_document(text).await);
        document
            .edges()
            .iter()
            .filter(|edge| entities.contains(&edge.source) && entities.contains(&edge.target))
            .cloned()
            .collect()
    }

    async fn extract(&self, text: &str) -> Extraction {
        Extraction::Document(self.render_document(text).await)
    }
}

/// Build the configured backend. A hybrid backend with neither model
/// reachable degrades to [`PatternBackend`].
pub async fn select_backend(config: &ExtractConfig) -> Arc<dyn ExtractionBackend> {
    match config.backend {
        BackendKind::Pattern => Arc::new(PatternBackend::new()),
        BackendKind::Hosted => Arc::new(HostedBackend::from_config(config)),
        BackendKind::Hybrid => {
            let ner = connect_ner(config);
            let generator = connect_generator(config).await;

            if ner.is_none() && generator.is_none() {
                warn!("No model runtime available, falling back to pattern extraction");
                return Arc::new(PatternBackend::new());
            }

            info!(
                ner = ner.is_some(),
                generator = generator.is_some(),
                "Hybrid extraction ready"
            );
            Arc::new(HybridBackend::new(ner, generator, config))
        }
    }
}

fn connect_ner(config: &ExtractConfig) -> Option<Arc<dyn NerModel>> {
    if !config.ner.enabled {
        return None;
    }
    match HttpNerClient::from_config(&config.ner, config.request_timeout()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "NER client could not be built");
            None
        }
    }
}

async fn connect_generator(config: &ExtractConfig) -> Option<Arc<dyn TextGenerator>> {
    if !config.generator.enabled {
        return None;
    }
    let client = match OllamaClient::from_config(&config.generator, config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Generator client could not be built");
            return None;
        }
    };

    let retry = RetryPolicy::from_config(&config.retry);
    let probe = retry.retry("generator_probe", || client.probe()).await;
    match probe {
        Ok(()) => Some(Arc::new(client)),
        Err(e) => {
            warn!(model = client.model(), error = %e, "Generator unreachable, pairwise extraction disabled");
            None
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
