use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on entities fed to the pairwise generator: 15 entities is at
/// most 105 prompts per document.
pub const MAX_PAIR_ENTITIES: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub backend: BackendKind,
    pub max_pair_entities: usize,
    /// Characters of document text given to each pairwise prompt
    pub context_chars: usize,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    pub ner: NerConfig,
    pub generator: GeneratorConfig,
    pub hosted: HostedConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Hybrid,   // NER + pairwise generator, patterns as supplement
    Pattern,  // Regex templates only, no model runtime
    Hosted,   // Hosted LLM writes the whole document in one call
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

/// Token-classification endpoint (Hugging Face inference API shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    pub enabled: bool,
    pub url: String,
    /// From `NER_API_KEY`, never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Ollama server used for pairwise relation prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

/// OpenAI-compatible chat completions service for single-shot extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    /// From `LLM_API_KEY`, never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Hybrid,
            max_pair_entities: MAX_PAIR_ENTITIES,
            context_chars: 500,
            request_timeout_secs: 30,
            retry: RetryConfig::default(),
            ner: NerConfig::default(),
            generator: GeneratorConfig::default(),
            hosted: HostedConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
        }
    }
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://api-inference.huggingface.co/models/dslim/bert-base-NER".to_string(),
            api_key: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            max_tokens: 30,
        }
    }
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            api_key: None,
        }
    }
}

impl ExtractConfig {
    pub fn pattern_only() -> Self {
        Self {
            backend: BackendKind::Pattern,
            ner: NerConfig {
                enabled: false,
                ..NerConfig::default()
            },
            generator: GeneratorConfig {
                enabled: false,
                ..GeneratorConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn hosted(api_key: Option<String>) -> Self {
        Self {
            backend: BackendKind::Hosted,
            request_timeout_secs: 120,
            hosted: HostedConfig {
                api_key,
                ..HostedConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured pair budget, never above [`MAX_PAIR_ENTITIES`].
    pub fn pair_entities(&self) -> usize {
        self.max_pair_entities.min(MAX_PAIR_ENTITIES)
    }
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Hybrid => "hybrid",
            BackendKind::Pattern => "pattern",
            BackendKind::Hosted => "hosted",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(BackendKind::Hybrid),
            "pattern" | "pattern-only" => Ok(BackendKind::Pattern),
            "hosted" => Ok(BackendKind::Hosted),
            other => Err(format!(
                "unknown backend `{other}` (expected hybrid, pattern or hosted)"
            )),
        }
    }
}
