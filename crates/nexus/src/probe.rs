use extract::{
    BackendKind, ChatCompletionsClient, ExtractConfig, HttpNerClient, NerModel, OllamaClient, Result,
    TextGenerator,
};
use std::fmt;
use tracing::{info, warn};

const PROBE_TEXT: &str = "Nexus checks that Hugging Face answers.";

/// Reachability of one model runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStatus {
    pub runtime: &'static str,
    pub state: RuntimeState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeState {
    Ready,
    Disabled,
    Unavailable(String),
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            RuntimeState::Ready => write!(f, "{:<10} ready", self.runtime),
            RuntimeState::Disabled => write!(f, "{:<10} disabled", self.runtime),
            RuntimeState::Unavailable(reason) => write!(f, "{:<10} unavailable: {reason}", self.runtime),
        }
    }
}

impl RuntimeStatus {
    fn from_result(runtime: &'static str, result: Result<()>) -> Self {
        let state = match result {
            Ok(()) => {
                info!(runtime, "Runtime ready");
                RuntimeState::Ready
            }
            Err(e) => {
                warn!(runtime, error = %e, "Runtime unavailable");
                RuntimeState::Unavailable(e.to_string())
            }
        };
        Self { runtime, state }
    }

    fn disabled(runtime: &'static str) -> Self {
        Self {
            runtime,
            state: RuntimeState::Disabled,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == RuntimeState::Ready
    }
}

/// Check every runtime the configured backend would use. Nothing is
/// retried: this reports the state right now.
pub async fn probe_runtimes(config: &ExtractConfig) -> Vec<RuntimeStatus> {
    let timeout = config.request_timeout();

    match config.backend {
        BackendKind::Pattern => Vec::new(),
        BackendKind::Hosted => {
            let result = match ChatCompletionsClient::from_config(&config.hosted, timeout) {
                Ok(client) => client.generate("Reply with OK.").await.map(|_| ()),
                Err(e) => Err(e),
            };
            vec![RuntimeStatus::from_result("hosted", result)]
        }
        BackendKind::Hybrid => {
            let ner = if config.ner.enabled {
                let result = match HttpNerClient::from_config(&config.ner, timeout) {
                    Ok(client) => client.recognize(PROBE_TEXT).await.map(|_| ()),
                    Err(e) => Err(e),
                };
                RuntimeStatus::from_result("ner", result)
            } else {
                RuntimeStatus::disabled("ner")
            };

            let generator = if config.generator.enabled {
                let result = match OllamaClient::from_config(&config.generator, timeout) {
                    Ok(client) => client.probe().await,
                    Err(e) => Err(e),
                };
                RuntimeStatus::from_result("generator", result)
            } else {
                RuntimeStatus::disabled("generator")
            };

            vec![ner, generator]
        }
    }
}
