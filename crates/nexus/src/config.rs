use anyhow::{Context, Result};
use extract::{BackendKind, ExtractConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Used when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "nexus.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// Graph Document the query engine reads. Overwritten on every run.
    pub graph_path: PathBuf,
    pub extract: ExtractConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            graph_path: PathBuf::from("data/graph.txt"),
            extract: ExtractConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (or `nexus.toml` when present), then apply
    /// environment overrides. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml(&raw).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Environment overrides. API keys are only ever read here, never from
    /// the config file. Tests pass a lookup instead of mutating the process
    /// environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(backend) = lookup("NEXUS_BACKEND") {
            self.extract.backend = backend
                .parse::<BackendKind>()
                .map_err(|e| anyhow::anyhow!("NEXUS_BACKEND: {e}"))?;
        }
        if let Some(path) = lookup("NEXUS_GRAPH_PATH") {
            self.graph_path = PathBuf::from(path);
        }
        if let Some(level) = lookup("NEXUS_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(key) = lookup("LLM_API_KEY") {
            self.extract.hosted.api_key = Some(key);
        }
        if let Some(key) = lookup("NER_API_KEY") {
            self.extract.ner.api_key = Some(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.extract.backend, BackendKind::Hybrid);
        assert_eq!(config.extract.max_pair_entities, 15);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
graph_path = "/srv/kb/graph.txt"

[extract]
backend = "pattern"

[extract.generator]
model = "mistral"
"#,
        )
        .unwrap();

        assert_eq!(config.graph_path, PathBuf::from("/srv/kb/graph.txt"));
        assert_eq!(config.extract.backend, BackendKind::Pattern);
        assert_eq!(config.extract.generator.model, "mistral");
        assert_eq!(config.extract.generator.max_tokens, 30);
        assert_eq!(config.extract.context_chars, 500);
    }

    #[test]
    fn test_api_key_is_not_read_from_toml() {
        let config = AppConfig::from_toml(
            r#"
[extract.hosted]
api_key = "sk-from-file"
"#,
        )
        .unwrap();
        assert!(config.extract.hosted.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env_of(&[
                ("NEXUS_BACKEND", "hosted"),
                ("NEXUS_GRAPH_PATH", "/tmp/kb.txt"),
                ("NEXUS_LOG_LEVEL", "debug"),
                ("LLM_API_KEY", "sk-test"),
                ("NER_API_KEY", "   "),
            ]))
            .unwrap();

        assert_eq!(config.extract.backend, BackendKind::Hosted);
        assert_eq!(config.graph_path, PathBuf::from("/tmp/kb.txt"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.extract.hosted.api_key.as_deref(), Some("sk-test"));
        assert!(config.extract.ner.api_key.is_none());
    }

    #[test]
    fn test_invalid_backend_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(env_of(&[("NEXUS_BACKEND", "quantum")]))
            .unwrap_err();
        assert!(err.to_string().contains("NEXUS_BACKEND"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nexus.toml");
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "warn");

        let missing = AppConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(missing.to_string().contains("absent.toml"));
    }
}
