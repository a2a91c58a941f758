//! Capabilities the extraction backends need from model runtimes.
//!
//! Backends only see these traits, so the runtimes can be swapped (or faked
//! in tests) without touching extraction logic.

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::NerSpan;

#[async_trait]
pub trait NerModel: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<NerSpan>>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Cheap liveness check run once when a backend is built.
    async fn probe(&self) -> Result<()> {
        Ok(())
    }
}
