use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::config::NerConfig;
use crate::error::{ExtractError, Result};
use crate::model::NerModel;
use crate::schema::NerSpan;

/// Token-classification endpoint speaking the Hugging Face inference API:
/// `{"inputs": text}` in, a list of aggregated spans out.
#[derive(Clone)]
pub struct HttpNerClient {
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct NerRequest<'a> {
    inputs: &'a str,
}

impl HttpNerClient {
    pub fn new(url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, api_key, client })
    }

    pub fn from_config(config: &NerConfig, timeout: Duration) -> Result<Self> {
        Self::new(config.url.clone(), config.api_key.clone(), timeout)
    }
}

#[async_trait]
impl NerModel for HttpNerClient {
    async fn recognize(&self, text: &str) -> Result<Vec<NerSpan>> {
        let mut request = self.client.post(&self.url).json(&NerRequest { inputs: text });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ExtractError::from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
