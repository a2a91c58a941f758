use std::time::Duration;

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Failures talking to a model runtime. None of these abort a document run:
/// callers skip the item or fall back to pattern extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("request to model service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("empty response from model service")]
    EmptyResponse,

    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),
}

impl ExtractError {
    /// Build a [`ExtractError::Status`] from a non-success response, keeping
    /// whatever body text the service sent back.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::Status { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let e = ExtractError::Status {
            status: 503,
            body: "model loading".into(),
        };
        assert_eq!(e.to_string(), "model service returned HTTP 503: model loading");
    }

    #[test]
    fn test_missing_credentials_display() {
        let e = ExtractError::MissingCredentials("LLM_API_KEY");
        assert!(e.to_string().contains("LLM_API_KEY"));
    }
}
