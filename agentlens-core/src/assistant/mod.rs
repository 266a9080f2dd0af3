pub mod vapi;

pub use vapi::{VapiClient, VAPI_API_BASE};

use async_trait::async_trait;

use crate::models::AssistantConfig;

/// Result of fetching one assistant. Every variant but `Fetched` is local to
/// that assistant: the caller moves on to the next identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(AssistantConfig),
    /// The API answered with a status other than 200.
    HttpError { status: u16, body: String },
    /// The request never produced a response.
    TransportError(String),
    /// 200 response whose body is not an assistant object.
    DecodeError(String),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Fetched(_) => "fetched",
            FetchOutcome::HttpError { .. } => "http_error",
            FetchOutcome::TransportError(_) => "transport_error",
            FetchOutcome::DecodeError(_) => "decode_error",
        }
    }

    pub fn assistant(&self) -> Option<&AssistantConfig> {
        match self {
            FetchOutcome::Fetched(config) => Some(config),
            _ => None,
        }
    }
}

#[async_trait]
pub trait AssistantSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn fetch_assistant(&self, assistant_id: &str) -> FetchOutcome;
}

pub type DynAssistantSource = Box<dyn AssistantSource>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(
            FetchOutcome::Fetched(AssistantConfig::default()).label(),
            "fetched"
        );
        assert_eq!(
            FetchOutcome::HttpError {
                status: 404,
                body: String::new()
            }
            .label(),
            "http_error"
        );
        assert_eq!(
            FetchOutcome::TransportError("refused".to_string()).label(),
            "transport_error"
        );
        assert_eq!(
            FetchOutcome::DecodeError("eof".to_string()).label(),
            "decode_error"
        );
    }

    #[test]
    fn test_only_fetched_is_success() {
        assert!(FetchOutcome::Fetched(AssistantConfig::default()).is_success());
        assert!(FetchOutcome::Fetched(AssistantConfig::default())
            .assistant()
            .is_some());
        assert!(!FetchOutcome::TransportError("x".to_string()).is_success());
        assert!(FetchOutcome::DecodeError("x".to_string())
            .assistant()
            .is_none());
    }
}
