use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AssistantApiConfig;
use crate::error::{AgentlensError, AgentlensResult};
use crate::models::AssistantConfig;

use super::{AssistantSource, FetchOutcome};

pub const VAPI_API_BASE: &str = "https://api.vapi.ai";

pub struct VapiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl VapiClient {
    pub fn new(config: &AssistantApiConfig) -> AgentlensResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AgentlensError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, &config.token))
    }

    pub fn with_client(client: Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn assistant_url(&self, assistant_id: &str) -> String {
        format!("{}/assistant/{}", self.base_url, assistant_id)
    }
}

#[async_trait]
impl AssistantSource for VapiClient {
    fn source_name(&self) -> &str {
        "vapi"
    }

    async fn fetch_assistant(&self, assistant_id: &str) -> FetchOutcome {
        let url = self.assistant_url(assistant_id);
        info!(assistant_id, "Fetching assistant config");

        let response = match self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(assistant_id, "Failed to reach assistant API: {}", e);
                return FetchOutcome::TransportError(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(assistant_id, "Failed to read assistant API response: {}", e);
                return FetchOutcome::TransportError(e.to_string());
            }
        };

        if status != StatusCode::OK {
            warn!(
                assistant_id,
                status = status.as_u16(),
                "Assistant API returned an error status"
            );
            return FetchOutcome::HttpError {
                status: status.as_u16(),
                body,
            };
        }

        match serde_json::from_str::<AssistantConfig>(&body) {
            Ok(config) => {
                debug!(assistant_id, name = ?config.name, "Assistant config decoded");
                FetchOutcome::Fetched(config)
            }
            Err(e) => {
                warn!(assistant_id, "Failed to parse assistant API response: {}", e);
                FetchOutcome::DecodeError(e.to_string())
            }
        }
    }
}
