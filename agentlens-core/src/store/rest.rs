use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{AgentlensError, AgentlensResult};
use crate::models::CustomerRecord;

use super::CustomerStore;

const REST_PATH: &str = "rest/v1";

/// Customer lookups through the PostgREST endpoint of the hosted database.
pub struct RestCustomerStore {
    client: Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl RestCustomerStore {
    pub fn new(config: &StoreConfig) -> AgentlensResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AgentlensError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(
            client,
            &config.url,
            &config.service_key,
            &config.table,
        ))
    }

    pub fn with_client(client: Client, base_url: &str, service_key: &str, table: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            table: table.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, self.table)
    }
}

#[async_trait]
impl CustomerStore for RestCustomerStore {
    fn backend_name(&self) -> &str {
        "rest"
    }

    async fn find_customer(&self, customer_id: &str) -> AgentlensResult<Option<CustomerRecord>> {
        let url = self.table_url();
        info!(customer_id, table = %self.table, "Querying customer agents");

        let id_filter = format!("eq.{}", customer_id);
        let response = self
            .client
            .get(&url)
            .query(&[("select", "agents"), ("id", id_filter.as_str())])
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AgentlensError::store_connection_failed_with_source(e.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Data store rejected the query");
            return Err(AgentlensError::StoreRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AgentlensError::StoreResponseInvalid(e.to_string()))?;

        let rows: Vec<CustomerRecord> = serde_json::from_str(&body)
            .map_err(|e| AgentlensError::StoreResponseInvalid(e.to_string()))?;

        debug!(rows = rows.len(), "Data store returned rows");

        Ok(rows.into_iter().next())
    }
}
