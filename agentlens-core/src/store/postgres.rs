use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::db::{Database, DatabaseConfig};
use crate::error::AgentlensResult;
use crate::models::CustomerRecord;

use super::CustomerStore;

/// Customer lookups over a direct Postgres connection.
pub struct PgCustomerStore {
    db: Database,
    query: String,
}

impl PgCustomerStore {
    /// `table` must already be validated as a plain identifier.
    pub fn new(db: Database, table: &str) -> Self {
        Self {
            db,
            query: select_agents_query(table),
        }
    }

    pub fn from_config(config: &StoreConfig) -> AgentlensResult<Self> {
        let db = Database::connect_lazy(&DatabaseConfig::from_store_config(config))?;
        Ok(Self::new(db, &config.table))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

// `id::text` compares the identifier as given, so malformed ids reach the
// database as a plain mismatch instead of a cast error.
fn select_agents_query(table: &str) -> String {
    format!("SELECT agents FROM {} WHERE id::text = $1 LIMIT 1", table)
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    fn backend_name(&self) -> &str {
        "postgres"
    }

    async fn find_customer(&self, customer_id: &str) -> AgentlensResult<Option<CustomerRecord>> {
        info!(customer_id, "Querying customer agents");

        let record = sqlx::query_as::<_, CustomerRecord>(&self.query)
            .bind(customer_id)
            .fetch_optional(self.db.pool())
            .await?;

        debug!(found = record.is_some(), "Customer query finished");
        Ok(record)
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
