pub mod postgres;
pub mod rest;

pub use postgres::PgCustomerStore;
pub use rest::RestCustomerStore;

use async_trait::async_trait;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::AgentlensResult;
use crate::models::CustomerRecord;

/// Read access to the customer records.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    fn backend_name(&self) -> &str;

    /// Returns the first row whose `id` equals `customer_id`, projected to
    /// its `agents` column. The identifier is forwarded unvalidated.
    async fn find_customer(&self, customer_id: &str) -> AgentlensResult<Option<CustomerRecord>>;

    /// Releases held connections. The store must not be used afterwards.
    async fn close(&self) {}
}

pub type DynCustomerStore = Box<dyn CustomerStore>;

pub fn build_store(config: &StoreConfig) -> AgentlensResult<DynCustomerStore> {
    match config.backend {
        StoreBackend::Rest => Ok(Box::new(RestCustomerStore::new(config)?)),
        StoreBackend::Postgres => Ok(Box::new(PgCustomerStore::from_config(config)?)),
    }
}
