#![allow(
    clippy::needless_borrows_for_generic_args,
    clippy::derivable_impls,
    clippy::type_complexity,
    clippy::len_zero,
    dead_code
)]

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod services;
pub mod store;

pub use assistant::{AssistantSource, DynAssistantSource, FetchOutcome, VapiClient, VAPI_API_BASE};
pub use config::{
    get_config_dir, mask_password, mask_secret, AgentlensConfig, AssistantApiConfig,
    ConfigLoadError, DisplayConfig, LoggingConfig, StoreBackend, StoreConfig,
};
pub use db::{Database, DatabaseConfig, DatabaseError};
pub use error::{AgentlensError, AgentlensResult, CliErrorDisplay};
pub use models::{
    parse_agent_ids, truncate_chars, AgentList, AssistantConfig, AssistantModel,
    AssistantSummary, CustomerRecord,
};
pub use report::{ConsoleReporter, InspectionObserver};
pub use services::{AgentFetch, InspectionReport, Inspector, LookupOutcome};
pub use store::{build_store, CustomerStore, DynCustomerStore, PgCustomerStore, RestCustomerStore};
