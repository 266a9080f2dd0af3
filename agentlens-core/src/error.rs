//! Error types for the Agentlens core library.
//!
//! Failures of the customer data store and of the configuration layer end a
//! run (or stop it from starting). Assistant API failures never show up here:
//! they are reported per assistant through `FetchOutcome`.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Store | Data store connection, query and response errors |
//! | E2001-E2099 | Config | Environment, config file, and validation errors |
//! | E9001-E9099 | General | Internal and IO errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// The main error type for the Agentlens core library.
#[derive(Debug, Error)]
pub enum AgentlensError {
    // ========================================================================
    // Store Errors (E1001-E1099)
    // ========================================================================
    /// Failed to establish a connection to the data store
    #[error("[E1001] Data store connection failed: {message}")]
    StoreConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The data store rejected or failed the query
    #[error("[E1002] Data store query failed: {0}")]
    StoreQueryFailed(String),

    /// The data store answered with a non-success HTTP status
    #[error("[E1003] Data store returned status {status}: {body}")]
    StoreRequestFailed { status: u16, body: String },

    /// The data store answered with a body that could not be decoded
    #[error("[E1004] Failed to decode data store response: {0}")]
    StoreResponseInvalid(String),

    /// Connection pool exhausted or closed
    #[error("[E1005] Data store pool unavailable: {0}")]
    StorePoolUnavailable(String),

    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Required configuration value is missing
    #[error("[E2001] Missing configuration: {0}")]
    MissingConfig(String),

    /// Configuration file parse error
    #[error("[E2002] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E2003] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// IO error, e.g. writing the report or reading the prompt
    #[error("[E9002] IO error: {0}")]
    IoError(String),
}

impl AgentlensError {
    pub fn store_connection_failed(message: impl Into<String>) -> Self {
        AgentlensError::StoreConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    pub fn store_connection_failed_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AgentlensError::StoreConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias for Agentlens operations.
pub type AgentlensResult<T> = Result<T, AgentlensError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<sqlx::Error> for AgentlensError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => AgentlensError::StorePoolUnavailable(err.to_string()),
            sqlx::Error::PoolClosed => {
                AgentlensError::StorePoolUnavailable("Connection pool is closed".to_string())
            }
            sqlx::Error::Configuration(_) | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                AgentlensError::store_connection_failed(err.to_string())
            }
            sqlx::Error::Database(db_err) => AgentlensError::StoreQueryFailed(db_err.to_string()),
            _ => AgentlensError::StoreQueryFailed(err.to_string()),
        }
    }
}

impl From<std::io::Error> for AgentlensError {
    fn from(err: std::io::Error) -> Self {
        AgentlensError::IoError(err.to_string())
    }
}

impl From<crate::db::DatabaseError> for AgentlensError {
    fn from(err: crate::db::DatabaseError) -> Self {
        match err {
            crate::db::DatabaseError::ConnectionFailed(e) => {
                AgentlensError::store_connection_failed_with_source("database pool", e)
            }
            crate::db::DatabaseError::InvalidConfig(msg) => AgentlensError::InvalidConfigValue {
                key: "store.database_url".to_string(),
                message: msg,
            },
        }
    }
}

impl From<crate::config::ConfigLoadError> for AgentlensError {
    fn from(err: crate::config::ConfigLoadError) -> Self {
        match err {
            crate::config::ConfigLoadError::MissingRequired(key) => {
                AgentlensError::MissingConfig(key)
            }
            crate::config::ConfigLoadError::InvalidValue { key, message } => {
                AgentlensError::InvalidConfigValue { key, message }
            }
            crate::config::ConfigLoadError::Config(e) => {
                AgentlensError::ConfigParseError(e.to_string())
            }
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl AgentlensError {
    /// Returns true if this error came from the customer data store.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            AgentlensError::StoreConnectionFailed { .. }
                | AgentlensError::StoreQueryFailed(_)
                | AgentlensError::StoreRequestFailed { .. }
                | AgentlensError::StoreResponseInvalid(_)
                | AgentlensError::StorePoolUnavailable(_)
        )
    }

    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AgentlensError::MissingConfig(_)
                | AgentlensError::ConfigParseError(_)
                | AgentlensError::InvalidConfigValue { .. }
        )
    }

    /// Returns true if running the same operation again might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AgentlensError::StoreConnectionFailed { .. }
                | AgentlensError::StorePoolUnavailable(_)
        ) || matches!(self, AgentlensError::StoreRequestFailed { status, .. } if *status >= 500)
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AgentlensError::StoreConnectionFailed { .. } => "E1001",
            AgentlensError::StoreQueryFailed(_) => "E1002",
            AgentlensError::StoreRequestFailed { .. } => "E1003",
            AgentlensError::StoreResponseInvalid(_) => "E1004",
            AgentlensError::StorePoolUnavailable(_) => "E1005",
            AgentlensError::MissingConfig(_) => "E2001",
            AgentlensError::ConfigParseError(_) => "E2002",
            AgentlensError::InvalidConfigValue { .. } => "E2003",
            AgentlensError::Internal(_) => "E9001",
            AgentlensError::IoError(_) => "E9002",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            AgentlensError::StoreConnectionFailed { .. } => {
                Some("Check that the data store is reachable and the store URL is correct")
            }
            AgentlensError::StoreRequestFailed { status, .. } if *status == 401 || *status == 403 => {
                Some("Check the service key (SUPABASE_SERVICE_ROLE_KEY)")
            }
            AgentlensError::StorePoolUnavailable(_) => {
                Some("The database is busy. Try again in a few seconds")
            }
            AgentlensError::MissingConfig(_) => {
                Some("Create a .env file or set the environment variable")
            }
            AgentlensError::ConfigParseError(_) => Some("Check the syntax of your agentlens.toml"),
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with its suggestion.
pub struct CliErrorDisplay<'a> {
    error: &'a AgentlensError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a AgentlensError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Main error message (already includes code)
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        if self.error.is_transient() {
            writeln!(f)?;
            writeln!(f, "  This error may be temporary. Try running the command again.")?;
        }

        Ok(())
    }
}
