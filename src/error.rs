//! Error types for the rolegrid toolkit

use thiserror::Error;

/// Unified error type for catalog loading, overlay reconciliation, payload
/// assembly, and role-service communication.
///
/// None of these errors are retried automatically and none are fatal to the
/// process: callers surface them as a notification and leave their state as
/// it was, so the operation can be re-attempted or abandoned.
#[derive(Error, Debug)]
pub enum RoleGridError {
    /// The module catalog or the role list could not be fetched
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A role create/update was not accepted by the role service
    #[error("Submit failed: {0}")]
    SubmitFailed(String),

    /// Client-side validation failed before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// A module id that does not exist in the overlay or catalog
    #[error("Unknown module id {0}")]
    UnknownModule(u64),

    /// A function id that does not exist under the given module
    #[error("Unknown function id {function_id} under module {module_id}")]
    UnknownFunction { module_id: u64, function_id: u64 },

    /// A sub-function id that does not exist under the given function
    #[error(
        "Unknown sub-function id {sub_function_id} under module {module_id}, function {function_id}"
    )]
    UnknownSubFunction {
        module_id: u64,
        function_id: u64,
        sub_function_id: u64,
    },

    /// A flat permission row addressed by a function name that has no row
    #[error("No permission row for function '{0}'")]
    UnknownRow(String),

    /// A display name that normalizes to an empty API key
    #[error("Invalid API key derived from '{0}'")]
    InvalidApiKey(String),

    /// An edit-session operation that requires a selected role
    #[error("No role is selected")]
    NoActiveRole,

    /// HTTP client construction or transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RoleGridError {
    /// Create a new catalog-unavailable error
    pub fn catalog_unavailable(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    /// Create a new submit-failed error
    pub fn submit_failed(msg: impl Into<String>) -> Self {
        Self::SubmitFailed(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias for operations that can result in a RoleGridError
pub type RoleGridResult<T> = Result<T, RoleGridError>;
