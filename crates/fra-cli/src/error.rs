//! Error types for the CLI application.

use fra_domain::AuthorityError;
use fra_store::StoreError;
use fra_workflow::WorkflowError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workflow refused the operation
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No session token supplied
    #[error("No session token. Pass --token or set FRA_TOKEN.")]
    NoToken,
}

impl From<AuthorityError> for CliError {
    fn from(e: AuthorityError) -> Self {
        CliError::Workflow(e.into())
    }
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Workflow(e) if e.is_retryable() => 75,
            CliError::Workflow(WorkflowError::Unauthenticated | WorkflowError::Unauthorized(_))
            | CliError::NoToken => 77,
            CliError::Workflow(
                WorkflowError::EmptyBoundary
                | WorkflowError::InvalidGeometry { .. }
                | WorkflowError::DuplicateAreaId(_)
                | WorkflowError::MissingPrecondition(_)
                | WorkflowError::InvalidClaim(_),
            )
            | CliError::InvalidInput(_) => 64,
            CliError::Config(_) | CliError::Toml(_) => 78,
            _ => 1,
        }
    }
}
