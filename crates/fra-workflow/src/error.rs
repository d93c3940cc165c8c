//! Workflow error types

use fra_domain::traits::RepositoryError;
use fra_domain::{Action, AuthorityError, ClaimId, GeometryError, Status, TransitionError};
use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors returned by workflow and boundary operations
///
/// No operation commits anything when it returns one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// The action is not legal from the claim's current status
    #[error("Invalid transition: '{action}' is not allowed from '{status}'")]
    InvalidTransition {
        /// Current status
        status: Status,
        /// Attempted action
        action: Action,
    },

    /// Caller lacks the role or jurisdiction
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller-correctable precondition unmet (remarks, boundary)
    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    /// No shapes supplied for a boundary save
    #[error("Boundary must contain at least one shape")]
    EmptyBoundary,

    /// A supplied shape cannot be turned into an area
    #[error("Invalid geometry in shape '{shape}': {reason}")]
    InvalidGeometry {
        /// Shape identifier or position
        shape: String,
        /// What is wrong with it
        reason: GeometryError,
    },

    /// Two shapes in one boundary were given the same identifier
    #[error("Duplicate area id in boundary: '{0}'")]
    DuplicateAreaId(String),

    /// Someone else saved the claim first; reload and retry
    #[error("Claim {id} was modified concurrently (loaded revision {expected}, now {actual})")]
    ConcurrentModification {
        /// Claim ID
        id: ClaimId,
        /// Revision the caller loaded
        expected: u64,
        /// Revision now stored
        actual: u64,
    },

    /// Unknown claim ID
    #[error("Claim not found: {0}")]
    NotFound(ClaimId),

    /// Session token could not be resolved
    #[error("Unauthenticated: session token not recognised")]
    Unauthenticated,

    /// Submission rejected before it was stored
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    /// Storage failure
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl WorkflowError {
    /// Whether reloading the claim and retrying may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::ConcurrentModification { .. })
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::InvalidTransition { .. } => "invalid_transition",
            WorkflowError::Unauthorized(_) => "unauthorized",
            WorkflowError::MissingPrecondition(_) => "missing_precondition",
            WorkflowError::EmptyBoundary => "empty_boundary",
            WorkflowError::InvalidGeometry { .. } => "invalid_geometry",
            WorkflowError::DuplicateAreaId(_) => "duplicate_area_id",
            WorkflowError::ConcurrentModification { .. } => "concurrent_modification",
            WorkflowError::NotFound(_) => "not_found",
            WorkflowError::Unauthenticated => "unauthenticated",
            WorkflowError::InvalidClaim(_) => "invalid_claim",
            WorkflowError::Repository(_) => "repository",
        }
    }
}

impl From<TransitionError> for WorkflowError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::InvalidTransition { status, action } => {
                WorkflowError::InvalidTransition { status, action }
            }
            TransitionError::Unauthorized(reason) => WorkflowError::Unauthorized(reason),
            TransitionError::MissingPrecondition(reason) => {
                WorkflowError::MissingPrecondition(reason)
            }
        }
    }
}

impl From<RepositoryError> for WorkflowError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => WorkflowError::NotFound(id),
            RepositoryError::ConcurrentModification {
                id,
                expected,
                actual,
            } => WorkflowError::ConcurrentModification {
                id,
                expected,
                actual,
            },
            other => WorkflowError::Repository(other),
        }
    }
}

impl From<AuthorityError> for WorkflowError {
    fn from(e: AuthorityError) -> Self {
        match e {
            AuthorityError::Unauthenticated => WorkflowError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_concurrency_errors_are_retryable() {
        let id = ClaimId::new();
        assert!(WorkflowError::ConcurrentModification {
            id,
            expected: 1,
            actual: 2
        }
        .is_retryable());
        assert!(!WorkflowError::Unauthorized("x".to_string()).is_retryable());
        assert!(!WorkflowError::NotFound(id).is_retryable());
    }

    #[test]
    fn test_repository_error_mapping() {
        let id = ClaimId::new();
        assert_eq!(
            WorkflowError::from(RepositoryError::NotFound(id)),
            WorkflowError::NotFound(id)
        );
        assert_eq!(
            WorkflowError::from(RepositoryError::Backend("disk full".to_string())).kind(),
            "repository"
        );
    }

    #[test]
    fn test_transition_error_mapping_keeps_kind() {
        let err: WorkflowError = TransitionError::MissingPrecondition("remarks".to_string()).into();
        assert_eq!(err.kind(), "missing_precondition");
        assert!(err.to_string().contains("remarks"));
    }
}
