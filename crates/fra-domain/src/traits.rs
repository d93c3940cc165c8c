//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Implementations live in other crates.

use crate::authority::{Authority, AuthorityError};
use crate::claim::{ClaimId, ClaimRecord, ClaimType};
use crate::status::Status;
use std::fmt;

/// Durable storage for claims
///
/// Implemented by the infrastructure layer (fra-store). Methods take `&self`
/// so one repository can be shared between threads; implementations
/// synchronise internally.
///
/// Writes use optimistic concurrency: [`save`](ClaimRepository::save)
/// succeeds only if the stored revision still equals `claim.revision()`, and
/// returns the new revision.
pub trait ClaimRepository {
    /// Store a newly submitted claim
    fn insert(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError>;

    /// Load a claim by ID
    fn load(&self, id: ClaimId) -> Result<Option<ClaimRecord>, RepositoryError>;

    /// Replace a stored claim if nobody else has written it since it was loaded
    fn save(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError>;

    /// List claims matching a filter, in no guaranteed order
    fn list(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRecord>, RepositoryError>;
}

impl<R: ClaimRepository + ?Sized> ClaimRepository for &R {
    fn insert(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError> {
        (**self).insert(claim)
    }

    fn load(&self, id: ClaimId) -> Result<Option<ClaimRecord>, RepositoryError> {
        (**self).load(id)
    }

    fn save(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError> {
        (**self).save(claim)
    }

    fn list(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRecord>, RepositoryError> {
        (**self).list(filter)
    }
}

/// Criteria for listing claims
///
/// Text fields match case-insensitively against the applicant's address.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    /// Only claims currently in one of these statuses (any status when empty)
    pub statuses: Vec<Status>,

    /// Filter by state
    pub state: Option<String>,

    /// Filter by district
    pub district: Option<String>,

    /// Filter by tehsil
    pub tehsil: Option<String>,

    /// Filter by Gram Panchayat
    pub gram_panchayat: Option<String>,

    /// Filter by claim type
    pub claim_type: Option<ClaimType>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl ClaimFilter {
    /// Whether a claim satisfies every criterion except `limit`
    pub fn matches(&self, claim: &ClaimRecord) -> bool {
        fn field_matches(want: &Option<String>, have: &str) -> bool {
            want.as_deref()
                .map_or(true, |w| w.trim().eq_ignore_ascii_case(have.trim()))
        }

        (self.statuses.is_empty() || self.statuses.contains(&claim.status()))
            && field_matches(&self.state, &claim.applicant.state)
            && field_matches(&self.district, &claim.applicant.district)
            && field_matches(&self.tehsil, &claim.applicant.tehsil)
            && field_matches(&self.gram_panchayat, &claim.applicant.gram_panchayat)
            && self.claim_type.map_or(true, |t| t == claim.claim_type)
    }
}

/// Errors reported by a [`ClaimRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No claim with this ID
    NotFound(ClaimId),

    /// A claim with this ID already exists
    AlreadyExists(ClaimId),

    /// The stored revision moved on since the claim was loaded
    ConcurrentModification {
        /// Claim being saved
        id: ClaimId,
        /// Revision the caller loaded
        expected: u64,
        /// Revision currently stored
        actual: u64,
    },

    /// Storage backend failure
    Backend(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::NotFound(id) => write!(f, "claim not found: {}", id),
            RepositoryError::AlreadyExists(id) => write!(f, "claim already exists: {}", id),
            RepositoryError::ConcurrentModification {
                id,
                expected,
                actual,
            } => write!(
                f,
                "claim {} was modified concurrently (loaded revision {}, stored revision {})",
                id, expected, actual
            ),
            RepositoryError::Backend(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Resolves a session token into the caller's role and jurisdiction
///
/// Credential handling is outside the core; implementations may wrap any
/// identity provider.
pub trait AuthorityContext {
    /// Resolve a session token
    fn resolve(&self, session_token: &str) -> Result<Authority, AuthorityError>;
}
