//! FRA Workflow
//!
//! Applies officer actions and boundary edits to stored claims.
//!
//! The workflow layer provides:
//! - [`WorkflowEngine`]: load a claim, authorize the caller, run the
//!   transition, and save it back in one optimistic read-modify-write
//! - [`BoundaryStore`]: validate drawn shapes, compute their areas, and
//!   replace a claim's boundary wholesale
//! - [`StaticAuthority`]: a token table implementing `AuthorityContext`
//!
//! A failed call never leaves a partial write behind. A save that loses a race
//! with another officer fails with [`WorkflowError::ConcurrentModification`];
//! the caller reloads and decides whether to try again.
//!
//! # Examples
//!
//! ```
//! use fra_domain::{Action, Applicant, Authority, ClaimType, Jurisdiction, LandDetails, Role};
//! use fra_store::MemoryStore;
//! use fra_workflow::{ClaimApplication, WorkflowConfig, WorkflowEngine};
//!
//! let engine = WorkflowEngine::new(MemoryStore::new(), WorkflowConfig::default());
//! let claim = engine.submit_claim(ClaimApplication {
//!     applicant: Applicant {
//!         name: "Budhram".to_string(),
//!         gram_panchayat: "Chada".to_string(),
//!         district: "Dindori".to_string(),
//!         ..Default::default()
//!     },
//!     claim_type: ClaimType::Individual,
//!     land: LandDetails { declared_area: 1.0, ..Default::default() },
//! }).unwrap();
//!
//! let officer = Authority::new("gs-7", Role::GramSabha, Jurisdiction::GramPanchayat {
//!     district: "Dindori".to_string(),
//!     gram_panchayat: "Chada".to_string(),
//! });
//! let verified = engine.apply(claim.id, Action::Verify, &officer, "").unwrap();
//! assert_eq!(verified.history().len(), 1);
//! ```

#![warn(missing_docs)]

mod authority;
mod boundary;
mod config;
mod engine;
mod error;

pub use authority::StaticAuthority;
pub use boundary::BoundaryStore;
pub use config::WorkflowConfig;
pub use engine::{ClaimApplication, WorkflowEngine};
pub use error::{Result, WorkflowError};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
