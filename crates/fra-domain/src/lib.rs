//! FRA Domain Layer
//!
//! This crate contains the core business logic and domain model for Forest
//! Rights Act claim adjudication. Apart from `uuid` it has no external
//! dependencies and defines the value objects, the claim state machine, the
//! boundary geometry, and the trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Claim**: a forest-rights request filed by an individual or a community
//! - **Status**: where a claim currently sits in the review chain
//! - **Workflow history**: append-only audit log of every applied transition
//! - **Authority**: the acting officer's role and jurisdiction
//! - **Boundary**: the shapes drawn by a Gram Sabha officer and their computed area
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations (storage, credential lookup) live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authority;
pub mod boundary;
pub mod claim;
pub mod geometry;
pub mod history;
pub mod status;
pub mod traits;
pub mod workflow;

// Re-exports for convenience
pub use authority::{Authority, AuthorityError, Jurisdiction, Role};
pub use boundary::{Area, AreaType, MapData, Shape, ShapeInput};
pub use claim::{Applicant, AreaUnit, ClaimId, ClaimRecord, ClaimType, LandDetails};
pub use geometry::{GeometryError, LatLng};
pub use history::WorkflowEntry;
pub use status::Status;
pub use workflow::{Action, Requirement, Transition, TransitionError};
