//! Workflow module - the claim state machine
//!
//! Legal moves are listed once in [`TRANSITIONS`], keyed by
//! `(from status, action)`. Everything else (the engine, the CLI, the
//! "which buttons can this officer press" query) is derived from that table.

use crate::authority::{Authority, Role};
use crate::claim::ClaimRecord;
use crate::history::WorkflowEntry;
use crate::status::Status;
use std::fmt;

/// Action an officer can take on a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Gram Sabha confirms the claim is genuine
    Verify,

    /// Gram Sabha confirms the drawn boundary
    SaveMap,

    /// Send the claim to the next level
    Forward,

    /// Open a forwarded claim for review
    BeginReview,

    /// Approve at the current level
    Approve,

    /// Reject at the current level
    Reject,
}

impl Action {
    /// Every action
    pub const ALL: [Action; 6] = [
        Action::Verify,
        Action::SaveMap,
        Action::Forward,
        Action::BeginReview,
        Action::Approve,
        Action::Reject,
    ];

    /// Get the action name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Verify => "verify",
            Action::SaveMap => "save_map",
            Action::Forward => "forward",
            Action::BeginReview => "begin_review",
            Action::Approve => "approve",
            Action::Reject => "reject",
        }
    }

    /// Parse an action from a string
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "verify" => Some(Action::Verify),
            "save_map" | "savemap" => Some(Action::SaveMap),
            "forward" => Some(Action::Forward),
            "begin_review" | "beginreview" | "review" => Some(Action::BeginReview),
            "approve" => Some(Action::Approve),
            "reject" => Some(Action::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid action: {}", s))
    }
}

/// Caller-correctable preconditions of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Remarks must be non-blank
    pub remarks: bool,

    /// A saved boundary must be present
    pub map: bool,
}

impl Requirement {
    const NONE: Requirement = Requirement {
        remarks: false,
        map: false,
    };
    const REMARKS: Requirement = Requirement {
        remarks: true,
        map: false,
    };
    const MAP: Requirement = Requirement {
        remarks: false,
        map: true,
    };
    const MAP_AND_REMARKS: Requirement = Requirement {
        remarks: true,
        map: true,
    };
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status the claim must be in
    pub from: Status,

    /// Action being applied
    pub action: Action,

    /// Role allowed to apply it
    pub role: Role,

    /// Preconditions
    pub requirement: Requirement,

    /// Resulting status
    pub to: Status,
}

const fn row(
    from: Status,
    action: Action,
    role: Role,
    requirement: Requirement,
    to: Status,
) -> Transition {
    Transition {
        from,
        action,
        role,
        requirement,
        to,
    }
}

/// The complete set of legal transitions
pub static TRANSITIONS: [Transition; 10] = [
    row(Status::Submitted, Action::Verify, Role::GramSabha, Requirement::NONE, Status::VerifiedByGramSabha),
    row(Status::VerifiedByGramSabha, Action::SaveMap, Role::GramSabha, Requirement::MAP, Status::MappedByGramSabha),
    row(Status::MappedByGramSabha, Action::Forward, Role::GramSabha, Requirement::MAP_AND_REMARKS, Status::ForwardedToSubdivision),
    row(Status::ForwardedToSubdivision, Action::BeginReview, Role::Subdivision, Requirement::NONE, Status::UnderSubdivisionReview),
    row(Status::UnderSubdivisionReview, Action::Approve, Role::Subdivision, Requirement::NONE, Status::ApprovedBySubdivision),
    row(Status::UnderSubdivisionReview, Action::Reject, Role::Subdivision, Requirement::REMARKS, Status::RejectedBySubdivision),
    row(Status::ApprovedBySubdivision, Action::Forward, Role::Subdivision, Requirement::REMARKS, Status::ForwardedToDistrict),
    row(Status::ForwardedToDistrict, Action::BeginReview, Role::District, Requirement::NONE, Status::UnderDistrictReview),
    row(Status::UnderDistrictReview, Action::Approve, Role::District, Requirement::NONE, Status::TitleGranted),
    row(Status::UnderDistrictReview, Action::Reject, Role::District, Requirement::REMARKS, Status::FinalRejected),
];

/// Find the transition for `(status, action)`
pub fn lookup(status: Status, action: Action) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|t| t.from == status && t.action == action)
}

/// Transitions leaving `status`
pub fn transitions_from(status: Status) -> impl Iterator<Item = &'static Transition> {
    TRANSITIONS.iter().filter(move |t| t.from == status)
}

/// Why a transition was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `(status, action)` is not in the table
    InvalidTransition {
        /// Current status
        status: Status,
        /// Attempted action
        action: Action,
    },

    /// Wrong role, or jurisdiction does not cover the claim
    Unauthorized(String),

    /// A caller-correctable precondition is unmet
    MissingPrecondition(String),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::InvalidTransition { status, action } => {
                write!(f, "action '{}' is not allowed from status '{}'", action, status)
            }
            TransitionError::Unauthorized(reason) => write!(f, "unauthorized: {}", reason),
            TransitionError::MissingPrecondition(reason) => {
                write!(f, "missing precondition: {}", reason)
            }
        }
    }
}

impl std::error::Error for TransitionError {}

impl ClaimRecord {
    /// Check that `authority` may take `action` on this claim right now
    ///
    /// Checks run in a fixed order: table membership, then role, then
    /// jurisdiction. Preconditions are not checked here.
    pub fn authorize(
        &self,
        action: Action,
        authority: &Authority,
    ) -> Result<&'static Transition, TransitionError> {
        let transition =
            lookup(self.status(), action).ok_or(TransitionError::InvalidTransition {
                status: self.status(),
                action,
            })?;

        if authority.role != transition.role {
            return Err(TransitionError::Unauthorized(format!(
                "'{}' from '{}' requires role {}, caller is {}",
                action,
                self.status(),
                transition.role,
                authority.role
            )));
        }

        if !authority.covers(&self.applicant) {
            return Err(TransitionError::Unauthorized(format!(
                "claim {} is outside {}",
                self.id, authority.jurisdiction
            )));
        }

        Ok(transition)
    }

    /// Apply an action, returning the updated snapshot
    ///
    /// On success the returned claim carries exactly one new history entry and
    /// its status equals that entry's `to_status`. On failure `self` is
    /// untouched.
    pub fn apply(
        &self,
        action: Action,
        authority: &Authority,
        remarks: &str,
        timestamp: u64,
    ) -> Result<ClaimRecord, TransitionError> {
        let transition = self.authorize(action, authority)?;
        let remarks = remarks.trim();

        if transition.requirement.map && self.map_data().is_none() {
            return Err(TransitionError::MissingPrecondition(
                "a saved boundary is required".to_string(),
            ));
        }
        if transition.requirement.remarks && remarks.is_empty() {
            return Err(TransitionError::MissingPrecondition(format!(
                "remarks are required to {}",
                action
            )));
        }

        let mut next = self.clone();
        next.push_entry(WorkflowEntry {
            role: authority.role,
            officer_id: authority.officer_id.clone(),
            action,
            from_status: transition.from,
            to_status: transition.to,
            remarks: remarks.to_string(),
            timestamp,
        });
        Ok(next)
    }

    /// Actions `authority` is allowed to take now, ignoring preconditions
    pub fn available_actions(&self, authority: &Authority) -> Vec<Action> {
        transitions_from(self.status())
            .filter(|t| self.authorize(t.action, authority).is_ok())
            .map(|t| t.action)
            .collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::authority::Jurisdiction;
    use crate::claim::{Applicant, ClaimId, ClaimType, LandDetails};
    use proptest::prelude::*;

    fn any_action() -> impl Strategy<Value = Action> {
        prop::sample::select(Action::ALL.to_vec())
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(vec![Role::GramSabha, Role::Subdivision, Role::District, Role::State])
    }

    proptest! {
        /// Property: after any sequence of attempts, status equals the last
        /// entry's to_status and failed attempts leave the claim unchanged
        #[test]
        fn test_status_tracks_history(
            steps in prop::collection::vec((any_action(), any_role(), prop::bool::ANY), 0..40)
        ) {
            let applicant = Applicant {
                district: "Balaghat".to_string(),
                ..Default::default()
            };
            let mut claim = ClaimRecord::new(
                ClaimId::new(),
                applicant,
                ClaimType::Community,
                LandDetails::default(),
                0,
            );

            for (ts, (action, role, with_remarks)) in steps.into_iter().enumerate() {
                let authority = Authority::new(
                    "officer",
                    role,
                    Jurisdiction::District { district: "Balaghat".to_string() },
                );
                let remarks = if with_remarks { "noted" } else { "" };
                let before = claim.clone();

                match claim.apply(action, &authority, remarks, ts as u64) {
                    Ok(next) => {
                        prop_assert_eq!(next.history().len(), before.history().len() + 1);
                        prop_assert_eq!(&next.history()[..before.history().len()], before.history());
                        claim = next;
                    }
                    Err(_) => prop_assert_eq!(&claim, &before),
                }

                let expected = claim.last_entry().map(|e| e.to_status).unwrap_or(Status::INITIAL);
                prop_assert_eq!(claim.status(), expected);
            }
        }
    }
}
