//! Status module - lifecycle states of a claim

use std::fmt;

/// Lifecycle state of a claim
///
/// Claims move forward through the review chain:
/// Gram Sabha → Subdivision → District. Three states are terminal:
/// `RejectedBySubdivision`, `TitleGranted` and `FinalRejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Filed by the claimant, awaiting Gram Sabha verification
    Submitted,

    /// Verified by the Gram Sabha officer
    VerifiedByGramSabha,

    /// Boundary drawn and confirmed by the Gram Sabha officer
    MappedByGramSabha,

    /// Sent up to the Subdivision level committee
    ForwardedToSubdivision,

    /// Subdivision officer has opened the claim
    UnderSubdivisionReview,

    /// Approved at Subdivision level
    ApprovedBySubdivision,

    /// Rejected at Subdivision level (terminal)
    RejectedBySubdivision,

    /// Sent up to the District level committee
    ForwardedToDistrict,

    /// District officer has opened the claim
    UnderDistrictReview,

    /// Title granted by the District (terminal)
    TitleGranted,

    /// Rejected by the District (terminal)
    FinalRejected,
}

impl Status {
    /// Every status, in review-chain order
    pub const ALL: [Status; 11] = [
        Status::Submitted,
        Status::VerifiedByGramSabha,
        Status::MappedByGramSabha,
        Status::ForwardedToSubdivision,
        Status::UnderSubdivisionReview,
        Status::ApprovedBySubdivision,
        Status::RejectedBySubdivision,
        Status::ForwardedToDistrict,
        Status::UnderDistrictReview,
        Status::TitleGranted,
        Status::FinalRejected,
    ];

    /// Status assigned to a freshly filed claim
    pub const INITIAL: Status = Status::Submitted;

    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "submitted",
            Status::VerifiedByGramSabha => "verified_by_gram_sabha",
            Status::MappedByGramSabha => "mapped_by_gram_sabha",
            Status::ForwardedToSubdivision => "forwarded_to_subdivision",
            Status::UnderSubdivisionReview => "under_subdivision_review",
            Status::ApprovedBySubdivision => "approved_by_subdivision",
            Status::RejectedBySubdivision => "rejected_by_subdivision",
            Status::ForwardedToDistrict => "forwarded_to_district",
            Status::UnderDistrictReview => "under_district_review",
            Status::TitleGranted => "title_granted",
            Status::FinalRejected => "final_rejected",
        }
    }

    /// Parse a status from its string form
    ///
    /// Accepts both the snake_case storage form and the CamelCase variant name.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Status::ALL
            .into_iter()
            .find(|status| status.as_str().replace('_', "") == normalized)
    }

    /// Whether no further transition can leave this status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::RejectedBySubdivision | Status::TitleGranted | Status::FinalRejected
        )
    }

    /// Whether this is one of the rejection outcomes
    pub fn is_rejection(&self) -> bool {
        matches!(self, Status::RejectedBySubdivision | Status::FinalRejected)
    }

    /// Whether the Gram Sabha officer may still edit the claim boundary
    pub fn allows_boundary_edit(&self) -> bool {
        matches!(self, Status::VerifiedByGramSabha | Status::MappedByGramSabha)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_str() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_variant_names() {
        assert_eq!(Status::parse("MappedByGramSabha"), Some(Status::MappedByGramSabha));
        assert_eq!(Status::parse("title-granted"), Some(Status::TitleGranted));
        assert_eq!(Status::parse("granted"), None);
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<Status> = Status::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![Status::RejectedBySubdivision, Status::TitleGranted, Status::FinalRejected]
        );
        assert!(!Status::TitleGranted.is_rejection());
        assert!(Status::FinalRejected.is_rejection());
    }

    #[test]
    fn test_boundary_edit_window() {
        assert!(!Status::Submitted.allows_boundary_edit());
        assert!(Status::VerifiedByGramSabha.allows_boundary_edit());
        assert!(Status::MappedByGramSabha.allows_boundary_edit());
        assert!(!Status::ForwardedToSubdivision.allows_boundary_edit());
    }
}
