//! Claim module - the forest-rights claim aggregate

use crate::boundary::MapData;
use crate::history::WorkflowEntry;
use crate::status::Status;
use std::fmt;

/// Unique identifier for a claim based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so claims list in filing order
/// - 128-bit uniqueness
/// - No coordination required for distributed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use fra_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ClaimId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use fra_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let parsed = ClaimId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid claim id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Kind of forest right being claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    /// Individual forest right
    Individual,

    /// Community forest right
    Community,
}

impl ClaimType {
    /// Get the claim type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Individual => "individual",
            ClaimType::Community => "community",
        }
    }

    /// Parse a claim type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "individual" | "ifr" => Some(ClaimType::Individual),
            "community" | "cfr" => Some(ClaimType::Community),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who filed the claim and where
///
/// All fields are free-form text as entered; no cross-validation is done.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Applicant {
    /// Applicant or community name
    pub name: String,

    /// Phone or other contact
    pub contact: String,

    /// Identity document number
    pub identity_number: String,

    /// Village
    pub village: String,

    /// Gram Panchayat
    pub gram_panchayat: String,

    /// Tehsil (subdivision)
    pub tehsil: String,

    /// District
    pub district: String,

    /// State
    pub state: String,
}

/// Unit the declared area was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AreaUnit {
    /// Hectares
    #[default]
    Hectares,

    /// Acres
    Acres,
}

impl AreaUnit {
    /// Get the unit name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::Hectares => "hectares",
            AreaUnit::Acres => "acres",
        }
    }

    /// Parse a unit from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hectares" | "hectare" | "ha" => Some(AreaUnit::Hectares),
            "acres" | "acre" | "ac" => Some(AreaUnit::Acres),
            _ => None,
        }
    }
}

/// Land as declared on the claim form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandDetails {
    /// Declared area, in `unit`
    pub declared_area: f64,

    /// Unit of `declared_area`
    pub unit: AreaUnit,

    /// Free-text description of the land
    pub description: String,

    /// Forest compartment number, when known
    pub compartment_number: Option<String>,
}

/// A forest-rights claim and its review trail
///
/// `status`, `history` and `map_data` are only reachable through methods so
/// that the status always matches the last history entry and the history is
/// append-only. Transitions go through [`ClaimRecord::apply`](crate::workflow).
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    /// Unique identifier
    pub id: ClaimId,

    /// Applicant details
    pub applicant: Applicant,

    /// Individual or community claim
    pub claim_type: ClaimType,

    /// Declared land details
    pub land: LandDetails,

    /// When the claim was filed (seconds since Unix epoch)
    pub submitted_at: u64,

    status: Status,
    history: Vec<WorkflowEntry>,
    map_data: Option<MapData>,
    revision: u64,
}

impl ClaimRecord {
    /// Create a freshly submitted claim
    pub fn new(
        id: ClaimId,
        applicant: Applicant,
        claim_type: ClaimType,
        land: LandDetails,
        submitted_at: u64,
    ) -> Self {
        Self {
            id,
            applicant,
            claim_type,
            land,
            submitted_at,
            status: Status::INITIAL,
            history: Vec::new(),
            map_data: None,
            revision: 0,
        }
    }

    /// Reassemble a claim from stored parts
    ///
    /// Fails when the stored status does not match the last history entry.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ClaimId,
        applicant: Applicant,
        claim_type: ClaimType,
        land: LandDetails,
        submitted_at: u64,
        status: Status,
        history: Vec<WorkflowEntry>,
        map_data: Option<MapData>,
        revision: u64,
    ) -> Result<Self, String> {
        let expected = history.last().map(|e| e.to_status).unwrap_or(Status::INITIAL);
        if status != expected {
            return Err(format!(
                "claim {} has status {} but history ends at {}",
                id, status, expected
            ));
        }

        Ok(Self {
            id,
            applicant,
            claim_type,
            land,
            submitted_at,
            status,
            history,
            map_data,
            revision,
        })
    }

    /// Current lifecycle status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Full audit trail, oldest first
    pub fn history(&self) -> &[WorkflowEntry] {
        &self.history
    }

    /// Most recent audit entry
    pub fn last_entry(&self) -> Option<&WorkflowEntry> {
        self.history.last()
    }

    /// Saved boundary, if any
    pub fn map_data(&self) -> Option<&MapData> {
        self.map_data.as_ref()
    }

    /// Storage revision this snapshot was read at (0 before first save)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Authoritative reason for a rejected claim
    pub fn rejection_reason(&self) -> Option<&str> {
        if !self.status.is_rejection() {
            return None;
        }
        self.last_entry().map(|e| e.remarks.as_str())
    }

    /// Replace the boundary wholesale
    pub fn set_map_data(&mut self, map_data: MapData) {
        self.map_data = Some(map_data);
    }

    /// Remove the boundary, returning the previous one
    pub fn clear_map_data(&mut self) -> Option<MapData> {
        self.map_data.take()
    }

    /// Record the revision assigned by the repository after a save
    pub fn mark_saved(&mut self, revision: u64) {
        self.revision = revision;
    }

    pub(crate) fn push_entry(&mut self, entry: WorkflowEntry) {
        self.status = entry.to_status;
        self.history.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::Role;
    use crate::workflow::Action;

    fn sample_claim() -> ClaimRecord {
        ClaimRecord::new(
            ClaimId::new(),
            Applicant {
                name: "Ramesh Gond".to_string(),
                district: "Mandla".to_string(),
                ..Default::default()
            },
            ClaimType::Individual,
            LandDetails {
                declared_area: 1.5,
                ..Default::default()
            },
            1_700_000_000,
        )
    }

    #[test]
    fn test_claim_id_ordering() {
        let id1 = ClaimId::from_value(1000);
        let id2 = ClaimId::from_value(2000);
        assert!(id1 < id2);
    }

    #[test]
    fn test_claim_id_display_and_parse() {
        let id = ClaimId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);
        assert_eq!(ClaimId::from_string(&id_str).unwrap(), id);
    }

    #[test]
    fn test_claim_id_invalid_string() {
        assert!(ClaimId::from_string("not-a-valid-uuid").is_err());
        assert!(ClaimId::from_string("").is_err());
    }

    #[test]
    fn test_new_claim_is_submitted() {
        let claim = sample_claim();
        assert_eq!(claim.status(), Status::Submitted);
        assert!(claim.history().is_empty());
        assert!(claim.map_data().is_none());
        assert_eq!(claim.revision(), 0);
        assert!(claim.rejection_reason().is_none());
    }

    #[test]
    fn test_restore_checks_status_against_history() {
        let claim = sample_claim();
        let entry = WorkflowEntry {
            role: Role::GramSabha,
            officer_id: "gs-1".to_string(),
            action: Action::Verify,
            from_status: Status::Submitted,
            to_status: Status::VerifiedByGramSabha,
            remarks: String::new(),
            timestamp: 1,
        };

        let ok = ClaimRecord::restore(
            claim.id,
            claim.applicant.clone(),
            claim.claim_type,
            claim.land.clone(),
            claim.submitted_at,
            Status::VerifiedByGramSabha,
            vec![entry.clone()],
            None,
            3,
        );
        assert_eq!(ok.unwrap().revision(), 3);

        let bad = ClaimRecord::restore(
            claim.id,
            claim.applicant,
            claim.claim_type,
            claim.land,
            claim.submitted_at,
            Status::Submitted,
            vec![entry],
            None,
            3,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(ClaimType::parse("Community"), Some(ClaimType::Community));
        assert_eq!(ClaimType::parse("cfr"), Some(ClaimType::Community));
        assert_eq!(AreaUnit::parse("ha"), Some(AreaUnit::Hectares));
        assert_eq!(AreaUnit::parse("Acres"), Some(AreaUnit::Acres));
        assert_eq!(AreaUnit::parse("bigha"), None);
    }
}
