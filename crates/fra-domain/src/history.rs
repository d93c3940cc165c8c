//! History module - immutable audit entries

use crate::authority::Role;
use crate::status::Status;
use crate::workflow::Action;

/// One applied transition in a claim's audit trail
///
/// Entries are never edited or removed. A correction is a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowEntry {
    /// Role the officer acted in
    pub role: Role,

    /// Officer who applied the action
    pub officer_id: String,

    /// Action applied
    pub action: Action,

    /// Status before the action
    pub from_status: Status,

    /// Status after the action
    pub to_status: Status,

    /// Officer remarks (may be empty where remarks are optional)
    pub remarks: String,

    /// When the action was applied (seconds since Unix epoch)
    pub timestamp: u64,
}
