//! Authority module - acting officer role and jurisdiction
//!
//! The core never reads credentials itself. Callers resolve a session token
//! through an [`AuthorityContext`](crate::traits::AuthorityContext) and pass the
//! resulting [`Authority`] into every command.

use crate::claim::Applicant;
use std::fmt;

/// Reviewing authority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Gram Sabha officer (village level)
    GramSabha,

    /// Subdivision level committee officer
    Subdivision,

    /// District level committee officer
    District,

    /// State/National oversight (read-only in the workflow)
    State,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::GramSabha => "gram_sabha",
            Role::Subdivision => "subdivision",
            Role::District => "district",
            Role::State => "state",
        }
    }

    /// Parse a role from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "gram_sabha" | "gramsabha" => Some(Role::GramSabha),
            "subdivision" | "sdlc" => Some(Role::Subdivision),
            "district" | "dlc" => Some(Role::District),
            "state" | "national" => Some(Role::State),
            _ => None,
        }
    }

    /// Whether an officer in this role may hold `jurisdiction`
    ///
    /// A role may be scoped to its own level or narrower, never wider.
    pub fn accepts(&self, jurisdiction: &Jurisdiction) -> bool {
        jurisdiction.level() <= self.level()
    }

    fn level(&self) -> u8 {
        match self {
            Role::GramSabha => 0,
            Role::Subdivision => 1,
            Role::District => 2,
            Role::State => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// Administrative area an officer may act on
///
/// Names are compared case-insensitively after trimming, since claim addresses
/// are free-form text entered by applicants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jurisdiction {
    /// A single Gram Panchayat within a district
    GramPanchayat {
        /// District name
        district: String,
        /// Gram Panchayat name
        gram_panchayat: String,
    },

    /// A subdivision (tehsil) within a district
    Subdivision {
        /// District name
        district: String,
        /// Tehsil / subdivision name
        tehsil: String,
    },

    /// A whole district
    District {
        /// District name
        district: String,
    },

    /// A whole state
    State {
        /// State name
        state: String,
    },
}

impl Jurisdiction {
    fn level(&self) -> u8 {
        match self {
            Jurisdiction::GramPanchayat { .. } => 0,
            Jurisdiction::Subdivision { .. } => 1,
            Jurisdiction::District { .. } => 2,
            Jurisdiction::State { .. } => 3,
        }
    }

    /// Whether this jurisdiction contains the applicant's declared address
    pub fn covers(&self, applicant: &Applicant) -> bool {
        match self {
            Jurisdiction::GramPanchayat {
                district,
                gram_panchayat,
            } => {
                same_place(district, &applicant.district)
                    && same_place(gram_panchayat, &applicant.gram_panchayat)
            }
            Jurisdiction::Subdivision { district, tehsil } => {
                same_place(district, &applicant.district) && same_place(tehsil, &applicant.tehsil)
            }
            Jurisdiction::District { district } => same_place(district, &applicant.district),
            Jurisdiction::State { state } => same_place(state, &applicant.state),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jurisdiction::GramPanchayat {
                district,
                gram_panchayat,
            } => write!(f, "gram panchayat {} ({})", gram_panchayat, district),
            Jurisdiction::Subdivision { district, tehsil } => {
                write!(f, "subdivision {} ({})", tehsil, district)
            }
            Jurisdiction::District { district } => write!(f, "district {}", district),
            Jurisdiction::State { state } => write!(f, "state {}", state),
        }
    }
}

fn same_place(a: &str, b: &str) -> bool {
    let a = a.trim();
    !a.is_empty() && a.eq_ignore_ascii_case(b.trim())
}

/// Resolved identity of the caller for a single command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    /// Officer identifier recorded in the audit trail
    pub officer_id: String,

    /// Role the officer acts in
    pub role: Role,

    /// Area the officer may act on
    pub jurisdiction: Jurisdiction,
}

impl Authority {
    /// Create a new authority
    pub fn new(officer_id: impl Into<String>, role: Role, jurisdiction: Jurisdiction) -> Self {
        Self {
            officer_id: officer_id.into(),
            role,
            jurisdiction,
        }
    }

    /// Whether this authority may act on a claim filed by `applicant`
    pub fn covers(&self, applicant: &Applicant) -> bool {
        self.jurisdiction.covers(applicant)
    }
}

/// Failure to resolve a session token into an [`Authority`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// Token unknown, expired or malformed
    Unauthenticated,
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityError::Unauthenticated => f.write_str("session token not recognised"),
        }
    }
}

impl std::error::Error for AuthorityError {}
