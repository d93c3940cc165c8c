//! FRA Storage Layer
//!
//! Implements the `ClaimRepository` trait on SQLite, plus an in-memory store
//! for tests and embedding.
//!
//! # Architecture
//!
//! - One row per claim; the audit trail and the boundary live in JSON columns
//!   written in the same statement as the status
//! - Optimistic concurrency: every row carries a `revision`, and a save only
//!   lands if the caller's revision still matches
//!
//! # Examples
//!
//! ```no_run
//! use fra_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for claim operations
//! ```

#![warn(missing_docs)]

mod memory;
pub mod records;

pub use memory::MemoryStore;

use fra_domain::traits::{ClaimFilter, ClaimRepository, RepositoryError};
use fra_domain::{
    Applicant, AreaUnit, ClaimId, ClaimRecord, ClaimType, LandDetails, Status,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON column could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        RepositoryError::Backend(e.to_string())
    }
}

const SELECT_COLUMNS: &str = "id, revision, status, claim_type, applicant_name, contact, \
     identity_number, village, gram_panchayat, tehsil, district, state, declared_area, \
     area_unit, land_description, compartment_number, submitted_at, history, map_data";

/// SQLite-based implementation of ClaimRepository
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store may be shared between
/// threads. Each save is a single conditional `UPDATE`, which makes the
/// revision check and the write one atomic step.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fra_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("fra.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.with_conn(|conn| Ok(conn.execute_batch(schema)?))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }

    /// Convert ClaimId to bytes for storage
    fn claim_id_to_bytes(id: ClaimId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to ClaimId
    fn bytes_to_claim_id(bytes: &[u8]) -> Result<ClaimId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for ClaimId, got {}", bytes.len()))
        })?;
        Ok(ClaimId::from_value(u128::from_be_bytes(arr)))
    }

    fn stored_revision(conn: &Connection, id_bytes: &[u8]) -> Result<Option<u64>, StoreError> {
        let revision = conn
            .query_row(
                "SELECT revision FROM claims WHERE id = ?1",
                params![id_bytes],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(revision.map(|r| r as u64))
    }

    /// Raw column values of one claim row
    fn read_row(row: &Row<'_>) -> rusqlite::Result<RawClaim> {
        Ok(RawClaim {
            id: row.get(0)?,
            revision: row.get(1)?,
            status: row.get(2)?,
            claim_type: row.get(3)?,
            applicant: Applicant {
                name: row.get(4)?,
                contact: row.get(5)?,
                identity_number: row.get(6)?,
                village: row.get(7)?,
                gram_panchayat: row.get(8)?,
                tehsil: row.get(9)?,
                district: row.get(10)?,
                state: row.get(11)?,
            },
            declared_area: row.get(12)?,
            area_unit: row.get(13)?,
            land_description: row.get(14)?,
            compartment_number: row.get(15)?,
            submitted_at: row.get(16)?,
            history: row.get(17)?,
            map_data: row.get(18)?,
        })
    }
}

/// Column values before domain validation
struct RawClaim {
    id: Vec<u8>,
    revision: i64,
    status: String,
    claim_type: String,
    applicant: Applicant,
    declared_area: f64,
    area_unit: String,
    land_description: String,
    compartment_number: Option<String>,
    submitted_at: i64,
    history: String,
    map_data: Option<String>,
}

impl RawClaim {
    fn into_claim(self) -> Result<ClaimRecord, StoreError> {
        let id = SqliteStore::bytes_to_claim_id(&self.id)?;
        let status = Status::parse(&self.status)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown status: {}", self.status)))?;
        let claim_type = ClaimType::parse(&self.claim_type).ok_or_else(|| {
            StoreError::InvalidData(format!("Unknown claim type: {}", self.claim_type))
        })?;
        let unit = AreaUnit::parse(&self.area_unit)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown unit: {}", self.area_unit)))?;
        let history = records::history_from_json(&self.history)?;
        let map_data = self
            .map_data
            .as_deref()
            .map(records::map_data_from_json)
            .transpose()?;

        ClaimRecord::restore(
            id,
            self.applicant,
            claim_type,
            LandDetails {
                declared_area: self.declared_area,
                unit,
                description: self.land_description,
                compartment_number: self.compartment_number,
            },
            self.submitted_at as u64,
            status,
            history,
            map_data,
            self.revision as u64,
        )
        .map_err(StoreError::InvalidData)
    }
}

impl ClaimRepository for SqliteStore {
    fn insert(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError> {
        let id_bytes = Self::claim_id_to_bytes(claim.id);
        let history = records::history_to_json(claim.history())?;
        let map_data = claim
            .map_data()
            .map(records::map_data_to_json)
            .transpose()?;

        self.with_conn(|conn| {
            if Self::stored_revision(conn, &id_bytes)?.is_some() {
                return Ok(None);
            }

            conn.execute(
                "INSERT INTO claims (id, revision, status, claim_type, applicant_name, contact,
                     identity_number, village, gram_panchayat, tehsil, district, state,
                     declared_area, area_unit, land_description, compartment_number,
                     submitted_at, history, map_data)
                 VALUES (?1, 1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                params![
                    &id_bytes,
                    claim.status().as_str(),
                    claim.claim_type.as_str(),
                    &claim.applicant.name,
                    &claim.applicant.contact,
                    &claim.applicant.identity_number,
                    &claim.applicant.village,
                    &claim.applicant.gram_panchayat,
                    &claim.applicant.tehsil,
                    &claim.applicant.district,
                    &claim.applicant.state,
                    claim.land.declared_area,
                    claim.land.unit.as_str(),
                    &claim.land.description,
                    &claim.land.compartment_number,
                    claim.submitted_at as i64,
                    &history,
                    &map_data,
                ],
            )?;
            Ok(Some(1))
        })?
        .ok_or(RepositoryError::AlreadyExists(claim.id))
    }

    fn load(&self, id: ClaimId) -> Result<Option<ClaimRecord>, RepositoryError> {
        let id_bytes = Self::claim_id_to_bytes(id);

        let raw = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM claims WHERE id = ?1", SELECT_COLUMNS),
                    params![&id_bytes],
                    Self::read_row,
                )
                .optional()?)
        })?;

        Ok(raw.map(RawClaim::into_claim).transpose()?)
    }

    fn save(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError> {
        let id_bytes = Self::claim_id_to_bytes(claim.id);
        let history = records::history_to_json(claim.history())?;
        let map_data = claim
            .map_data()
            .map(records::map_data_to_json)
            .transpose()?;
        let expected = claim.revision();

        let outcome = self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE claims SET revision = revision + 1, status = ?3, claim_type = ?4,
                     applicant_name = ?5, contact = ?6, identity_number = ?7, village = ?8,
                     gram_panchayat = ?9, tehsil = ?10, district = ?11, state = ?12,
                     declared_area = ?13, area_unit = ?14, land_description = ?15,
                     compartment_number = ?16, history = ?17, map_data = ?18
                 WHERE id = ?1 AND revision = ?2",
                params![
                    &id_bytes,
                    expected as i64,
                    claim.status().as_str(),
                    claim.claim_type.as_str(),
                    &claim.applicant.name,
                    &claim.applicant.contact,
                    &claim.applicant.identity_number,
                    &claim.applicant.village,
                    &claim.applicant.gram_panchayat,
                    &claim.applicant.tehsil,
                    &claim.applicant.district,
                    &claim.applicant.state,
                    claim.land.declared_area,
                    claim.land.unit.as_str(),
                    &claim.land.description,
                    &claim.land.compartment_number,
                    &history,
                    &map_data,
                ],
            )?;

            if changed == 1 {
                return Ok(Ok(expected + 1));
            }
            Ok(Err(Self::stored_revision(conn, &id_bytes)?))
        })?;

        match outcome {
            Ok(revision) => Ok(revision),
            Err(None) => Err(RepositoryError::NotFound(claim.id)),
            Err(Some(actual)) => Err(RepositoryError::ConcurrentModification {
                id: claim.id,
                expected,
                actual,
            }),
        }
    }

    fn list(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRecord>, RepositoryError> {
        let mut sql = format!("SELECT {} FROM claims WHERE 1=1", SELECT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if !filter.statuses.is_empty() {
            let placeholders = vec!["?"; filter.statuses.len()].join(", ");
            sql.push_str(&format!(" AND status IN ({})", placeholders));
            for status in &filter.statuses {
                params.push(Box::new(status.as_str()));
            }
        }

        let text_filters = [
            ("state", &filter.state),
            ("district", &filter.district),
            ("tehsil", &filter.tehsil),
            ("gram_panchayat", &filter.gram_panchayat),
        ];
        for (column, value) in text_filters {
            if let Some(value) = value {
                sql.push_str(&format!(" AND LOWER(TRIM({})) = LOWER(TRIM(?))", column));
                params.push(Box::new(value.clone()));
            }
        }

        if let Some(claim_type) = filter.claim_type {
            sql.push_str(" AND claim_type = ?");
            params.push(Box::new(claim_type.as_str()));
        }

        sql.push_str(" ORDER BY id");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let raws = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
            let rows = stmt
                .query_map(&param_refs[..], Self::read_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        Ok(raws
            .into_iter()
            .map(RawClaim::into_claim)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
