//! In-memory claim repository

use fra_domain::traits::{ClaimFilter, ClaimRepository, RepositoryError};
use fra_domain::{ClaimId, ClaimRecord};
use std::collections::HashMap;
use std::sync::RwLock;

/// Claim repository held entirely in memory
///
/// Each stored claim is a complete snapshot; readers clone it under a read
/// lock and never observe a half-applied save.
#[derive(Default)]
pub struct MemoryStore {
    claims: RwLock<HashMap<ClaimId, ClaimRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored claims
    pub fn len(&self) -> usize {
        self.claims.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Whether the store holds no claims
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Backend("memory store lock poisoned".to_string())
}

impl ClaimRepository for MemoryStore {
    fn insert(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError> {
        let mut claims = self.claims.write().map_err(poisoned)?;
        if claims.contains_key(&claim.id) {
            return Err(RepositoryError::AlreadyExists(claim.id));
        }

        let mut stored = claim.clone();
        stored.mark_saved(1);
        claims.insert(claim.id, stored);
        Ok(1)
    }

    fn load(&self, id: ClaimId) -> Result<Option<ClaimRecord>, RepositoryError> {
        let claims = self.claims.read().map_err(poisoned)?;
        Ok(claims.get(&id).cloned())
    }

    fn save(&self, claim: &ClaimRecord) -> Result<u64, RepositoryError> {
        let mut claims = self.claims.write().map_err(poisoned)?;
        let stored = claims
            .get_mut(&claim.id)
            .ok_or(RepositoryError::NotFound(claim.id))?;

        if stored.revision() != claim.revision() {
            return Err(RepositoryError::ConcurrentModification {
                id: claim.id,
                expected: claim.revision(),
                actual: stored.revision(),
            });
        }

        let revision = claim.revision() + 1;
        let mut next = claim.clone();
        next.mark_saved(revision);
        *stored = next;
        Ok(revision)
    }

    fn list(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRecord>, RepositoryError> {
        let claims = self.claims.read().map_err(poisoned)?;
        let mut matching: Vec<ClaimRecord> = claims
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        matching.sort_by_key(|c| c.id);
        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }
}
