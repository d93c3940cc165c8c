//! Claim workflow engine

use crate::{current_timestamp, BoundaryStore, Result, WorkflowConfig, WorkflowError};
use fra_domain::traits::{ClaimFilter, ClaimRepository};
use fra_domain::workflow::TRANSITIONS;
use fra_domain::{
    Action, Applicant, Authority, ClaimId, ClaimRecord, ClaimType, Jurisdiction, LandDetails,
    MapData, Role, ShapeInput, Status,
};

/// A new claim as filed by the applicant
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimApplication {
    /// Applicant identity and address
    pub applicant: Applicant,
    /// Individual or community claim
    pub claim_type: ClaimType,
    /// Land being claimed
    pub land: LandDetails,
}

/// Applies officer actions and boundary edits to stored claims
///
/// Every mutating call is one read-modify-write against the repository: load
/// the claim, check the caller, compute the new snapshot, and save it guarded
/// by the revision that was loaded. If another writer got there first the call
/// fails with [`WorkflowError::ConcurrentModification`] and nothing is written.
pub struct WorkflowEngine<R> {
    repo: R,
    config: WorkflowConfig,
}

impl<R: ClaimRepository> WorkflowEngine<R> {
    /// Create an engine over a repository
    pub fn new(repo: R, config: WorkflowConfig) -> Self {
        Self { repo, config }
    }

    /// Underlying repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Active configuration
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Boundary store sharing this engine's repository and configuration
    ///
    /// The store performs no role or status checks; prefer
    /// [`save_claim_boundary`](Self::save_claim_boundary) for officer calls.
    pub fn boundaries(&self) -> BoundaryStore<'_, R> {
        BoundaryStore::new(&self.repo, &self.config)
    }

    /// File a new claim in `Submitted` status
    pub fn submit_claim(&self, application: ClaimApplication) -> Result<ClaimRecord> {
        validate_application(&application)?;

        let mut claim = ClaimRecord::new(
            ClaimId::new(),
            application.applicant,
            application.claim_type,
            application.land,
            current_timestamp(),
        );
        let revision = self.repo.insert(&claim)?;
        claim.mark_saved(revision);

        tracing::info!(
            "Claim {} submitted: {} claim by {} ({}, {})",
            claim.id,
            claim.claim_type,
            claim.applicant.name,
            claim.applicant.gram_panchayat,
            claim.applicant.district
        );
        Ok(claim)
    }

    /// Load a claim
    pub fn get_claim(&self, claim_id: ClaimId) -> Result<ClaimRecord> {
        tracing::debug!("Loading claim {}", claim_id);
        self.repo
            .load(claim_id)?
            .ok_or(WorkflowError::NotFound(claim_id))
    }

    /// Apply an officer action to a claim and persist the result
    ///
    /// Checks run in order: the action must be legal from the current status
    /// (`InvalidTransition`), the caller must hold the required role and cover
    /// the claim's address (`Unauthorized`), and the transition's remarks or
    /// boundary requirement must be met (`MissingPrecondition`). On any error
    /// the stored claim is unchanged.
    pub fn apply(
        &self,
        claim_id: ClaimId,
        action: Action,
        authority: &Authority,
        remarks: &str,
    ) -> Result<ClaimRecord> {
        let claim = self.get_claim(claim_id)?;
        let from = claim.status();

        let mut next = claim
            .apply(action, authority, remarks, current_timestamp())
            .map_err(|e| self.refused(claim_id, action, authority, e.into()))?;
        let revision = self
            .repo
            .save(&next)
            .map_err(|e| self.refused(claim_id, action, authority, e.into()))?;
        next.mark_saved(revision);

        tracing::info!(
            "Claim {}: {} by {} {} moved {} -> {}",
            claim_id,
            action,
            authority.role,
            authority.officer_id,
            from,
            next.status()
        );
        Ok(next)
    }

    /// Validate, compute and save a claim's boundary on behalf of an officer
    ///
    /// Only a Gram Sabha officer covering the claim may draw its boundary, and
    /// only while the claim is `VerifiedByGramSabha` or `MappedByGramSabha`.
    /// The status itself does not change.
    pub fn save_claim_boundary(
        &self,
        claim_id: ClaimId,
        authority: &Authority,
        shapes: Vec<ShapeInput>,
    ) -> Result<MapData> {
        let mut claim = self.get_claim(claim_id)?;
        check_boundary_access(&claim, authority)
            .map_err(|e| self.refused(claim_id, Action::SaveMap, authority, e))?;

        let map = self
            .boundaries()
            .replace_in(&mut claim, shapes, current_timestamp())
            .map_err(|e| self.refused(claim_id, Action::SaveMap, authority, e))?;
        self.repo
            .save(&claim)
            .map_err(|e| self.refused(claim_id, Action::SaveMap, authority, e.into()))?;

        tracing::info!(
            "Boundary saved for claim {} by {}: {} areas, {:.1} m² (revision {})",
            claim_id,
            authority.officer_id,
            map.areas().len(),
            map.total_area(),
            map.revision()
        );
        Ok(map)
    }

    /// Remove a claim's boundary on behalf of an officer
    ///
    /// Same access rules as [`save_claim_boundary`](Self::save_claim_boundary).
    /// Returns the removed boundary, or `None` if there was none.
    pub fn clear_claim_boundary(
        &self,
        claim_id: ClaimId,
        authority: &Authority,
    ) -> Result<Option<MapData>> {
        let mut claim = self.get_claim(claim_id)?;
        check_boundary_access(&claim, authority)
            .map_err(|e| self.refused(claim_id, Action::SaveMap, authority, e))?;

        let removed = claim.clear_map_data();
        if removed.is_some() {
            self.repo
                .save(&claim)
                .map_err(|e| self.refused(claim_id, Action::SaveMap, authority, e.into()))?;
            tracing::info!(
                "Boundary cleared for claim {} by {}",
                claim_id,
                authority.officer_id
            );
        }
        Ok(removed)
    }

    /// List claims matching a filter
    pub fn list_claims(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRecord>> {
        let claims = self.repo.list(filter)?;
        tracing::debug!("Listed {} claims", claims.len());
        Ok(claims)
    }

    /// Claims in the officer's jurisdiction waiting on the officer's role
    pub fn pending_for(&self, authority: &Authority) -> Result<Vec<ClaimRecord>> {
        let statuses = statuses_awaiting(authority.role);
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut filter = jurisdiction_filter(&authority.jurisdiction);
        filter.statuses = statuses;

        let mut claims = self.repo.list(&filter)?;
        claims.retain(|c| authority.covers(&c.applicant));
        tracing::debug!(
            "{} claims pending for {} {}",
            claims.len(),
            authority.role,
            authority.officer_id
        );
        Ok(claims)
    }

    /// Actions the officer may take on a claim right now
    ///
    /// Remarks and boundary requirements are not considered.
    pub fn available_actions(&self, claim_id: ClaimId, authority: &Authority) -> Result<Vec<Action>> {
        Ok(self.get_claim(claim_id)?.available_actions(authority))
    }

    fn refused(
        &self,
        claim_id: ClaimId,
        action: Action,
        authority: &Authority,
        error: WorkflowError,
    ) -> WorkflowError {
        tracing::warn!(
            "Refused {} on claim {} by {} {}: {} ({})",
            action,
            claim_id,
            authority.role,
            authority.officer_id,
            error.kind(),
            error
        );
        error
    }
}

fn validate_application(application: &ClaimApplication) -> Result<()> {
    if application.applicant.name.trim().is_empty() {
        return Err(WorkflowError::InvalidClaim(
            "applicant name is required".to_string(),
        ));
    }

    let area = application.land.declared_area;
    if !area.is_finite() || area < 0.0 {
        return Err(WorkflowError::InvalidClaim(format!(
            "declared area must be a non-negative number, got {}",
            area
        )));
    }

    Ok(())
}

fn check_boundary_access(claim: &ClaimRecord, authority: &Authority) -> Result<()> {
    if !claim.status().allows_boundary_edit() {
        return Err(WorkflowError::InvalidTransition {
            status: claim.status(),
            action: Action::SaveMap,
        });
    }

    if authority.role != Role::GramSabha {
        return Err(WorkflowError::Unauthorized(format!(
            "boundaries are drawn by {}, caller is {}",
            Role::GramSabha,
            authority.role
        )));
    }

    if !authority.covers(&claim.applicant) {
        return Err(WorkflowError::Unauthorized(format!(
            "claim {} is outside {}",
            claim.id, authority.jurisdiction
        )));
    }

    Ok(())
}

/// Statuses with at least one transition performed by `role`
fn statuses_awaiting(role: Role) -> Vec<Status> {
    let mut statuses: Vec<Status> = Vec::new();
    for transition in TRANSITIONS.iter().filter(|t| t.role == role) {
        if !statuses.contains(&transition.from) {
            statuses.push(transition.from);
        }
    }
    statuses
}

fn jurisdiction_filter(jurisdiction: &Jurisdiction) -> ClaimFilter {
    match jurisdiction {
        Jurisdiction::GramPanchayat {
            district,
            gram_panchayat,
        } => ClaimFilter {
            district: Some(district.clone()),
            gram_panchayat: Some(gram_panchayat.clone()),
            ..Default::default()
        },
        Jurisdiction::Subdivision { district, tehsil } => ClaimFilter {
            district: Some(district.clone()),
            tehsil: Some(tehsil.clone()),
            ..Default::default()
        },
        Jurisdiction::District { district } => ClaimFilter {
            district: Some(district.clone()),
            ..Default::default()
        },
        Jurisdiction::State { state } => ClaimFilter {
            state: Some(state.clone()),
            ..Default::default()
        },
    }
}
