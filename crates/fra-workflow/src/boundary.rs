//! Boundary capture and area computation for a single claim

use crate::{current_timestamp, Result, WorkflowConfig, WorkflowError};
use fra_domain::geometry::{self, GeometryError};
use fra_domain::traits::ClaimRepository;
use fra_domain::{Area, ClaimId, ClaimRecord, MapData, ShapeInput};
use std::collections::HashSet;

/// Owns the `MapData` of claims in a repository
///
/// Every save validates all shapes first and then replaces the boundary
/// wholesale in one repository write. Status is never changed here; moving a
/// claim to `MappedByGramSabha` is a separate `SaveMap` transition.
///
/// The store does not check who is calling or what status the claim is in.
/// `WorkflowEngine::save_claim_boundary` wraps it with those checks.
pub struct BoundaryStore<'a, R> {
    repo: &'a R,
    config: &'a WorkflowConfig,
}

impl<'a, R: ClaimRepository> BoundaryStore<'a, R> {
    /// Create a boundary store over a repository
    pub fn new(repo: &'a R, config: &'a WorkflowConfig) -> Self {
        Self { repo, config }
    }

    /// Validate shapes and compute a new boundary
    ///
    /// The revision continues from `previous`, starting at 1.
    pub fn build_map(
        &self,
        shapes: Vec<ShapeInput>,
        previous: Option<&MapData>,
        saved_at: u64,
    ) -> Result<MapData> {
        if shapes.is_empty() {
            return Err(WorkflowError::EmptyBoundary);
        }

        let segments = self.config.effective_circle_segments();
        let mut taken: HashSet<String> = shapes.iter().filter_map(|s| s.id.clone()).collect();
        if taken.len() != shapes.iter().filter(|s| s.id.is_some()).count() {
            return Err(WorkflowError::DuplicateAreaId(first_duplicate(&shapes)));
        }

        let mut areas = Vec::with_capacity(shapes.len());
        for (index, input) in shapes.into_iter().enumerate() {
            let label = input
                .id
                .clone()
                .unwrap_or_else(|| format!("#{}", index + 1));
            let invalid = |reason: GeometryError| WorkflowError::InvalidGeometry {
                shape: label.clone(),
                reason,
            };

            input.shape.validate_parameters().map_err(invalid)?;
            let ring = input.shape.ring(segments);
            geometry::validate_ring(&ring, self.config.max_vertices_per_shape).map_err(invalid)?;
            if self.config.reject_self_intersecting && geometry::is_self_intersecting(&ring) {
                return Err(invalid(GeometryError::SelfIntersecting));
            }

            let id = match input.id {
                Some(id) => id,
                None => next_free_id(&mut taken, index + 1),
            };
            let area_type = geometry::classify(input.area_type.as_deref());
            areas.push(Area::compute(id, input.shape, area_type, segments));
        }

        let revision = previous.map(|m| m.revision() + 1).unwrap_or(1);
        MapData::new(areas, revision, saved_at).ok_or(WorkflowError::EmptyBoundary)
    }

    /// Replace the boundary on an in-memory claim
    ///
    /// The claim is left as it was when validation fails.
    pub fn replace_in(
        &self,
        claim: &mut ClaimRecord,
        shapes: Vec<ShapeInput>,
        saved_at: u64,
    ) -> Result<MapData> {
        let map = self.build_map(shapes, claim.map_data(), saved_at)?;
        claim.set_map_data(map.clone());
        Ok(map)
    }

    /// Compute and persist a new boundary for a claim
    pub fn save_boundary(&self, claim_id: ClaimId, shapes: Vec<ShapeInput>) -> Result<MapData> {
        let mut claim = self.load(claim_id)?;
        let map = self.replace_in(&mut claim, shapes, current_timestamp())?;
        self.repo.save(&claim)?;

        tracing::info!(
            "Boundary saved for claim {}: {} areas, {:.1} m² (revision {})",
            claim_id,
            map.areas().len(),
            map.total_area(),
            map.revision()
        );
        Ok(map)
    }

    /// Current boundary of a claim, if one has been saved
    pub fn get_boundary(&self, claim_id: ClaimId) -> Result<Option<MapData>> {
        let claim = self.load(claim_id)?;
        Ok(claim.map_data().cloned())
    }

    /// Remove a claim's boundary, returning the one that was removed
    ///
    /// Clearing a claim with no boundary is a no-op and does not write.
    pub fn clear_boundary(&self, claim_id: ClaimId) -> Result<Option<MapData>> {
        let mut claim = self.load(claim_id)?;
        let removed = claim.clear_map_data();
        if removed.is_some() {
            self.repo.save(&claim)?;
            tracing::info!("Boundary cleared for claim {}", claim_id);
        }
        Ok(removed)
    }

    fn load(&self, claim_id: ClaimId) -> Result<ClaimRecord> {
        self.repo
            .load(claim_id)?
            .ok_or(WorkflowError::NotFound(claim_id))
    }
}

fn next_free_id(taken: &mut HashSet<String>, start: usize) -> String {
    let mut n = start;
    loop {
        let candidate = format!("area-{}", n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn first_duplicate(shapes: &[ShapeInput]) -> String {
    let mut seen = HashSet::new();
    shapes
        .iter()
        .filter_map(|s| s.id.as_deref())
        .find(|id| !seen.insert(*id))
        .unwrap_or_default()
        .to_string()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use fra_domain::{LatLng, Shape};
    use fra_store::MemoryStore;
    use proptest::prelude::*;

    fn any_shape() -> impl Strategy<Value = Shape> {
        prop_oneof![
            (-60.0..60.0f64, -170.0..170.0f64, 0.0001..0.01f64, 0.0001..0.01f64).prop_map(
                |(lat, lng, dlat, dlng)| Shape::Rectangle {
                    south_west: LatLng::new(lat, lng),
                    north_east: LatLng::new(lat + dlat, lng + dlng),
                }
            ),
            (-60.0..60.0f64, -170.0..170.0f64, 1.0..500.0f64).prop_map(|(lat, lng, r)| {
                Shape::Circle {
                    center: LatLng::new(lat, lng),
                    radius_m: r,
                }
            }),
        ]
    }

    proptest! {
        #[test]
        fn total_is_sum_of_areas(shapes in prop::collection::vec(any_shape(), 1..8)) {
            let config = WorkflowConfig::default();
            let store = MemoryStore::new();
            let boundaries = BoundaryStore::new(&store, &config);

            let count = shapes.len();
            let inputs = shapes.into_iter().map(ShapeInput::new).collect();
            let map = boundaries.build_map(inputs, None, 0).unwrap();

            let sum: f64 = map.areas().iter().map(|a| a.area_value).sum();
            prop_assert_eq!(map.areas().len(), count);
            prop_assert!((map.total_area() - sum).abs() <= 1e-9 * sum.max(1.0));
            prop_assert!(map.areas().iter().all(|a| a.area_value > 0.0 && !a.ring.is_empty()));
        }
    }
}
