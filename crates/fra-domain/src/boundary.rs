//! Boundary module - drawn land shapes and their computed areas

use crate::geometry::{self, GeometryError, LatLng};
use std::fmt;

/// Square metres per hectare
pub const SQ_M_PER_HECTARE: f64 = 10_000.0;

/// Square metres per acre
pub const SQ_M_PER_ACRE: f64 = 4_046.856_422_4;

/// Land-use classification of a drawn area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AreaType {
    /// Land under claim (default)
    #[default]
    Claimed,

    /// Forest land
    Forest,

    /// Water body
    Pond,

    /// Government land
    Government,

    /// Not yet classified
    Unknown,
}

impl AreaType {
    /// Get the area type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::Claimed => "claimed",
            AreaType::Forest => "forest",
            AreaType::Pond => "pond",
            AreaType::Government => "government",
            AreaType::Unknown => "unknown",
        }
    }

    /// Parse an area type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "claimed" => Some(AreaType::Claimed),
            "forest" => Some(AreaType::Forest),
            "pond" => Some(AreaType::Pond),
            "government" => Some(AreaType::Government),
            "unknown" => Some(AreaType::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape as drawn on the map
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Free-form polygon (open or closed ring)
    Polygon {
        /// Ring vertices
        points: Vec<LatLng>,
    },

    /// Axis-aligned rectangle given by two opposite corners
    Rectangle {
        /// South-west corner
        south_west: LatLng,
        /// North-east corner
        north_east: LatLng,
    },

    /// Circle around a centre point
    Circle {
        /// Centre
        center: LatLng,
        /// Radius in metres
        radius_m: f64,
    },
}

impl Shape {
    /// Short name of the shape kind
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Polygon { .. } => "polygon",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
        }
    }

    /// Normalise the shape into a ring of vertices
    ///
    /// Circles are approximated with `circle_segments` segments (see
    /// [`geometry::circle_as_polygon`]).
    pub fn ring(&self, circle_segments: usize) -> Vec<LatLng> {
        match self {
            Shape::Polygon { points } => points.clone(),
            Shape::Rectangle {
                south_west,
                north_east,
            } => vec![
                *south_west,
                LatLng::new(south_west.lat, north_east.lng),
                *north_east,
                LatLng::new(north_east.lat, south_west.lng),
            ],
            Shape::Circle { center, radius_m } => {
                geometry::circle_as_polygon(*center, *radius_m, circle_segments)
            }
        }
    }

    /// Check the inputs that cannot be validated on the ring alone
    pub fn validate_parameters(&self) -> Result<(), GeometryError> {
        if let Shape::Circle { center, radius_m } = self {
            if !radius_m.is_finite() || *radius_m <= 0.0 {
                return Err(GeometryError::InvalidRadius(*radius_m));
            }
            if !center.is_valid() {
                return Err(GeometryError::InvalidCoordinate {
                    lat: center.lat,
                    lng: center.lng,
                });
            }
        }
        Ok(())
    }
}

/// A shape submitted for saving, before area computation
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeInput {
    /// Caller-chosen identifier; generated when absent
    pub id: Option<String>,

    /// The drawn shape
    pub shape: Shape,

    /// Land-use tag as supplied by the map widget
    pub area_type: Option<String>,
}

impl ShapeInput {
    /// Create an untagged input with no explicit id
    pub fn new(shape: Shape) -> Self {
        Self {
            id: None,
            shape,
            area_type: None,
        }
    }

    /// Attach a land-use tag
    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        self.area_type = Some(tag.into());
        self
    }

    /// Attach an identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One saved area of a claim boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    /// Identifier, unique within the boundary
    pub id: String,

    /// Shape as drawn
    pub shape: Shape,

    /// Ring the area was computed from; never empty
    pub ring: Vec<LatLng>,

    /// Land-use classification
    pub area_type: AreaType,

    /// Computed area in square metres
    pub area_value: f64,
}

impl Area {
    /// Build an area from a shape, computing its ring and area
    pub fn compute(id: String, shape: Shape, area_type: AreaType, circle_segments: usize) -> Self {
        let ring = shape.ring(circle_segments);
        let area_value = geometry::ring_area(&ring);
        Self {
            id,
            shape,
            ring,
            area_type,
            area_value,
        }
    }
}

/// The saved boundary of a claim
///
/// Always holds at least one area, and `total_area` always equals the sum of
/// the areas' values.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    areas: Vec<Area>,
    total_area: f64,
    revision: u32,
    saved_at: u64,
}

impl MapData {
    /// Build a boundary from computed areas
    ///
    /// Returns `None` when `areas` is empty, since an empty boundary is not a
    /// valid saved state.
    pub fn new(areas: Vec<Area>, revision: u32, saved_at: u64) -> Option<Self> {
        if areas.is_empty() {
            return None;
        }
        let total_area = geometry::aggregate(&areas);
        Some(Self {
            areas,
            total_area,
            revision,
            saved_at,
        })
    }

    /// Saved areas, in the order they were submitted
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Total area in square metres
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// Total area in hectares
    pub fn total_hectares(&self) -> f64 {
        self.total_area / SQ_M_PER_HECTARE
    }

    /// Total area in acres
    pub fn total_acres(&self) -> f64 {
        self.total_area / SQ_M_PER_ACRE
    }

    /// How many times the boundary has been saved (1 on first save)
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// When the boundary was last saved (seconds since Unix epoch)
    pub fn saved_at(&self) -> u64 {
        self.saved_at
    }

    /// Summed area per land-use type, in first-seen order
    pub fn totals_by_type(&self) -> Vec<(AreaType, f64)> {
        let mut totals: Vec<(AreaType, f64)> = Vec::new();
        for area in &self.areas {
            match totals.iter_mut().find(|(t, _)| *t == area.area_type) {
                Some((_, sum)) => *sum += area.area_value,
                None => totals.push((area.area_type, area.area_value)),
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: &str, area_type: AreaType) -> Area {
        Area::compute(
            id.to_string(),
            Shape::Rectangle {
                south_west: LatLng::new(0.0, 0.0),
                north_east: LatLng::new(0.001, 0.001),
            },
            area_type,
            32,
        )
    }

    #[test]
    fn test_empty_boundary_is_not_constructible() {
        assert!(MapData::new(vec![], 1, 0).is_none());
    }

    #[test]
    fn test_total_area_is_sum() {
        let a = square("a", AreaType::Claimed);
        let b = square("b", AreaType::Forest);
        let expected = a.area_value + b.area_value;

        let map = MapData::new(vec![a, b], 1, 100).unwrap();
        assert!((map.total_area() - expected).abs() < 1e-9);
        assert!((map.total_hectares() - expected / 10_000.0).abs() < 1e-9);
        assert_eq!(map.revision(), 1);
        assert_eq!(map.saved_at(), 100);
    }

    #[test]
    fn test_totals_by_type() {
        let map = MapData::new(
            vec![
                square("a", AreaType::Claimed),
                square("b", AreaType::Pond),
                square("c", AreaType::Claimed),
            ],
            1,
            0,
        )
        .unwrap();

        let totals = map.totals_by_type();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].0, AreaType::Claimed);
        assert!((totals[0].1 - 2.0 * map.areas()[1].area_value).abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_ring_corners() {
        let shape = Shape::Rectangle {
            south_west: LatLng::new(1.0, 2.0),
            north_east: LatLng::new(3.0, 4.0),
        };
        let ring = shape.ring(32);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[1], LatLng::new(1.0, 4.0));
        assert_eq!(ring[3], LatLng::new(3.0, 2.0));
    }

    #[test]
    fn test_circle_parameters() {
        let bad_radius = Shape::Circle {
            center: LatLng::new(10.0, 10.0),
            radius_m: 0.0,
        };
        assert_eq!(bad_radius.validate_parameters(), Err(GeometryError::InvalidRadius(0.0)));

        let bad_center = Shape::Circle {
            center: LatLng::new(100.0, 10.0),
            radius_m: 50.0,
        };
        assert!(matches!(
            bad_center.validate_parameters(),
            Err(GeometryError::InvalidCoordinate { .. })
        ));

        let ok = Shape::Circle {
            center: LatLng::new(10.0, 10.0),
            radius_m: 50.0,
        };
        assert!(ok.validate_parameters().is_ok());
    }
}
