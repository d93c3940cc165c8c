//! Geometry module - area math for claim boundaries
//!
//! All coordinates are WGS84 latitude/longitude in degrees. Areas are computed
//! on a sphere of radius [`EARTH_RADIUS_M`] using the spherical-excess
//! approximation for small polygons, which is the same formula used by the
//! common web-map geodesic area helpers. Results are in square metres.

use crate::boundary::{Area, AreaType};
use std::fmt;

/// Equatorial radius used for area computation (metres)
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Minimum number of segments used to approximate a circle
///
/// At 32 segments an inscribed polygon under-reports the circle's area by
/// about 0.64%.
pub const MIN_CIRCLE_SEGMENTS: usize = 32;

/// A point on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees, positive north
    pub lat: f64,

    /// Longitude in degrees, positive east
    pub lng: f64,
}

impl LatLng {
    /// Create a new point
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both coordinates are finite and within WGS84 range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Reasons a drawn shape cannot be turned into a claim area
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Fewer than three distinct vertices
    TooFewVertices {
        /// Distinct vertices found
        count: usize,
    },

    /// More vertices than the configured limit
    TooManyVertices {
        /// Vertices supplied
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// A coordinate is NaN, infinite, or outside the valid lat/lng range
    InvalidCoordinate {
        /// Latitude supplied
        lat: f64,
        /// Longitude supplied
        lng: f64,
    },

    /// A circle radius that is not a positive finite number
    InvalidRadius(f64),

    /// Two non-adjacent edges of the ring cross each other
    SelfIntersecting,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::TooFewVertices { count } => {
                write!(f, "ring needs at least 3 distinct vertices, got {}", count)
            }
            GeometryError::TooManyVertices { count, max } => {
                write!(f, "ring has {} vertices, limit is {}", count, max)
            }
            GeometryError::InvalidCoordinate { lat, lng } => {
                write!(f, "invalid coordinate ({}, {})", lat, lng)
            }
            GeometryError::InvalidRadius(r) => write!(f, "invalid circle radius {}", r),
            GeometryError::SelfIntersecting => f.write_str("ring edges intersect each other"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Area enclosed by a ring, in square metres
///
/// The ring may be given open or closed (first point repeated at the end);
/// the closing edge is implied either way. Winding order does not matter.
/// Rings with fewer than three points have zero area. Self-intersecting rings
/// are not rejected here: their signed lobes partially cancel.
///
/// # Examples
///
/// ```
/// use fra_domain::geometry::ring_area;
/// use fra_domain::LatLng;
///
/// let square = [
///     LatLng::new(0.0, 0.0),
///     LatLng::new(0.0, 0.001),
///     LatLng::new(0.001, 0.001),
///     LatLng::new(0.001, 0.0),
/// ];
/// let area = ring_area(&square);
/// assert!((area - 12_392.0).abs() < 10.0);
/// ```
pub fn ring_area(points: &[LatLng]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for (i, p1) in points.iter().enumerate() {
        let p2 = &points[(i + 1) % points.len()];
        sum += (p2.lng - p1.lng).to_radians()
            * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
    }

    (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Approximate a circle as a closed ring
///
/// `segments` is raised to [`MIN_CIRCLE_SEGMENTS`] when lower. The returned
/// ring repeats its first vertex at the end.
pub fn circle_as_polygon(center: LatLng, radius_m: f64, segments: usize) -> Vec<LatLng> {
    let segments = segments.max(MIN_CIRCLE_SEGMENTS);
    let angular = radius_m / EARTH_RADIUS_M;
    let lat1 = center.lat.to_radians();
    let lng1 = center.lng.to_radians();

    let mut ring: Vec<LatLng> = (0..segments)
        .map(|i| {
            let bearing = 2.0 * std::f64::consts::PI * i as f64 / segments as f64;
            let lat2 = (lat1.sin() * angular.cos()
                + lat1.cos() * angular.sin() * bearing.cos())
            .asin();
            let lng2 = lng1
                + (bearing.sin() * angular.sin() * lat1.cos())
                    .atan2(angular.cos() - lat1.sin() * lat2.sin());
            LatLng::new(lat2.to_degrees(), lng2.to_degrees())
        })
        .collect();

    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

/// Land-use tag for a shape
///
/// The tag is caller-supplied; geometry is never inspected. Unknown or
/// missing tags fall back to [`AreaType::Claimed`].
pub fn classify(tag: Option<&str>) -> AreaType {
    tag.and_then(AreaType::parse).unwrap_or_default()
}

/// Sum of `area_value` over a set of areas (0 for an empty set)
pub fn aggregate(areas: &[Area]) -> f64 {
    areas.iter().map(|a| a.area_value).sum()
}

/// Drop consecutive duplicates and the closing vertex
fn open_ring(points: &[LatLng]) -> Vec<LatLng> {
    let mut ring: Vec<LatLng> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last() != Some(p) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Check a ring for coordinate validity and vertex count
pub fn validate_ring(points: &[LatLng], max_vertices: usize) -> Result<(), GeometryError> {
    if points.len() > max_vertices {
        return Err(GeometryError::TooManyVertices {
            count: points.len(),
            max: max_vertices,
        });
    }

    if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
        return Err(GeometryError::InvalidCoordinate {
            lat: bad.lat,
            lng: bad.lng,
        });
    }

    let distinct = open_ring(points).len();
    if distinct < 3 {
        return Err(GeometryError::TooFewVertices { count: distinct });
    }

    Ok(())
}

/// Whether any two non-adjacent edges of the ring touch or cross
///
/// Works in the plane of raw lat/lng degrees, which is adequate for
/// parcel-sized shapes away from the antimeridian.
pub fn is_self_intersecting(points: &[LatLng]) -> bool {
    let ring = open_ring(points);
    let n = ring.len();
    if n < 4 {
        return false;
    }

    for i in 0..n {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % n];
        for j in (i + 1)..n {
            // Edges sharing a vertex
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let b1 = ring[j];
            let b2 = ring[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

fn orientation(p: LatLng, q: LatLng, r: LatLng) -> f64 {
    (q.lng - p.lng) * (r.lat - p.lat) - (q.lat - p.lat) * (r.lng - p.lng)
}

fn on_segment(p: LatLng, q: LatLng, r: LatLng) -> bool {
    r.lng >= p.lng.min(q.lng)
        && r.lng <= p.lng.max(q.lng)
        && r.lat >= p.lat.min(q.lat)
        && r.lat <= p.lat.max(q.lat)
}

fn segments_intersect(a1: LatLng, a2: LatLng, b1: LatLng, b2: LatLng) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: rectangle area is positive and close to the planar estimate
        #[test]
        fn test_rectangle_area_property(
            south in -60.0f64..60.0,
            west in -170.0f64..170.0,
            dlat in 0.0005f64..0.05,
            dlng in 0.0005f64..0.05,
        ) {
            let ring = [
                LatLng::new(south, west),
                LatLng::new(south, west + dlng),
                LatLng::new(south + dlat, west + dlng),
                LatLng::new(south + dlat, west),
            ];
            let area = ring_area(&ring);
            let m_per_deg = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
            let expected = dlat * m_per_deg * dlng * m_per_deg * (south + dlat / 2.0).to_radians().cos();

            prop_assert!(area > 0.0);
            prop_assert!((area - expected).abs() / expected < 0.01);
        }

        /// Property: circle approximation stays within 1% of pi r^2
        #[test]
        fn test_circle_area_property(
            lat in -60.0f64..60.0,
            lng in -170.0f64..170.0,
            radius in 10.0f64..5_000.0,
        ) {
            let area = ring_area(&circle_as_polygon(LatLng::new(lat, lng), radius, MIN_CIRCLE_SEGMENTS));
            let expected = std::f64::consts::PI * radius * radius;
            prop_assert!((area - expected).abs() / expected < 0.01);
        }
    }
}
