//! Serializable records for the JSON columns
//!
//! The domain crate stays free of serde, so these mirror types carry the
//! on-disk shape of history entries and boundaries. The CLI reuses the shape
//! records to read drawn boundaries from JSON files.

use crate::StoreError;
use fra_domain::{
    Action, Area, AreaType, LatLng, MapData, Role, Shape, ShapeInput, Status, WorkflowEntry,
};
use serde::{Deserialize, Serialize};

/// Relative tolerance when checking a stored total against the recomputed one
const TOTAL_AREA_TOLERANCE: f64 = 1e-9;

/// A point as stored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointRecord {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl From<LatLng> for PointRecord {
    fn from(p: LatLng) -> Self {
        Self { lat: p.lat, lng: p.lng }
    }
}

impl From<PointRecord> for LatLng {
    fn from(p: PointRecord) -> Self {
        LatLng::new(p.lat, p.lng)
    }
}

/// A drawn shape as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeRecord {
    /// Free-form polygon
    Polygon {
        /// Ring vertices
        points: Vec<PointRecord>,
    },
    /// Axis-aligned rectangle
    Rectangle {
        /// South-west corner
        south_west: PointRecord,
        /// North-east corner
        north_east: PointRecord,
    },
    /// Circle
    Circle {
        /// Centre
        center: PointRecord,
        /// Radius in metres
        radius_m: f64,
    },
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        match shape {
            Shape::Polygon { points } => ShapeRecord::Polygon {
                points: points.iter().copied().map(PointRecord::from).collect(),
            },
            Shape::Rectangle {
                south_west,
                north_east,
            } => ShapeRecord::Rectangle {
                south_west: (*south_west).into(),
                north_east: (*north_east).into(),
            },
            Shape::Circle { center, radius_m } => ShapeRecord::Circle {
                center: (*center).into(),
                radius_m: *radius_m,
            },
        }
    }
}

impl From<ShapeRecord> for Shape {
    fn from(record: ShapeRecord) -> Self {
        match record {
            ShapeRecord::Polygon { points } => Shape::Polygon {
                points: points.into_iter().map(LatLng::from).collect(),
            },
            ShapeRecord::Rectangle {
                south_west,
                north_east,
            } => Shape::Rectangle {
                south_west: south_west.into(),
                north_east: north_east.into(),
            },
            ShapeRecord::Circle { center, radius_m } => Shape::Circle {
                center: center.into(),
                radius_m,
            },
        }
    }
}

/// A shape submitted for saving, as read from a JSON document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShapeInputRecord {
    /// Optional caller-chosen identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Land-use tag
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub area_type: Option<String>,

    /// The shape
    pub shape: ShapeRecord,
}

impl From<ShapeInputRecord> for ShapeInput {
    fn from(record: ShapeInputRecord) -> Self {
        ShapeInput {
            id: record.id,
            shape: record.shape.into(),
            area_type: record.area_type,
        }
    }
}

/// A saved area as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaRecord {
    /// Identifier
    pub id: String,
    /// Shape as drawn
    pub shape: ShapeRecord,
    /// Ring the area was computed from
    pub ring: Vec<PointRecord>,
    /// Land-use type
    #[serde(rename = "type")]
    pub area_type: String,
    /// Area in square metres
    pub area_value: f64,
}

/// A saved boundary as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapDataRecord {
    /// Areas in submission order
    pub areas: Vec<AreaRecord>,
    /// Total area in square metres at save time
    pub total_area: f64,
    /// Boundary save counter
    pub revision: u32,
    /// Save time (seconds since Unix epoch)
    pub saved_at: u64,
}

impl From<&MapData> for MapDataRecord {
    fn from(map: &MapData) -> Self {
        Self {
            areas: map
                .areas()
                .iter()
                .map(|a| AreaRecord {
                    id: a.id.clone(),
                    shape: (&a.shape).into(),
                    ring: a.ring.iter().copied().map(PointRecord::from).collect(),
                    area_type: a.area_type.as_str().to_string(),
                    area_value: a.area_value,
                })
                .collect(),
            total_area: map.total_area(),
            revision: map.revision(),
            saved_at: map.saved_at(),
        }
    }
}

impl MapDataRecord {
    /// Rebuild the domain boundary, recomputing and checking the total
    pub fn into_domain(self) -> Result<MapData, StoreError> {
        let stored_total = self.total_area;
        let areas = self
            .areas
            .into_iter()
            .map(|a| {
                let area_type = AreaType::parse(&a.area_type).ok_or_else(|| {
                    StoreError::InvalidData(format!("Unknown area type: {}", a.area_type))
                })?;
                if a.ring.is_empty() {
                    return Err(StoreError::InvalidData(format!("Area {} has an empty ring", a.id)));
                }
                Ok(Area {
                    id: a.id,
                    shape: a.shape.into(),
                    ring: a.ring.into_iter().map(LatLng::from).collect(),
                    area_type,
                    area_value: a.area_value,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let map = MapData::new(areas, self.revision, self.saved_at)
            .ok_or_else(|| StoreError::InvalidData("Stored boundary has no areas".to_string()))?;

        let drift = (map.total_area() - stored_total).abs();
        if drift > TOTAL_AREA_TOLERANCE * stored_total.abs().max(1.0) {
            return Err(StoreError::InvalidData(format!(
                "Stored total area {} does not match recomputed {}",
                stored_total,
                map.total_area()
            )));
        }

        Ok(map)
    }
}

/// A history entry as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    /// Role
    pub role: String,
    /// Acting officer
    pub officer_id: String,
    /// Action
    pub action: String,
    /// Status before
    pub from_status: String,
    /// Status after
    pub to_status: String,
    /// Remarks
    pub remarks: String,
    /// Time (seconds since Unix epoch)
    pub timestamp: u64,
}

impl From<&WorkflowEntry> for HistoryRecord {
    fn from(e: &WorkflowEntry) -> Self {
        Self {
            role: e.role.as_str().to_string(),
            officer_id: e.officer_id.clone(),
            action: e.action.as_str().to_string(),
            from_status: e.from_status.as_str().to_string(),
            to_status: e.to_status.as_str().to_string(),
            remarks: e.remarks.clone(),
            timestamp: e.timestamp,
        }
    }
}

impl TryFrom<HistoryRecord> for WorkflowEntry {
    type Error = StoreError;

    fn try_from(r: HistoryRecord) -> Result<Self, Self::Error> {
        let invalid = |what: &str, value: &str| {
            StoreError::InvalidData(format!("Unknown {} in history: {}", what, value))
        };

        Ok(WorkflowEntry {
            role: Role::parse(&r.role).ok_or_else(|| invalid("role", &r.role))?,
            officer_id: r.officer_id,
            action: Action::parse(&r.action).ok_or_else(|| invalid("action", &r.action))?,
            from_status: Status::parse(&r.from_status)
                .ok_or_else(|| invalid("status", &r.from_status))?,
            to_status: Status::parse(&r.to_status).ok_or_else(|| invalid("status", &r.to_status))?,
            remarks: r.remarks,
            timestamp: r.timestamp,
        })
    }
}

/// Serialize a history to its JSON column value
pub fn history_to_json(history: &[WorkflowEntry]) -> Result<String, StoreError> {
    let records: Vec<HistoryRecord> = history.iter().map(HistoryRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a history JSON column value
pub fn history_from_json(json: &str) -> Result<Vec<WorkflowEntry>, StoreError> {
    let records: Vec<HistoryRecord> = serde_json::from_str(json)?;
    records.into_iter().map(WorkflowEntry::try_from).collect()
}

/// Serialize a boundary to its JSON column value
pub fn map_data_to_json(map: &MapData) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&MapDataRecord::from(map))?)
}

/// Parse a boundary JSON column value
pub fn map_data_from_json(json: &str) -> Result<MapData, StoreError> {
    let record: MapDataRecord = serde_json::from_str(json)?;
    record.into_domain()
}

/// Parse a JSON array of shapes to save
pub fn shapes_from_json(json: &str) -> Result<Vec<ShapeInput>, StoreError> {
    let records: Vec<ShapeInputRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(ShapeInput::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shapes_document() {
        let json = r#"[
            {"id": "plot", "type": "claimed", "shape": {"kind": "rectangle",
                "south_west": {"lat": 21.0, "lng": 80.0},
                "north_east": {"lat": 21.001, "lng": 80.001}}},
            {"type": "pond", "shape": {"kind": "circle",
                "center": {"lat": 21.0005, "lng": 80.0005}, "radius_m": 20.0}},
            {"shape": {"kind": "polygon", "points": [
                {"lat": 21.0, "lng": 80.0}, {"lat": 21.0, "lng": 80.001}, {"lat": 21.001, "lng": 80.0}]}}
        ]"#;

        let shapes = shapes_from_json(json).unwrap();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0].id.as_deref(), Some("plot"));
        assert!(matches!(shapes[1].shape, Shape::Circle { radius_m, .. } if radius_m == 20.0));
        assert_eq!(shapes[1].area_type.as_deref(), Some("pond"));
        assert!(shapes[2].area_type.is_none());
    }

    #[test]
    fn test_unknown_shape_kind_is_rejected() {
        let json = r#"[{"shape": {"kind": "hexagon"}}]"#;
        assert!(matches!(shapes_from_json(json), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_tampered_total_is_detected() {
        let area = Area::compute(
            "a".to_string(),
            Shape::Rectangle {
                south_west: LatLng::new(0.0, 0.0),
                north_east: LatLng::new(0.001, 0.001),
            },
            AreaType::Forest,
            32,
        );
        let map = MapData::new(vec![area], 2, 50).unwrap();

        let mut record = MapDataRecord::from(&map);
        let restored = record.clone().into_domain().unwrap();
        assert_eq!(restored, map);

        record.total_area *= 2.0;
        assert!(matches!(record.into_domain(), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_history_with_unknown_status_is_rejected() {
        let json = r#"[{"role":"gram_sabha","officer_id":"x","action":"verify",
            "from_status":"submitted","to_status":"approved","remarks":"","timestamp":1}]"#;
        assert!(matches!(history_from_json(json), Err(StoreError::InvalidData(_))));
    }
}
