//! Workflow configuration

use fra_domain::geometry::MIN_CIRCLE_SEGMENTS;
use serde::{Deserialize, Serialize};

/// Tunables for boundary validation and area computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Segments used to approximate a circle (never fewer than 32)
    #[serde(default = "default_circle_segments")]
    pub circle_segments: usize,

    /// Reject polygons whose edges cross instead of computing their area
    #[serde(default)]
    pub reject_self_intersecting: bool,

    /// Upper bound on vertices in a single shape
    #[serde(default = "default_max_vertices")]
    pub max_vertices_per_shape: usize,
}

fn default_circle_segments() -> usize {
    MIN_CIRCLE_SEGMENTS
}

fn default_max_vertices() -> usize {
    10_000
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            circle_segments: default_circle_segments(),
            reject_self_intersecting: false,
            max_vertices_per_shape: default_max_vertices(),
        }
    }
}

impl WorkflowConfig {
    /// Create a strict configuration (self-intersecting rings rejected)
    pub fn strict() -> Self {
        Self {
            reject_self_intersecting: true,
            ..Self::default()
        }
    }

    /// Circle segment count after clamping to the minimum
    pub fn effective_circle_segments(&self) -> usize {
        self.circle_segments.max(MIN_CIRCLE_SEGMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkflowConfig::default();
        assert_eq!(config.circle_segments, 32);
        assert!(!config.reject_self_intersecting);
        assert_eq!(config.max_vertices_per_shape, 10_000);
    }

    #[test]
    fn test_strict_config() {
        assert!(WorkflowConfig::strict().reject_self_intersecting);
    }

    #[test]
    fn test_circle_segments_are_clamped() {
        let config = WorkflowConfig {
            circle_segments: 8,
            ..Default::default()
        };
        assert_eq!(config.effective_circle_segments(), 32);

        let config = WorkflowConfig {
            circle_segments: 128,
            ..Default::default()
        };
        assert_eq!(config.effective_circle_segments(), 128);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WorkflowConfig = toml::from_str("reject_self_intersecting = true").unwrap();
        assert!(config.reject_self_intersecting);
        assert_eq!(config.circle_segments, 32);
        assert_eq!(config.max_vertices_per_shape, 10_000);
    }
}
