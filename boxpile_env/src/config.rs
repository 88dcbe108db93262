// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Environment configuration.
//!
//! The JSON form is flat at the top level:
//!
//! ```json
//! {
//!   "dx": 1000, "dy": 1500, "dz": 1000,
//!   "shape": { "x": 100, "z": 100 },
//!   "boxes": {
//!     "placed": { "2": { "dx": 136, "dy": 150, "dz": 136, "x": 68, "y": 75, "z": 68 } },
//!     "unplaced": { "1": { "dx": 100, "dy": 100, "dz": 100 } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use boxpile_index::{Extent3, GridShape};
use serde::{Deserialize, Serialize};

use crate::boxes::{Axis, BoxGeometry, Pose, RotationFlags};
use crate::error::ConfigError;

/// A box that is already in the container when the episode starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedSpec {
    /// Extents in the placed orientation.
    #[serde(flatten)]
    pub geometry: BoxGeometry,
    /// Center position.
    #[serde(flatten)]
    pub pose: Pose,
    /// Rotation parity.
    #[serde(flatten)]
    pub rotation: RotationFlags,
}

/// Boxes known at construction, keyed by identifier.
///
/// Keys are ordered, so placed boxes are replayed and pending boxes are dequeued in
/// ascending identifier order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSets {
    /// Boxes already in the container.
    pub placed: BTreeMap<String, PlacedSpec>,
    /// Boxes still to be stacked.
    pub unplaced: BTreeMap<String, BoxGeometry>,
}

/// Reward constants.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// Reward of a losing move; the episode ends.
    pub die: f64,
    /// Normaliser of the placement reward.
    pub push: f64,
    /// Cost of a one-unit move.
    pub movement: f64,
    /// Cost of a rotation.
    pub rotation: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            die: -10.0,
            push: 10.0,
            movement: -0.2,
            rotation: -0.2,
        }
    }
}

/// Everything needed to build or reset an environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvOptions {
    /// Container extents.
    #[serde(flatten)]
    pub container: Extent3,
    /// Relief cell counts along X and Z.
    pub shape: GridShape,
    /// Initial boxes.
    #[serde(default)]
    pub boxes: BoxSets,
    /// Reward constants.
    #[serde(default)]
    pub rewards: Rewards,
}

impl EnvOptions {
    /// Options for an empty container.
    pub fn new(container: Extent3, shape: GridShape) -> Self {
        Self {
            container,
            shape,
            boxes: BoxSets::default(),
            rewards: Rewards::default(),
        }
    }

    /// Add a box that is already resting in the container.
    pub fn with_placed(mut self, id: impl Into<String>, spec: PlacedSpec) -> Self {
        self.boxes.placed.insert(id.into(), spec);
        self
    }

    /// Add a box to be stacked.
    pub fn with_unplaced(mut self, id: impl Into<String>, geometry: BoxGeometry) -> Self {
        self.boxes.unplaced.insert(id.into(), geometry);
        self
    }

    /// Parse options from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the preconditions the geometry relies on.
    ///
    /// Every box must fit the container in at least one orientation, which also bounds
    /// the number of relief cells a single footprint can cover.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in axes(&self.container) {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Container { axis, value });
            }
        }
        if self.shape.x == 0 {
            return Err(ConfigError::EmptyGrid { axis: Axis::X });
        }
        if self.shape.z == 0 {
            return Err(ConfigError::EmptyGrid { axis: Axis::Z });
        }

        for (id, spec) in &self.boxes.placed {
            check_extent(id, &spec.geometry)?;
            check_fit(id, &spec.geometry, &self.container)?;
            if !spec.pose.is_finite() {
                return Err(ConfigError::BoxPose { id: id.clone() });
            }
        }
        for (id, geometry) in &self.boxes.unplaced {
            check_extent(id, geometry)?;
            check_fit(id, geometry, &self.container)?;
            if self.boxes.placed.contains_key(id) {
                return Err(ConfigError::DuplicateId { id: id.clone() });
            }
        }
        Ok(())
    }
}

fn axes(e: &Extent3) -> [(Axis, f64); 3] {
    [(Axis::X, e.dx), (Axis::Y, e.dy), (Axis::Z, e.dz)]
}

fn check_extent(id: &str, geometry: &BoxGeometry) -> Result<(), ConfigError> {
    match axes(geometry)
        .into_iter()
        .find(|(_, v)| !(v.is_finite() && *v > 0.0))
    {
        Some((axis, value)) => Err(ConfigError::BoxExtent {
            id: id.to_owned(),
            axis,
            value,
        }),
        None => Ok(()),
    }
}

/// Compares sorted extents: quarter turns reach every axis permutation.
fn check_fit(id: &str, geometry: &BoxGeometry, container: &Extent3) -> Result<(), ConfigError> {
    let mut sides = axes(geometry).map(|(_, v)| v);
    let mut room = axes(container).map(|(_, v)| v);
    sides.sort_by(f64::total_cmp);
    room.sort_by(f64::total_cmp);
    if sides.iter().zip(&room).all(|(side, limit)| side <= limit) {
        Ok(())
    } else {
        Err(ConfigError::BoxTooLarge { id: id.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "dx": 1000, "dy": 1500, "dz": 1000,
        "shape": { "x": 100, "z": 100 },
        "boxes": {
            "placed": {
                "2": { "dx": 136, "dy": 150, "dz": 136, "x": 68, "y": 75, "z": 68,
                       "rx": false, "ry": false, "rz": false }
            },
            "unplaced": { "1": { "dx": 100, "dy": 100, "dz": 100 } }
        }
    }"#;

    #[test]
    fn parses_flat_document() {
        let options = EnvOptions::from_json_str(SCENARIO).unwrap();
        assert_eq!(options.container, Extent3::new(1000.0, 1500.0, 1000.0));
        assert_eq!(options.shape, GridShape::new(100, 100));
        let placed = &options.boxes.placed["2"];
        assert_eq!(placed.geometry, BoxGeometry::new(136.0, 150.0, 136.0));
        assert_eq!(placed.pose, Pose::new(68.0, 75.0, 68.0));
        assert_eq!(placed.rotation, RotationFlags::default());
        assert_eq!(
            options.boxes.unplaced["1"],
            BoxGeometry::new(100.0, 100.0, 100.0)
        );
        assert_eq!(options.rewards, Rewards::default());
    }

    #[test]
    fn rotation_flags_and_boxes_are_optional() {
        let json = r#"{ "dx": 10, "dy": 10, "dz": 10, "shape": { "x": 1, "z": 1 },
            "boxes": { "placed": {
                "a": { "dx": 1, "dy": 1, "dz": 1, "x": 1, "y": 0.5, "z": 1, "ry": true }
            } } }"#;
        let options = EnvOptions::from_json_str(json).unwrap();
        assert!(options.boxes.placed["a"].rotation.ry);
        assert!(options.boxes.unplaced.is_empty());

        let bare = r#"{ "dx": 10, "dy": 10, "dz": 10, "shape": { "x": 1, "z": 1 } }"#;
        let options = EnvOptions::from_json_str(bare).unwrap();
        assert!(options.boxes.placed.is_empty());
    }

    #[test]
    fn rejects_degenerate_container_and_grid() {
        let mut options = EnvOptions::new(Extent3::new(10.0, 0.0, 10.0), GridShape::new(1, 1));
        assert!(matches!(
            options.validate(),
            Err(ConfigError::Container { axis: Axis::Y, .. })
        ));
        options.container.dy = 10.0;
        options.shape.z = 0;
        assert!(matches!(
            options.validate(),
            Err(ConfigError::EmptyGrid { axis: Axis::Z })
        ));
    }

    #[test]
    fn rejects_bad_boxes() {
        let base = EnvOptions::new(Extent3::new(10.0, 10.0, 10.0), GridShape::new(2, 2));

        let err = base
            .clone()
            .with_unplaced("flat", BoxGeometry::new(1.0, -1.0, 1.0))
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "box `flat` extent along y must be positive and finite, got -1"
        );

        let spec = PlacedSpec {
            geometry: BoxGeometry::new(1.0, 1.0, 1.0),
            pose: Pose::new(f64::NAN, 0.5, 1.0),
            rotation: RotationFlags::default(),
        };
        assert!(matches!(
            base.clone().with_placed("lost", spec.clone()).validate(),
            Err(ConfigError::BoxPose { .. })
        ));

        let spec = PlacedSpec {
            pose: Pose::new(1.0, 0.5, 1.0),
            ..spec
        };
        assert!(matches!(
            base.with_placed("twice", spec)
                .with_unplaced("twice", BoxGeometry::new(1.0, 1.0, 1.0))
                .validate(),
            Err(ConfigError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_boxes_that_fit_no_orientation() {
        let base = EnvOptions::new(
            Extent3::new(1000.0, 1500.0, 1000.0),
            GridShape::new(100, 100),
        );

        // Too wide as given, but standing it on end fits the taller axis.
        let upright = base
            .clone()
            .with_unplaced("beam", BoxGeometry::new(1400.0, 10.0, 10.0));
        assert!(upright.validate().is_ok());

        let huge = base
            .clone()
            .with_unplaced("slab", BoxGeometry::new(20000.0, 10.0, 20000.0));
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::BoxTooLarge { ref id }) if id == "slab"
        ));

        let spec = PlacedSpec {
            geometry: BoxGeometry::new(1100.0, 1100.0, 10.0),
            pose: Pose::new(550.0, 550.0, 5.0),
            rotation: RotationFlags::default(),
        };
        let err = base.with_placed("wall", spec).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "box `wall` does not fit the container in any orientation"
        );
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            EnvOptions::from_json_str("{ \"dx\": 1 }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
