// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box records: geometry, pose, rotation parity, and identifiers.

use core::fmt;

use boxpile_index::{Aabb3D, Extent3, Point3};
use serde::{Deserialize, Serialize};

/// Extents of a box in its current orientation.
pub type BoxGeometry = Extent3;

/// Center of a box in container coordinates.
pub type Pose = Point3;

/// Handle of a box, stable for the lifetime of an episode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub(crate) u32);

impl BoxId {
    /// Relief slot used for this box.
    #[inline]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

/// One of the three container axes. `Y` is vertical.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis along the container width.
    X,
    /// Vertical axis.
    Y,
    /// Horizontal axis along the container depth.
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Whether a box has been rotated an odd number of times about each axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationFlags {
    /// Parity of rotations about X.
    pub rx: bool,
    /// Parity of rotations about Y.
    pub ry: bool,
    /// Parity of rotations about Z.
    pub rz: bool,
}

/// A box with a pose: the selected box, the next box, or a placed one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedBox {
    /// Handle of the box.
    pub id: BoxId,
    /// Extents in the current orientation.
    pub geometry: BoxGeometry,
    /// Center position.
    pub pose: Pose,
    /// Rotation parity.
    pub rotation: RotationFlags,
}

impl PlacedBox {
    /// Axis-aligned bounds at the current pose.
    #[inline]
    pub fn aabb(&self) -> Aabb3D {
        Aabb3D::from_center(self.pose, self.geometry)
    }

    /// Rotate a quarter turn about `axis`.
    ///
    /// Only parity is tracked: the flag flips and the two extents across the axis swap.
    /// Rotating twice about the same axis restores the box.
    pub fn rotate(&mut self, axis: Axis) {
        let g = &mut self.geometry;
        match axis {
            Axis::X => {
                self.rotation.rx = !self.rotation.rx;
                core::mem::swap(&mut g.dx, &mut g.dy);
            }
            Axis::Y => {
                self.rotation.ry = !self.rotation.ry;
                core::mem::swap(&mut g.dx, &mut g.dz);
            }
            Axis::Z => {
                self.rotation.rz = !self.rotation.rz;
                core::mem::swap(&mut g.dy, &mut g.dz);
            }
        }
    }

    /// Shift the center by `step` along `axis`.
    pub fn translate(&mut self, axis: Axis, step: f64) {
        match axis {
            Axis::X => self.pose.x += step,
            Axis::Y => self.pose.y += step,
            Axis::Z => self.pose.z += step,
        }
    }

    /// Whether the box stays within `[0, extent]` along a horizontal `axis`.
    pub fn within(&self, axis: Axis, container: &Extent3) -> bool {
        let (center, half, bound) = match axis {
            Axis::X => (self.pose.x, self.geometry.dx / 2.0, container.dx),
            Axis::Y => (self.pose.y, self.geometry.dy / 2.0, container.dy),
            Axis::Z => (self.pose.z, self.geometry.dz / 2.0, container.dz),
        };
        center - half >= 0.0 && center + half <= bound
    }

    /// Whether the footprint lies inside the container floor.
    #[inline]
    pub fn footprint_within(&self, container: &Extent3) -> bool {
        self.within(Axis::X, container) && self.within(Axis::Z, container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlacedBox {
        PlacedBox {
            id: BoxId(0),
            geometry: BoxGeometry::new(100.0, 50.0, 30.0),
            pose: Pose::new(500.0, 25.0, 500.0),
            rotation: RotationFlags::default(),
        }
    }

    #[test]
    fn rotate_x_swaps_width_and_height() {
        let mut b = sample();
        b.rotate(Axis::X);
        assert_eq!(b.geometry, BoxGeometry::new(50.0, 100.0, 30.0));
        assert!(b.rotation.rx);
        assert!(!b.rotation.ry && !b.rotation.rz);
    }

    #[test]
    fn rotate_y_and_z_swap_their_planes() {
        let mut b = sample();
        b.rotate(Axis::Y);
        assert_eq!(b.geometry, BoxGeometry::new(30.0, 50.0, 100.0));
        let mut b = sample();
        b.rotate(Axis::Z);
        assert_eq!(b.geometry, BoxGeometry::new(100.0, 30.0, 50.0));
        assert!(b.rotation.rz);
    }

    #[test]
    fn rotation_is_an_involution() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut b = sample();
            b.rotate(axis);
            b.rotate(axis);
            assert_eq!(b, sample(), "double rotation about {axis}");
        }
    }

    #[test]
    fn containment_checks_edges_inclusively() {
        let container = Extent3::new(1000.0, 1500.0, 1000.0);
        let mut b = sample();
        b.pose.x = 50.0;
        assert!(b.footprint_within(&container));
        b.translate(Axis::X, -1.0);
        assert!(!b.within(Axis::X, &container));
        assert!(b.within(Axis::Z, &container));
        b.pose.x = 950.0;
        assert!(b.footprint_within(&container));
        b.translate(Axis::X, 1.0);
        assert!(!b.footprint_within(&container));
    }
}
