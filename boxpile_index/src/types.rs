// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: points, extents, and 3D axis-aligned boxes.
//!
//! Boxes are described by their center and per-axis extent at the API edge (that is
//! how poses are tracked while a box is being manipulated) and stored as min/max
//! corners internally, so that intersection is exact.

/// A position in container coordinates. `y` is the vertical axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    /// Position along the X axis.
    pub x: f64,
    /// Position along the vertical axis.
    pub y: f64,
    /// Position along the Z axis.
    pub z: f64,
}

impl Point3 {
    /// Create a point from its coordinates.
    #[inline(always)]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether all coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Full (not half) extents of a box along the three axes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent3 {
    /// Extent along the X axis.
    pub dx: f64,
    /// Extent along the vertical axis.
    pub dy: f64,
    /// Extent along the Z axis.
    pub dz: f64,
}

impl Extent3 {
    /// Create an extent from its three components.
    #[inline(always)]
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Product of the three extents.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.dx * self.dy * self.dz
    }

    /// Area of the horizontal (X-Z) projection.
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        self.dx * self.dz
    }

    /// Whether every component is finite and strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        [self.dx, self.dy, self.dz]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }
}

/// Axis-aligned bounding box in 3D.
///
/// The vertical axis is `y`; the footprint of a box is its projection onto the X-Z plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D {
    /// Minimum x
    pub min_x: f64,
    /// Minimum y (bottom face)
    pub min_y: f64,
    /// Minimum z
    pub min_z: f64,
    /// Maximum x
    pub max_x: f64,
    /// Maximum y (top face)
    pub max_y: f64,
    /// Maximum z
    pub max_z: f64,
}

impl Aabb3D {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Create an AABB from its center and full extents.
    #[inline]
    pub fn from_center(center: Point3, extent: Extent3) -> Self {
        let (hx, hy, hz) = (extent.dx / 2.0, extent.dy / 2.0, extent.dz / 2.0);
        Self {
            min_x: center.x - hx,
            min_y: center.y - hy,
            min_z: center.z - hz,
            max_x: center.x + hx,
            max_y: center.y + hy,
            max_z: center.z + hz,
        }
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point3 {
        Point3 {
            x: self.min_x + (self.max_x - self.min_x) / 2.0,
            y: self.min_y + (self.max_y - self.min_y) / 2.0,
            z: self.min_z + (self.max_z - self.min_z) / 2.0,
        }
    }

    /// Full extents of the box. Inverted boxes report negative extents.
    #[inline]
    pub fn extent(&self) -> Extent3 {
        Extent3 {
            dx: self.max_x - self.min_x,
            dy: self.max_y - self.min_y,
            dz: self.max_z - self.min_z,
        }
    }

    /// Height of the top face.
    #[inline]
    pub fn top(&self) -> f64 {
        self.max_y
    }

    /// The overlap of two AABBs, or `None` if they are disjoint.
    ///
    /// Faces are part of the box: two boxes that only touch produce a zero-width overlap
    /// rather than `None`. Stacking and container checks rely on this.
    ///
    /// # Examples
    ///
    /// ```
    /// use boxpile_index::Aabb3D;
    ///
    /// let a = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
    /// let b = Aabb3D::new(5.0, 5.0, 5.0, 15.0, 15.0, 15.0);
    /// assert_eq!(a.intersect(&b), Some(Aabb3D::new(5.0, 5.0, 5.0, 10.0, 10.0, 10.0)));
    ///
    /// // Touching faces still intersect, with zero width along X.
    /// let c = Aabb3D::new(10.0, 0.0, 0.0, 20.0, 10.0, 10.0);
    /// assert_eq!(a.intersect(&c).map(|o| o.extent().dx), Some(0.0));
    ///
    /// let d = Aabb3D::new(11.0, 0.0, 0.0, 20.0, 10.0, 10.0);
    /// assert!(a.intersect(&d).is_none());
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let out = Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            min_z: self.min_z.max(other.min_z),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
            max_z: self.max_z.min(other.max_z),
        };
        (out.min_x <= out.max_x && out.min_y <= out.max_y && out.min_z <= out.max_z)
            .then_some(out)
    }

    /// Whether the two boxes overlap or touch.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    /// The same footprint extended down to `floor`: the vertical column this box
    /// occupies once everything beneath it is counted as filled.
    #[inline]
    pub fn column(&self, floor: f64) -> Self {
        Self {
            min_y: floor,
            ..*self
        }
    }

    /// Volume of the box, zero for empty or inverted boxes.
    #[inline]
    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e.dx.max(0.0) * e.dy.max(0.0) * e.dz.max(0.0)
    }

    /// Area of the footprint, zero for empty or inverted boxes.
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        let e = self.extent();
        e.dx.max(0.0) * e.dz.max(0.0)
    }

    /// Return true if the box has no volume. Assumes no NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y || self.max_z <= self.min_z
    }
}
