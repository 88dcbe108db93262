// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=boxpile_index --heading-base-level=0

//! Boxpile Index: the spatial core of a box-stacking environment.
//!
//! - [`Aabb3D`] is a 3D axis-aligned box with exact, boundary-inclusive intersection.
//! - [`slice`] measures the peak and mean stacked height of a set of boxes inside a
//!   query slab, counting the space under every box as filled and overlaps once.
//! - [`Relief`] is a sparse height map: it registers placed boxes in the floor cells
//!   their footprint covers and keeps each cell's average height current.
//!
//! The vertical axis is `y`. The container floor sits at `y = 0`; its footprint spans
//! `[0, dx] × [0, dz]`.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`Point3`], [`Extent3`], and
//!   [`GridShape`].
//!
//! # Example
//!
//! ```rust
//! use boxpile_index::{Aabb3D, Extent3, GridShape, Point3, Relief};
//!
//! // A 1000 × 1500 × 1000 container with 10 × 10 cells.
//! let mut relief = Relief::new(Extent3::new(1000.0, 1500.0, 1000.0), GridShape::new(100, 100));
//!
//! let first = Aabb3D::from_center(
//!     Point3::new(50.0, 50.0, 50.0),
//!     Extent3::new(100.0, 100.0, 100.0),
//! );
//! relief.insert(0, first);
//! assert_eq!(relief.height((3, 4)), Some(100.0));
//!
//! // Where would a box dropped over the corner of the first one come to rest?
//! let probe = Aabb3D::new(80.0, 0.0, 80.0, 180.0, 1500.0, 180.0);
//! let rest = relief.slice_region(&probe).height.max;
//! assert_eq!(rest, 100.0);
//! ```
//!
//! ### Float semantics
//!
//! Coordinates are assumed finite (no NaNs). Debug builds assert on degenerate grids.

#![no_std]

extern crate alloc;

mod relief;
mod slice;
mod types;
mod util;

pub use relief::{CellCoord, GridShape, Relief, ReliefCell};
pub use slice::{FLOOR, Height, SliceStats, slice};
pub use types::{Aabb3D, Extent3, Point3};
