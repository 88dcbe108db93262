// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Height and volume statistics of a set of boxes inside a query slab.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::types::Aabb3D;

/// Level that stacked columns are measured from.
pub const FLOOR: f64 = 0.0;

/// Peak and mean resting height inside a slab.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Height {
    /// Highest top face among the boxes intersecting the slab.
    pub max: f64,
    /// Stacked volume divided by the slab footprint area.
    pub average: f64,
}

/// Result of [`slice`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SliceStats {
    /// Peak and mean height.
    pub height: Height,
    /// Stacked volume inside the slab.
    pub volume: f64,
}

/// Intersect `slab` with every box and measure what it holds.
///
/// Each non-empty intersection is treated as a column standing on [`FLOOR`] and
/// reaching up to the intersection's top face: anything under a box counts as
/// occupied. `volume` is the volume of the union of those columns, so space shared by
/// overlapping columns is counted once. `height.average` is that volume spread over
/// the slab footprint, which makes it equal to `height.max` when a single box covers
/// the whole footprint and never larger than `height.max`.
///
/// Boxes that merely touch the slab still contribute to `height.max`.
///
/// # Examples
///
/// ```
/// use boxpile_index::{Aabb3D, slice};
///
/// let slab = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 100.0, 10.0);
/// // Covers the left half of the slab up to y = 40.
/// let half = Aabb3D::new(0.0, 20.0, 0.0, 5.0, 40.0, 10.0);
/// let stats = slice(&slab, [&half]);
/// assert_eq!(stats.height.max, 40.0);
/// assert_eq!(stats.height.average, 20.0);
/// ```
pub fn slice<'a, I>(slab: &Aabb3D, boxes: I) -> SliceStats
where
    I: IntoIterator<Item = &'a Aabb3D>,
{
    let mut max = FLOOR;
    let mut columns: SmallVec<[Aabb3D; 8]> = SmallVec::new();
    for b in boxes {
        if let Some(overlap) = slab.intersect(b) {
            if overlap.top() > max {
                max = overlap.top();
            }
            columns.push(overlap.column(FLOOR));
        }
    }

    let volume = stacked_volume(&columns);
    let area = slab.footprint_area();
    let average = if area > 0.0 { volume / area } else { 0.0 };
    SliceStats {
        height: Height { max, average },
        volume,
    }
}

/// Volume of the union of floor-standing columns.
///
/// The footprint is split along every column edge; inside each resulting sub-rectangle
/// the union is as tall as the tallest column covering it. This is the closed form of
/// inclusion-exclusion over the columns, exact for any number of overlaps.
fn stacked_volume(columns: &[Aabb3D]) -> f64 {
    match columns {
        [] => 0.0,
        [only] => only.volume(),
        _ => {
            let xs = edges(columns.iter().flat_map(|c| [c.min_x, c.max_x]));
            let zs = edges(columns.iter().flat_map(|c| [c.min_z, c.max_z]));
            let mut volume = 0.0;
            for wx in xs.windows(2) {
                let (x0, x1) = (wx[0], wx[1]);
                let mx = 0.5 * (x0 + x1);
                for wz in zs.windows(2) {
                    let (z0, z1) = (wz[0], wz[1]);
                    let mz = 0.5 * (z0 + z1);
                    let tallest = columns
                        .iter()
                        .filter(|c| {
                            c.min_x <= mx && mx <= c.max_x && c.min_z <= mz && mz <= c.max_z
                        })
                        .map(|c| c.max_y - c.min_y)
                        .fold(0.0, f64::max);
                    volume += (x1 - x0) * (z1 - z0) * tallest;
                }
            }
            volume
        }
    }
}

fn edges(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn slab() -> Aabb3D {
        Aabb3D::new(0.0, 0.0, 0.0, 10.0, 1500.0, 10.0)
    }

    #[test]
    fn empty_slab_is_flat() {
        let stats = slice(&slab(), core::iter::empty());
        assert_eq!(stats, SliceStats::default());
    }

    #[test]
    fn single_covering_box_average_equals_max() {
        let b = Aabb3D::new(-5.0, 0.0, -5.0, 20.0, 150.0, 20.0);
        let stats = slice(&slab(), [&b]);
        assert_eq!(stats.height.max, 150.0);
        assert!((stats.height.average - 150.0).abs() < EPSILON);
        assert!((stats.volume - 10.0 * 150.0 * 10.0).abs() < EPSILON);
    }

    #[test]
    fn floating_box_counts_as_a_full_column() {
        // Sits on something not in the query; still fills down to the floor.
        let b = Aabb3D::new(0.0, 100.0, 0.0, 10.0, 150.0, 10.0);
        let stats = slice(&slab(), [&b]);
        assert!((stats.height.average - 150.0).abs() < EPSILON);
    }

    #[test]
    fn stacked_boxes_are_not_double_counted() {
        let bottom = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 50.0, 10.0);
        let top = Aabb3D::new(0.0, 50.0, 0.0, 10.0, 80.0, 10.0);
        let stats = slice(&slab(), [&bottom, &top]);
        assert_eq!(stats.height.max, 80.0);
        assert!((stats.height.average - 80.0).abs() < EPSILON);
    }

    #[test]
    fn three_way_overlap_is_exact() {
        let a = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 30.0, 10.0);
        let b = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 20.0, 10.0);
        let c = Aabb3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let stats = slice(&slab(), [&a, &b, &c]);
        assert!((stats.volume - 10.0 * 10.0 * 30.0).abs() < EPSILON);
        assert!((stats.height.average - 30.0).abs() < EPSILON);
    }

    #[test]
    fn side_by_side_boxes_average_their_columns() {
        let left = Aabb3D::new(0.0, 0.0, 0.0, 5.0, 40.0, 10.0);
        let right = Aabb3D::new(5.0, 0.0, 0.0, 10.0, 20.0, 10.0);
        let stats = slice(&slab(), [&left, &right]);
        assert_eq!(stats.height.max, 40.0);
        assert!((stats.height.average - 30.0).abs() < EPSILON);
    }

    #[test]
    fn partially_overlapping_columns() {
        // Tall column on x in [0, 6], short one on x in [4, 10]; shared strip counts once.
        let tall = Aabb3D::new(0.0, 0.0, 0.0, 6.0, 100.0, 10.0);
        let short = Aabb3D::new(4.0, 0.0, 0.0, 10.0, 50.0, 10.0);
        let stats = slice(&slab(), [&tall, &short]);
        let expected = 6.0 * 10.0 * 100.0 + 4.0 * 10.0 * 50.0;
        assert!((stats.volume - expected).abs() < EPSILON);
    }

    #[test]
    fn touching_box_raises_max_but_adds_no_volume() {
        let neighbour = Aabb3D::new(10.0, 0.0, 0.0, 20.0, 90.0, 10.0);
        let stats = slice(&slab(), [&neighbour]);
        assert_eq!(stats.height.max, 90.0);
        assert_eq!(stats.volume, 0.0);
    }

    #[test]
    fn average_never_exceeds_max() {
        let boxes = [
            Aabb3D::new(-3.0, 0.0, 2.0, 4.0, 12.0, 8.0),
            Aabb3D::new(1.0, 12.0, 1.0, 9.0, 30.0, 6.0),
            Aabb3D::new(3.0, 0.0, -1.0, 12.0, 25.0, 4.0),
            Aabb3D::new(2.0, 30.0, 3.0, 7.0, 31.5, 11.0),
            Aabb3D::new(8.0, 0.0, 7.0, 10.0, 5.0, 10.0),
        ];
        for n in 1..=boxes.len() {
            for start in 0..boxes.len() {
                let subset = boxes.iter().cycle().skip(start).take(n);
                let stats = slice(&slab(), subset);
                assert!(stats.height.average <= stats.height.max + EPSILON);
                assert!(stats.height.average >= 0.0);
            }
        }
    }
}
