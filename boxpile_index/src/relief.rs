// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse height map over the container floor.
//!
//! The floor is split into `shape.x × shape.z` cells. Every placed box is registered in
//! each cell its footprint overlaps, and each populated cell caches the average stacked
//! height of the boxes registered there. Heights are recomputed from the full cell
//! membership on every change, never patched incrementally.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::slice::{FLOOR, SliceStats, slice};
use crate::types::{Aabb3D, Extent3};
use crate::util::{ceil_cell, floor_cell};

/// Integer `(cell_x, cell_z)` coordinate of a relief cell.
pub type CellCoord = (i32, i32);

/// Number of cells along each horizontal axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridShape {
    /// Cells along X.
    pub x: u32,
    /// Cells along Z.
    pub z: u32,
}

impl GridShape {
    /// Create a grid shape.
    #[inline(always)]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }
}

/// A populated relief cell.
#[derive(Clone, Debug, Default)]
pub struct ReliefCell {
    height: f64,
    slots: SmallVec<[usize; 8]>,
}

impl ReliefCell {
    /// Average stacked height over the cell.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Slots of the boxes whose footprint overlaps this cell, in registration order.
    #[inline]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }
}

#[derive(Clone, Debug)]
struct SlotEntry {
    aabb: Aabb3D,
    // Cells currently listing this slot.
    cells: SmallVec<[CellCoord; 8]>,
}

/// Height map of placed boxes, keyed by cell.
///
/// Boxes are addressed by caller-chosen `usize` slots; the relief keeps a copy of each
/// box's AABB so it can recompute cell heights on its own.
///
/// Footprint cells are not clipped to the grid: a box hanging over the container edge
/// registers cells with negative or out-of-range coordinates.
#[derive(Clone)]
pub struct Relief {
    container: Extent3,
    cell_dx: f64,
    cell_dz: f64,
    cells: HashMap<CellCoord, ReliefCell>,
    slots: Vec<Option<SlotEntry>>,
}

impl Debug for Relief {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live_slots = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Relief")
            .field("container", &self.container)
            .field("cell_dx", &self.cell_dx)
            .field("cell_dz", &self.cell_dz)
            .field("live_slots", &live_slots)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl Relief {
    /// Create an empty relief for a container split into `shape` cells.
    ///
    /// The container extents and cell counts must be strictly positive.
    pub fn new(container: Extent3, shape: GridShape) -> Self {
        debug_assert!(
            container.is_positive(),
            "container extents must be strictly positive"
        );
        debug_assert!(
            shape.x > 0 && shape.z > 0,
            "grid shape must have at least one cell per axis"
        );
        Self {
            container,
            cell_dx: container.dx / f64::from(shape.x),
            cell_dz: container.dz / f64::from(shape.z),
            cells: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Container extents this relief was built for.
    #[inline]
    pub fn container(&self) -> Extent3 {
        self.container
    }

    /// Cell size along X and Z.
    #[inline]
    pub fn cell_size(&self) -> (f64, f64) {
        (self.cell_dx, self.cell_dz)
    }

    /// Cells overlapped by the footprint of `aabb`.
    ///
    /// The lower edge is floored and the upper edge is ceiled, so a footprint that ends
    /// exactly on a cell boundary does not claim the next cell.
    pub fn footprint_cells(&self, aabb: &Aabb3D) -> SmallVec<[CellCoord; 8]> {
        let x0 = floor_cell(aabb.min_x, self.cell_dx);
        let x1 = ceil_cell(aabb.max_x, self.cell_dx);
        let z0 = floor_cell(aabb.min_z, self.cell_dz);
        let z1 = ceil_cell(aabb.max_z, self.cell_dz);
        let mut out = SmallVec::new();
        for x in x0..x1 {
            for z in z0..z1 {
                out.push((x, z));
            }
        }
        out
    }

    /// Full-height query slab standing on `cell`.
    pub fn cell_slab(&self, (x, z): CellCoord) -> Aabb3D {
        let min_x = f64::from(x) * self.cell_dx;
        let min_z = f64::from(z) * self.cell_dz;
        Aabb3D::new(
            min_x,
            0.0,
            min_z,
            min_x + self.cell_dx,
            self.container.dy,
            min_z + self.cell_dz,
        )
    }

    /// Register a box under `slot` and refresh the height of every cell it covers.
    ///
    /// Re-inserting a live slot first withdraws it from the cells it used to cover.
    pub fn insert(&mut self, slot: usize, aabb: Aabb3D) {
        self.ensure_slot(slot);
        if let Some(old) = self.slots[slot].take() {
            self.withdraw(slot, &old.cells);
        }

        let cells = self.footprint_cells(&aabb);
        self.slots[slot] = Some(SlotEntry {
            aabb,
            cells: cells.clone(),
        });
        for &coord in &cells {
            self.cells.entry(coord).or_default().slots.push(slot);
            self.refresh(coord);
        }
    }

    /// Remove a box and refresh the cells it covered.
    pub fn remove(&mut self, slot: usize) {
        if slot >= self.slots.len() {
            return;
        }
        if let Some(entry) = self.slots[slot].take() {
            self.withdraw(slot, &entry.cells);
        }
    }

    /// Drop every box and cell.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.slots.clear();
    }

    /// Cached height of `cell`, or `None` if no box covers it.
    #[inline]
    pub fn height(&self, cell: CellCoord) -> Option<f64> {
        self.cells.get(&cell).map(ReliefCell::height)
    }

    /// The populated cell at `cell`, if any.
    #[inline]
    pub fn cell(&self, cell: CellCoord) -> Option<&ReliefCell> {
        self.cells.get(&cell)
    }

    /// All populated cells, in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &ReliefCell)> + '_ {
        self.cells.iter().map(|(&coord, cell)| (coord, cell))
    }

    /// Number of populated cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is populated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// AABB registered under `slot`.
    #[inline]
    pub fn aabb(&self, slot: usize) -> Option<&Aabb3D> {
        self.slots.get(slot)?.as_ref().map(|e| &e.aabb)
    }

    /// Cells currently listing `slot`.
    #[inline]
    pub fn slot_cells(&self, slot: usize) -> &[CellCoord] {
        match self.slots.get(slot) {
            Some(Some(entry)) => &entry.cells,
            _ => &[],
        }
    }

    /// Visit every registered box that overlaps or touches `region`.
    ///
    /// Candidates come from the cells around the region's footprint; each slot is
    /// reported once.
    pub fn visit_region<F: FnMut(usize, &Aabb3D)>(&self, region: &Aabb3D, mut f: F) {
        // A box that only touches the region's lower edge ends in the cell before it.
        let x0 = floor_cell(region.min_x, self.cell_dx).saturating_sub(1);
        let x1 = ceil_cell(region.max_x, self.cell_dx);
        let z0 = floor_cell(region.min_z, self.cell_dz).saturating_sub(1);
        let z1 = ceil_cell(region.max_z, self.cell_dz);

        let mut seen: HashSet<usize> = HashSet::new();
        for x in x0..=x1 {
            for z in z0..=z1 {
                let Some(cell) = self.cells.get(&(x, z)) else {
                    continue;
                };
                for &slot in &cell.slots {
                    if !seen.insert(slot) {
                        continue;
                    }
                    let aabb = slot_aabb(&self.slots, slot);
                    if aabb.overlaps(region) {
                        f(slot, aabb);
                    }
                }
            }
        }
    }

    /// [`slice`] of `region` against every registered box.
    pub fn slice_region(&self, region: &Aabb3D) -> SliceStats {
        let mut hits: SmallVec<[Aabb3D; 8]> = SmallVec::new();
        self.visit_region(region, |_, aabb| hits.push(*aabb));
        slice(region, &hits)
    }

    /// Highest top face inside `region`, or [`FLOOR`] if nothing reaches into it.
    ///
    /// Equal to `slice_region(region).height.max` without measuring volume.
    pub fn max_height(&self, region: &Aabb3D) -> f64 {
        let mut max = FLOOR;
        self.visit_region(region, |_, aabb| {
            if let Some(overlap) = region.intersect(aabb) {
                max = max.max(overlap.top());
            }
        });
        max
    }

    fn ensure_slot(&mut self, slot: usize) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
    }

    fn withdraw(&mut self, slot: usize, cells: &[CellCoord]) {
        for &coord in cells {
            let cell = self
                .cells
                .get_mut(&coord)
                .expect("relief invariant violated: missing cell while withdrawing slot");
            let pos = cell
                .slots
                .iter()
                .position(|&s| s == slot)
                .expect("relief invariant violated: slot not found in expected cell");
            cell.slots.remove(pos);

            if cell.slots.is_empty() {
                self.cells.remove(&coord);
            } else {
                self.refresh(coord);
            }
        }
    }

    fn refresh(&mut self, coord: CellCoord) {
        let slab = self.cell_slab(coord);
        let Some(cell) = self.cells.get_mut(&coord) else {
            return;
        };
        let stats = slice(&slab, cell.slots.iter().map(|&s| slot_aabb(&self.slots, s)));
        cell.height = stats.height.average;
    }
}

fn slot_aabb(slots: &[Option<SlotEntry>], slot: usize) -> &Aabb3D {
    &slots
        .get(slot)
        .expect("relief invariant violated: cell references out-of-bounds slot")
        .as_ref()
        .expect("relief invariant violated: cell references vacant slot")
        .aabb
}
