// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owner of box identities: the pending queue and the placed boxes.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::boxes::{BoxGeometry, BoxId, PlacedBox};

/// Pending and placed boxes.
///
/// The catalog interns the caller's string identifiers into [`BoxId`] handles. A box is
/// either pending here, held by the environment as its next or selected box, or placed
/// here; the environment moves it along that path and never duplicates it.
#[derive(Clone, Debug, Default)]
pub struct BoxCatalog {
    labels: Vec<String>,
    pending: VecDeque<(BoxId, BoxGeometry)>,
    placed: HashMap<BoxId, PlacedBox>,
}

impl BoxCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle for `label`.
    pub(crate) fn register(&mut self, label: impl Into<String>) -> BoxId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Box handles are intentionally 32-bit."
        )]
        let id = BoxId(self.labels.len() as u32);
        self.labels.push(label.into());
        id
    }

    /// Queue a box for stacking.
    pub(crate) fn enqueue(&mut self, id: BoxId, geometry: BoxGeometry) {
        self.pending.push_back((id, geometry));
    }

    /// Take the first pending box.
    pub(crate) fn pop_pending(&mut self) -> Option<(BoxId, BoxGeometry)> {
        self.pending.pop_front()
    }

    /// Record a placed box, returning the record it replaces.
    pub(crate) fn commit(&mut self, placed: PlacedBox) -> Option<PlacedBox> {
        self.placed.insert(placed.id, placed)
    }

    /// Forget every box.
    pub(crate) fn clear(&mut self) {
        self.labels.clear();
        self.pending.clear();
        self.placed.clear();
    }

    /// The identifier `id` was registered with.
    pub fn label(&self, id: BoxId) -> Option<&str> {
        self.labels.get(id.slot()).map(String::as_str)
    }

    /// Placed box by handle.
    pub fn placed(&self, id: BoxId) -> Option<&PlacedBox> {
        self.placed.get(&id)
    }

    /// Placed boxes, in arbitrary order.
    pub fn iter_placed(&self) -> impl Iterator<Item = &PlacedBox> + '_ {
        self.placed.values()
    }

    /// Number of placed boxes.
    pub fn placed_len(&self) -> usize {
        self.placed.len()
    }

    /// Pending boxes in dequeue order.
    pub fn pending(&self) -> impl Iterator<Item = (BoxId, &BoxGeometry)> + '_ {
        self.pending.iter().map(|(id, g)| (*id, g))
    }

    /// Number of pending boxes.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
