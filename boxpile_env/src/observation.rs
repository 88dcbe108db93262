// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the agent sees after each action.

use serde::{Deserialize, Serialize};

/// `(cell_x, height, cell_z)`; serialized as a three-element array.
pub type CellHeight = (i32, f64, i32);

/// Relief and look-ahead heights.
///
/// Serializes as `{"r": [...], "s": [...], "n": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Every populated relief cell, ordered by `(cell_x, cell_z)`.
    #[serde(rename = "r")]
    pub relief: Vec<CellHeight>,
    /// Cells under the selected box, with the average height each would have if the
    /// box were dropped right now.
    #[serde(rename = "s")]
    pub selected: Vec<CellHeight>,
    /// Same as `selected`, for the next box.
    #[serde(rename = "n")]
    pub next: Vec<CellHeight>,
}

/// Result of one action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Observation after the action.
    #[serde(rename = "state")]
    pub observation: Observation,
    /// Reward earned by the action.
    pub reward: f64,
    /// Whether the episode has ended.
    pub done: bool,
}
