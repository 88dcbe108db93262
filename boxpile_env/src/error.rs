// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only construction and action decoding can fail. Losing moves inside an episode are
//! reported through [`Step::done`](crate::Step::done), not through these types.

use thiserror::Error;

use crate::boxes::Axis;

/// Rejected environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A container extent is zero, negative, or not finite.
    #[error("container extent along {axis} must be positive and finite, got {value}")]
    Container {
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: f64,
    },

    /// The grid has no cells along an axis.
    #[error("grid shape must have at least one cell along {axis}")]
    EmptyGrid {
        /// Offending axis.
        axis: Axis,
    },

    /// A box extent is zero, negative, or not finite.
    #[error("box `{id}` extent along {axis} must be positive and finite, got {value}")]
    BoxExtent {
        /// Box identifier.
        id: String,
        /// Offending axis.
        axis: Axis,
        /// Offending value.
        value: f64,
    },

    /// A box is larger than the container in every orientation.
    #[error("box `{id}` does not fit the container in any orientation")]
    BoxTooLarge {
        /// Box identifier.
        id: String,
    },

    /// A placed box has a non-finite position.
    #[error("box `{id}` has a non-finite position")]
    BoxPose {
        /// Box identifier.
        id: String,
    },

    /// The same identifier is listed as both placed and unplaced.
    #[error("box `{id}` is listed as both placed and unplaced")]
    DuplicateId {
        /// Box identifier.
        id: String,
    },

    /// The configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A raw action index outside the discrete action space.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("action index {index} is out of range (expected 0..{count})")]
pub struct ActionError {
    /// The rejected index.
    pub index: u8,
    /// Size of the action space.
    pub count: usize,
}
