// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=boxpile_env --heading-base-level=0

//! Boxpile Env: a box-stacking environment for reinforcement learning.
//!
//! Boxes arrive one at a time. The agent steers the *selected* box over the container
//! floor with eight discrete [`Action`]s (push, one-unit moves along X and Z, and
//! quarter turns about each axis) and pushes it down onto whatever is already there.
//! Every step returns an [`Observation`] of the relief, a reward, and a `done` flag.
//!
//! - Moving or rotating the box so that it overhangs the container floor ends the
//!   episode with the `die` reward.
//! - Pushing drops the box onto the highest point under its footprint. If it then
//!   sticks out of the top of the container the episode ends with the `die` reward,
//!   but the box is still placed.
//! - Otherwise a push is rewarded by how much empty space the box leaves under itself.
//!
//! Geometry and the height map live in [`boxpile_index`].
//!
//! # Example
//!
//! ```rust
//! use boxpile_env::{Action, BoxPileEnv};
//!
//! let mut env = BoxPileEnv::from_json_str(r#"{
//!     "dx": 100, "dy": 100, "dz": 100,
//!     "shape": { "x": 10, "z": 10 },
//!     "boxes": { "unplaced": { "a": { "dx": 20, "dy": 10, "dz": 20 } } }
//! }"#)?;
//!
//! let first = env.start();
//! assert!(first.relief.is_empty());
//!
//! let step = env.step(Action::MinusX);
//! assert!(!step.done);
//! let step = env.step(Action::Push);
//! assert!(!step.done);
//! assert_eq!(step.observation.relief.len(), 6);
//! assert!(env.is_idle());
//! # Ok::<(), boxpile_env::ConfigError>(())
//! ```
//!
//! Everything is synchronous and single-threaded: one environment belongs to one
//! driver, and independent episodes use independent environments.

mod action;
mod boxes;
mod catalog;
mod config;
mod env;
mod error;
mod observation;

pub use action::Action;
pub use boxes::{Axis, BoxGeometry, BoxId, PlacedBox, Pose, RotationFlags};
pub use boxpile_index;
pub use catalog::BoxCatalog;
pub use config::{BoxSets, EnvOptions, PlacedSpec, Rewards};
pub use env::BoxPileEnv;
pub use error::{ActionError, ConfigError};
pub use observation::{CellHeight, Observation, Step};
