// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The environment controller.

use boxpile_index::{Aabb3D, Extent3, Relief, slice};
use tracing::{debug, info, trace};

use crate::action::Action;
use crate::boxes::{Axis, BoxId, PlacedBox, Pose, RotationFlags};
use crate::catalog::BoxCatalog;
use crate::config::{EnvOptions, Rewards};
use crate::error::{ActionError, ConfigError};
use crate::observation::{CellHeight, Observation, Step};

/// A box-stacking environment.
///
/// The environment owns a relief of placed boxes, a queue of pending boxes, and at most
/// two boxes in flight: the *selected* box the agent is steering and the *next* box it
/// will get afterwards. Each [`step`](Self::step) applies one [`Action`] to the
/// selected box and reports the new [`Observation`], a reward, and whether the episode
/// has ended.
///
/// A freshly built environment has a next box but no selected one; call
/// [`start`](Self::start) to hand the first box to the agent.
#[derive(Clone, Debug)]
pub struct BoxPileEnv {
    container: Extent3,
    rewards: Rewards,
    catalog: BoxCatalog,
    relief: Relief,
    selected: Option<PlacedBox>,
    next: Option<PlacedBox>,
    terminated: bool,
}

impl BoxPileEnv {
    /// Build an environment, replaying every pre-placed box into the relief.
    pub fn new(options: EnvOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let mut env = Self {
            container: options.container,
            rewards: options.rewards,
            catalog: BoxCatalog::new(),
            relief: Relief::new(options.container, options.shape),
            selected: None,
            next: None,
            terminated: false,
        };
        env.load(options);
        Ok(env)
    }

    /// Parse JSON options and build an environment from them.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::new(EnvOptions::from_json_str(json)?)
    }

    /// Replace the whole configuration and start over.
    ///
    /// On error the environment is left untouched.
    pub fn reset(&mut self, options: EnvOptions) -> Result<Observation, ConfigError> {
        options.validate()?;
        self.container = options.container;
        self.rewards = options.rewards;
        self.relief = Relief::new(options.container, options.shape);
        self.load(options);
        Ok(self.observation())
    }

    fn load(&mut self, options: EnvOptions) {
        self.catalog.clear();
        self.relief.clear();
        self.selected = None;
        self.next = None;
        self.terminated = false;

        for (label, spec) in options.boxes.placed {
            let id = self.catalog.register(label);
            self.place(PlacedBox {
                id,
                geometry: spec.geometry,
                pose: spec.pose,
                rotation: spec.rotation,
            });
        }
        for (label, geometry) in options.boxes.unplaced {
            let id = self.catalog.register(label);
            self.catalog.enqueue(id, geometry);
        }
        self.next = self.draw_pending();

        info!(
            placed = self.catalog.placed_len(),
            pending = self.catalog.pending_len(),
            cells = self.relief.len(),
            "environment reset"
        );
    }

    /// Hand the next box to the agent and return the first observation.
    pub fn start(&mut self) -> Observation {
        if self.selected.is_none() {
            self.select();
        }
        self.observation()
    }

    /// Apply one action to the selected box.
    ///
    /// Without a selected box, or once the episode has ended, nothing changes and the
    /// reward is zero.
    pub fn step(&mut self, action: Action) -> Step {
        let (reward, done) = if self.terminated {
            (0.0, true)
        } else if self.selected.is_none() {
            debug!(?action, "no selected box; action ignored");
            (0.0, false)
        } else {
            self.dispatch(action)
        };

        if done && !self.terminated {
            self.terminated = true;
            info!(?action, reward, "episode terminated");
        }
        debug!(?action, reward, done, "step");
        Step {
            observation: self.observation(),
            reward,
            done,
        }
    }

    /// Apply an action given by its index in [`Action::ALL`].
    pub fn step_index(&mut self, index: u8) -> Result<Step, ActionError> {
        Ok(self.step(Action::try_from(index)?))
    }

    fn dispatch(&mut self, action: Action) -> (f64, bool) {
        match action {
            Action::Push => self.push(),
            Action::MinusX => self.translate(Axis::X, -1.0),
            Action::PlusX => self.translate(Axis::X, 1.0),
            Action::MinusZ => self.translate(Axis::Z, -1.0),
            Action::PlusZ => self.translate(Axis::Z, 1.0),
            Action::RotateX => self.rotate(Axis::X),
            Action::RotateY => self.rotate(Axis::Y),
            Action::RotateZ => self.rotate(Axis::Z),
        }
    }

    fn push(&mut self) -> (f64, bool) {
        let Some(mut selected) = self.selected.take() else {
            return (0.0, false);
        };
        let stats = self.relief.slice_region(&self.drop_slab(&selected));
        selected.pose.y = stats.height.max + selected.geometry.dy / 2.0;

        let g = selected.geometry;
        let outcome = if selected.pose.y + g.dy / 2.0 > self.container.dy {
            (self.rewards.die, true)
        } else {
            // Volume the box would enclose if everything under it were filled, against
            // the volume that actually is.
            let resting = g.dx * stats.height.max * g.dz;
            (resting / self.rewards.push * (resting - stats.volume), false)
        };

        debug!(
            label = self.label(selected.id),
            y = selected.pose.y,
            reward = outcome.0,
            "box pushed"
        );
        self.place(selected);
        self.select();
        if self.selected.is_none() {
            info!(
                placed = self.catalog.placed_len(),
                "all boxes placed; environment idle"
            );
        }
        outcome
    }

    fn translate(&mut self, axis: Axis, step: f64) -> (f64, bool) {
        let Some(selected) = self.selected.as_mut() else {
            return (0.0, false);
        };
        selected.translate(axis, step);
        if selected.within(axis, &self.container) {
            (self.rewards.movement, false)
        } else {
            (self.rewards.die, true)
        }
    }

    fn rotate(&mut self, axis: Axis) -> (f64, bool) {
        let Some(selected) = self.selected.as_mut() else {
            return (0.0, false);
        };
        selected.rotate(axis);
        // Height is settled on push; only the footprint has to fit.
        if selected.footprint_within(&self.container) {
            (self.rewards.rotation, false)
        } else {
            (self.rewards.die, true)
        }
    }

    /// Commit a box to the catalog and the relief.
    fn place(&mut self, placed: PlacedBox) {
        let aabb = placed.aabb();
        self.relief.insert(placed.id.slot(), aabb);
        trace!(
            label = self.label(placed.id),
            cells = self.relief.slot_cells(placed.id.slot()).len(),
            "relief updated"
        );
        self.catalog.commit(placed);
    }

    /// Promote the next box to selected and draw a new next box.
    fn select(&mut self) {
        let Some(next) = self.next.take() else {
            self.selected = None;
            return;
        };
        self.selected = Some(next);
        self.next = self.draw_pending();
        if self.next.is_none() {
            debug!(label = self.label(next.id), "last box selected");
        }
    }

    fn draw_pending(&mut self) -> Option<PlacedBox> {
        let (id, geometry) = self.catalog.pop_pending()?;
        Some(PlacedBox {
            id,
            geometry,
            pose: Pose::new(
                self.container.dx / 2.0,
                geometry.dy / 2.0,
                self.container.dz / 2.0,
            ),
            rotation: RotationFlags::default(),
        })
    }

    /// Full-height slab over the footprint of `b`.
    fn drop_slab(&self, b: &PlacedBox) -> Aabb3D {
        let aabb = b.aabb();
        Aabb3D {
            min_y: 0.0,
            max_y: self.container.dy,
            ..aabb
        }
    }

    /// Current observation.
    pub fn observation(&self) -> Observation {
        let mut relief: Vec<CellHeight> = self
            .relief
            .cells()
            .map(|((x, z), cell)| (x, cell.height(), z))
            .collect();
        relief.sort_by_key(|&(x, _, z)| (x, z));

        Observation {
            relief,
            selected: self.look_ahead(self.selected.as_ref()),
            next: self.look_ahead(self.next.as_ref()),
        }
    }

    /// Per-cell average height of `b` once dropped onto the current stack.
    fn look_ahead(&self, b: Option<&PlacedBox>) -> Vec<CellHeight> {
        let Some(b) = b else {
            return Vec::new();
        };
        let rest = self.relief.max_height(&self.drop_slab(b));
        let mut ghost = *b;
        ghost.pose.y = rest + b.geometry.dy / 2.0;
        let aabb = ghost.aabb();
        self.relief
            .footprint_cells(&aabb)
            .into_iter()
            .map(|cell| {
                let stats = slice(&self.relief.cell_slab(cell), [&aabb]);
                (cell.0, stats.height.average, cell.1)
            })
            .collect()
    }

    fn label(&self, id: BoxId) -> &str {
        self.catalog.label(id).unwrap_or("?")
    }

    /// Whether no box is selected: before [`start`](Self::start), or after the last
    /// box has been pushed.
    pub fn is_idle(&self) -> bool {
        self.selected.is_none()
    }

    /// Whether a losing move has ended the episode.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The box the agent is steering.
    pub fn selected(&self) -> Option<&PlacedBox> {
        self.selected.as_ref()
    }

    /// The box the agent gets after the selected one.
    pub fn next(&self) -> Option<&PlacedBox> {
        self.next.as_ref()
    }

    /// Pending and placed boxes.
    pub fn catalog(&self) -> &BoxCatalog {
        &self.catalog
    }

    /// Height map of the placed boxes.
    pub fn relief(&self) -> &Relief {
        &self.relief
    }

    /// Container extents.
    pub fn container(&self) -> Extent3 {
        self.container
    }

    /// Reward constants in use.
    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }
}
