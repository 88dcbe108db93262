// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The discrete action space.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// An action applied to the selected box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Drop the box onto the stack and move on to the next one.
    Push = 0,
    /// Move one unit towards `x = 0`.
    MinusX = 1,
    /// Move one unit towards `x = dx`.
    PlusX = 2,
    /// Move one unit towards `z = 0`.
    MinusZ = 3,
    /// Move one unit towards `z = dz`.
    PlusZ = 4,
    /// Quarter turn about X.
    RotateX = 5,
    /// Quarter turn about the vertical axis.
    RotateY = 6,
    /// Quarter turn about Z.
    RotateZ = 7,
}

impl Action {
    /// Size of the action space.
    pub const COUNT: usize = 8;

    /// Every action, ordered by index.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Push,
        Self::MinusX,
        Self::PlusX,
        Self::MinusZ,
        Self::PlusZ,
        Self::RotateX,
        Self::RotateY,
        Self::RotateZ,
    ];

    /// Index of the action in [`Action::ALL`].
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(ActionError {
                index,
                count: Self::COUNT,
            })
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action.index()
    }
}
