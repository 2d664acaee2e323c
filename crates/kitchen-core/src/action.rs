#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Direction, Location, ObjectId};

/// One agent's intent for a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum AgentAction {
    #[default]
    NoOp,
    /// Face `direction`, then step that way if the cell is enterable.
    Move { direction: Direction },
    /// Face `direction` without stepping.
    Turn { direction: Direction },
    /// Grab, merge or drop at the facing cell, falling back to the station action.
    Interact {
        #[cfg_attr(feature = "serde", serde(default))]
        arm: Option<usize>,
    },
    /// Trigger the facing station's action directly.
    Execute {
        #[cfg_attr(feature = "serde", serde(default))]
        arm: Option<usize>,
    },
}

/// Resolved outcome of an [`AgentAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome", rename_all = "snake_case"))]
pub enum Interaction {
    NoOp,
    Moved {
        to: Location,
    },
    Turned {
        orientation: Direction,
    },
    Grabbed {
        object: ObjectId,
        arm: usize,
    },
    /// A held object went into a dynamic holder, or a loose object into a held one.
    Merged {
        object: ObjectId,
        into: ObjectId,
    },
    /// A held object was placed into the static station.
    Dropped {
        object: ObjectId,
        onto: ObjectId,
    },
    Executed {
        station: ObjectId,
        created: Vec<ObjectId>,
        removed: Vec<ObjectId>,
    },
}

impl Interaction {
    pub fn is_noop(&self) -> bool {
        matches!(self, Interaction::NoOp)
    }
}
