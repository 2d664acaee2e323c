//! World configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Location;

/// Global simulation parameters supplied by the level loader.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Grid width (columns).
    pub width: u32,

    /// Grid height (rows).
    pub height: u32,

    /// Arm slots given to agents created without an explicit count.
    pub arms_per_agent: usize,

    /// Ticks an absorbing delivery square holds an item before consuming it.
    pub absorb_dwell_ticks: u32,

    /// Ticks a READY food needs inside a running appliance.
    pub processing_ticks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            arms_per_agent: 1,
            absorb_dwell_ticks: 1,
            processing_ticks: 2,
        }
    }
}

impl WorldConfig {
    pub fn with_bounds(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_arms(mut self, arms: usize) -> Self {
        self.arms_per_agent = arms;
        self
    }

    pub fn in_bounds(&self, location: Location) -> bool {
        location.row >= 0
            && location.col >= 0
            && (location.row as i64) < self.height as i64
            && (location.col as i64) < self.width as i64
    }
}
