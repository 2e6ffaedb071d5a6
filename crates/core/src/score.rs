use serde::{Deserialize, Serialize};

use crate::types::{Lane, LANES};

/// Running score for a round: a total plus per-lane accumulators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    total: u32,
    lanes: [u32; LANES],
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Points earned in lane `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..4`.
    pub fn lane(&self, index: usize) -> u32 {
        self.lane_score(Lane::new(index))
    }

    pub fn lane_score(&self, lane: Lane) -> u32 {
        self.lanes[lane.index()]
    }

    /// Credit `points` to `lane` and to the total
    pub fn add(&mut self, lane: Lane, points: u32) {
        self.lanes[lane.index()] = self.lanes[lane.index()].saturating_add(points);
        self.total = self.total.saturating_add(points);
    }

    /// Credit round-level bonus points (not tied to any lane)
    pub fn add_bonus(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
