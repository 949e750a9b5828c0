//! Destruction streak: consecutive removals without a miss

use serde::{Deserialize, Serialize};

use crate::consts::STREAK_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakCounter {
    count: u32,
    threshold: u32,
}

impl Default for StreakCounter {
    fn default() -> Self {
        Self::new(STREAK_THRESHOLD)
    }
}

impl StreakCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    /// Count a successful removal; true once the threshold is reached
    pub fn record_hit(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.count >= self.threshold
    }

    /// A click that hit nothing
    pub fn record_miss(&mut self) {
        self.count = 0;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
