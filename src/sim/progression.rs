//! Experience and leveling

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_CAP;

/// Experience needed to advance past `level`
#[inline]
pub fn experience_for_level(level: u32) -> u32 {
    level * level * 10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    /// Experience accumulated toward the next level
    pub experience: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }
}

impl Progression {
    /// Add experience and resolve every level-up it pays for
    ///
    /// Returns the number of levels gained. Experience keeps accumulating at
    /// the level cap.
    pub fn gain(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.level < LEVEL_CAP && self.experience >= experience_for_level(self.level) {
            self.experience -= experience_for_level(self.level);
            self.level += 1;
            gained += 1;
        }
        gained
    }
}
