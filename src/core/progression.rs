//! Experience and level thresholds shared by the hero and every skill.

use super::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Skills trained by the activity loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Mining,
    Fishing,
    Hunting,
    Cooking,
    Blacksmithing,
}

impl Skill {
    pub const ALL: [Skill; 5] = [
        Skill::Mining,
        Skill::Fishing,
        Skill::Hunting,
        Skill::Cooking,
        Skill::Blacksmithing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Mining => "Mining",
            Skill::Fishing => "Fishing",
            Skill::Hunting => "Hunting",
            Skill::Cooking => "Cooking",
            Skill::Blacksmithing => "Blacksmithing",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Level, experience, and the threshold for the next level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub level: u32,
    pub xp: u64,
    pub xp_next: u64,
}

impl Default for SkillProgress {
    fn default() -> Self {
        Self {
            level: STARTING_LEVEL,
            xp: 0,
            xp_next: STARTING_XP_NEXT,
        }
    }
}

/// Threshold after one level-up: floor(next * 1.5), always strictly larger.
pub fn next_threshold(xp_next: u64) -> u64 {
    ((xp_next as f64 * XP_NEXT_GROWTH).floor() as u64).max(xp_next.saturating_add(1))
}

impl SkillProgress {
    /// Adds experience and applies as many level-ups as the overflow allows.
    ///
    /// Returns the number of levels gained.
    pub fn grant_xp(&mut self, amount: u64) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        self.settle()
    }

    /// Applies pending level-ups so that `xp < xp_next`. Returns levels gained.
    pub fn settle(&mut self) -> u32 {
        self.level = self.level.max(STARTING_LEVEL);
        self.xp_next = self.xp_next.max(1);
        let mut gained = 0;
        while self.xp >= self.xp_next {
            self.xp -= self.xp_next;
            self.level = self.level.saturating_add(1);
            self.xp_next = next_threshold(self.xp_next);
            gained += 1;
        }
        gained
    }
}

/// Maximum health at a hero level.
pub fn hp_max_for_level(level: u32) -> u32 {
    BASE_HP_MAX + level.max(1).saturating_sub(1).saturating_mul(HP_MAX_PER_LEVEL)
}

/// Maximum stamina at a hero level.
pub fn stamina_max_for_level(level: u32) -> u32 {
    BASE_STAMINA_MAX + level.max(1).saturating_sub(1).saturating_mul(STAMINA_MAX_PER_LEVEL)
}
