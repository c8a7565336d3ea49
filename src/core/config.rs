//! Runtime-tunable timing and regeneration settings.

use super::balance::{MAX_BOSS_ROUNDS, MAX_COMBAT_ROUNDS};
use super::constants::*;
use crate::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// How much health and stamina come back, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenPolicy {
    pub hp_amount: u32,
    pub hp_interval_ms: u64,
    pub stamina_amount: u32,
    pub stamina_interval_ms: u64,
}

impl Default for RegenPolicy {
    fn default() -> Self {
        Self {
            hp_amount: HP_REGEN_AMOUNT,
            hp_interval_ms: HP_REGEN_EVERY_MS,
            stamina_amount: STAMINA_REGEN_AMOUNT,
            stamina_interval_ms: STAMINA_REGEN_EVERY_MS,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Wait between activity and combat ticks.
    pub tick_interval_ms: u64,

    /// How often the regeneration ticker checks the clock.
    pub regen_check_interval_ms: u64,

    pub regen: RegenPolicy,

    /// Exchanges before a zone or wave encounter is a stalemate.
    pub max_combat_rounds: u32,

    /// Boss exchanges before a dungeon run fails.
    pub max_boss_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: ACTIVITY_TICK_MS,
            regen_check_interval_ms: REGEN_CHECK_INTERVAL_MS,
            regen: RegenPolicy::default(),
            max_combat_rounds: MAX_COMBAT_ROUNDS,
            max_boss_rounds: MAX_BOSS_ROUNDS,
        }
    }
}

impl GameConfig {
    /// Reads a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> GameResult<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        let checks = [
            (self.tick_interval_ms == 0, "tick_interval_ms must be positive"),
            (
                self.regen_check_interval_ms == 0,
                "regen_check_interval_ms must be positive",
            ),
            (self.regen.hp_interval_ms == 0, "regen.hp_interval_ms must be positive"),
            (
                self.regen.stamina_interval_ms == 0,
                "regen.stamina_interval_ms must be positive",
            ),
            (self.regen.hp_amount == 0, "regen.hp_amount must be positive"),
            (self.regen.stamina_amount == 0, "regen.stamina_amount must be positive"),
            (self.max_combat_rounds == 0, "max_combat_rounds must be positive"),
            (self.max_boss_rounds == 0, "max_boss_rounds must be positive"),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, msg)) => Err(GameError::InvalidConfig(msg.to_string())),
            None => Ok(()),
        }
    }
}
