//! Error types shared across the crate.

use std::io;
use thiserror::Error;

/// Errors returned by user-initiated operations and storage.
///
/// Tick-time precondition failures are not errors: they halt the loop with a
/// [`crate::activities::BlockReason`] instead.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),

    #[error("could not encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Target must be a positive number (got {0:?}).")]
    InvalidTarget(String),

    #[error("No item in inventory slot {0}.")]
    NoSuchSlot(usize),

    #[error("Only gear can be equipped or upgraded.")]
    NotGear,

    #[error("Requires level {required} (current {current}).")]
    LevelTooLow { required: u32, current: u32 },

    #[error("Item is already at the maximum upgrade tier (+{0}).")]
    MaxUpgradeTier(u8),

    #[error("Not enough {name}: need {needed}, have {have}.")]
    InsufficientMaterials { name: String, needed: u32, have: u32 },

    #[error("That item cannot be eaten.")]
    NotEdible,

    #[error("Not enough gold: need {needed}, have {have}.")]
    NotEnoughGold { needed: u64, have: u64 },

    #[error("Not enough stamina: need {needed}, have {have}.")]
    NotEnoughStamina { needed: u32, have: u32 },

    #[error("No more inventory space.")]
    InventoryFull,

    #[error("Nothing equipped in that slot.")]
    SlotEmpty,

    #[error("No dungeon run is in progress.")]
    NoActiveRun,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type GameResult<T> = Result<T, GameError>;
