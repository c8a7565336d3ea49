use crate::combat::types::EncounterReport;
use crate::core::config::GameConfig;
use crate::core::progression::Skill;
use crate::core::save::PlayerSave;
use crate::core::scheduler::{PauseSignal, Scheduler};
use crate::items::inventory::has_room;
use crate::items::types::Rarity;
use crate::utils::persistence::{SaveStore, Storage};
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// Whose experience a grant goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpTrack {
    Hero,
    Skill(Skill),
}

impl fmt::Display for XpTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XpTrack::Hero => f.write_str("Hero"),
            XpTrack::Skill(skill) => f.write_str(skill.name()),
        }
    }
}

/// A precondition that failed at the start of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockReason {
    #[error("Requires {track} level {required}.")]
    LevelTooLow {
        track: XpTrack,
        required: u32,
        current: u32,
    },

    #[error("Not enough {name} (need {needed}, have {have}).")]
    MissingInput { name: String, needed: u32, have: u32 },

    #[error("Out of arrows.")]
    OutOfArrows,

    #[error("No more inventory space.")]
    InventoryFull,

    #[error("Not enough stamina (need {needed}, have {have}).")]
    NotEnoughStamina { needed: u32, have: u32 },

    #[error("You are too wounded to fight.")]
    NoHealth,
}

/// Why a loop is no longer running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopReason {
    #[error("Stopped.")]
    User,

    #[error("Paused.")]
    Paused,

    #[error("Target completed!")]
    TargetCompleted,

    #[error("{0}")]
    Blocked(BlockReason),

    #[error("You were defeated by {0}.")]
    Defeated(String),

    #[error("Could not save progress: {0}")]
    SaveFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Stopped,
    Completed,
    Blocked,
}

/// Something that happened during a tick, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    Started { activity: &'static str },
    Consumed { item: String, quantity: u32 },
    Produced { item: String, quantity: u32 },
    XpGained { track: XpTrack, amount: u64 },
    LevelUp { track: XpTrack, level: u32 },
    StaminaSpent { amount: u32 },
    Encounter { enemy: String, report: EncounterReport },
    GoldFound { amount: u64 },
    ItemFound { name: String, rarity: Rarity },
    TargetCompleted { last: Option<String> },
    Halted { reason: StopReason },
}

impl ActivityEvent {
    /// Human-readable line for an activity log.
    pub fn message(&self) -> String {
        match self {
            ActivityEvent::Started { activity } => format!("{activity} started."),
            ActivityEvent::Consumed { item, quantity } => format!("Used {quantity} {item}."),
            ActivityEvent::Produced { item, quantity } => {
                format!("You obtained {quantity} {item}.")
            }
            ActivityEvent::XpGained { track, amount } => format!("+{amount} {track} XP"),
            ActivityEvent::LevelUp { track, level } => {
                format!("{track} level up! Now level {level}.")
            }
            ActivityEvent::StaminaSpent { amount } => format!("-{amount} stamina"),
            ActivityEvent::Encounter { enemy, report } => format!(
                "{enemy}: {} after {} rounds (dealt {}, took {}).",
                report.outcome.name(),
                report.rounds,
                report.damage_dealt,
                report.damage_taken
            ),
            ActivityEvent::GoldFound { amount } => format!("+{amount} gold"),
            ActivityEvent::ItemFound { name, rarity } => {
                format!("Loot: {name} ({})", rarity.name())
            }
            ActivityEvent::TargetCompleted { last: Some(item) } => {
                format!("Target completed! You obtained 1 {item} (last).")
            }
            ActivityEvent::TargetCompleted { last: None } => "Target completed!".to_string(),
            ActivityEvent::Halted { reason } => reason.to_string(),
        }
    }
}

/// Result of a successful `perform`.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub events: Vec<ActivityEvent>,
    /// Name of the item produced, for the target-completed message.
    pub produced: Option<String>,
    /// Set when the tick itself ends the loop (e.g. the hero died).
    pub halt: Option<StopReason>,
}

impl TickOutcome {
    pub fn produced(&mut self, name: String, quantity: u32) {
        self.events.push(ActivityEvent::Produced {
            item: name.clone(),
            quantity,
        });
        self.produced = Some(name);
    }

    pub fn consumed(&mut self, name: String, quantity: u32) {
        self.events.push(ActivityEvent::Consumed {
            item: name,
            quantity,
        });
    }

    /// Grants skill experience and reports any level-ups.
    pub fn grant_skill_xp(&mut self, save: &mut PlayerSave, skill: Skill, amount: u64) {
        let gained = save.skill_mut(skill).grant_xp(amount);
        self.record_xp(XpTrack::Skill(skill), amount, gained, save.skill(skill).level);
    }

    /// Grants hero experience, including the stat gains of each level.
    pub fn grant_hero_xp(&mut self, save: &mut PlayerSave, amount: u64) {
        let gained = save.grant_hero_xp(amount);
        self.record_xp(XpTrack::Hero, amount, gained, save.hero.level);
    }

    fn record_xp(&mut self, track: XpTrack, amount: u64, gained: u32, level: u32) {
        self.events.push(ActivityEvent::XpGained { track, amount });
        if gained > 0 {
            self.events.push(ActivityEvent::LevelUp { track, level });
        }
    }
}

/// One repeatable action driven by an [`ActivityLoop`](super::ActivityLoop).
pub trait Activity {
    /// Display name, e.g. "Mining".
    fn label(&self) -> &'static str;

    /// Validates the tick against the current save without mutating it.
    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason>;

    /// Performs the tick. Only called after `check` passed on the same save.
    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, rng: &mut R) -> TickOutcome;
}

/// Everything a tick handler may touch.
pub struct TickContext<'a, S: Storage, R: Rng + ?Sized> {
    pub store: &'a mut SaveStore<S>,
    pub scheduler: &'a mut Scheduler,
    pub pause: &'a PauseSignal,
    pub rng: &'a mut R,
    pub config: &'a GameConfig,
}

/// Checks that the hero meets a skill level requirement.
pub fn require_skill(save: &PlayerSave, skill: Skill, required: u32) -> Result<(), BlockReason> {
    let current = save.skill(skill).level;
    if current < required {
        return Err(BlockReason::LevelTooLow {
            track: XpTrack::Skill(skill),
            required,
            current,
        });
    }
    Ok(())
}

/// Checks that swapping `consumed` units for `produced` units fits the inventory.
pub fn require_room(save: &PlayerSave, consumed: u32, produced: u32) -> Result<(), BlockReason> {
    if has_room(&save.inventory, save.inventory_max, consumed, produced) {
        Ok(())
    } else {
        Err(BlockReason::InventoryFull)
    }
}
