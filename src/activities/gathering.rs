//! Mining, fishing and hunting.

use super::data::{FishingSpot, HuntTarget, OreDef};
use super::types::*;
use crate::core::constants::{ARROWS_PER_SHOT, FISH_PRIMARY_CHANCE, GATHER_XP_PER_TICK};
use crate::core::progression::Skill;
use crate::core::save::PlayerSave;
use crate::items::catalog;
use crate::items::inventory::{add_item, count_of, remove_quantity};
use crate::items::types::Item;
use rand::Rng;

/// Adds one gathered item and grants skill xp.
fn gather(save: &mut PlayerSave, skill: Skill, item: Item) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    let name = item.display_name();
    add_item(&mut save.inventory, item, 1);
    outcome.produced(name, 1);
    outcome.grant_skill_xp(save, skill, GATHER_XP_PER_TICK);
    outcome
}

#[derive(Debug, Clone, Copy)]
pub struct Mining {
    pub ore: OreDef,
}

impl Activity for Mining {
    fn label(&self) -> &'static str {
        "Mining"
    }

    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason> {
        require_skill(save, Skill::Mining, self.ore.req_level)?;
        require_room(save, 0, 1)
    }

    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, _rng: &mut R) -> TickOutcome {
        gather(save, Skill::Mining, self.ore.item())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Fishing {
    pub spot: FishingSpot,
}

impl Activity for Fishing {
    fn label(&self) -> &'static str {
        "Fishing"
    }

    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason> {
        require_skill(save, Skill::Fishing, self.spot.req_level)?;
        require_room(save, 0, 1)
    }

    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, rng: &mut R) -> TickOutcome {
        let fish = if rng.gen_bool(FISH_PRIMARY_CHANCE) {
            self.spot.primary
        } else {
            self.spot.secondary
        };
        gather(save, Skill::Fishing, fish.item())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Hunting {
    pub target: HuntTarget,
}

impl Activity for Hunting {
    fn label(&self) -> &'static str {
        "Hunting"
    }

    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason> {
        require_skill(save, Skill::Hunting, self.target.req_level)?;
        if count_of(&save.inventory, &catalog::arrows_key()) < ARROWS_PER_SHOT {
            return Err(BlockReason::OutOfArrows);
        }
        require_room(save, ARROWS_PER_SHOT, 1)
    }

    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, _rng: &mut R) -> TickOutcome {
        remove_quantity(&mut save.inventory, &catalog::arrows_key(), ARROWS_PER_SHOT);
        let mut outcome = gather(save, Skill::Hunting, self.target.meat());
        outcome.events.insert(
            0,
            ActivityEvent::Consumed {
                item: "Arrows".to_string(),
                quantity: ARROWS_PER_SHOT,
            },
        );
        outcome
    }
}
