//! Cooking and forging: activities that turn inputs into a product.

use super::data::{CookRecipe, SmeltRecipe};
use super::types::*;
use crate::core::constants::{COOK_XP_PER_TICK, FORGE_XP_REQ_DIVISOR};
use crate::core::progression::Skill;
use crate::core::save::PlayerSave;
use crate::items::inventory::{add_item, count_of, remove_quantity};
use crate::items::types::StackKey;
use rand::Rng;

fn require_input(
    save: &PlayerSave,
    key: &StackKey,
    name: &str,
    needed: u32,
) -> Result<(), BlockReason> {
    let have = count_of(&save.inventory, key);
    if have < needed {
        return Err(BlockReason::MissingInput {
            name: name.to_string(),
            needed,
            have,
        });
    }
    Ok(())
}

/// Blacksmithing xp for one bar: `round(base * (1 + req / 20))`.
pub fn forge_xp(recipe: &SmeltRecipe) -> u64 {
    let scale = 1.0 + f64::from(recipe.req_level) / FORGE_XP_REQ_DIVISOR;
    (recipe.base_xp as f64 * scale).round() as u64
}

#[derive(Debug, Clone, Copy)]
pub struct Cooking {
    pub recipe: CookRecipe,
}

impl Activity for Cooking {
    fn label(&self) -> &'static str {
        "Cooking"
    }

    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason> {
        require_skill(save, Skill::Cooking, self.recipe.req_level)?;
        require_input(save, &self.recipe.input_key(), self.recipe.input_name, 1)?;
        require_room(save, 1, 1)
    }

    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, _rng: &mut R) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        remove_quantity(&mut save.inventory, &self.recipe.input_key(), 1);
        outcome.consumed(self.recipe.input_name.to_string(), 1);

        let food = self.recipe.output();
        let name = food.display_name();
        add_item(&mut save.inventory, food, 1);
        outcome.produced(name, 1);
        outcome.grant_skill_xp(save, Skill::Cooking, COOK_XP_PER_TICK);
        outcome
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Forging {
    pub recipe: SmeltRecipe,
}

impl Activity for Forging {
    fn label(&self) -> &'static str {
        "Forging"
    }

    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason> {
        require_skill(save, Skill::Blacksmithing, self.recipe.req_level)?;
        for input in &self.recipe.inputs {
            require_input(save, &input.key(), input.name, input.quantity)?;
        }
        require_room(save, self.recipe.input_units(), 1)
    }

    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, _rng: &mut R) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        for input in &self.recipe.inputs {
            remove_quantity(&mut save.inventory, &input.key(), input.quantity);
            outcome.consumed(input.name.to_string(), input.quantity);
        }

        add_item(&mut save.inventory, self.recipe.output(), 1);
        outcome.produced(self.recipe.name.to_string(), 1);
        outcome.grant_skill_xp(save, Skill::Blacksmithing, forge_xp(&self.recipe));
        outcome
    }
}
