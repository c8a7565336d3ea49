//! Eating, selling, buying arrows, and banking.

use super::catalog;
use super::inventory;
use super::types::{Gear, Item, Stack};
use crate::core::balance::*;
use crate::core::constants::*;
use crate::core::save::PlayerSave;
use crate::error::{GameError, GameResult};

/// What eating a food item restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meal {
    pub hp_restored: u32,
    pub stamina_restored: u32,
}

/// Consumes one food from slot `index`, healing up to the vitals maxima.
pub fn eat(save: &mut PlayerSave, index: usize) -> GameResult<Meal> {
    let stack = save
        .inventory
        .get(index)
        .ok_or(GameError::NoSuchSlot(index))?;
    let food = match &stack.item {
        Item::Food(f) => f.clone(),
        _ => return Err(GameError::NotEdible),
    };
    inventory::take_one(&mut save.inventory, index)?;

    let vitals = &mut save.vitals;
    let hp_before = vitals.hp;
    let stamina_before = vitals.stamina;
    vitals.hp = vitals.hp.saturating_add(food.heal_hp).min(vitals.hp_max);
    vitals.stamina = vitals
        .stamina
        .saturating_add(food.heal_stamina)
        .min(vitals.stamina_max);

    Ok(Meal {
        hp_restored: vitals.hp - hp_before,
        stamina_restored: vitals.stamina - stamina_before,
    })
}

pub fn gear_sell_price(gear: &Gear) -> u64 {
    let stats = u64::from(gear.attack) + u64::from(gear.defense);
    ((SELL_BASE_PRICE + stats * SELL_PRICE_PER_STAT) * gear.rarity.sell_multiplier()).max(1)
}

/// Gold paid for one unit.
pub fn unit_price(item: &Item) -> u64 {
    match item {
        Item::Gear(g) => gear_sell_price(g),
        _ => 1,
    }
}

/// Sells one unit from slot `index`. Returns the gold earned.
pub fn sell_one(save: &mut PlayerSave, index: usize) -> GameResult<u64> {
    let item = inventory::take_one(&mut save.inventory, index)?;
    let price = unit_price(&item);
    save.gold = save.gold.saturating_add(price);
    Ok(price)
}

/// Sells the whole stack at slot `index`. Returns the gold earned.
pub fn sell_stack(save: &mut PlayerSave, index: usize) -> GameResult<u64> {
    if index >= save.inventory.len() {
        return Err(GameError::NoSuchSlot(index));
    }
    let stack = save.inventory.remove(index);
    let total = unit_price(&stack.item).saturating_mul(u64::from(stack.units()));
    save.gold = save.gold.saturating_add(total);
    Ok(total)
}

/// Buys one bundle of arrows.
pub fn buy_arrows(save: &mut PlayerSave) -> GameResult<()> {
    if save.gold < ARROW_BUNDLE_PRICE {
        return Err(GameError::NotEnoughGold {
            needed: ARROW_BUNDLE_PRICE,
            have: save.gold,
        });
    }
    inventory::try_add(
        &mut save.inventory,
        save.inventory_max,
        catalog::arrows(),
        ARROW_BUNDLE_SIZE,
    )?;
    save.gold -= ARROW_BUNDLE_PRICE;
    Ok(())
}

/// Moves the whole stack at slot `index` into the bank.
pub fn deposit(save: &mut PlayerSave, index: usize) -> GameResult<()> {
    if index >= save.inventory.len() {
        return Err(GameError::NoSuchSlot(index));
    }
    let Stack { item, quantity } = save.inventory.remove(index);
    inventory::add_item(&mut save.bank, item, quantity.max(1));
    Ok(())
}
