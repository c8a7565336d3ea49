use super::inventory;
use super::types::{EquipSlot, Gear, Item};
use crate::core::balance::*;
use crate::core::save::PlayerSave;
use crate::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Player equipment: at most one gear item per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Gear>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Gear> {
        self.slots.get(&slot)
    }

    /// Places `gear` in `slot`, returning the previous occupant.
    pub fn set(&mut self, slot: EquipSlot, gear: Option<Gear>) -> Option<Gear> {
        match gear {
            Some(g) => self.slots.insert(slot, g),
            None => self.slots.remove(&slot),
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Gear> {
        self.slots.values()
    }

    /// Number of equipped pieces belonging to `set_id`.
    pub fn set_pieces(&self, set_id: &str) -> usize {
        self.iter_equipped().filter(|g| g.in_set(set_id)).count()
    }
}

/// Combat stats derived from base stats and equipped gear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTotals {
    pub gear_attack: u32,
    pub gear_defense: u32,
    pub set_bonus_pct: u32,
    pub attack: u32,
    pub defense: u32,
}

/// Attack bonus percent for a number of equipped set pieces.
pub fn set_bonus_pct(pieces: usize) -> u32 {
    match pieces {
        0 | 1 => 0,
        2 => SET_BONUS_TWO_PIECES_PCT,
        3 => SET_BONUS_THREE_PIECES_PCT,
        _ => SET_BONUS_FOUR_PIECES_PCT,
    }
}

/// The set multiplier applies to attack only; defense is a plain sum.
pub fn compute_totals(base_attack: u32, base_defense: u32, equipment: &Equipment) -> CombatTotals {
    let gear_attack = equipment
        .iter_equipped()
        .fold(0u32, |acc, g| acc.saturating_add(g.attack));
    let gear_defense = equipment
        .iter_equipped()
        .fold(0u32, |acc, g| acc.saturating_add(g.defense));
    let pct = set_bonus_pct(equipment.set_pieces(CRYPTWARDEN_SET_ID));

    let raw_attack = u64::from(base_attack) + u64::from(gear_attack);
    let attack = raw_attack * u64::from(100 + pct) / 100;

    CombatTotals {
        gear_attack,
        gear_defense,
        set_bonus_pct: pct,
        attack: u32::try_from(attack).unwrap_or(u32::MAX),
        defense: base_defense.saturating_add(gear_defense),
    }
}

pub fn can_equip(gear: &Gear, hero_level: u32) -> bool {
    hero_level >= gear.req_level
}

/// Moves one unit from inventory slot `index` into its equipment slot.
///
/// The displaced item, if any, goes back to the inventory as its own stack.
/// Returns the displaced item.
pub fn equip(save: &mut PlayerSave, index: usize) -> GameResult<Option<Gear>> {
    let stack = save
        .inventory
        .get(index)
        .ok_or(GameError::NoSuchSlot(index))?;
    let gear = stack.item.as_gear().ok_or(GameError::NotGear)?;
    if !can_equip(gear, save.hero.level) {
        return Err(GameError::LevelTooLow {
            required: gear.req_level,
            current: save.hero.level,
        });
    }

    let gear = match inventory::take_one(&mut save.inventory, index)? {
        Item::Gear(g) => g,
        _ => return Err(GameError::NotGear),
    };
    let slot = gear.slot;
    let previous = save.equipment.set(slot, Some(gear));
    if let Some(prev) = &previous {
        inventory::add_item(&mut save.inventory, Item::Gear(prev.clone()), 1);
    }
    save.recompute_totals();
    log::debug!("equipped {:?}", slot);
    Ok(previous)
}

/// Moves the item in `slot` back to the inventory.
pub fn unequip(save: &mut PlayerSave, slot: EquipSlot) -> GameResult<Gear> {
    if save.equipment.get(slot).is_none() {
        return Err(GameError::SlotEmpty);
    }
    if !inventory::has_room(&save.inventory, save.inventory_max, 0, 1) {
        return Err(GameError::InventoryFull);
    }
    let gear = save.equipment.set(slot, None).ok_or(GameError::SlotEmpty)?;
    inventory::add_item(&mut save.inventory, Item::Gear(gear.clone()), 1);
    save.recompute_totals();
    Ok(gear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog;
    use crate::items::types::{Rarity, Stack};

    fn gear(slot: EquipSlot, attack: u32, defense: u32, req_level: u32) -> Gear {
        Gear {
            id: "test".to_string(),
            base_name: "Test".to_string(),
            slot,
            rarity: Rarity::Common,
            req_level,
            attack,
            defense,
            upgrade: 0,
            set_id: None,
        }
    }

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert_eq!(eq.iter_equipped().count(), 0);
        assert!(eq.get(EquipSlot::Ring).is_none());
    }

    #[test]
    fn test_set_bonus_steps() {
        assert_eq!(set_bonus_pct(0), 0);
        assert_eq!(set_bonus_pct(1), 0);
        assert_eq!(set_bonus_pct(2), 2);
        assert_eq!(set_bonus_pct(3), 4);
        assert_eq!(set_bonus_pct(4), 6);
        assert_eq!(set_bonus_pct(9), 6);
    }

    #[test]
    fn test_totals_without_set() {
        let mut eq = Equipment::new();
        eq.set(EquipSlot::MainHand, Some(gear(EquipSlot::MainHand, 7, 0, 1)));
        eq.set(EquipSlot::Chest, Some(gear(EquipSlot::Chest, 2, 4, 1)));
        let totals = compute_totals(10, 10, &eq);
        assert_eq!(totals.attack, 19);
        assert_eq!(totals.defense, 14);
        assert_eq!(totals.set_bonus_pct, 0);
    }

    #[test]
    fn test_full_set_multiplies_attack_only() {
        let mut eq = Equipment::new();
        for piece in catalog::cryptwarden_set() {
            eq.set(piece.slot, Some(piece));
        }
        let totals = compute_totals(10, 10, &eq);
        // (10 + 30 + 20) * 1.06 = 63.6
        assert_eq!(totals.set_bonus_pct, 6);
        assert_eq!(totals.attack, 63);
        assert_eq!(totals.defense, 10 + 12 + 18);
    }

    #[test]
    fn test_equip_swaps_previous_occupant_back() {
        let mut save = PlayerSave::default();
        save.inventory.push(Stack::single(Item::Gear(gear(EquipSlot::Ring, 1, 0, 1))));
        equip(&mut save, 0).unwrap();
        assert!(save.inventory.is_empty());

        save.inventory.push(Stack::single(Item::Gear(gear(EquipSlot::Ring, 4, 4, 1))));
        let previous = equip(&mut save, 0).unwrap();
        assert_eq!(previous.map(|g| g.attack), Some(1));
        assert_eq!(save.inventory.len(), 1);
        assert_eq!(save.equipment.get(EquipSlot::Ring).map(|g| g.attack), Some(4));
        assert_eq!(save.totals.attack, save.base_attack + 4);
    }

    #[test]
    fn test_equip_refuses_under_level() {
        let mut save = PlayerSave::default();
        save.inventory.push(Stack::single(Item::Gear(gear(EquipSlot::Helmet, 0, 4, 12))));
        let result = equip(&mut save, 0);
        assert!(matches!(result, Err(GameError::LevelTooLow { required: 12, current: 1 })));
        assert_eq!(save.inventory.len(), 1);
    }

    #[test]
    fn test_equip_rejects_non_gear() {
        let mut save = PlayerSave::default();
        save.inventory.push(Stack::new(catalog::coal(), 3));
        assert!(matches!(equip(&mut save, 0), Err(GameError::NotGear)));
    }

    #[test]
    fn test_unequip_returns_item() {
        let mut save = PlayerSave::default();
        save.equipment
            .set(EquipSlot::Boots, Some(gear(EquipSlot::Boots, 0, 1, 1)));
        save.recompute_totals();
        assert_eq!(save.totals.defense, 11);

        unequip(&mut save, EquipSlot::Boots).unwrap();
        assert_eq!(save.inventory.len(), 1);
        assert_eq!(save.totals.defense, 10);
        assert!(matches!(
            unequip(&mut save, EquipSlot::Boots),
            Err(GameError::SlotEmpty)
        ));
    }
}
