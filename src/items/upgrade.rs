//! Upgrade station: spend Iron Bars and Coal for a chance to raise a gear
//! item's tier.

use super::catalog;
use super::inventory;
use super::types::{Item, StackKey};
use crate::core::balance::*;
use crate::core::save::PlayerSave;
use crate::error::{GameError, GameResult};
use rand::Rng;

/// Materials needed to attempt the next upgrade from `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeCost {
    pub iron_bars: u32,
    pub coal: u32,
}

pub fn upgrade_cost(tier: u8) -> UpgradeCost {
    let tier = u32::from(tier);
    UpgradeCost {
        iron_bars: 1 + tier,
        coal: 1 + tier / 2,
    }
}

/// Success chance for an attempt from `tier`, decreasing linearly to a floor.
pub fn success_chance(tier: u8) -> f64 {
    (UPGRADE_BASE_SUCCESS - f64::from(tier) * UPGRADE_SUCCESS_STEP)
        .clamp(UPGRADE_MIN_SUCCESS, UPGRADE_BASE_SUCCESS)
}

/// Result of one upgrade attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOutcome {
    pub success: bool,
    pub tier: u8,
    pub name: String,
    /// Inventory slot now holding the attempted unit.
    pub index: usize,
}

fn require(save: &PlayerSave, key: &StackKey, name: &str, needed: u32) -> GameResult<()> {
    let have = inventory::count_of(&save.inventory, key);
    if have < needed {
        return Err(GameError::InsufficientMaterials {
            name: name.to_string(),
            needed,
            have,
        });
    }
    Ok(())
}

/// Attempts to upgrade one unit of the gear at inventory slot `index`.
///
/// Materials are consumed whether or not the roll succeeds. The attempted
/// unit is split off its stack and reinserted as its own stack at the end of
/// the inventory; the rest of the original stack is left untouched.
pub fn attempt_upgrade<R: Rng + ?Sized>(
    save: &mut PlayerSave,
    index: usize,
    rng: &mut R,
) -> GameResult<UpgradeOutcome> {
    let stack = save
        .inventory
        .get(index)
        .ok_or(GameError::NoSuchSlot(index))?;
    let tier = stack.item.as_gear().ok_or(GameError::NotGear)?.upgrade;
    if tier >= MAX_UPGRADE_TIER {
        return Err(GameError::MaxUpgradeTier(tier));
    }

    let cost = upgrade_cost(tier);
    require(save, &catalog::iron_bar_key(), "Iron Bar", cost.iron_bars)?;
    require(save, &catalog::coal_key(), "Coal", cost.coal)?;

    // Material stacks sit at their own slots, so resolve the target by
    // identity again after they are drained.
    let target = save.inventory[index].item.clone();
    inventory::remove_quantity(&mut save.inventory, &catalog::iron_bar_key(), cost.iron_bars);
    inventory::remove_quantity(&mut save.inventory, &catalog::coal_key(), cost.coal);
    let index = save
        .inventory
        .iter()
        .position(|s| s.item == target)
        .ok_or(GameError::NoSuchSlot(index))?;

    let mut gear = match inventory::take_one(&mut save.inventory, index)? {
        Item::Gear(g) => g,
        _ => return Err(GameError::NotGear),
    };

    let success = rng.gen::<f64>() < success_chance(tier);
    if success {
        gear.upgrade += 1;
        gear.attack = gear.attack.saturating_add(UPGRADE_STAT_GAIN);
        gear.defense = gear.defense.saturating_add(UPGRADE_STAT_GAIN);
        log::info!("upgrade succeeded: {}", gear.display_name());
    } else {
        log::info!("upgrade failed: {} stays at +{}", gear.base_name, tier);
    }

    let outcome = UpgradeOutcome {
        success,
        tier: gear.upgrade,
        name: gear.display_name(),
        index: save.inventory.len(),
    };
    inventory::add_item(&mut save.inventory, Item::Gear(gear), 1);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::types::{EquipSlot, Gear, Rarity, Stack};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sword(tier: u8) -> Item {
        Item::Gear(Gear {
            id: "rusty_sword".to_string(),
            base_name: "Rusty Sword".to_string(),
            slot: EquipSlot::MainHand,
            rarity: Rarity::Common,
            req_level: 1,
            attack: 2,
            defense: 0,
            upgrade: tier,
            set_id: None,
        })
    }

    fn save_with(item: Item, bars: u32, coal: u32) -> PlayerSave {
        let mut save = PlayerSave::default();
        save.inventory.push(Stack::single(item));
        if bars > 0 {
            save.inventory.push(Stack::new(catalog::iron_bar(), bars));
        }
        if coal > 0 {
            save.inventory.push(Stack::new(catalog::coal(), coal));
        }
        save
    }

    #[test]
    fn test_cost_scales_with_tier() {
        assert_eq!(upgrade_cost(0), UpgradeCost { iron_bars: 1, coal: 1 });
        assert_eq!(upgrade_cost(3), UpgradeCost { iron_bars: 4, coal: 2 });
        assert_eq!(upgrade_cost(9), UpgradeCost { iron_bars: 10, coal: 5 });
    }

    #[test]
    fn test_success_chance_clamped() {
        assert!((success_chance(0) - 0.85).abs() < 1e-9);
        assert!((success_chance(3) - 0.55).abs() < 1e-9);
        assert!((success_chance(7) - 0.20).abs() < 1e-9);
        assert!((success_chance(9) - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_missing_materials_leaves_save_unchanged() {
        let mut save = save_with(sword(0), 0, 5);
        let before = save.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = attempt_upgrade(&mut save, 0, &mut rng);
        assert!(matches!(
            result,
            Err(GameError::InsufficientMaterials { needed: 1, have: 0, .. })
        ));
        assert_eq!(save, before);
    }

    #[test]
    fn test_max_tier_rejected() {
        let mut save = save_with(sword(MAX_UPGRADE_TIER), 50, 50);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            attempt_upgrade(&mut save, 0, &mut rng),
            Err(GameError::MaxUpgradeTier(10))
        ));
    }

    #[test]
    fn test_non_gear_rejected() {
        let mut save = save_with(sword(0), 5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            attempt_upgrade(&mut save, 1, &mut rng),
            Err(GameError::NotGear)
        ));
    }

    #[test]
    fn test_materials_consumed_on_every_attempt() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut successes = 0;
        for _ in 0..20 {
            let mut save = save_with(sword(0), 3, 3);
            let outcome = attempt_upgrade(&mut save, 0, &mut rng).unwrap();
            assert_eq!(inventory::count_of(&save.inventory, &catalog::iron_bar_key()), 2);
            assert_eq!(inventory::count_of(&save.inventory, &catalog::coal_key()), 2);
            let gear = save.inventory[outcome.index].item.as_gear().unwrap().clone();
            if outcome.success {
                successes += 1;
                assert_eq!(gear.upgrade, 1);
                assert_eq!(gear.attack, 3);
                assert_eq!(gear.defense, 1);
                assert_eq!(outcome.name, "Rusty Sword +1");
            } else {
                assert_eq!(gear.upgrade, 0);
                assert_eq!(gear.attack, 2);
            }
        }
        assert!(successes > 0);
    }

    #[test]
    fn test_slot_consumed_materials_reindexes_target() {
        // Gear after the material stacks: draining bars removes an earlier slot.
        let mut save = PlayerSave::default();
        save.inventory.push(Stack::new(catalog::iron_bar(), 1));
        save.inventory.push(Stack::new(catalog::coal(), 1));
        save.inventory.push(Stack::single(sword(0)));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = attempt_upgrade(&mut save, 2, &mut rng).unwrap();
        assert_eq!(save.inventory.len(), 1);
        assert_eq!(outcome.index, 0);
        assert!(save.inventory[0].item.is_gear());
    }
}
