//! Inventory stacking rules.
//!
//! Non-gear items merge into one stack per [`StackKey`]. Gear is always kept
//! as singleton stacks, one slot per physical item. Capacity is counted in
//! units: the sum of every stack's quantity (at least one per slot).

use super::types::{Item, Stack, StackKey};
use crate::error::{GameError, GameResult};

/// Total capacity units in use.
pub fn used_capacity(stacks: &[Stack]) -> u32 {
    stacks
        .iter()
        .fold(0u32, |acc, stack| acc.saturating_add(stack.units()))
}

/// True if removing `consumed` units and adding `produced` units stays within `max`.
pub fn has_room(stacks: &[Stack], max: u32, consumed: u32, produced: u32) -> bool {
    let after = used_capacity(stacks)
        .saturating_sub(consumed)
        .saturating_add(produced);
    after <= max
}

/// Units held across every stack matching `key`.
pub fn count_of(stacks: &[Stack], key: &StackKey) -> u32 {
    stacks
        .iter()
        .filter(|s| s.item.stack_key().as_ref() == Some(key))
        .fold(0u32, |acc, s| acc.saturating_add(s.quantity))
}

/// Adds `quantity` units, merging into an existing stack when the item stacks.
///
/// Does not check capacity; see [`try_add`].
pub fn add_item(stacks: &mut Vec<Stack>, item: Item, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match item.stack_key() {
        None => {
            for _ in 0..quantity {
                stacks.push(Stack::single(item.clone()));
            }
        }
        Some(key) => {
            if let Some(existing) = stacks
                .iter_mut()
                .find(|s| s.item.stack_key().as_ref() == Some(&key))
            {
                existing.quantity = existing.quantity.saturating_add(quantity);
            } else {
                stacks.push(Stack::new(item, quantity));
            }
        }
    }
}

/// Adds the item only if it fits within `max` capacity units.
pub fn try_add(stacks: &mut Vec<Stack>, max: u32, item: Item, quantity: u32) -> GameResult<()> {
    if !has_room(stacks, max, 0, quantity) {
        return Err(GameError::InventoryFull);
    }
    add_item(stacks, item, quantity);
    Ok(())
}

/// Removes `quantity` units of `key`, draining stacks front to back.
///
/// Returns false and leaves the inventory untouched if there are not enough.
pub fn remove_quantity(stacks: &mut Vec<Stack>, key: &StackKey, quantity: u32) -> bool {
    if count_of(stacks, key) < quantity {
        return false;
    }
    let mut remaining = quantity;
    for stack in stacks.iter_mut() {
        if remaining == 0 {
            break;
        }
        if stack.item.stack_key().as_ref() != Some(key) {
            continue;
        }
        let taken = stack.quantity.min(remaining);
        stack.quantity -= taken;
        remaining -= taken;
    }
    stacks.retain(|s| s.quantity > 0);
    true
}

/// Takes exactly one unit out of the stack at `index`.
pub fn take_one(stacks: &mut Vec<Stack>, index: usize) -> GameResult<Item> {
    let stack = stacks.get_mut(index).ok_or(GameError::NoSuchSlot(index))?;
    if stack.quantity <= 1 {
        return Ok(stacks.remove(index).item);
    }
    stack.quantity -= 1;
    Ok(stack.item.clone())
}

/// Splits any gear stack with quantity > 1 into singleton stacks.
///
/// Empty gear stacks are dropped. Copies are only created while the total
/// stays within `max` units; the rest are discarded.
pub fn unstack_gear(stacks: &mut Vec<Stack>, max: u32) {
    stacks.retain(|s| !(s.item.is_gear() && s.quantity == 0));
    let mut copies = Vec::new();
    for stack in stacks.iter_mut().filter(|s| s.item.is_gear() && s.quantity > 1) {
        copies.push((stack.item.clone(), stack.quantity - 1));
        stack.quantity = 1;
    }
    if copies.is_empty() {
        return;
    }

    let wanted = copies
        .iter()
        .fold(0u32, |acc, (_, n)| acc.saturating_add(*n));
    let mut budget = max.saturating_sub(used_capacity(stacks));
    if budget < wanted {
        log::warn!("discarding {} gear copies over capacity", wanted - budget);
    }
    for (item, n) in copies {
        let take = n.min(budget);
        budget -= take;
        for _ in 0..take {
            stacks.push(Stack::single(item.clone()));
        }
    }
}

/// Merges duplicate non-gear stacks into the first occurrence and drops empty ones.
pub fn consolidate(stacks: &mut Vec<Stack>) {
    let mut merged: Vec<Stack> = Vec::with_capacity(stacks.len());
    for stack in stacks.drain(..) {
        if stack.quantity == 0 {
            continue;
        }
        match stack.item.stack_key() {
            Some(key) => {
                if let Some(existing) = merged
                    .iter_mut()
                    .find(|s| s.item.stack_key().as_ref() == Some(&key))
                {
                    existing.quantity = existing.quantity.saturating_add(stack.quantity);
                } else {
                    merged.push(stack);
                }
            }
            None => merged.push(stack),
        }
    }
    *stacks = merged;
}

/// Swaps two slots. Display order only; no effect on stacking.
pub fn swap_slots(stacks: &mut [Stack], a: usize, b: usize) -> GameResult<()> {
    let len = stacks.len();
    if a >= len {
        return Err(GameError::NoSuchSlot(a));
    }
    if b >= len {
        return Err(GameError::NoSuchSlot(b));
    }
    stacks.swap(a, b);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::types::{EquipSlot, Gear, ItemKind, Rarity, Resource};

    fn coal() -> Item {
        Item::Ore(Resource::new("coal", "Coal"))
    }

    fn boots() -> Item {
        Item::Gear(Gear {
            id: "tattered_boots".to_string(),
            base_name: "Tattered Boots".to_string(),
            slot: EquipSlot::Boots,
            rarity: Rarity::Common,
            req_level: 2,
            attack: 0,
            defense: 1,
            upgrade: 0,
            set_id: None,
        })
    }

    #[test]
    fn test_resources_merge_into_one_stack() {
        let mut inv = Vec::new();
        add_item(&mut inv, coal(), 2);
        add_item(&mut inv, coal(), 3);
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].quantity, 5);
    }

    #[test]
    fn test_identical_gear_never_stacks() {
        let mut inv = Vec::new();
        add_item(&mut inv, boots(), 1);
        add_item(&mut inv, boots(), 1);
        assert_eq!(inv.len(), 2);
        assert!(inv.iter().all(|s| s.quantity == 1));
    }

    #[test]
    fn test_used_capacity_counts_units() {
        let mut inv = Vec::new();
        add_item(&mut inv, coal(), 7);
        add_item(&mut inv, boots(), 2);
        assert_eq!(used_capacity(&inv), 9);
    }

    #[test]
    fn test_try_add_refuses_over_capacity() {
        let mut inv = Vec::new();
        add_item(&mut inv, coal(), 9);
        let before = inv.clone();
        let result = try_add(&mut inv, 10, coal(), 2);
        assert!(matches!(result, Err(GameError::InventoryFull)));
        assert_eq!(inv, before);
    }

    #[test]
    fn test_remove_quantity_is_all_or_nothing() {
        let mut inv = vec![Stack::new(coal(), 2)];
        let key = StackKey::new(ItemKind::Ore, "coal");
        assert!(!remove_quantity(&mut inv, &key, 3));
        assert_eq!(inv[0].quantity, 2);
        assert!(remove_quantity(&mut inv, &key, 2));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_take_one_from_larger_stack() {
        let mut inv = vec![Stack::new(coal(), 3)];
        let item = take_one(&mut inv, 0).unwrap();
        assert_eq!(item, coal());
        assert_eq!(inv[0].quantity, 2);
    }

    #[test]
    fn test_take_one_bad_index() {
        let mut inv: Vec<Stack> = Vec::new();
        assert!(matches!(take_one(&mut inv, 4), Err(GameError::NoSuchSlot(4))));
    }

    #[test]
    fn test_unstack_gear_splits_legacy_stacks() {
        let mut inv = vec![Stack::new(boots(), 3), Stack::new(coal(), 4)];
        unstack_gear(&mut inv, 1000);
        assert_eq!(inv.len(), 4);
        assert_eq!(inv.iter().filter(|s| s.item.is_gear()).count(), 3);
        assert_eq!(used_capacity(&inv), 7);
    }

    #[test]
    fn test_unstack_gear_drops_empty_gear() {
        let mut inv = vec![Stack::new(boots(), 0), Stack::new(coal(), 0)];
        unstack_gear(&mut inv, 1000);
        consolidate(&mut inv);
        assert!(inv.is_empty());
    }

    #[test]
    fn test_unstack_gear_stops_at_capacity() {
        let mut inv = vec![Stack::new(coal(), 5), Stack::new(boots(), u32::MAX)];
        unstack_gear(&mut inv, 10);
        assert_eq!(inv.len(), 6);
        assert_eq!(used_capacity(&inv), 10);

        // already over capacity: no copies at all
        let mut inv = vec![Stack::new(coal(), 20), Stack::new(boots(), 3)];
        unstack_gear(&mut inv, 10);
        assert_eq!(inv.len(), 2);
        assert_eq!(inv[1].quantity, 1);
    }

    #[test]
    fn test_consolidate_merges_duplicates_and_drops_empty() {
        let mut inv = vec![
            Stack::new(coal(), 1),
            Stack::new(boots(), 1),
            Stack::new(coal(), 2),
            Stack::new(Item::Ore(Resource::new("iron", "Iron Ore")), 0),
        ];
        consolidate(&mut inv);
        assert_eq!(inv.len(), 2);
        assert_eq!(inv[0].quantity, 3);
    }

    #[test]
    fn test_swap_slots() {
        let mut inv = vec![Stack::new(coal(), 1), Stack::single(boots())];
        swap_slots(&mut inv, 0, 1).unwrap();
        assert!(inv[0].item.is_gear());
        assert!(swap_slots(&mut inv, 0, 2).is_err());
    }
}
