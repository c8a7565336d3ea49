use crate::core::balance::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Helmet,
    Shoulders,
    Chest,
    Bracers,
    Gloves,
    Belt,
    Pants,
    Boots,
    Ring,
    Amulet,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 12] = [
        EquipSlot::MainHand,
        EquipSlot::OffHand,
        EquipSlot::Helmet,
        EquipSlot::Shoulders,
        EquipSlot::Chest,
        EquipSlot::Bracers,
        EquipSlot::Gloves,
        EquipSlot::Belt,
        EquipSlot::Pants,
        EquipSlot::Boots,
        EquipSlot::Ring,
        EquipSlot::Amulet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::MainHand => "Main Hand",
            EquipSlot::OffHand => "Off Hand",
            EquipSlot::Helmet => "Helmet",
            EquipSlot::Shoulders => "Shoulders",
            EquipSlot::Chest => "Chest",
            EquipSlot::Bracers => "Bracers",
            EquipSlot::Gloves => "Gloves",
            EquipSlot::Belt => "Belt",
            EquipSlot::Pants => "Pants",
            EquipSlot::Boots => "Boots",
            EquipSlot::Ring => "Ring",
            EquipSlot::Amulet => "Amulet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Mythic,
}

impl Rarity {
    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Multiplier applied to a gear item's base sell price.
    pub fn sell_multiplier(&self) -> u64 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 4,
            Rarity::Epic => 8,
            Rarity::Mythic => 20,
        }
    }

    /// Chance that a mob drops its unique item of this rarity.
    pub fn drop_chance(&self) -> f64 {
        match self {
            Rarity::Common => DROP_CHANCE_COMMON,
            Rarity::Uncommon => DROP_CHANCE_UNCOMMON,
            Rarity::Rare => DROP_CHANCE_RARE,
            Rarity::Epic => DROP_CHANCE_EPIC,
            Rarity::Mythic => MYTHIC_DROP_CHANCE,
        }
    }
}

/// Identity of a simple stackable item (ore, fish, arrows...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
}

impl Resource {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub heal_hp: u32,
    #[serde(default)]
    pub heal_stamina: u32,
}

/// A single piece of equipment. Gear is never stacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub id: String,
    pub base_name: String,
    pub slot: EquipSlot,
    pub rarity: Rarity,
    #[serde(default)]
    pub req_level: u32,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    /// Upgrade tier, 0 to MAX_UPGRADE_TIER.
    #[serde(default)]
    pub upgrade: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
}

impl Gear {
    /// "Base Name" at tier 0, "Base Name +N" after upgrades.
    pub fn display_name(&self) -> String {
        if self.upgrade > 0 {
            format!("{} +{}", self.base_name, self.upgrade)
        } else {
            self.base_name.clone()
        }
    }

    pub fn in_set(&self, set_id: &str) -> bool {
        self.set_id.as_deref() == Some(set_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Ore,
    Bar,
    Fish,
    Meat,
    Food,
    Gear,
    Material,
    Consumable,
}

/// Everything that can sit in an inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Ore(Resource),
    Bar(Resource),
    Fish(Resource),
    Meat(Resource),
    Food(Food),
    Gear(Gear),
    Material(Resource),
    Consumable(Resource),
}

/// Merge identity for non-gear items: (kind, id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackKey {
    pub kind: ItemKind,
    pub id: String,
}

impl StackKey {
    pub fn new(kind: ItemKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Ore(_) => ItemKind::Ore,
            Item::Bar(_) => ItemKind::Bar,
            Item::Fish(_) => ItemKind::Fish,
            Item::Meat(_) => ItemKind::Meat,
            Item::Food(_) => ItemKind::Food,
            Item::Gear(_) => ItemKind::Gear,
            Item::Material(_) => ItemKind::Material,
            Item::Consumable(_) => ItemKind::Consumable,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Item::Ore(r)
            | Item::Bar(r)
            | Item::Fish(r)
            | Item::Meat(r)
            | Item::Material(r)
            | Item::Consumable(r) => &r.id,
            Item::Food(f) => &f.id,
            Item::Gear(g) => &g.id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Item::Ore(r)
            | Item::Bar(r)
            | Item::Fish(r)
            | Item::Meat(r)
            | Item::Material(r)
            | Item::Consumable(r) => r.name.clone(),
            Item::Food(f) => f.name.clone(),
            Item::Gear(g) => g.display_name(),
        }
    }

    /// Key used for merge decisions. Gear has none: every unit is its own stack.
    pub fn stack_key(&self) -> Option<StackKey> {
        match self {
            Item::Gear(_) => None,
            other => Some(StackKey::new(other.kind(), other.id())),
        }
    }

    pub fn is_gear(&self) -> bool {
        matches!(self, Item::Gear(_))
    }

    pub fn as_gear(&self) -> Option<&Gear> {
        match self {
            Item::Gear(g) => Some(g),
            _ => None,
        }
    }
}

/// One inventory slot: an item and how many units it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub item: Item,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Stack {
    pub fn new(item: Item, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn single(item: Item) -> Self {
        Self::new(item, 1)
    }

    /// Capacity units this slot occupies (at least one).
    pub fn units(&self) -> u32 {
        self.quantity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> Gear {
        Gear {
            id: "rusty_sword".to_string(),
            base_name: "Rusty Sword".to_string(),
            slot: EquipSlot::MainHand,
            rarity: Rarity::Common,
            req_level: 1,
            attack: 2,
            defense: 0,
            upgrade: 0,
            set_id: None,
        }
    }

    #[test]
    fn test_gear_has_no_stack_key() {
        assert!(Item::Gear(sword()).stack_key().is_none());
    }

    #[test]
    fn test_resource_key_includes_kind() {
        let ore = Item::Ore(Resource::new("coal", "Coal"));
        let material = Item::Material(Resource::new("coal", "Coal"));
        assert_ne!(ore.stack_key(), material.stack_key());
    }

    #[test]
    fn test_upgraded_display_name() {
        let mut gear = sword();
        assert_eq!(gear.display_name(), "Rusty Sword");
        gear.upgrade = 3;
        assert_eq!(gear.display_name(), "Rusty Sword +3");
    }

    #[test]
    fn test_item_json_is_tagged_by_kind() {
        let stack = Stack::new(Item::Fish(Resource::new("bog_carp", "Bog Carp")), 4);
        let json = serde_json::to_value(&stack).unwrap();
        assert_eq!(json["item"]["kind"], "fish");
        assert_eq!(json["item"]["id"], "bog_carp");
        assert_eq!(json["quantity"], 4);
    }

    #[test]
    fn test_gear_json_defaults_missing_fields() {
        let json = serde_json::json!({
            "kind": "gear",
            "id": "plague_mask",
            "base_name": "Plague Mask",
            "slot": "helmet",
            "rarity": "uncommon"
        });
        let item: Item = serde_json::from_value(json).unwrap();
        let gear = item.as_gear().unwrap();
        assert_eq!(gear.upgrade, 0);
        assert_eq!(gear.attack, 0);
        assert!(gear.set_id.is_none());
    }

    #[test]
    fn test_rarity_ordering_matches_drop_rates() {
        assert!(Rarity::Common.drop_chance() > Rarity::Uncommon.drop_chance());
        assert!(Rarity::Rare.drop_chance() > Rarity::Epic.drop_chance());
        assert!(Rarity::Epic.drop_chance() > Rarity::Mythic.drop_chance());
    }
}
