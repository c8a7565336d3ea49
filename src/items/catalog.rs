//! Fixed item definitions: zone uniques, zone mythics, the Cryptwarden set,
//! and the handful of resources other systems refer to by identity.

use super::types::{EquipSlot, Gear, Item, ItemKind, Rarity, Resource, StackKey};
use crate::core::balance::CRYPTWARDEN_SET_ID;

/// Static definition of a droppable gear item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearDef {
    pub id: &'static str,
    pub name: &'static str,
    pub slot: EquipSlot,
    pub attack: u32,
    pub defense: u32,
    pub req_level: u32,
    pub rarity: Rarity,
}

impl GearDef {
    pub fn to_gear(&self) -> Gear {
        Gear {
            id: self.id.to_string(),
            base_name: self.name.to_string(),
            slot: self.slot,
            rarity: self.rarity,
            req_level: self.req_level,
            attack: self.attack,
            defense: self.defense,
            upgrade: 0,
            set_id: None,
        }
    }
}

const fn def(
    id: &'static str,
    name: &'static str,
    slot: EquipSlot,
    attack: u32,
    defense: u32,
    req_level: u32,
    rarity: Rarity,
) -> GearDef {
    GearDef {
        id,
        name,
        slot,
        attack,
        defense,
        req_level,
        rarity,
    }
}

/// Mob-specific unique drops.
pub const ITEM_LIBRARY: [GearDef; 10] = [
    def("rusty_sword", "Rusty Sword", EquipSlot::MainHand, 2, 0, 1, Rarity::Common),
    def("cracked_shield", "Cracked Shield", EquipSlot::OffHand, 0, 2, 1, Rarity::Common),
    def("tattered_boots", "Tattered Boots", EquipSlot::Boots, 0, 1, 2, Rarity::Common),
    def("leather_bracers", "Leather Bracers", EquipSlot::Bracers, 0, 2, 4, Rarity::Uncommon),
    def("shadow_blade", "Shadow Blade", EquipSlot::MainHand, 7, 0, 9, Rarity::Epic),
    def("bone_club", "Bone Club", EquipSlot::MainHand, 4, 0, 10, Rarity::Common),
    def("plague_mask", "Plague Mask", EquipSlot::Helmet, 0, 4, 12, Rarity::Uncommon),
    def("death_shroud", "Death Shroud", EquipSlot::Chest, 2, 4, 14, Rarity::Rare),
    def("reaper_scythe", "Reaper Scythe", EquipSlot::MainHand, 10, 0, 16, Rarity::Epic),
    def("necro_ring", "Necro Ring", EquipSlot::Ring, 4, 4, 18, Rarity::Epic),
];

pub const GRAVEBORN_BLADE: GearDef = def(
    "graveborn_blade",
    "Graveborn Blade",
    EquipSlot::MainHand,
    12,
    4,
    10,
    Rarity::Mythic,
);

pub const LICH_KINGS_AMULET: GearDef = def(
    "lich_kings_amulet",
    "Lich King's Amulet",
    EquipSlot::Amulet,
    6,
    6,
    18,
    Rarity::Mythic,
);

pub fn find_gear(id: &str) -> Option<&'static GearDef> {
    ITEM_LIBRARY.iter().find(|d| d.id == id)
}

const CRYPTWARDEN_PIECES: [GearDef; 4] = [
    def(
        "cryptwarden_longsword_main",
        "Cryptwarden Longsword",
        EquipSlot::MainHand,
        30,
        0,
        10,
        Rarity::Epic,
    ),
    def(
        "cryptwarden_longsword_off",
        "Cryptwarden Longsword",
        EquipSlot::OffHand,
        20,
        0,
        10,
        Rarity::Epic,
    ),
    def("cryptwarden_helm", "Cryptwarden Helm", EquipSlot::Helmet, 0, 12, 10, Rarity::Epic),
    def("cryptwarden_cuirass", "Cryptwarden Cuirass", EquipSlot::Chest, 0, 18, 10, Rarity::Epic),
];

/// The four Cryptwarden pieces, tagged with their set identity.
pub fn cryptwarden_set() -> Vec<Gear> {
    CRYPTWARDEN_PIECES
        .iter()
        .map(|d| Gear {
            set_id: Some(CRYPTWARDEN_SET_ID.to_string()),
            ..d.to_gear()
        })
        .collect()
}

// Resources referenced outside their producing activity

pub fn coal() -> Item {
    Item::Ore(Resource::new("coal", "Coal"))
}

pub fn iron_bar() -> Item {
    Item::Bar(Resource::new("iron_bar", "Iron Bar"))
}

pub fn arrows() -> Item {
    Item::Consumable(Resource::new("arrows", "Arrows"))
}

pub fn coal_key() -> StackKey {
    StackKey::new(ItemKind::Ore, "coal")
}

pub fn iron_bar_key() -> StackKey {
    StackKey::new(ItemKind::Bar, "iron_bar")
}

pub fn arrows_key() -> StackKey {
    StackKey::new(ItemKind::Consumable, "arrows")
}
