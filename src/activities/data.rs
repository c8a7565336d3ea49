//! Ore, fishing spot, hunting target, and recipe definitions.
//!
//! Each activity page picks one entry through a single query parameter;
//! absent or unknown values fall back to the first entry.

use crate::items::types::{Food, Item, ItemKind, Resource, StackKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OreDef {
    pub id: &'static str,
    pub name: &'static str,
    pub req_level: u32,
}

impl OreDef {
    pub fn item(&self) -> Item {
        Item::Ore(Resource::new(self.id, self.name))
    }
}

pub const ORES: [OreDef; 5] = [
    OreDef { id: "iron", name: "Iron Ore", req_level: 1 },
    OreDef { id: "coal", name: "Coal", req_level: 1 },
    OreDef { id: "obsidian", name: "Obsidian", req_level: 10 },
    OreDef { id: "adamant", name: "Adamant", req_level: 20 },
    OreDef { id: "ruby", name: "Ruby", req_level: 30 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishDef {
    pub id: &'static str,
    pub name: &'static str,
}

impl FishDef {
    pub fn item(&self) -> Item {
        Item::Fish(Resource::new(self.id, self.name))
    }
}

/// A fishing spot yields `primary` most of the time and `secondary` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishingSpot {
    pub id: &'static str,
    pub name: &'static str,
    pub req_level: u32,
    pub primary: FishDef,
    pub secondary: FishDef,
}

const fn fish(id: &'static str, name: &'static str) -> FishDef {
    FishDef { id, name }
}

pub const FISHING_SPOTS: [FishingSpot; 4] = [
    FishingSpot {
        id: "Riverbend_Falls",
        name: "Riverbend Falls",
        req_level: 1,
        primary: fish("silver_minnow", "Silver Minnow"),
        secondary: fish("river_trout", "River Trout"),
    },
    FishingSpot {
        id: "Crystal_Cove",
        name: "Crystal Cove",
        req_level: 5,
        primary: fish("moonlit_sardine", "Moonlit Sardine"),
        secondary: fish("crystal_snapper", "Crystal Snapper"),
    },
    FishingSpot {
        id: "Sunset_Pier",
        name: "Sunset Pier",
        req_level: 10,
        primary: fish("sunset_mackerel", "Sunset Mackerel"),
        secondary: fish("ember_tuna", "Ember Tuna"),
    },
    FishingSpot {
        id: "Murkwood_Swamp",
        name: "Murkwood Swamp",
        req_level: 15,
        primary: fish("bog_carp", "Bog Carp"),
        secondary: fish("witchfin_eel", "Witchfin Eel"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuntTarget {
    pub id: &'static str,
    pub name: &'static str,
    pub req_level: u32,
    pub meat_id: &'static str,
    pub meat_name: &'static str,
}

impl HuntTarget {
    pub fn meat(&self) -> Item {
        Item::Meat(Resource::new(self.meat_id, self.meat_name))
    }
}

const fn hunt(
    id: &'static str,
    name: &'static str,
    req_level: u32,
    meat_id: &'static str,
    meat_name: &'static str,
) -> HuntTarget {
    HuntTarget {
        id,
        name,
        req_level,
        meat_id,
        meat_name,
    }
}

pub const HUNT_TARGETS: [HuntTarget; 4] = [
    hunt("deer", "Deer", 1, "raw_deer_meat", "Raw Deer Meat"),
    hunt("boar", "Boar", 5, "raw_boar_meat", "Raw Boar Meat"),
    hunt("wolf", "Wolf", 10, "raw_wolf_meat", "Raw Wolf Meat"),
    hunt("bear", "Bear", 15, "raw_bear_meat", "Raw Bear Meat"),
];

/// Turns one raw fish or meat into one food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookRecipe {
    pub id: &'static str,
    pub req_level: u32,
    pub input_kind: ItemKind,
    pub input_id: &'static str,
    pub input_name: &'static str,
    pub output_name: &'static str,
    pub heal_hp: u32,
    pub heal_stamina: u32,
}

impl CookRecipe {
    pub fn input_key(&self) -> StackKey {
        StackKey::new(self.input_kind, self.input_id)
    }

    pub fn output(&self) -> Item {
        Item::Food(Food {
            id: self.id.to_string(),
            name: self.output_name.to_string(),
            heal_hp: self.heal_hp,
            heal_stamina: self.heal_stamina,
        })
    }
}

const fn cook_fish(
    id: &'static str,
    req_level: u32,
    input_id: &'static str,
    input_name: &'static str,
    output_name: &'static str,
    heal_hp: u32,
) -> CookRecipe {
    CookRecipe {
        id,
        req_level,
        input_kind: ItemKind::Fish,
        input_id,
        input_name,
        output_name,
        heal_hp,
        heal_stamina: 0,
    }
}

const fn cook_meat(
    id: &'static str,
    req_level: u32,
    input_id: &'static str,
    input_name: &'static str,
    output_name: &'static str,
    heal_stamina: u32,
) -> CookRecipe {
    CookRecipe {
        id,
        req_level,
        input_kind: ItemKind::Meat,
        input_id,
        input_name,
        output_name,
        heal_hp: 0,
        heal_stamina,
    }
}

pub const COOK_RECIPES: [CookRecipe; 12] = [
    cook_fish(
        "cooked_silver_minnow",
        1,
        "silver_minnow",
        "Silver Minnow",
        "Cooked Silver Minnow",
        5,
    ),
    cook_fish("cooked_river_trout", 1, "river_trout", "River Trout", "Cooked River Trout", 7),
    cook_fish(
        "cooked_moonlit_sardine",
        5,
        "moonlit_sardine",
        "Moonlit Sardine",
        "Cooked Moonlit Sardine",
        5,
    ),
    cook_fish(
        "cooked_crystal_snapper",
        5,
        "crystal_snapper",
        "Crystal Snapper",
        "Cooked Crystal Snapper",
        7,
    ),
    cook_fish(
        "cooked_sunset_mackerel",
        10,
        "sunset_mackerel",
        "Sunset Mackerel",
        "Cooked Sunset Mackerel",
        5,
    ),
    cook_fish("cooked_ember_tuna", 10, "ember_tuna", "Ember Tuna", "Cooked Ember Tuna", 7),
    cook_fish("cooked_bog_carp", 15, "bog_carp", "Bog Carp", "Cooked Bog Carp", 5),
    cook_fish("cooked_witchfin_eel", 15, "witchfin_eel", "Witchfin Eel", "Cooked Witchfin Eel", 7),
    cook_meat("cooked_deer_meat", 1, "raw_deer_meat", "Raw Deer Meat", "Cooked Deer Meat", 2),
    cook_meat("cooked_boar_meat", 5, "raw_boar_meat", "Raw Boar Meat", "Cooked Boar Meat", 3),
    cook_meat("cooked_wolf_meat", 10, "raw_wolf_meat", "Raw Wolf Meat", "Cooked Wolf Meat", 4),
    cook_meat("cooked_bear_meat", 15, "raw_bear_meat", "Raw Bear Meat", "Cooked Bear Meat", 5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmeltInput {
    pub ore_id: &'static str,
    pub name: &'static str,
    pub quantity: u32,
}

impl SmeltInput {
    pub fn key(&self) -> StackKey {
        StackKey::new(ItemKind::Ore, self.ore_id)
    }
}

/// Smelts ore and coal into one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmeltRecipe {
    pub id: &'static str,
    pub name: &'static str,
    pub req_level: u32,
    pub inputs: [SmeltInput; 2],
    pub base_xp: u64,
}

impl SmeltRecipe {
    pub fn output(&self) -> Item {
        Item::Bar(Resource::new(self.id, self.name))
    }

    pub fn input_units(&self) -> u32 {
        self.inputs.iter().map(|i| i.quantity).sum()
    }
}

const fn smelt(
    id: &'static str,
    name: &'static str,
    req_level: u32,
    ore: (&'static str, &'static str),
    coal: u32,
    base_xp: u64,
) -> SmeltRecipe {
    SmeltRecipe {
        id,
        name,
        req_level,
        inputs: [
            SmeltInput { ore_id: ore.0, name: ore.1, quantity: 2 },
            SmeltInput { ore_id: "coal", name: "Coal", quantity: coal },
        ],
        base_xp,
    }
}

pub const SMELT_RECIPES: [SmeltRecipe; 4] = [
    smelt("iron_bar", "Iron Bar", 1, ("iron", "Iron Ore"), 1, 10),
    smelt("obsidian_bar", "Obsidian Bar", 10, ("obsidian", "Obsidian"), 2, 30),
    smelt("adamant_bar", "Adamant Bar", 20, ("adamant", "Adamant"), 3, 60),
    smelt("ruby_bar", "Ruby Bar", 30, ("ruby", "Ruby"), 4, 90),
];

/// Value of `key` in a query string such as `?ore=coal&x=1`.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

fn select<T: Copy>(items: &[T], id_of: impl Fn(&T) -> &str, wanted: Option<&str>) -> T {
    wanted
        .and_then(|w| items.iter().find(|it| id_of(it) == w))
        .copied()
        .unwrap_or(items[0])
}

pub fn select_ore(query: &str) -> OreDef {
    select(&ORES, |o| o.id, query_param(query, "ore"))
}

pub fn select_spot(query: &str) -> FishingSpot {
    select(&FISHING_SPOTS, |s| s.id, query_param(query, "spot"))
}

pub fn select_hunt_target(query: &str) -> HuntTarget {
    select(&HUNT_TARGETS, |t| t.id, query_param(query, "target"))
}

pub fn select_cook_recipe(query: &str) -> CookRecipe {
    select(&COOK_RECIPES, |r| r.id, query_param(query, "recipe"))
}

pub fn select_smelt_recipe(query: &str) -> SmeltRecipe {
    select(&SMELT_RECIPES, |r| r.id, query_param(query, "recipe"))
}
