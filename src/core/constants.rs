// Storage keys
pub const SAVE_KEY: &str = "darkstone_save_v1";
pub const ACTIVE_DUNGEON_KEY: &str = "ds_active_dungeon_v1";
pub const SAVE_DIR_NAME: &str = ".darkstone";

// Tick and timing (milliseconds)
pub const ACTIVITY_TICK_MS: u64 = 6_000;
pub const REGEN_CHECK_INTERVAL_MS: u64 = 2_000;

// Passive regeneration
pub const HP_REGEN_AMOUNT: u32 = 20;
pub const HP_REGEN_EVERY_MS: u64 = 10 * 60 * 1000;
pub const STAMINA_REGEN_AMOUNT: u32 = 10;
pub const STAMINA_REGEN_EVERY_MS: u64 = 4 * 60 * 1000;

// Vitals scale with hero level: base + (level - 1) * per_level
pub const BASE_HP_MAX: u32 = 100;
pub const HP_MAX_PER_LEVEL: u32 = 10;
pub const BASE_STAMINA_MAX: u32 = 100;
pub const STAMINA_MAX_PER_LEVEL: u32 = 5;

// Progression
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_XP_NEXT: u64 = 100;
/// Threshold multiplier per level, applied as floor(next * 1.5).
pub const XP_NEXT_GROWTH: f64 = 1.5;
pub const BASE_ATTACK: u32 = 10;
pub const BASE_DEFENSE: u32 = 10;
pub const ATTACK_PER_HERO_LEVEL: u32 = 5;
pub const DEFENSE_PER_HERO_LEVEL: u32 = 5;

// Inventory
pub const DEFAULT_INVENTORY_CAPACITY: u32 = 1000;

// Gathering and crafting
pub const GATHER_XP_PER_TICK: u64 = 6;
pub const COOK_XP_PER_TICK: u64 = 6;
/// Forging xp is round(base_xp * (1 + req / FORGE_XP_REQ_DIVISOR)).
pub const FORGE_XP_REQ_DIVISOR: f64 = 20.0;
pub const FISH_PRIMARY_CHANCE: f64 = 0.70;
pub const ARROWS_PER_SHOT: u32 = 1;

// Market
pub const ARROW_BUNDLE_SIZE: u32 = 100;
pub const ARROW_BUNDLE_PRICE: u64 = 10;
