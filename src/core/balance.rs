//! Combat, reward, and upgrade tuning.
//!
//! All combat balance numbers should be defined here.

// =============================================================================
// ENCOUNTERS
// =============================================================================

/// Exchanges before an encounter is ruled a stalemate.
pub const MAX_COMBAT_ROUNDS: u32 = 15;

/// Boss exchanges before the raid gives up. The boss plays one exchange per
/// tick but shares the encounter cap.
pub const MAX_BOSS_ROUNDS: u32 = MAX_COMBAT_ROUNDS;

/// Lower bound of the multiplicative damage variance.
pub const DAMAGE_VARIANCE_MIN: f64 = 0.90;

/// Upper bound of the multiplicative damage variance.
pub const DAMAGE_VARIANCE_MAX: f64 = 1.10;

/// Fraction of defense subtracted in the wave model.
pub const WAVE_DEFENSE_FACTOR: f64 = 0.6;

// =============================================================================
// ZONE COMBAT
// =============================================================================

/// Stamina paid before every zone encounter.
pub const ZONE_ENCOUNTER_STAMINA: u32 = 2;

/// Flat part of the victory xp formula: max(MIN, BASE + level * PER_LEVEL).
pub const ZONE_XP_BASE: u64 = 8;
pub const ZONE_XP_PER_LEVEL: u64 = 2;
pub const ZONE_XP_MIN: u64 = 5;

/// Drop chance for a mob's unique item by rarity.
pub const DROP_CHANCE_COMMON: f64 = 0.20;
pub const DROP_CHANCE_UNCOMMON: f64 = 0.10;
pub const DROP_CHANCE_RARE: f64 = 0.03;
pub const DROP_CHANCE_EPIC: f64 = 0.008;

/// Zone-wide mythic roll on every victory.
pub const MYTHIC_DROP_CHANCE: f64 = 0.001;

// =============================================================================
// DUNGEON
// =============================================================================

pub const DUNGEON_ENTRY_STAMINA: u32 = 20;
pub const DUNGEON_GOLD_MIN: u64 = 500;
pub const DUNGEON_GOLD_MAX: u64 = 800;
pub const DUNGEON_XP_MIN: u64 = 400;
pub const DUNGEON_XP_MAX: u64 = 600;
pub const SET_DROP_CHANCE: f64 = 0.06;

// =============================================================================
// EQUIPMENT
// =============================================================================

/// Set identity that grants the attack bonus.
pub const CRYPTWARDEN_SET_ID: &str = "cryptwarden";

/// Attack bonus percent for 2, 3, and 4+ equipped set pieces.
pub const SET_BONUS_TWO_PIECES_PCT: u32 = 2;
pub const SET_BONUS_THREE_PIECES_PCT: u32 = 4;
pub const SET_BONUS_FOUR_PIECES_PCT: u32 = 6;

// =============================================================================
// UPGRADE STATION
// =============================================================================

pub const MAX_UPGRADE_TIER: u8 = 10;
pub const UPGRADE_BASE_SUCCESS: f64 = 0.85;
pub const UPGRADE_SUCCESS_STEP: f64 = 0.10;
pub const UPGRADE_MIN_SUCCESS: f64 = 0.20;
/// Attack and defense gained per successful upgrade.
pub const UPGRADE_STAT_GAIN: u32 = 1;

// =============================================================================
// SELLING
// =============================================================================

/// Gear price before the rarity multiplier: BASE + (atk + def) * PER_STAT.
pub const SELL_BASE_PRICE: u64 = 5;
pub const SELL_PRICE_PER_STAT: u64 = 3;
