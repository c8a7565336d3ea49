//! The player save record and its normalization.
//!
//! Stored documents are read permissively: any field that is missing,
//! non-numeric, or non-finite falls back to its default, and malformed
//! inventory entries are dropped. Normalization then restores every
//! invariant of the record (xp below threshold, vitals within maxima, gear
//! unstacked, totals current).

use super::constants::*;
use super::progression::{hp_max_for_level, stamina_max_for_level, Skill, SkillProgress};
use crate::items::equipment::{compute_totals, CombatTotals, Equipment};
use crate::items::inventory;
use crate::items::types::{EquipSlot, Gear, Stack};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Health and stamina with their regeneration timestamps (ms since epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hp: u32,
    pub hp_max: u32,
    pub stamina: u32,
    pub stamina_max: u32,
    pub hp_regen_ts: i64,
    pub stamina_regen_ts: i64,
}

impl Default for Vitals {
    fn default() -> Self {
        let hp_max = hp_max_for_level(STARTING_LEVEL);
        let stamina_max = stamina_max_for_level(STARTING_LEVEL);
        Self {
            hp: hp_max,
            hp_max,
            stamina: stamina_max,
            stamina_max,
            hp_regen_ts: 0,
            stamina_regen_ts: 0,
        }
    }
}

/// All persisted player progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub hero: SkillProgress,
    pub mining: SkillProgress,
    pub fishing: SkillProgress,
    pub hunting: SkillProgress,
    pub cooking: SkillProgress,
    pub blacksmithing: SkillProgress,
    pub base_attack: u32,
    pub base_defense: u32,
    /// Derived from base stats and equipment; recomputed on normalize.
    pub totals: CombatTotals,
    pub vitals: Vitals,
    pub gold: u64,
    pub inventory: Vec<Stack>,
    pub inventory_max: u32,
    pub bank: Vec<Stack>,
    pub equipment: Equipment,
}

impl Default for PlayerSave {
    fn default() -> Self {
        let equipment = Equipment::new();
        Self {
            hero: SkillProgress::default(),
            mining: SkillProgress::default(),
            fishing: SkillProgress::default(),
            hunting: SkillProgress::default(),
            cooking: SkillProgress::default(),
            blacksmithing: SkillProgress::default(),
            base_attack: BASE_ATTACK,
            base_defense: BASE_DEFENSE,
            totals: compute_totals(BASE_ATTACK, BASE_DEFENSE, &equipment),
            vitals: Vitals::default(),
            gold: 0,
            inventory: Vec::new(),
            inventory_max: DEFAULT_INVENTORY_CAPACITY,
            bank: Vec::new(),
            equipment,
        }
    }
}

/// Keeps the current/max ratio when the maximum changes; otherwise clamps.
///
/// A missing current value means a fresh record, which starts full.
fn reconcile_vital(new_max: u32, stored_max: Option<u32>, stored: Option<u32>) -> u32 {
    let prev_max = stored_max.unwrap_or(new_max).max(1);
    let prev = stored.unwrap_or(prev_max).min(prev_max);
    if prev_max != new_max {
        let ratio = f64::from(prev) / f64::from(prev_max);
        ((ratio * f64::from(new_max)).round() as u32).min(new_max)
    } else {
        prev
    }
}

impl PlayerSave {
    /// A fresh save with regeneration clocks started at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        let mut save = Self::default();
        save.vitals.hp_regen_ts = now_ms;
        save.vitals.stamina_regen_ts = now_ms;
        save
    }

    pub fn skill(&self, skill: Skill) -> &SkillProgress {
        match skill {
            Skill::Mining => &self.mining,
            Skill::Fishing => &self.fishing,
            Skill::Hunting => &self.hunting,
            Skill::Cooking => &self.cooking,
            Skill::Blacksmithing => &self.blacksmithing,
        }
    }

    pub fn skill_mut(&mut self, skill: Skill) -> &mut SkillProgress {
        match skill {
            Skill::Mining => &mut self.mining,
            Skill::Fishing => &mut self.fishing,
            Skill::Hunting => &mut self.hunting,
            Skill::Cooking => &mut self.cooking,
            Skill::Blacksmithing => &mut self.blacksmithing,
        }
    }

    /// Grants hero experience. Each level adds base attack and defense and
    /// raises the vitals maxima. Returns levels gained.
    pub fn grant_hero_xp(&mut self, amount: u64) -> u32 {
        let gained = self.hero.grant_xp(amount);
        if gained > 0 {
            self.apply_hero_levels(gained);
        }
        gained
    }

    fn apply_hero_levels(&mut self, gained: u32) {
        self.base_attack = self
            .base_attack
            .saturating_add(gained.saturating_mul(ATTACK_PER_HERO_LEVEL));
        self.base_defense = self
            .base_defense
            .saturating_add(gained.saturating_mul(DEFENSE_PER_HERO_LEVEL));
        self.refresh_vitals();
        self.recompute_totals();
    }

    /// Recomputes vitals maxima from the hero level.
    pub fn refresh_vitals(&mut self) {
        let level = self.hero.level;
        let v = &mut self.vitals;
        let hp_max = hp_max_for_level(level);
        v.hp = reconcile_vital(hp_max, Some(v.hp_max), Some(v.hp));
        v.hp_max = hp_max;
        let stamina_max = stamina_max_for_level(level);
        v.stamina = reconcile_vital(stamina_max, Some(v.stamina_max), Some(v.stamina));
        v.stamina_max = stamina_max;
    }

    pub fn recompute_totals(&mut self) {
        self.totals = compute_totals(self.base_attack, self.base_defense, &self.equipment);
    }

    /// Restores every record invariant. Idempotent.
    pub fn normalize(&mut self) {
        let gained = self.hero.settle();
        if gained > 0 {
            self.apply_hero_levels(gained);
        }
        for skill in Skill::ALL {
            self.skill_mut(skill).settle();
        }

        inventory::unstack_gear(&mut self.inventory, self.inventory_max);
        inventory::consolidate(&mut self.inventory);
        // the bank has no capacity of its own; bound legacy splits the same way
        inventory::unstack_gear(&mut self.bank, self.inventory_max);
        inventory::consolidate(&mut self.bank);

        self.refresh_vitals();
        self.recompute_totals();
    }

    /// Builds a normalized save from an arbitrary stored document.
    ///
    /// Never fails: anything unreadable takes its default. Missing or future
    /// regeneration timestamps start at `now_ms`.
    pub fn from_value(value: &Value, now_ms: i64) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        let defaults = PlayerSave::default();

        let mut save = PlayerSave {
            hero: read_progress(obj.get("hero")),
            mining: read_progress(obj.get("mining")),
            fishing: read_progress(obj.get("fishing")),
            hunting: read_progress(obj.get("hunting")),
            cooking: read_progress(obj.get("cooking")),
            blacksmithing: read_progress(obj.get("blacksmithing")),
            base_attack: read_u32(obj.get("base_attack")).unwrap_or(defaults.base_attack),
            base_defense: read_u32(obj.get("base_defense")).unwrap_or(defaults.base_defense),
            totals: defaults.totals,
            vitals: defaults.vitals,
            gold: read_u64(obj.get("gold")).unwrap_or(0),
            inventory: read_stacks(obj.get("inventory")),
            inventory_max: read_u32(obj.get("inventory_max"))
                .unwrap_or(DEFAULT_INVENTORY_CAPACITY),
            bank: read_stacks(obj.get("bank")),
            equipment: read_equipment(obj.get("equipment")),
        };

        // Vitals are reconciled before normalize so a missing current value
        // can start full instead of being clamped from zero.
        let vitals = obj.get("vitals").and_then(Value::as_object);
        let field = |key: &str| vitals.and_then(|v| v.get(key));
        let level = save.hero.level.max(STARTING_LEVEL);
        let hp_max = hp_max_for_level(level);
        let stamina_max = stamina_max_for_level(level);
        save.vitals = Vitals {
            hp: reconcile_vital(hp_max, read_u32(field("hp_max")), read_u32(field("hp"))),
            hp_max,
            stamina: reconcile_vital(
                stamina_max,
                read_u32(field("stamina_max")),
                read_u32(field("stamina")),
            ),
            stamina_max,
            hp_regen_ts: read_regen_ts(field("hp_regen_ts"), now_ms),
            stamina_regen_ts: read_regen_ts(field("stamina_regen_ts"), now_ms),
        };

        save.normalize();
        save
    }
}

fn read_f64(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn read_u64(value: Option<&Value>) -> Option<u64> {
    read_f64(value).map(|n| n.max(0.0).floor() as u64)
}

fn read_u32(value: Option<&Value>) -> Option<u32> {
    read_u64(value).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

fn read_i64(value: Option<&Value>) -> Option<i64> {
    read_f64(value).map(|n| n.floor() as i64)
}

/// Regeneration clocks never run ahead of `now_ms` or behind the epoch.
fn read_regen_ts(value: Option<&Value>, now_ms: i64) -> i64 {
    read_i64(value).map_or(now_ms, |ts| ts.clamp(now_ms.min(0), now_ms))
}

fn read_progress(value: Option<&Value>) -> SkillProgress {
    let defaults = SkillProgress::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return defaults;
    };
    SkillProgress {
        level: read_u32(obj.get("level")).unwrap_or(defaults.level),
        xp: read_u64(obj.get("xp")).unwrap_or(defaults.xp),
        xp_next: read_u64(obj.get("xp_next")).unwrap_or(defaults.xp_next),
    }
}

fn read_stacks(value: Option<&Value>) -> Vec<Stack> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let stacks: Vec<Stack> = entries
        .iter()
        .filter_map(|e| serde_json::from_value(e.clone()).ok())
        .collect();
    if stacks.len() < entries.len() {
        log::warn!(
            "dropped {} unreadable inventory entries",
            entries.len() - stacks.len()
        );
    }
    stacks
}

fn read_equipment(value: Option<&Value>) -> Equipment {
    let mut equipment = Equipment::new();
    let Some(obj) = value.and_then(Value::as_object) else {
        return equipment;
    };
    for (key, entry) in obj {
        let slot = serde_json::from_value::<EquipSlot>(Value::String(key.clone()));
        let gear = serde_json::from_value::<Gear>(entry.clone());
        match (slot, gear) {
            (Ok(slot), Ok(gear)) if gear.slot == slot => {
                equipment.set(slot, Some(gear));
            }
            _ if entry.is_null() => {}
            _ => log::warn!("dropped unreadable equipment entry {:?}", key),
        }
    }
    equipment
}
