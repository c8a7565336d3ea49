use crate::core::save::PlayerSave;
use serde::{Deserialize, Serialize};

/// Either side of a fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
}

impl Combatant {
    pub fn new(name: &str, level: u32, hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            name: name.to_string(),
            level,
            hp,
            max_hp: hp,
            attack,
            defense,
        }
    }

    /// The hero as currently saved: derived totals and current hp.
    pub fn hero(save: &PlayerSave) -> Self {
        Self {
            name: "Hero".to_string(),
            level: save.hero.level,
            hp: save.vitals.hp,
            max_hp: save.vitals.hp_max,
            attack: save.totals.attack,
            defense: save.totals.defense,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }
}

/// How one strike's damage is derived from attack and defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageModel {
    /// `max(1, floor(a - 0.6 d))`, no variance. Dungeon waves.
    Wave,
    /// `max(1, floor((a - d) * U[0.9, 1.1]))`. Open-zone fights.
    Zone,
    /// Like `Zone`, but an attack that does not beat defense lands 0 or 1.
    HardGate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    /// Round cap reached with both sides standing.
    Stalemate,
}

impl EncounterOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            EncounterOutcome::Victory => "Victory",
            EncounterOutcome::Defeat => "Defeat",
            EncounterOutcome::Stalemate => "Stalemate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterReport {
    pub outcome: EncounterOutcome,
    pub rounds: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub hero_hp: u32,
}

/// One round: the hero's strike, then the enemy's if it survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub hero_damage: u32,
    /// None when the enemy fell before striking back.
    pub enemy_damage: Option<u32>,
}
