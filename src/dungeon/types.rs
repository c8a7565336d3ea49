//! Crypt dungeon data: the persisted run marker, wave and boss stats, and
//! the events a raid reports.

use crate::combat::types::{Combatant, EncounterReport};
use serde::{Deserialize, Serialize};

pub const CRYPT_ID: &str = "crypt";

/// Marker stored while a dungeon run is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDungeonRun {
    pub id: String,
    pub started_at: i64,
}

impl ActiveDungeonRun {
    pub fn crypt(now_ms: i64) -> Self {
        Self {
            id: CRYPT_ID.to_string(),
            started_at: now_ms,
        }
    }

    pub fn is_crypt(&self) -> bool {
        self.id == CRYPT_ID
    }
}

/// A fixed dungeon opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Foe {
    pub id: &'static str,
    pub name: &'static str,
    pub level: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
}

impl Foe {
    pub fn spawn(&self) -> Combatant {
        Combatant::new(self.name, self.level, self.hp, self.attack, self.defense)
    }
}

const fn foe(
    id: &'static str,
    name: &'static str,
    level: u32,
    hp: u32,
    attack: u32,
    defense: u32,
) -> Foe {
    Foe {
        id,
        name,
        level,
        hp,
        attack,
        defense,
    }
}

pub const CRYPT_WAVES: [Foe; 6] = [
    foe("bone_wretch", "Bone Wretch", 1, 120, 18, 10),
    foe("crypt_skeleton", "Crypt Skeleton", 2, 135, 20, 12),
    foe("grave_acolyte", "Grave Acolyte", 3, 150, 22, 14),
    foe("rotting_knight", "Rotting Knight", 4, 175, 25, 16),
    foe("tomb_guardian", "Tomb Guardian", 5, 210, 28, 18),
    foe("wraithbound_archer", "Wraithbound Archer", 6, 190, 30, 17),
];

pub const CRYPT_BOSS: Foe = foe("vorun_warden", "Vorun, the Warden", 10, 500, 80, 80);

/// Where a raid currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DungeonPhase {
    #[default]
    Idle,
    Prepare,
    /// Zero-based index of the wave waiting to be fought.
    Wave(usize),
    /// Boss rounds played so far.
    Boss { round: u32 },
    Won,
    Failed,
    /// Halted by the pause signal or by leaving the page. The marker stays.
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DungeonEvent {
    Entered { stamina_spent: u32 },
    Preparing,
    WaveStarted { wave: usize, enemy: String },
    WaveCleared { wave: usize, report: EncounterReport },
    BossAppeared { name: String },
    BossRound {
        round: u32,
        dealt: u32,
        taken: Option<u32>,
        boss_hp: u32,
        hero_hp: u32,
    },
    Victory {
        gold: u64,
        xp: u64,
        levels_gained: u32,
        set_drop: Option<String>,
    },
    Failed { reason: String },
}

impl DungeonEvent {
    pub fn message(&self) -> String {
        match self {
            DungeonEvent::Entered { stamina_spent } => {
                format!("Entered Whispering Crypt. (-{stamina_spent} stamina)")
            }
            DungeonEvent::Preparing => "Prepare for battle...".to_string(),
            DungeonEvent::WaveStarted { wave, enemy } => format!("Wave {}: {enemy}", wave + 1),
            DungeonEvent::WaveCleared { wave, report } => {
                format!("Cleared Wave {} in {} rounds.", wave + 1, report.rounds)
            }
            DungeonEvent::BossAppeared { name } => format!("Boss: {name}"),
            DungeonEvent::BossRound {
                round,
                dealt,
                taken: Some(taken),
                ..
            } => format!("Round {round}: You dealt {dealt}, boss dealt {taken}"),
            DungeonEvent::BossRound {
                round,
                dealt,
                taken: None,
                ..
            } => format!("Round {round}: You hit {dealt}. Boss defeated."),
            DungeonEvent::Victory {
                gold,
                xp,
                levels_gained,
                set_drop,
            } => {
                let mut line = format!("Boss defeated! Gold +{gold}, XP +{xp}");
                if *levels_gained > 0 {
                    line.push_str(&format!(", Level Ups: +{levels_gained}"));
                }
                if let Some(name) = set_drop {
                    line.push_str(&format!(". SET DROP: {name}"));
                }
                line
            }
            DungeonEvent::Failed { reason } => format!("Dungeon failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_uses_camel_case_keys() {
        let json = serde_json::to_string(&ActiveDungeonRun::crypt(5)).unwrap();
        assert_eq!(json, r#"{"id":"crypt","startedAt":5}"#);
    }

    #[test]
    fn test_waves_grow_tougher() {
        assert!(CRYPT_WAVES.windows(2).all(|w| w[0].level < w[1].level));
        assert_eq!(CRYPT_BOSS.spawn().hp, 500);
    }

    #[test]
    fn test_boss_round_messages() {
        let hit = DungeonEvent::BossRound {
            round: 2,
            dealt: 1,
            taken: Some(0),
            boss_hp: 499,
            hero_hp: 90,
        };
        assert_eq!(hit.message(), "Round 2: You dealt 1, boss dealt 0");
    }
}
