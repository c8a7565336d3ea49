//! Open-world hunting grounds and their mobs.

use super::types::Combatant;
use crate::activities::data::query_param;
use crate::items::catalog::{self, GearDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobDef {
    pub id: &'static str,
    pub name: &'static str,
    pub level: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Catalog id of this mob's unique drop.
    pub unique_drop: &'static str,
}

impl MobDef {
    /// A fresh, full-health instance for one encounter.
    pub fn spawn(&self) -> Combatant {
        Combatant::new(self.name, self.level, self.hp, self.attack, self.defense)
    }

    pub fn unique(&self) -> Option<&'static GearDef> {
        catalog::find_gear(self.unique_drop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub id: &'static str,
    pub name: &'static str,
    pub req_level: u32,
    pub mobs: [MobDef; 5],
    pub gold_min: u64,
    pub gold_max: u64,
    pub mythic: GearDef,
}

impl Zone {
    pub fn mob(&self, id: &str) -> Option<&MobDef> {
        self.mobs.iter().find(|m| m.id == id)
    }
}

const fn mob(
    id: &'static str,
    name: &'static str,
    level: u32,
    hp: u32,
    attack: u32,
    defense: u32,
    unique_drop: &'static str,
) -> MobDef {
    MobDef {
        id,
        name,
        level,
        hp,
        attack,
        defense,
        unique_drop,
    }
}

pub static ZONES: [Zone; 2] = [
    Zone {
        id: "undead",
        name: "Undead Territory",
        req_level: 1,
        mobs: [
            mob("skeleton", "Skeleton", 2, 35, 8, 3, "rusty_sword"),
            mob("zombie", "Zombie", 3, 40, 9, 4, "cracked_shield"),
            mob("ghoul", "Ghoul", 4, 45, 10, 5, "tattered_boots"),
            mob("wraith", "Wraith", 6, 50, 12, 6, "leather_bracers"),
            mob("cryptknight", "Crypt Knight", 9, 70, 16, 9, "shadow_blade"),
        ],
        gold_min: 2,
        gold_max: 6,
        mythic: catalog::GRAVEBORN_BLADE,
    },
    Zone {
        id: "necropolis",
        name: "Necropolis",
        req_level: 10,
        mobs: [
            mob("boneguard", "Bone Guard", 11, 80, 18, 10, "bone_club"),
            mob("plague bearer", "Plague Bearer", 12, 90, 19, 11, "plague_mask"),
            mob("deathmage", "Death Mage", 14, 85, 22, 10, "death_shroud"),
            mob("reaper", "Reaper", 16, 100, 24, 12, "reaper_scythe"),
            mob("lich", "Lich Lord", 19, 130, 28, 15, "necro_ring"),
        ],
        gold_min: 6,
        gold_max: 12,
        mythic: catalog::LICH_KINGS_AMULET,
    },
];

/// Zone named by the `zone` query parameter, defaulting to the first.
pub fn select_zone(query: &str) -> &'static Zone {
    query_param(query, "zone")
        .and_then(|id| ZONES.iter().find(|z| z.id == id))
        .unwrap_or(&ZONES[0])
}

/// Mob named by the `mob` query parameter, if it lives in `zone`.
pub fn select_mob(zone: &Zone, query: &str) -> Option<MobDef> {
    query_param(query, "mob").and_then(|id| zone.mob(id)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_zone_defaults_to_undead() {
        assert_eq!(select_zone("").id, "undead");
        assert_eq!(select_zone("?zone=atlantis").id, "undead");
        assert_eq!(select_zone("?zone=necropolis").req_level, 10);
    }

    #[test]
    fn test_every_mob_has_a_unique() {
        for zone in &ZONES {
            for mob in &zone.mobs {
                assert!(mob.unique().is_some(), "{} has no unique", mob.id);
            }
        }
    }

    #[test]
    fn test_select_mob_in_zone() {
        let zone = select_zone("?zone=undead");
        assert_eq!(select_mob(zone, "?mob=wraith").map(|m| m.level), Some(6));
        assert_eq!(select_mob(zone, "?mob=reaper"), None);
        assert_eq!(select_mob(zone, ""), None);
    }

    #[test]
    fn test_spawn_is_full_health() {
        let skeleton = ZONES[0].mobs[0].spawn();
        assert_eq!(skeleton.hp, 35);
        assert_eq!(skeleton.max_hp, 35);
        assert_eq!(skeleton.defense, 3);
    }
}
