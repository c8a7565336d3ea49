//! Victory rewards for zone fights.

use super::zones::{MobDef, Zone};
use crate::core::balance::{ZONE_XP_BASE, ZONE_XP_MIN, ZONE_XP_PER_LEVEL};
use crate::items::catalog::GearDef;
use crate::items::types::Gear;
use rand::Rng;

/// Hero xp for beating a mob of `mob_level`.
pub fn zone_xp(mob_level: u32) -> u64 {
    (ZONE_XP_BASE + ZONE_XP_PER_LEVEL * u64::from(mob_level)).max(ZONE_XP_MIN)
}

/// Gold in `[min + lvl/4, max + lvl/2]`, inclusive.
pub fn roll_gold<R: Rng + ?Sized>(zone: &Zone, mob_level: u32, rng: &mut R) -> u64 {
    let lvl = u64::from(mob_level);
    let low = zone.gold_min + lvl / 4;
    let high = zone.gold_max + lvl / 2;
    rng.gen_range(low..=high)
}

fn roll_drop<R: Rng + ?Sized>(
    def: &GearDef,
    chance: f64,
    hero_level: u32,
    rng: &mut R,
) -> Option<Gear> {
    // Gear the hero could not wear never drops.
    if def.req_level > hero_level {
        return None;
    }
    (rng.gen::<f64>() < chance).then(|| def.to_gear())
}

/// The mob's unique item, at the chance for its rarity.
pub fn roll_unique<R: Rng + ?Sized>(mob: &MobDef, hero_level: u32, rng: &mut R) -> Option<Gear> {
    let def = mob.unique()?;
    roll_drop(def, def.rarity.drop_chance(), hero_level, rng)
}

/// The zone's mythic item.
pub fn roll_mythic<R: Rng + ?Sized>(zone: &Zone, hero_level: u32, rng: &mut R) -> Option<Gear> {
    roll_drop(&zone.mythic, zone.mythic.rarity.drop_chance(), hero_level, rng)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VictoryRewards {
    pub xp: u64,
    pub gold: u64,
    pub drops: Vec<Gear>,
}

pub fn roll_victory<R: Rng + ?Sized>(
    zone: &Zone,
    mob: &MobDef,
    hero_level: u32,
    rng: &mut R,
) -> VictoryRewards {
    let gold = roll_gold(zone, mob.level, rng);
    let drops = [
        roll_unique(mob, hero_level, rng),
        roll_mythic(zone, hero_level, rng),
    ]
    .into_iter()
    .flatten()
    .collect();
    VictoryRewards {
        xp: zone_xp(mob.level),
        gold,
        drops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::zones::ZONES;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zone_xp() {
        assert_eq!(zone_xp(2), 12);
        assert_eq!(zone_xp(19), 46);
        assert_eq!(zone_xp(0), 8);
    }

    #[test]
    fn test_gold_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let undead = &ZONES[0];
        for _ in 0..500 {
            let gold = roll_gold(undead, 9, &mut rng);
            assert!((4..=10).contains(&gold), "got {gold}");
        }
        let necro = &ZONES[1];
        for _ in 0..500 {
            let gold = roll_gold(necro, 19, &mut rng);
            assert!((10..=21).contains(&gold), "got {gold}");
        }
    }

    #[test]
    fn test_unique_gated_by_hero_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let cryptknight = ZONES[0].mob("cryptknight").copied().unwrap();
        for _ in 0..2_000 {
            assert!(roll_unique(&cryptknight, 8, &mut rng).is_none());
        }
    }

    #[test]
    fn test_common_unique_drops_sometimes() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let skeleton = ZONES[0].mob("skeleton").copied().unwrap();
        let drops = (0..1_000)
            .filter_map(|_| roll_unique(&skeleton, 1, &mut rng))
            .count();
        // 20% nominal
        assert!((120..=280).contains(&drops), "got {drops}");
    }

    #[test]
    fn test_mythic_gated_by_hero_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..5_000 {
            assert!(roll_mythic(&ZONES[0], 9, &mut rng).is_none());
        }
    }
}
