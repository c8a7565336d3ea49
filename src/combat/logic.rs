//! Turn-based encounter resolution.
//!
//! The hero always strikes first. An enemy killed by that strike does not
//! strike back in the same round.

use super::types::*;
use crate::core::balance::{DAMAGE_VARIANCE_MAX, DAMAGE_VARIANCE_MIN, WAVE_DEFENSE_FACTOR};
use rand::Rng;

fn variance<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(DAMAGE_VARIANCE_MIN..=DAMAGE_VARIANCE_MAX)
}

/// Damage of one strike. Never below 1, except a `HardGate` miss.
pub fn roll_damage<R: Rng + ?Sized>(
    attack: u32,
    defense: u32,
    model: DamageModel,
    rng: &mut R,
) -> u32 {
    let (a, d) = (f64::from(attack), f64::from(defense));
    match model {
        DamageModel::Wave => (a - d * WAVE_DEFENSE_FACTOR).floor().max(1.0) as u32,
        DamageModel::Zone => ((a - d) * variance(rng)).floor().max(1.0) as u32,
        DamageModel::HardGate => {
            if attack <= defense {
                u32::from(rng.gen_bool(0.5))
            } else {
                ((a - d) * variance(rng)).floor().max(1.0) as u32
            }
        }
    }
}

/// Plays a single round between `hero` and `enemy`.
pub fn exchange<R: Rng + ?Sized>(
    hero: &mut Combatant,
    enemy: &mut Combatant,
    model: DamageModel,
    rng: &mut R,
) -> Exchange {
    let hero_damage = roll_damage(hero.attack, enemy.defense, model, rng);
    enemy.take_damage(hero_damage);
    if !enemy.is_alive() {
        return Exchange {
            hero_damage,
            enemy_damage: None,
        };
    }
    let enemy_damage = roll_damage(enemy.attack, hero.defense, model, rng);
    hero.take_damage(enemy_damage);
    Exchange {
        hero_damage,
        enemy_damage: Some(enemy_damage),
    }
}

/// Fights until one side falls or `max_rounds` pass.
pub fn resolve_encounter<R: Rng + ?Sized>(
    hero: &mut Combatant,
    enemy: &mut Combatant,
    model: DamageModel,
    max_rounds: u32,
    rng: &mut R,
) -> EncounterReport {
    let mut rounds = 0;
    let mut damage_dealt = 0u32;
    let mut damage_taken = 0u32;

    while hero.is_alive() && enemy.is_alive() && rounds < max_rounds {
        rounds += 1;
        let round = exchange(hero, enemy, model, rng);
        damage_dealt = damage_dealt.saturating_add(round.hero_damage);
        damage_taken = damage_taken.saturating_add(round.enemy_damage.unwrap_or(0));
    }

    let outcome = if !enemy.is_alive() {
        EncounterOutcome::Victory
    } else if !hero.is_alive() {
        EncounterOutcome::Defeat
    } else {
        EncounterOutcome::Stalemate
    };
    log::debug!(
        "{} vs {}: {} in {} rounds",
        hero.name,
        enemy.name,
        outcome.name(),
        rounds
    );

    EncounterReport {
        outcome,
        rounds,
        damage_dealt,
        damage_taken,
        hero_hp: hero.hp,
    }
}
