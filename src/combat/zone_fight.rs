//! Auto-fighting in an open zone, one encounter per tick.

use super::logic::resolve_encounter;
use super::rewards::roll_victory;
use super::types::{Combatant, DamageModel, EncounterOutcome};
use super::zones::{MobDef, Zone};
use crate::activities::{Activity, ActivityEvent, BlockReason, StopReason, TickOutcome, XpTrack};
use crate::core::balance::{MAX_COMBAT_ROUNDS, ZONE_ENCOUNTER_STAMINA};
use crate::core::save::PlayerSave;
use crate::items::inventory::try_add;
use crate::items::types::Item;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct ZoneFight {
    pub zone: &'static Zone,
    /// Fight only this mob; otherwise a random one each encounter.
    pub mob: Option<MobDef>,
    pub max_rounds: u32,
}

impl ZoneFight {
    pub fn new(zone: &'static Zone, mob: Option<MobDef>) -> Self {
        Self {
            zone,
            mob,
            max_rounds: MAX_COMBAT_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    fn pick_mob<R: Rng + ?Sized>(&self, rng: &mut R) -> MobDef {
        match self.mob {
            Some(mob) => mob,
            None => self
                .zone
                .mobs
                .choose(rng)
                .copied()
                .unwrap_or(self.zone.mobs[0]),
        }
    }
}

impl Activity for ZoneFight {
    fn label(&self) -> &'static str {
        "Fighting"
    }

    fn check(&self, save: &PlayerSave) -> Result<(), BlockReason> {
        if save.hero.level < self.zone.req_level {
            return Err(BlockReason::LevelTooLow {
                track: XpTrack::Hero,
                required: self.zone.req_level,
                current: save.hero.level,
            });
        }
        if save.vitals.hp == 0 {
            return Err(BlockReason::NoHealth);
        }
        if save.vitals.stamina < ZONE_ENCOUNTER_STAMINA {
            return Err(BlockReason::NotEnoughStamina {
                needed: ZONE_ENCOUNTER_STAMINA,
                have: save.vitals.stamina,
            });
        }
        Ok(())
    }

    fn perform<R: Rng + ?Sized>(&self, save: &mut PlayerSave, rng: &mut R) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        save.vitals.stamina -= ZONE_ENCOUNTER_STAMINA;
        outcome.events.push(ActivityEvent::StaminaSpent {
            amount: ZONE_ENCOUNTER_STAMINA,
        });

        let mob = self.pick_mob(rng);
        let mut hero = Combatant::hero(save);
        let mut enemy = mob.spawn();
        let report = resolve_encounter(
            &mut hero,
            &mut enemy,
            DamageModel::Zone,
            self.max_rounds,
            rng,
        );
        save.vitals.hp = report.hero_hp;
        outcome.events.push(ActivityEvent::Encounter {
            enemy: mob.name.to_string(),
            report,
        });

        match report.outcome {
            EncounterOutcome::Defeat => {
                log::info!("hero defeated by {}", mob.name);
                outcome.halt = Some(StopReason::Defeated(mob.name.to_string()));
            }
            // The enemy flees: no rewards, keep fighting.
            EncounterOutcome::Stalemate => {}
            EncounterOutcome::Victory => {
                let rewards = roll_victory(self.zone, &mob, save.hero.level, rng);
                save.gold = save.gold.saturating_add(rewards.gold);
                outcome.events.push(ActivityEvent::GoldFound {
                    amount: rewards.gold,
                });
                for gear in rewards.drops {
                    let (name, rarity) = (gear.display_name(), gear.rarity);
                    match try_add(&mut save.inventory, save.inventory_max, Item::Gear(gear), 1) {
                        Ok(()) => outcome.events.push(ActivityEvent::ItemFound { name, rarity }),
                        Err(_) => log::warn!("inventory full, {} left behind", name),
                    }
                }
                outcome.produced = Some(mob.name.to_string());
                outcome.grant_hero_xp(save, rewards.xp);
            }
        }
        outcome
    }
}
