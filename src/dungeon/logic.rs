//! The crypt raid state machine.
//!
//! ```text
//! Prepare --6s--> Wave 1 --6s--> ... Wave 6 --same tick--> Boss round 1 --6s--> ...
//! ```
//!
//! Each wave is one full encounter. The boss is one exchange per tick and
//! keeps its health between ticks. The hero's health is written to the save
//! after every encounter or exchange.

use super::types::*;
use crate::activities::TickContext;
use crate::combat::logic::{exchange, resolve_encounter};
use crate::combat::types::{Combatant, DamageModel, EncounterOutcome};
use crate::core::balance::*;
use crate::core::save::PlayerSave;
use crate::core::scheduler::{Scheduler, TimerId};
use crate::error::{GameError, GameResult};
use crate::items::catalog;
use crate::items::inventory::try_add;
use crate::items::types::Item;
use crate::utils::persistence::{SaveStore, Storage};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pays the entry cost and writes the active-run marker.
pub fn enter_crypt<S: Storage>(store: &mut SaveStore<S>, now_ms: i64) -> GameResult<DungeonEvent> {
    let mut save = store.load(now_ms);
    if save.vitals.stamina < DUNGEON_ENTRY_STAMINA {
        return Err(GameError::NotEnoughStamina {
            needed: DUNGEON_ENTRY_STAMINA,
            have: save.vitals.stamina,
        });
    }
    save.vitals.stamina -= DUNGEON_ENTRY_STAMINA;
    store.save(&save)?;
    store.set_active_run(&ActiveDungeonRun::crypt(now_ms))?;
    log::info!("entered the crypt");
    Ok(DungeonEvent::Entered {
        stamina_spent: DUNGEON_ENTRY_STAMINA,
    })
}

#[derive(Debug)]
pub struct DungeonRaid {
    phase: DungeonPhase,
    boss: Option<Combatant>,
    pending: Option<TimerId>,
    max_wave_rounds: u32,
    max_boss_rounds: u32,
}

impl Default for DungeonRaid {
    fn default() -> Self {
        Self::new(MAX_COMBAT_ROUNDS, MAX_BOSS_ROUNDS)
    }
}

impl DungeonRaid {
    pub fn new(max_wave_rounds: u32, max_boss_rounds: u32) -> Self {
        Self {
            phase: DungeonPhase::Idle,
            boss: None,
            pending: None,
            max_wave_rounds,
            max_boss_rounds,
        }
    }

    pub fn phase(&self) -> DungeonPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            DungeonPhase::Prepare | DungeonPhase::Wave(_) | DungeonPhase::Boss { .. }
        )
    }

    pub fn boss(&self) -> Option<&Combatant> {
        self.boss.as_ref()
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    /// Starts the run from the top if a marker exists.
    ///
    /// A raid that has already started, even if it was halted since, does
    /// not restart; a new `DungeonRaid` does.
    pub fn resume<S: Storage, R: Rng + ?Sized>(
        &mut self,
        ctx: &mut TickContext<'_, S, R>,
    ) -> GameResult<Vec<DungeonEvent>> {
        let active = ctx.store.load_active_run().filter(|run| run.is_crypt());
        if active.is_none() {
            return Err(GameError::NoActiveRun);
        }
        if self.phase != DungeonPhase::Idle || ctx.pause.is_paused() {
            return Ok(Vec::new());
        }
        log::info!("crypt run started");
        self.phase = DungeonPhase::Prepare;
        self.boss = None;
        self.pending = Some(ctx.scheduler.schedule_in(ctx.config.tick_interval_ms));
        Ok(vec![DungeonEvent::Preparing])
    }

    /// Stops without touching the marker, so the run can be restarted later.
    pub fn on_pause(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        if self.is_running() {
            log::debug!("crypt run halted in {:?}", self.phase);
            self.phase = DungeonPhase::Halted;
        }
    }

    /// Handles a fired wake-up. Timers this raid does not own are ignored.
    pub fn fire<S: Storage, R: Rng + ?Sized>(
        &mut self,
        timer: TimerId,
        ctx: &mut TickContext<'_, S, R>,
    ) -> Vec<DungeonEvent> {
        if self.pending != Some(timer) {
            return Vec::new();
        }
        self.pending = None;
        let mut events = Vec::new();
        if ctx.pause.is_paused() {
            self.on_pause(ctx.scheduler);
            return events;
        }
        match self.phase {
            DungeonPhase::Prepare => self.start_wave(0, ctx, &mut events),
            DungeonPhase::Wave(index) => self.fight_wave(index, ctx, &mut events),
            DungeonPhase::Boss { .. } => self.boss_round(ctx, &mut events),
            _ => {}
        }
        events
    }

    fn schedule<S: Storage, R: Rng + ?Sized>(&mut self, ctx: &mut TickContext<'_, S, R>) {
        self.pending = Some(ctx.scheduler.schedule_in(ctx.config.tick_interval_ms));
    }

    fn start_wave<S: Storage, R: Rng + ?Sized>(
        &mut self,
        index: usize,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<DungeonEvent>,
    ) {
        self.phase = DungeonPhase::Wave(index);
        events.push(DungeonEvent::WaveStarted {
            wave: index,
            enemy: CRYPT_WAVES[index].name.to_string(),
        });
        self.schedule(ctx);
    }

    fn fight_wave<S: Storage, R: Rng + ?Sized>(
        &mut self,
        index: usize,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<DungeonEvent>,
    ) {
        let mut save = ctx.store.load(ctx.scheduler.now());
        let mut hero = Combatant::hero(&save);
        let mut enemy = CRYPT_WAVES[index].spawn();
        let report = resolve_encounter(
            &mut hero,
            &mut enemy,
            DamageModel::Wave,
            self.max_wave_rounds,
            &mut *ctx.rng,
        );
        save.vitals.hp = report.hero_hp;
        if !self.persist(&save, ctx, events) {
            return;
        }

        let wave = index + 1;
        match report.outcome {
            EncounterOutcome::Defeat => self.fail(format!("died on Wave {wave}"), ctx, events),
            EncounterOutcome::Stalemate => {
                self.fail(format!("Wave {wave} stalled (too tanky)"), ctx, events)
            }
            EncounterOutcome::Victory => {
                events.push(DungeonEvent::WaveCleared {
                    wave: index,
                    report,
                });
                if index + 1 < CRYPT_WAVES.len() {
                    self.start_wave(index + 1, ctx, events);
                } else {
                    // The first boss exchange follows the last wave without a gap.
                    self.phase = DungeonPhase::Boss { round: 0 };
                    self.boss = Some(CRYPT_BOSS.spawn());
                    events.push(DungeonEvent::BossAppeared {
                        name: CRYPT_BOSS.name.to_string(),
                    });
                    self.boss_round(ctx, events);
                }
            }
        }
    }

    fn boss_round<S: Storage, R: Rng + ?Sized>(
        &mut self,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<DungeonEvent>,
    ) {
        let DungeonPhase::Boss { round } = self.phase else {
            return;
        };
        let round = round + 1;
        self.phase = DungeonPhase::Boss { round };
        let boss = self.boss.get_or_insert_with(|| CRYPT_BOSS.spawn());

        let mut save = ctx.store.load(ctx.scheduler.now());
        let mut hero = Combatant::hero(&save);
        let result = exchange(&mut hero, boss, DamageModel::HardGate, &mut *ctx.rng);
        let boss_hp = boss.hp;
        events.push(DungeonEvent::BossRound {
            round,
            dealt: result.hero_damage,
            taken: result.enemy_damage,
            boss_hp,
            hero_hp: hero.hp,
        });

        if boss_hp == 0 {
            self.win(save, ctx, events);
            return;
        }
        save.vitals.hp = hero.hp;
        if !self.persist(&save, ctx, events) {
            return;
        }
        if hero.hp == 0 {
            self.fail("killed by boss".to_string(), ctx, events);
        } else if round >= self.max_boss_rounds {
            self.fail(format!("{} outlasted you", CRYPT_BOSS.name), ctx, events);
        } else {
            self.schedule(ctx);
        }
    }

    fn win<S: Storage, R: Rng + ?Sized>(
        &mut self,
        mut save: PlayerSave,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<DungeonEvent>,
    ) {
        let rng = &mut *ctx.rng;
        let gold = rng.gen_range(DUNGEON_GOLD_MIN..=DUNGEON_GOLD_MAX);
        let xp = rng.gen_range(DUNGEON_XP_MIN..=DUNGEON_XP_MAX);
        let set_piece = if rng.gen::<f64>() < SET_DROP_CHANCE {
            catalog::cryptwarden_set().choose(rng).cloned()
        } else {
            None
        };

        save.gold = save.gold.saturating_add(gold);
        let levels_gained = save.grant_hero_xp(xp);
        let set_drop = set_piece.and_then(|gear| {
            let name = gear.display_name();
            match try_add(&mut save.inventory, save.inventory_max, Item::Gear(gear), 1) {
                Ok(()) => Some(name),
                Err(_) => {
                    log::warn!("inventory full, {} left behind", name);
                    None
                }
            }
        });
        if !self.persist(&save, ctx, events) {
            return;
        }

        log::info!("crypt cleared: +{} gold, +{} xp", gold, xp);
        events.push(DungeonEvent::Victory {
            gold,
            xp,
            levels_gained,
            set_drop,
        });
        self.finish(DungeonPhase::Won, ctx);
    }

    fn fail<S: Storage, R: Rng + ?Sized>(
        &mut self,
        reason: String,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<DungeonEvent>,
    ) {
        log::info!("crypt run failed: {}", reason);
        events.push(DungeonEvent::Failed { reason });
        self.finish(DungeonPhase::Failed, ctx);
    }

    fn finish<S: Storage, R: Rng + ?Sized>(
        &mut self,
        phase: DungeonPhase,
        ctx: &mut TickContext<'_, S, R>,
    ) {
        self.phase = phase;
        self.boss = None;
        if let Some(id) = self.pending.take() {
            ctx.scheduler.cancel(id);
        }
        if let Err(e) = ctx.store.clear_active_run() {
            log::error!("failed to clear dungeon marker: {}", e);
        }
    }

    /// Writes the save; a failed write ends the run.
    fn persist<S: Storage, R: Rng + ?Sized>(
        &mut self,
        save: &PlayerSave,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<DungeonEvent>,
    ) -> bool {
        match ctx.store.save(save) {
            Ok(()) => true,
            Err(e) => {
                log::error!("crypt: failed to persist save: {}", e);
                self.fail(format!("could not save progress: {e}"), ctx, events);
                false
            }
        }
    }
}
