//! One open game: the save store, the clock, the pause flag, and the single
//! screen currently shown.
//!
//! Only one screen's loop can run at a time. Navigating silently stops the
//! previous one. The regeneration ticker belongs to the session itself and
//! keeps running across navigation.

use super::config::GameConfig;
use super::regen::{apply_regen, RegenReport};
use super::save::PlayerSave;
use super::scheduler::{wall_clock_ms, PauseSignal, Scheduler, TimerId};
use crate::activities::data::{
    select_cook_recipe, select_hunt_target, select_ore, select_smelt_recipe, select_spot,
};
use crate::activities::{
    parse_target_count, ActivityEvent, ActivityLoop, Cooking, Fishing, Forging, Hunting, Mining,
    TickContext,
};
use crate::combat::zones::{select_mob, select_zone};
use crate::combat::ZoneFight;
use crate::dungeon::{enter_crypt, DungeonEvent, DungeonRaid};
use crate::error::{GameError, GameResult};
use crate::items::types::{EquipSlot, Gear};
use crate::items::{equipment, inventory, market, upgrade};
use crate::utils::persistence::{SaveStore, Storage};
use rand::Rng;

/// Where the player can go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Hub,
    Mining,
    Fishing,
    Hunting,
    Cooking,
    Forging,
    Zone,
    Dungeon,
}

/// The page on display and the loop that belongs to it.
pub enum Screen {
    Hub,
    Mining(ActivityLoop<Mining>),
    Fishing(ActivityLoop<Fishing>),
    Hunting(ActivityLoop<Hunting>),
    Cooking(ActivityLoop<Cooking>),
    Forging(ActivityLoop<Forging>),
    Zone(ActivityLoop<ZoneFight>),
    Dungeon(DungeonRaid),
}

/// Applies `$body` to whichever activity loop the screen holds.
macro_rules! with_loop {
    ($screen:expr, $lp:ident => $body:expr, else $other:expr) => {
        match $screen {
            Screen::Mining($lp) => $body,
            Screen::Fishing($lp) => $body,
            Screen::Hunting($lp) => $body,
            Screen::Cooking($lp) => $body,
            Screen::Forging($lp) => $body,
            Screen::Zone($lp) => $body,
            Screen::Hub | Screen::Dungeon(_) => $other,
        }
    };
}

impl Screen {
    pub fn destination(&self) -> Destination {
        match self {
            Screen::Hub => Destination::Hub,
            Screen::Mining(_) => Destination::Mining,
            Screen::Fishing(_) => Destination::Fishing,
            Screen::Hunting(_) => Destination::Hunting,
            Screen::Cooking(_) => Destination::Cooking,
            Screen::Forging(_) => Destination::Forging,
            Screen::Zone(_) => Destination::Zone,
            Screen::Dungeon(_) => Destination::Dungeon,
        }
    }

    pub fn is_running(&self) -> bool {
        match self {
            Screen::Dungeon(raid) => raid.is_running(),
            other => with_loop!(other, lp => lp.is_running(), else false),
        }
    }

    fn pending_timer(&self) -> Option<TimerId> {
        match self {
            Screen::Dungeon(raid) => raid.pending_timer(),
            other => with_loop!(other, lp => lp.pending_timer(), else None),
        }
    }

    /// Stops without a message and cancels the pending tick.
    fn halt(&mut self, scheduler: &mut Scheduler) {
        match self {
            Screen::Dungeon(raid) => raid.on_pause(scheduler),
            other => with_loop!(other, lp => lp.on_pause(scheduler), else ()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Activity(ActivityEvent),
    Dungeon(DungeonEvent),
    Regenerated(RegenReport),
}

impl SessionEvent {
    pub fn message(&self) -> String {
        match self {
            SessionEvent::Activity(e) => e.message(),
            SessionEvent::Dungeon(e) => e.message(),
            SessionEvent::Regenerated(r) => {
                format!("+{} HP, +{} stamina", r.hp_gained, r.stamina_gained)
            }
        }
    }
}

fn activity_events(events: Vec<ActivityEvent>) -> Vec<SessionEvent> {
    events.into_iter().map(SessionEvent::Activity).collect()
}

fn dungeon_events(events: Vec<DungeonEvent>) -> Vec<SessionEvent> {
    events.into_iter().map(SessionEvent::Dungeon).collect()
}

pub struct Session<S: Storage, R: Rng> {
    store: SaveStore<S>,
    scheduler: Scheduler,
    pause: PauseSignal,
    rng: R,
    config: GameConfig,
    screen: Screen,
    regen_timer: Option<TimerId>,
}

impl<S: Storage, R: Rng> Session<S, R> {
    /// Opens the game at `now_ms`: validates the config, catches up on
    /// regeneration, writes back the normalized save, and starts the
    /// regeneration ticker. The session starts on the hub.
    pub fn open(storage: S, rng: R, config: GameConfig, now_ms: i64) -> GameResult<Self> {
        config.validate()?;
        let mut store = SaveStore::new(storage);
        let mut save = store.load(now_ms);
        let report = apply_regen(&mut save, now_ms, &config.regen);
        store.save(&save)?;
        log::info!(
            "session opened: hero level {}, regen caught up {} hp / {} stamina",
            save.hero.level,
            report.hp_gained,
            report.stamina_gained
        );

        let mut scheduler = Scheduler::new(now_ms);
        let regen_timer = Some(scheduler.schedule_in(config.regen_check_interval_ms));
        Ok(Self {
            store,
            scheduler,
            pause: PauseSignal::new(),
            rng,
            config,
            screen: Screen::Hub,
            regen_timer,
        })
    }

    /// Opens the game at the host's current time.
    pub fn open_now(storage: S, rng: R, config: GameConfig) -> GameResult<Self> {
        Self::open(storage, rng, config, wall_clock_ms())
    }

    pub fn now(&self) -> i64 {
        self.scheduler.now()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &SaveStore<S> {
        &self.store
    }

    /// A handle on the pause flag, for overlays that want to raise it.
    pub fn pause_signal(&self) -> PauseSignal {
        self.pause.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// The normalized save as it stands now, for renderers.
    pub fn snapshot(&self) -> PlayerSave {
        self.store.load(self.now())
    }

    fn split(&mut self) -> (&mut Screen, TickContext<'_, S, R>) {
        (
            &mut self.screen,
            TickContext {
                store: &mut self.store,
                scheduler: &mut self.scheduler,
                pause: &self.pause,
                rng: &mut self.rng,
                config: &self.config,
            },
        )
    }

    /// Leaves the current screen and opens `dest`.
    ///
    /// `query` selects the ore, spot, target, recipe or zone, e.g.
    /// `?ore=coal`; unknown or missing values fall back to the first entry.
    /// Opening the dungeon resumes a run if one is marked active.
    pub fn navigate(&mut self, dest: Destination, query: &str) -> Vec<SessionEvent> {
        self.screen.halt(&mut self.scheduler);
        log::debug!("navigate to {:?} {}", dest, query);
        self.screen = match dest {
            Destination::Hub => Screen::Hub,
            Destination::Mining => Screen::Mining(ActivityLoop::new(Mining {
                ore: select_ore(query),
            })),
            Destination::Fishing => Screen::Fishing(ActivityLoop::new(Fishing {
                spot: select_spot(query),
            })),
            Destination::Hunting => Screen::Hunting(ActivityLoop::new(Hunting {
                target: select_hunt_target(query),
            })),
            Destination::Cooking => Screen::Cooking(ActivityLoop::new(Cooking {
                recipe: select_cook_recipe(query),
            })),
            Destination::Forging => Screen::Forging(ActivityLoop::new(Forging {
                recipe: select_smelt_recipe(query),
            })),
            Destination::Zone => {
                let zone = select_zone(query);
                let fight = ZoneFight::new(zone, select_mob(zone, query))
                    .with_max_rounds(self.config.max_combat_rounds);
                Screen::Zone(ActivityLoop::new(fight))
            }
            Destination::Dungeon => Screen::Dungeon(DungeonRaid::new(
                self.config.max_combat_rounds,
                self.config.max_boss_rounds,
            )),
        };

        if dest != Destination::Dungeon || self.store.load_active_run().is_none() {
            return Vec::new();
        }
        let (screen, mut ctx) = self.split();
        match screen {
            Screen::Dungeon(raid) => match raid.resume(&mut ctx) {
                Ok(events) => dungeon_events(events),
                Err(e) => {
                    log::warn!("could not resume dungeon: {}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Starts the current screen's loop. Does nothing on the hub or while paused.
    pub fn start(&mut self) -> Vec<SessionEvent> {
        let (screen, mut ctx) = self.split();
        with_loop!(screen, lp => activity_events(lp.start(&mut ctx)), else Vec::new())
    }

    /// Parses a repeat count and applies it to the current loop.
    pub fn request_target(&mut self, input: &str) -> GameResult<Vec<SessionEvent>> {
        let count = parse_target_count(input)?;
        let (screen, mut ctx) = self.split();
        with_loop!(
            screen,
            lp => lp.request_target(count, &mut ctx).map(activity_events),
            else Err(GameError::InvalidTarget(input.to_string()))
        )
    }

    /// User stop: cancels the pending tick and reports it.
    pub fn stop(&mut self) -> Vec<SessionEvent> {
        let scheduler = &mut self.scheduler;
        match &mut self.screen {
            Screen::Dungeon(raid) => {
                raid.on_pause(scheduler);
                Vec::new()
            }
            other => with_loop!(
                other,
                lp => activity_events(lp.stop(false, scheduler)),
                else Vec::new()
            ),
        }
    }

    /// Pays for the crypt, marks the run active, and opens the dungeon screen.
    pub fn enter_dungeon(&mut self) -> GameResult<Vec<SessionEvent>> {
        if self.pause.is_paused() {
            return Ok(Vec::new());
        }
        let now = self.now();
        let entered = enter_crypt(&mut self.store, now)?;
        let mut events = vec![SessionEvent::Dungeon(entered)];
        events.extend(self.navigate(Destination::Dungeon, ""));
        Ok(events)
    }

    /// Raises the pause flag and cancels the active loop's pending tick.
    pub fn pause(&mut self) {
        if self.pause.is_paused() {
            return;
        }
        log::info!("paused");
        self.pause.raise();
        self.screen.halt(&mut self.scheduler);
    }

    /// Clears the pause flag and catches up on regeneration. Stopped loops
    /// stay stopped.
    pub fn resume(&mut self) -> Vec<SessionEvent> {
        if !self.pause.is_paused() {
            return Vec::new();
        }
        log::info!("resumed");
        self.pause.clear();
        self.regen_tick().into_iter().collect()
    }

    /// Moves the clock forward `ms`, firing every wake-up that falls due in order.
    pub fn advance(&mut self, ms: u64) -> Vec<SessionEvent> {
        let until = self.now().saturating_add(ms as i64);
        let mut events = Vec::new();
        while let Some(id) = self.scheduler.pop_due(until) {
            if Some(id) == self.regen_timer {
                let every = self.config.regen_check_interval_ms;
                self.regen_timer = Some(self.scheduler.schedule_in(every));
                if !self.pause.is_paused() {
                    events.extend(self.regen_tick());
                }
                continue;
            }
            if self.screen.pending_timer() != Some(id) {
                continue;
            }
            let (screen, mut ctx) = self.split();
            let fired = match screen {
                Screen::Dungeon(raid) => dungeon_events(raid.fire(id, &mut ctx)),
                other => with_loop!(
                    other,
                    lp => activity_events(lp.fire(id, &mut ctx)),
                    else Vec::new()
                ),
            };
            events.extend(fired);
        }
        self.scheduler.set_now(until);
        events
    }

    fn regen_tick(&mut self) -> Option<SessionEvent> {
        let now = self.now();
        let mut save = self.store.load(now);
        let report = apply_regen(&mut save, now, &self.config.regen);
        if !report.changed() {
            return None;
        }
        if let Err(e) = self.store.save(&save) {
            log::error!("failed to persist regeneration: {}", e);
            return None;
        }
        Some(SessionEvent::Regenerated(report))
    }

    /// Loads the save, applies `f`, and writes the result back if it succeeded.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut PlayerSave, &mut R) -> GameResult<T>,
    ) -> GameResult<T> {
        let mut save = self.store.load(self.now());
        let value = f(&mut save, &mut self.rng)?;
        self.store.save(&save)?;
        Ok(value)
    }

    pub fn equip(&mut self, index: usize) -> GameResult<Option<Gear>> {
        self.mutate(|save, _| equipment::equip(save, index))
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> GameResult<Gear> {
        self.mutate(|save, _| equipment::unequip(save, slot))
    }

    pub fn upgrade(&mut self, index: usize) -> GameResult<upgrade::UpgradeOutcome> {
        self.mutate(|save, rng| upgrade::attempt_upgrade(save, index, rng))
    }

    pub fn eat(&mut self, index: usize) -> GameResult<market::Meal> {
        self.mutate(|save, _| market::eat(save, index))
    }

    pub fn sell_one(&mut self, index: usize) -> GameResult<u64> {
        self.mutate(|save, _| market::sell_one(save, index))
    }

    pub fn sell_stack(&mut self, index: usize) -> GameResult<u64> {
        self.mutate(|save, _| market::sell_stack(save, index))
    }

    pub fn buy_arrows(&mut self) -> GameResult<()> {
        self.mutate(|save, _| market::buy_arrows(save))
    }

    pub fn deposit(&mut self, index: usize) -> GameResult<()> {
        self.mutate(|save, _| market::deposit(save, index))
    }

    pub fn swap_slots(&mut self, a: usize, b: usize) -> GameResult<()> {
        self.mutate(|save, _| inventory::swap_slots(&mut save.inventory, a, b))
    }
}
