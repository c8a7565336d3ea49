//! The fixed-interval loop shared by every activity.
//!
//! ```text
//! Idle --start--> Running --stop--> Stopped
//!                    |---target reached--> Completed
//!                    `---check failed----> Blocked
//! ```
//!
//! Every tick re-reads the save, validates, mutates, persists, and only then
//! schedules the next wake-up. A pause cancels the pending wake-up and is
//! also checked at the top of every tick.

use super::types::*;
use crate::core::scheduler::{Scheduler, TimerId};
use crate::error::{GameError, GameResult};
use crate::utils::persistence::Storage;
use rand::Rng;

/// Parses a user-entered repeat count. Fractions are floored.
pub fn parse_target_count(input: &str) -> GameResult<u32> {
    let invalid = || GameError::InvalidTarget(input.to_string());
    let n: f64 = input.trim().parse().map_err(|_| invalid())?;
    if !n.is_finite() {
        return Err(invalid());
    }
    let n = n.floor();
    if n < 1.0 {
        return Err(invalid());
    }
    Ok(n.min(f64::from(u32::MAX)) as u32)
}

pub struct ActivityLoop<A: Activity> {
    activity: A,
    state: LoopState,
    last_stop: Option<StopReason>,
    target_remaining: u32,
    pending: Option<TimerId>,
    ticks: u64,
}

impl<A: Activity> ActivityLoop<A> {
    pub fn new(activity: A) -> Self {
        Self {
            activity,
            state: LoopState::Idle,
            last_stop: None,
            target_remaining: 0,
            pending: None,
            ticks: 0,
        }
    }

    pub fn activity(&self) -> &A {
        &self.activity
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn last_stop(&self) -> Option<&StopReason> {
        self.last_stop.as_ref()
    }

    /// Remaining repetitions; zero means unbounded.
    pub fn target_remaining(&self) -> u32 {
        self.target_remaining
    }

    /// Ticks performed since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    /// Starts the loop and runs the first tick immediately.
    ///
    /// Does nothing if already running or while paused.
    pub fn start<S: Storage, R: Rng + ?Sized>(
        &mut self,
        ctx: &mut TickContext<'_, S, R>,
    ) -> Vec<ActivityEvent> {
        if self.is_running() {
            return Vec::new();
        }
        if ctx.pause.is_paused() {
            log::debug!("{} not started: paused", self.activity.label());
            return Vec::new();
        }
        self.state = LoopState::Running;
        self.last_stop = None;
        log::info!("{} started", self.activity.label());
        let mut events = vec![ActivityEvent::Started {
            activity: self.activity.label(),
        }];
        self.tick(ctx, &mut events);
        events
    }

    /// Sets a repeat count. Starts the loop if it is not already running.
    pub fn request_target<S: Storage, R: Rng + ?Sized>(
        &mut self,
        count: u32,
        ctx: &mut TickContext<'_, S, R>,
    ) -> GameResult<Vec<ActivityEvent>> {
        if count == 0 {
            return Err(GameError::InvalidTarget(count.to_string()));
        }
        self.target_remaining = count;
        if self.is_running() {
            return Ok(Vec::new());
        }
        let events = self.start(ctx);
        if !self.is_running() && events.is_empty() {
            // Start refused (paused); leave no stale target behind.
            self.target_remaining = 0;
        }
        Ok(events)
    }

    /// Stops the loop and cancels any pending tick.
    pub fn stop(&mut self, silent: bool, scheduler: &mut Scheduler) -> Vec<ActivityEvent> {
        let reason = if silent {
            StopReason::Paused
        } else {
            StopReason::User
        };
        let was_running = self.is_running();
        self.halt(LoopState::Stopped, reason.clone(), scheduler);
        if silent || !was_running {
            return Vec::new();
        }
        vec![ActivityEvent::Halted { reason }]
    }

    /// Reacts to the global pause signal exactly like a silent stop.
    pub fn on_pause(&mut self, scheduler: &mut Scheduler) {
        if self.is_running() {
            log::debug!("{} paused", self.activity.label());
        }
        self.stop(true, scheduler);
    }

    /// Handles a fired wake-up. Timers this loop does not own are ignored.
    pub fn fire<S: Storage, R: Rng + ?Sized>(
        &mut self,
        timer: TimerId,
        ctx: &mut TickContext<'_, S, R>,
    ) -> Vec<ActivityEvent> {
        if self.pending != Some(timer) {
            return Vec::new();
        }
        self.pending = None;
        let mut events = Vec::new();
        self.tick(ctx, &mut events);
        events
    }

    fn halt(&mut self, state: LoopState, reason: StopReason, scheduler: &mut Scheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        self.target_remaining = 0;
        if self.is_running() || state != LoopState::Stopped {
            log::info!("{} halted: {}", self.activity.label(), reason);
        }
        self.state = state;
        self.last_stop = Some(reason);
    }

    fn halt_with_event(
        &mut self,
        state: LoopState,
        reason: StopReason,
        scheduler: &mut Scheduler,
        events: &mut Vec<ActivityEvent>,
    ) {
        events.push(ActivityEvent::Halted {
            reason: reason.clone(),
        });
        self.halt(state, reason, scheduler);
    }

    fn tick<S: Storage, R: Rng + ?Sized>(
        &mut self,
        ctx: &mut TickContext<'_, S, R>,
        events: &mut Vec<ActivityEvent>,
    ) {
        if !self.is_running() {
            return;
        }
        if ctx.pause.is_paused() {
            self.halt(LoopState::Stopped, StopReason::Paused, ctx.scheduler);
            return;
        }

        let mut save = ctx.store.load(ctx.scheduler.now());
        if let Err(reason) = self.activity.check(&save) {
            self.halt_with_event(
                LoopState::Blocked,
                StopReason::Blocked(reason),
                ctx.scheduler,
                events,
            );
            return;
        }

        let outcome = self.activity.perform(&mut save, &mut *ctx.rng);
        self.ticks += 1;
        events.extend(outcome.events);

        if let Err(e) = ctx.store.save(&save) {
            log::error!("{}: failed to persist save: {}", self.activity.label(), e);
            self.halt_with_event(
                LoopState::Stopped,
                StopReason::SaveFailed(e.to_string()),
                ctx.scheduler,
                events,
            );
            return;
        }

        if let Some(reason) = outcome.halt {
            self.halt_with_event(LoopState::Stopped, reason, ctx.scheduler, events);
            return;
        }

        if self.target_remaining > 0 {
            self.target_remaining -= 1;
            if self.target_remaining == 0 {
                events.push(ActivityEvent::TargetCompleted {
                    last: outcome.produced,
                });
                self.halt(LoopState::Completed, StopReason::TargetCompleted, ctx.scheduler);
                return;
            }
        }

        self.pending = Some(ctx.scheduler.schedule_in(ctx.config.tick_interval_ms));
    }
}
