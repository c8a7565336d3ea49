//! Passive health and stamina regeneration with offline catch-up.
//!
//! Each resource keeps its own timestamp. Timestamps only ever advance by
//! whole intervals, so partial progress toward the next chunk survives
//! repeated calls and reloads.

use super::config::RegenPolicy;
use super::save::PlayerSave;

/// What one regeneration pass granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegenReport {
    pub hp_ticks: u64,
    pub hp_gained: u32,
    pub stamina_ticks: u64,
    pub stamina_gained: u32,
}

impl RegenReport {
    /// True if any timestamp moved, meaning the save needs persisting.
    pub fn changed(&self) -> bool {
        self.hp_ticks > 0 || self.stamina_ticks > 0
    }
}

/// Whole intervals elapsed between `ts` and `now`. Clock skew counts as zero.
fn elapsed_ticks(ts: i64, now_ms: i64, interval_ms: u64) -> u64 {
    if interval_ms == 0 || now_ms <= ts {
        return 0;
    }
    now_ms.saturating_sub(ts) as u64 / interval_ms
}

fn regen_one(
    current: &mut u32,
    max: u32,
    ts: &mut i64,
    now_ms: i64,
    amount: u32,
    interval_ms: u64,
) -> (u64, u32) {
    let ticks = elapsed_ticks(*ts, now_ms, interval_ms);
    if ticks == 0 {
        return (0, 0);
    }
    let before = *current;
    let grant = u64::from(amount).saturating_mul(ticks);
    let after = u64::from(before).saturating_add(grant).min(u64::from(max));
    *current = after as u32;
    let advance = i64::try_from(ticks.saturating_mul(interval_ms)).unwrap_or(i64::MAX);
    *ts = ts.saturating_add(advance);
    (ticks, current.saturating_sub(before))
}

/// Applies every whole regeneration interval elapsed since the stored
/// timestamps. Calling again before another interval passes is a no-op.
pub fn apply_regen(save: &mut PlayerSave, now_ms: i64, policy: &RegenPolicy) -> RegenReport {
    let v = &mut save.vitals;
    let (hp_ticks, hp_gained) = regen_one(
        &mut v.hp,
        v.hp_max,
        &mut v.hp_regen_ts,
        now_ms,
        policy.hp_amount,
        policy.hp_interval_ms,
    );
    let (stamina_ticks, stamina_gained) = regen_one(
        &mut v.stamina,
        v.stamina_max,
        &mut v.stamina_regen_ts,
        now_ms,
        policy.stamina_amount,
        policy.stamina_interval_ms,
    );
    RegenReport {
        hp_ticks,
        hp_gained,
        stamina_ticks,
        stamina_gained,
    }
}
