//! Income: manual clicks, passive ticks, offline catch-up and the daily reward.

use chrono::{DateTime, Local, NaiveDate};
use serde::Deserialize;

use super::state::GameState;
use crate::error::DailyRewardError;

/// Absences at or below this many seconds earn nothing offline.
pub const OFFLINE_MIN_SECS: f64 = 60.0;

/// Offline earnings stop accruing after 24 hours.
pub const OFFLINE_CAP_SECS: f64 = 24.0 * 60.0 * 60.0;

/// Daily reward before the prestige doubling.
pub const DAILY_REWARD_BASE: f64 = 100.0;

/// Manual click: earn `coins_per_click`.
pub fn click(state: &mut GameState) {
    let power = state.coins_per_click;
    state.earn(power);
}

/// One second of passive income. No-op (returns false) without production.
pub fn passive_tick(state: &mut GameState) -> bool {
    if state.coins_per_second <= 0.0 {
        return false;
    }
    let cps = state.coins_per_second;
    state.earn(cps);
    true
}

/// Grant catch-up income for the time since `last_played` and stamp
/// `last_played = now_ms`. Returns the coins granted.
pub fn offline_accrual(state: &mut GameState, now_ms: i64) -> f64 {
    let elapsed = now_ms.saturating_sub(state.last_played) as f64 / 1000.0;
    state.last_played = now_ms;

    if elapsed <= OFFLINE_MIN_SECS || !state.offline_progress {
        return 0.0;
    }

    let credited = elapsed.min(OFFLINE_CAP_SECS);
    let granted = (state.coins_per_second * credited).floor();
    if granted <= 0.0 {
        return 0.0;
    }
    state.earn(granted);
    tracing::info!(elapsed_secs = elapsed, credited_secs = credited, granted, "offline income granted");
    granted
}

/// Which calendar decides when a new day starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// The machine's local time zone.
    #[default]
    Local,
    Utc,
}

/// Calendar date of a millisecond timestamp under `boundary`.
pub fn calendar_day(ms: i64, boundary: DayBoundary) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp_millis(ms)?;
    Some(match boundary {
        DayBoundary::Local => utc.with_timezone(&Local).date_naive(),
        DayBoundary::Utc => utc.date_naive(),
    })
}

/// Re-arm the daily reward when `now_ms` falls on a different calendar day
/// than the last claim. Elapsed duration is irrelevant. Returns true if the
/// flag was reset.
pub fn refresh_daily_reward(state: &mut GameState, now_ms: i64, boundary: DayBoundary) -> bool {
    if !state.daily_reward_claimed {
        return false;
    }
    let today = calendar_day(now_ms, boundary);
    let last = calendar_day(state.daily_reward_last, boundary);
    if today.is_some() && today == last {
        return false;
    }
    state.daily_reward_claimed = false;
    tracing::debug!("daily reward available again");
    true
}

/// Daily reward amount: `floor(100 × 2^prestige_level)`.
pub fn daily_reward_amount(prestige_level: u32) -> f64 {
    (DAILY_REWARD_BASE * 2f64.powi(prestige_level as i32)).floor()
}

/// Claim today's reward. Fails without touching the state when it was
/// already claimed on the current calendar day.
pub fn claim_daily_reward(
    state: &mut GameState,
    now_ms: i64,
    boundary: DayBoundary,
) -> Result<f64, DailyRewardError> {
    refresh_daily_reward(state, now_ms, boundary);
    if state.daily_reward_claimed {
        return Err(DailyRewardError::AlreadyClaimed);
    }
    let reward = daily_reward_amount(state.prestige_level);
    state.earn(reward);
    state.daily_reward_claimed = true;
    state.daily_reward_last = now_ms;
    tracing::info!(reward, prestige_level = state.prestige_level, "daily reward claimed");
    Ok(reward)
}
