//! Wall-clock sources and fixed-timestep timers for the driver.
//!
//! The engine itself is timeless: the driver reads a [`Clock`], feeds the
//! timestamp to a [`GameTime`] accumulator and applies one engine tick per
//! whole interval that elapsed. Everything runs on one thread; timers here
//! are plain values polled by their owner, never background tasks.

use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    // std::time::SystemTime::now() panics on wasm32-unknown-unknown.
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: i64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Fixed-timestep accumulator: converts wall-clock timestamps into a count
/// of whole intervals elapsed, carrying the remainder to the next update.
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Milliseconds per tick (e.g. 1000 = one tick per second).
    ms_per_tick: i64,
    /// Largest gap credited by a single update.
    max_delta_ms: i64,
    /// Accumulated milliseconds not yet consumed as ticks.
    accumulator: i64,
    /// Total elapsed ticks since creation.
    pub total_ticks: u64,
    /// Timestamp of the last update, None while stopped.
    last_timestamp: Option<i64>,
}

impl GameTime {
    /// `ms_per_tick` is clamped to at least 1.
    pub fn new(ms_per_tick: i64, max_delta_ms: i64) -> Self {
        Self {
            ms_per_tick: ms_per_tick.max(1),
            max_delta_ms: max_delta_ms.max(0),
            accumulator: 0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed the current timestamp. Returns the number of whole ticks to
    /// process. The first update after creation or [`stop`](Self::stop)
    /// only starts the timer.
    pub fn update(&mut self, now_ms: i64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp: clocks can go backwards, and huge gaps are capped.
            Some(prev) => (now_ms - prev).clamp(0, self.max_delta_ms),
            None => 0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = self.accumulator / self.ms_per_tick;
        self.accumulator -= ticks * self.ms_per_tick;
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.total_ticks += u64::from(ticks);
        ticks
    }

    /// Stop the timer and drop any partial interval.
    pub fn stop(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0;
    }

    pub fn is_running(&self) -> bool {
        self.last_timestamp.is_some()
    }

    /// Milliseconds until the next tick, if running.
    pub fn remaining_ms(&self) -> Option<i64> {
        self.last_timestamp.map(|_| self.ms_per_tick - self.accumulator)
    }
}

/// A one-shot deadline owned by the driver. Arming replaces any previous
/// deadline; cancelling or expiring clears it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneShot {
    fires_at: Option<i64>,
}

impl OneShot {
    pub fn arm(&mut self, now_ms: i64, duration_ms: i64) {
        self.fires_at = Some(now_ms + duration_ms);
    }

    pub fn cancel(&mut self) {
        self.fires_at = None;
    }

    /// True while armed and not yet expired at `now_ms`.
    pub fn is_pending(&self, now_ms: i64) -> bool {
        self.fires_at.is_some_and(|t| now_ms < t)
    }

    /// Clears the deadline once it has passed. Returns true on the poll
    /// that observed the expiry.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.fires_at {
            Some(t) if now_ms >= t => {
                self.fires_at = None;
                true
            }
            _ => false,
        }
    }
}
