//! Play session: the single owner and writer of the game state.
//!
//! A [`Session`] holds the current [`GameState`] and the timers around it
//! (passive income, autosave, achievement highlight). Commands and queries
//! are synchronous; each command first catches the timers up to "now",
//! applies one engine operation and then settles achievements and unlocks.

use crate::clicker::accrual::{self, claim_daily_reward, offline_accrual, refresh_daily_reward};
use crate::clicker::achievements::check_achievements;
use crate::clicker::prestige::{self, prestige_eligible};
use crate::clicker::save::Persistence;
use crate::clicker::state::{GameState, UpgradeId};
use crate::clicker::upgrades::{self, unlock_available_upgrades};
use crate::config::SessionConfig;
use crate::error::{DailyRewardError, PrestigeError, PurchaseError, SaveError};
use crate::store::SaveStore;
use crate::time::{Clock, GameTime, OneShot};

pub struct Session<S, C> {
    state: GameState,
    persistence: Persistence<S>,
    clock: C,
    config: SessionConfig,
    /// Passive income timer; only running while `coins_per_second > 0`.
    passive: GameTime,
    autosave: GameTime,
    /// "Achievement just unlocked" highlight.
    highlight: OneShot,
    /// Offline income granted at load, until the driver takes it.
    offline_granted: Option<f64>,
}

impl<S: SaveStore, C: Clock> Session<S, C> {
    /// Load the saved game (or start fresh), apply offline income and
    /// settle achievements.
    pub fn start(config: SessionConfig, store: S, clock: C) -> Self {
        let now = clock.now_ms();
        let mut persistence = Persistence::new(store);

        let (state, offline_granted) = match persistence.load() {
            Some(mut saved) => {
                let granted = offline_accrual(&mut saved, now);
                (saved, (granted > 0.0).then_some(granted))
            }
            None => {
                tracing::info!("starting a new game");
                (GameState::new(now), None)
            }
        };

        let mut session = Self {
            state,
            persistence,
            clock,
            passive: GameTime::new(config.tick_interval_ms, config.max_catch_up_ms),
            autosave: GameTime::new(config.autosave_interval_ms, config.max_catch_up_ms),
            highlight: OneShot::default(),
            offline_granted,
            config,
        };
        refresh_daily_reward(&mut session.state, now, session.config.day_boundary);
        session.autosave.update(now);
        session.settle(now);
        session
    }

    /// Catch timers up to the clock: apply passive ticks, expire the
    /// highlight, re-arm the daily reward and autosave when due.
    /// Returns the number of passive ticks applied.
    pub fn update(&mut self) -> u32 {
        let now = self.clock.now_ms();

        let ticks = if self.passive.is_running() {
            self.passive.update(now)
        } else {
            0
        };
        for _ in 0..ticks {
            if !accrual::passive_tick(&mut self.state) {
                break;
            }
            self.settle(now);
        }

        self.highlight.poll(now);
        refresh_daily_reward(&mut self.state, now, self.config.day_boundary);

        if self.autosave.update(now) > 0 {
            self.save_quietly(now);
        }
        ticks
    }

    /// Manual click.
    pub fn click(&mut self) {
        let now = self.catch_up();
        accrual::click(&mut self.state);
        self.settle(now);
    }

    pub fn buy_upgrade(&mut self, id: &str) -> Result<UpgradeId, PurchaseError> {
        let now = self.catch_up();
        let bought = upgrades::buy_upgrade(&mut self.state, id)?;
        self.settle(now);
        Ok(bought)
    }

    pub fn claim_daily_reward(&mut self) -> Result<f64, DailyRewardError> {
        let now = self.catch_up();
        let reward = claim_daily_reward(&mut self.state, now, self.config.day_boundary)?;
        self.settle(now);
        Ok(reward)
    }

    /// Always `NotImplemented` in this version; the state is untouched.
    pub fn prestige(&mut self) -> Result<(), PrestigeError> {
        self.catch_up();
        prestige::prestige(&self.state)
    }

    /// Wipe the save and start over. Does nothing unless `confirmed`.
    pub fn reset_game(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        let now = self.clock.now_ms();
        if let Err(e) = self.persistence.clear() {
            tracing::warn!(error = %e, "could not clear save during reset");
        }
        self.state = prestige::reset_game(now);
        self.passive.stop();
        self.highlight.cancel();
        self.offline_granted = None;
        self.settle(now);
        true
    }

    /// Save now with `lastPlayed` stamped to the current time.
    pub fn save(&mut self) -> Result<(), SaveError> {
        let now = self.clock.now_ms();
        self.persistence.save(&self.state, now)
    }

    /// End of session: catch up and write a final snapshot.
    pub fn shutdown(mut self) -> Result<GameState, SaveError> {
        self.update();
        self.save()?;
        tracing::info!("session ended");
        Ok(self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True for a short while after any achievement unlocks.
    pub fn achievement_highlighted(&self) -> bool {
        self.highlight.is_pending(self.clock.now_ms())
    }

    /// Offline income granted at load. Returns it once.
    pub fn take_offline_report(&mut self) -> Option<f64> {
        self.offline_granted.take()
    }

    pub fn prestige_eligible(&self) -> bool {
        prestige_eligible(&self.state)
    }

    /// Whether the passive income timer is currently running.
    pub fn passive_running(&self) -> bool {
        self.passive.is_running()
    }

    fn catch_up(&mut self) -> i64 {
        self.update();
        self.clock.now_ms()
    }

    /// Run achievement passes until none unlock (rewards can cross further
    /// thresholds), then unlock upgrades and start or stop the passive timer.
    fn settle(&mut self, now: i64) {
        while !check_achievements(&mut self.state).is_empty() {
            self.highlight.arm(now, self.config.highlight_ms);
        }
        unlock_available_upgrades(&mut self.state);

        let producing = self.state.coins_per_second > 0.0;
        if producing && !self.passive.is_running() {
            self.passive.update(now);
        } else if !producing && self.passive.is_running() {
            self.passive.stop();
        }
    }

    fn save_quietly(&mut self, now: i64) {
        if let Err(e) = self.persistence.save(&self.state, now) {
            tracing::warn!(error = %e, "autosave failed");
        }
    }
}
