//! Prestige (declared, not yet available) and full reset.

use super::state::{GameState, PRESTIGE_THRESHOLD};
use crate::error::PrestigeError;

/// Whether lifetime earnings are high enough to offer prestige.
pub fn prestige_eligible(state: &GameState) -> bool {
    state.total_coins >= PRESTIGE_THRESHOLD
}

/// Prestige reset. Not available in this version: always reports
/// `NotImplemented` and leaves the state alone.
pub fn prestige(state: &GameState) -> Result<(), PrestigeError> {
    tracing::info!(
        eligible = prestige_eligible(state),
        total_coins = state.total_coins,
        "prestige requested but not available"
    );
    Err(PrestigeError::NotImplemented)
}

/// Discard all progress. Confirmation is the caller's job.
pub fn reset_game(now_ms: i64) -> GameState {
    tracing::info!("game reset to defaults");
    GameState::new(now_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prestige_not_implemented_even_when_eligible() {
        let mut state = GameState::new(0);
        state.total_coins = 2_000_000.0;
        let before = state.clone();
        assert!(prestige_eligible(&state));
        assert_eq!(prestige(&state), Err(PrestigeError::NotImplemented));
        assert_eq!(state, before);
    }

    #[test]
    fn eligibility_threshold() {
        let mut state = GameState::new(0);
        state.total_coins = 999_999.0;
        assert!(!prestige_eligible(&state));
        state.total_coins = 1_000_000.0;
        assert!(prestige_eligible(&state));
    }

    #[test]
    fn reset_returns_defaults() {
        let state = reset_game(42);
        assert_eq!(state, GameState::new(42));
    }
}
