//! Achievement engine.

use super::state::GameState;

/// Unlock every achievement whose condition holds and pay its reward.
///
/// Conditions are evaluated against the state as it was on entry, so a
/// reward paid in this pass cannot satisfy another condition in the same
/// pass. Returns the ids unlocked, in catalogue order; empty means the
/// state was not modified.
pub fn check_achievements(state: &mut GameState) -> Vec<String> {
    let newly_met: Vec<usize> = state
        .achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.unlocked && a.condition.is_met(state))
        .map(|(i, _)| i)
        .collect();

    if newly_met.is_empty() {
        return Vec::new();
    }

    let mut reward_total = 0.0;
    let mut unlocked = Vec::with_capacity(newly_met.len());
    for i in newly_met {
        let achievement = &mut state.achievements[i];
        achievement.unlocked = true;
        reward_total += achievement.reward;
        tracing::info!(
            achievement = %achievement.id,
            reward = achievement.reward,
            "achievement unlocked"
        );
        unlocked.push(achievement.id.clone());
    }
    state.earn(reward_total);
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::accrual::click;

    #[test]
    fn nothing_unlocks_on_fresh_state() {
        let mut state = GameState::new(0);
        let before = state.clone();
        assert!(check_achievements(&mut state).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn five_clicks_then_first_click_reward() {
        let mut state = GameState::new(0);
        for _ in 0..5 {
            click(&mut state);
        }
        assert_eq!(state.coins, 5.0);
        assert_eq!(state.total_coins, 5.0);
        assert_eq!(check_achievements(&mut state), vec!["firstClick".to_string()]);
        assert_eq!(state.coins, 10.0);
        assert_eq!(state.total_coins, 10.0);
    }

    #[test]
    fn simultaneous_unlocks_sum_rewards() {
        let mut state = GameState::new(0);
        state.coins = 1_000.0;
        state.total_coins = 1_000.0;
        let unlocked = check_achievements(&mut state);
        assert_eq!(
            unlocked,
            vec!["firstClick", "richBeginner", "spaceEntrepreneur"]
        );
        assert_eq!(state.coins, 1_000.0 + 5.0 + 20.0 + 100.0);
        assert_eq!(state.total_coins, 1_125.0);
    }

    #[test]
    fn rewards_do_not_cascade_within_a_pass() {
        let mut state = GameState::new(0);
        // 96 + 5 (firstClick) would cross 100, but not in the same pass.
        state.total_coins = 96.0;
        state.coins = 96.0;
        assert_eq!(check_achievements(&mut state), vec!["firstClick"]);
        assert!(!state.achievement("richBeginner").unwrap().unlocked);
        assert_eq!(check_achievements(&mut state), vec!["richBeginner"]);
    }

    #[test]
    fn reward_paid_once() {
        let mut state = GameState::new(0);
        state.total_coins = 1.0;
        check_achievements(&mut state);
        let coins = state.coins;
        assert!(check_achievements(&mut state).is_empty());
        assert_eq!(state.coins, coins);
    }

    #[test]
    fn click_master_needs_level_ten() {
        let mut state = GameState::new(0);
        state.upgrades[0].level = 10;
        let unlocked = check_achievements(&mut state);
        assert_eq!(unlocked, vec!["clickMaster"]);
        assert_eq!(state.coins, 50.0);
    }

    #[test]
    fn passive_income_achievement() {
        let mut state = GameState::new(0);
        state.coins_per_second = 100.0;
        assert_eq!(check_achievements(&mut state), vec!["autoIncome"]);
        assert_eq!(state.total_coins, 200.0);
    }
}
