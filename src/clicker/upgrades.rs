//! Upgrade engine: unlocking, purchasing and effect application.

use super::state::{cost_at_level, GameState, UpgradeEffect, UpgradeId};
use crate::error::PurchaseError;

/// Unlock every upgrade whose `unlock_coins` threshold has been reached
/// by lifetime earnings. Returns true if any upgrade changed, so callers
/// can skip redundant re-renders.
pub fn unlock_available_upgrades(state: &mut GameState) -> bool {
    let total = state.total_coins;
    let mut changed = false;
    for upgrade in state.upgrades.iter_mut().filter(|u| !u.unlocked) {
        if total >= upgrade.unlock_coins {
            upgrade.unlocked = true;
            changed = true;
            tracing::debug!(upgrade = %upgrade.id, "upgrade unlocked");
        }
    }
    changed
}

/// Buy one level of the upgrade with key `id`.
///
/// On success exactly one upgrade's level/cost and one production stat
/// change. On failure the state is untouched.
pub fn buy_upgrade(state: &mut GameState, id: &str) -> Result<UpgradeId, PurchaseError> {
    let idx = state
        .upgrades
        .iter()
        .position(|u| u.id.key() == id)
        .ok_or_else(|| PurchaseError::UnknownUpgrade(id.to_string()))?;

    let upgrade = &state.upgrades[idx];
    if let Some(max_level) = upgrade.max_level.filter(|_| upgrade.is_maxed()) {
        return Err(PurchaseError::MaxLevel {
            upgrade: upgrade.id,
            max_level,
        });
    }
    let Some(next_level) = upgrade.level.checked_add(1) else {
        return Err(PurchaseError::MaxLevel {
            upgrade: upgrade.id,
            max_level: upgrade.level,
        });
    };
    if state.coins < upgrade.cost {
        return Err(PurchaseError::InsufficientCoins {
            upgrade: upgrade.id,
            cost: upgrade.cost,
            coins: state.coins,
        });
    }

    let paid = upgrade.cost;
    state.coins -= paid;

    let upgrade = &mut state.upgrades[idx];
    upgrade.level = next_level;
    upgrade.cost = cost_at_level(upgrade.base_cost, upgrade.level);
    let upgrade_id = upgrade.id;
    let relative = upgrade.effect;
    let level = upgrade.level;

    apply_upgrade_effect(state, upgrade_id.effect(), relative);

    tracing::info!(
        upgrade = %upgrade_id,
        level,
        paid,
        coins_per_click = state.coins_per_click,
        coins_per_second = state.coins_per_second,
        "upgrade purchased"
    );
    Ok(upgrade_id)
}

/// Apply one level's worth of an upgrade effect.
fn apply_upgrade_effect(state: &mut GameState, effect: UpgradeEffect, relative: f64) {
    match effect {
        UpgradeEffect::AddClick(k) => {
            state.coins_per_click += k * state.prestige_multiplier;
        }
        UpgradeEffect::AddPassive(k) => {
            state.coins_per_second += k * state.prestige_multiplier;
        }
        UpgradeEffect::MultiplyClick => {
            state.coins_per_click = (state.coins_per_click * (1.0 + relative)).floor();
        }
    }
}

/// How close the balance is to affording `cost`, in whole percent (0..=100).
pub fn purchase_progress(coins: f64, cost: f64) -> u8 {
    if cost <= 0.0 {
        return 100;
    }
    ((coins / cost) * 100.0).floor().clamp(0.0, 100.0) as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_upgrade_id() -> impl Strategy<Value = UpgradeId> {
        prop_oneof![
            Just(UpgradeId::ClickPower),
            Just(UpgradeId::AutoClicker),
            Just(UpgradeId::ClickMultiplier),
            Just(UpgradeId::AsteroidMiner),
            Just(UpgradeId::SpaceStation),
            Just(UpgradeId::PlanetaryBase),
        ]
    }

    proptest! {
        #[test]
        fn prop_cost_follows_curve_after_n_purchases(id in arb_upgrade_id(), n in 0u32..40) {
            let mut state = GameState::new(0);
            state.coins = 1e15;
            for _ in 0..n {
                buy_upgrade(&mut state, id.key()).unwrap();
            }
            let up = state.upgrade(id).unwrap();
            prop_assert_eq!(up.level, n);
            prop_assert_eq!(up.cost, cost_at_level(up.base_cost, n));
        }

        #[test]
        fn prop_purchase_never_overdraws(id in arb_upgrade_id(), coins in 0.0f64..100_000.0) {
            let mut state = GameState::new(0);
            state.coins = coins;
            let _ = buy_upgrade(&mut state, id.key());
            prop_assert!(state.coins >= 0.0);
        }

        #[test]
        fn prop_purchase_preserves_total_coins(id in arb_upgrade_id(), coins in 0.0f64..100_000.0) {
            let mut state = GameState::new(0);
            state.coins = coins;
            state.total_coins = coins;
            let _ = buy_upgrade(&mut state, id.key());
            prop_assert_eq!(state.total_coins, coins);
        }

        #[test]
        fn prop_unlock_is_idempotent(total in 0.0f64..50_000.0) {
            let mut once = GameState::new(0);
            once.total_coins = total;
            unlock_available_upgrades(&mut once);
            let mut twice = once.clone();
            prop_assert!(!unlock_available_upgrades(&mut twice));
            prop_assert_eq!(once, twice);
        }
    }
}
