//! Plain-text views of the game state for the terminal driver.

use crate::clicker::accrual::daily_reward_amount;
use crate::clicker::prestige::prestige_eligible;
use crate::clicker::state::GameState;
use crate::clicker::upgrades::purchase_progress;

/// Thousands-separated number with one decimal when the value has a
/// visible fraction (`1234567` → `1,234,567`, `1.97` → `2.0`).
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    // Round to tenths first so a carry reaches the integer part.
    let tenths = (n * 10.0).round() as u64;
    let whole = group_thousands(tenths / 10);
    if n.fract() > 0.05 {
        format!("{whole}.{}", tenths % 10)
    } else {
        whole
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Balance, rates and reward availability.
pub fn status_lines(state: &GameState, highlighted: bool) -> Vec<String> {
    let mut lines = vec![
        format!("coins: {}", format_number(state.coins.floor())),
        format!(
            "per click: {}   per second: {}",
            format_number(state.coins_per_click),
            format_number(state.coins_per_second)
        ),
        format!("total earned: {}", format_number(state.total_coins.floor())),
        format!(
            "achievements: {}/{}{}",
            state.unlocked_achievement_count(),
            state.achievements.len(),
            if highlighted { "  ★ new!" } else { "" }
        ),
    ];
    if state.daily_reward_claimed {
        lines.push("daily reward: claimed, come back tomorrow".to_string());
    } else {
        lines.push(format!(
            "daily reward: {} available (`daily`)",
            format_number(daily_reward_amount(state.prestige_level))
        ));
    }
    if prestige_eligible(state) {
        lines.push("prestige: eligible (coming in a future update)".to_string());
    }
    lines
}

/// Unlocked upgrades with price and how close the balance is to it.
pub fn upgrade_lines(state: &GameState) -> Vec<String> {
    state
        .upgrades
        .iter()
        .filter(|u| u.unlocked)
        .map(|u| {
            let price = if u.is_maxed() {
                "max".to_string()
            } else {
                format!(
                    "{} ({}%)",
                    format_number(u.cost),
                    purchase_progress(state.coins, u.cost)
                )
            };
            format!("{:<16} lv {:<3} {:<20} {}", u.id.key(), u.level, price, u.description)
        })
        .collect()
}

pub fn achievement_lines(state: &GameState) -> Vec<String> {
    state
        .achievements
        .iter()
        .map(|a| {
            format!(
                "[{}] {:<20} +{:<6} {}",
                if a.unlocked { "x" } else { " " },
                a.name,
                format_number(a.reward),
                a.description
            )
        })
        .collect()
}
