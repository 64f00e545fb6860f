//! Cosmic Clicker progression model and built-in catalogues.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cost growth per purchased level.
pub const COST_GROWTH: f64 = 1.15;

/// Lifetime coins needed before prestige may be offered.
pub const PRESTIGE_THRESHOLD: f64 = 1_000_000.0;

/// Identity of a built-in upgrade. Effects are dispatched on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeId {
    ClickPower,
    AutoClicker,
    ClickMultiplier,
    AsteroidMiner,
    SpaceStation,
    PlanetaryBase,
}

impl UpgradeId {
    /// All upgrades in display order.
    pub fn all() -> &'static [UpgradeId] {
        &[
            UpgradeId::ClickPower,
            UpgradeId::AutoClicker,
            UpgradeId::ClickMultiplier,
            UpgradeId::AsteroidMiner,
            UpgradeId::SpaceStation,
            UpgradeId::PlanetaryBase,
        ]
    }

    /// Stable key used in snapshots and commands.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::ClickPower => "clickPower",
            UpgradeId::AutoClicker => "autoClicker",
            UpgradeId::ClickMultiplier => "clickMultiplier",
            UpgradeId::AsteroidMiner => "asteroidMiner",
            UpgradeId::SpaceStation => "spaceStation",
            UpgradeId::PlanetaryBase => "planetaryBase",
        }
    }

    /// What one purchase of this upgrade does.
    pub fn effect(&self) -> UpgradeEffect {
        match self {
            UpgradeId::ClickPower => UpgradeEffect::AddClick(1.0),
            UpgradeId::AutoClicker => UpgradeEffect::AddPassive(1.0),
            UpgradeId::ClickMultiplier => UpgradeEffect::MultiplyClick,
            UpgradeId::AsteroidMiner => UpgradeEffect::AddPassive(5.0),
            UpgradeId::SpaceStation => UpgradeEffect::AddPassive(25.0),
            UpgradeId::PlanetaryBase => UpgradeEffect::AddPassive(100.0),
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UpgradeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpgradeId::all()
            .iter()
            .copied()
            .find(|id| id.key() == s)
            .ok_or(())
    }
}

/// Effect applied once per purchased level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// `coins_per_click += k × prestige_multiplier`
    AddClick(f64),
    /// `coins_per_second += k × prestige_multiplier`
    AddPassive(f64),
    /// `coins_per_click = floor(coins_per_click × (1 + upgrade.effect))`,
    /// compounding on the current click yield.
    MultiplyClick,
}

/// A purchasable, levelled upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub base_cost: f64,
    /// Price of the next level. Always `cost_at_level(base_cost, level)`.
    pub cost: f64,
    pub level: u32,
    /// Relative boost, only read by `MultiplyClick` upgrades.
    pub effect: f64,
    /// Lifetime coins at which the upgrade is offered.
    pub unlock_coins: f64,
    /// Monotonic: never goes back to false.
    pub unlocked: bool,
    pub max_level: Option<u32>,
    pub icon: String,
}

impl Upgrade {
    fn new(
        id: UpgradeId,
        name: &str,
        description: &str,
        base_cost: f64,
        effect: f64,
        unlock_coins: f64,
        icon: &str,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            base_cost,
            cost: base_cost,
            level: 0,
            effect,
            unlock_coins,
            unlocked: unlock_coins <= 0.0,
            max_level: None,
            icon: icon.to_string(),
        }
    }

    /// Whether the level cap has been reached.
    pub fn is_maxed(&self) -> bool {
        self.max_level.is_some_and(|max| self.level >= max)
    }
}

/// Price of an upgrade at a given level: `floor(base × 1.15^level)`.
pub fn cost_at_level(base_cost: f64, level: u32) -> f64 {
    (base_cost * COST_GROWTH.powf(f64::from(level))).floor()
}

/// Declarative achievement condition over the game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AchievementCondition {
    /// `total_coins >= threshold`
    TotalCoinsAtLeast { threshold: f64 },
    /// The upgrade's level equals `level` exactly.
    UpgradeLevel { upgrade: UpgradeId, level: u32 },
    /// `coins_per_second >= threshold`
    CoinsPerSecondAtLeast { threshold: f64 },
}

impl AchievementCondition {
    /// Evaluate against the current state. Pure.
    pub fn is_met(&self, state: &GameState) -> bool {
        match self {
            AchievementCondition::TotalCoinsAtLeast { threshold } => {
                state.total_coins >= *threshold
            }
            AchievementCondition::UpgradeLevel { upgrade, level } => state
                .upgrade(*upgrade)
                .is_some_and(|u| u.level == *level),
            AchievementCondition::CoinsPerSecondAtLeast { threshold } => {
                state.coins_per_second >= *threshold
            }
        }
    }
}

/// A one-time goal with a coin reward.
#[derive(Clone, Debug, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub condition: AchievementCondition,
    pub reward: f64,
    pub icon: String,
    /// Monotonic; the reward is paid on the false→true transition only.
    pub unlocked: bool,
}

impl Achievement {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        condition: AchievementCondition,
        reward: f64,
        icon: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            condition,
            reward,
            icon: icon.to_string(),
            unlocked: false,
        }
    }
}

/// The whole progression model. Mutated only through the engine functions.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable balance.
    pub coins: f64,
    /// Lifetime earnings. Never decreases; gates unlocks and achievements.
    pub total_coins: f64,
    pub coins_per_click: f64,
    pub coins_per_second: f64,
    /// Milliseconds since the Unix epoch.
    pub last_played: i64,
    pub offline_progress: bool,
    pub achievements: Vec<Achievement>,
    pub upgrades: Vec<Upgrade>,
    pub prestige_level: u32,
    pub prestige_multiplier: f64,
    pub daily_reward_claimed: bool,
    /// Milliseconds since the Unix epoch, 0 if never claimed.
    pub daily_reward_last: i64,
}

impl GameState {
    /// Fresh game started at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            coins: 0.0,
            total_coins: 0.0,
            coins_per_click: 1.0,
            coins_per_second: 0.0,
            last_played: now_ms,
            offline_progress: true,
            achievements: Self::create_achievements(),
            upgrades: Self::create_upgrades(),
            prestige_level: 0,
            prestige_multiplier: 1.0,
            daily_reward_claimed: false,
            daily_reward_last: 0,
        }
    }

    /// Built-in upgrade catalogue at level 0.
    pub fn create_upgrades() -> Vec<Upgrade> {
        vec![
            Upgrade::new(
                UpgradeId::ClickPower,
                "Click Power",
                "More coins per click",
                10.0,
                1.0,
                0.0,
                "MousePointer",
            ),
            Upgrade::new(
                UpgradeId::AutoClicker,
                "Auto Collector",
                "Earns coins every second",
                50.0,
                1.0,
                30.0,
                "Timer",
            ),
            Upgrade::new(
                UpgradeId::ClickMultiplier,
                "Click Multiplier",
                "Multiplies coins per click",
                250.0,
                0.2,
                150.0,
                "Plus",
            ),
            Upgrade::new(
                UpgradeId::AsteroidMiner,
                "Asteroid Miner",
                "Mines resources from asteroids",
                1_000.0,
                5.0,
                500.0,
                "Pickaxe",
            ),
            Upgrade::new(
                UpgradeId::SpaceStation,
                "Space Station",
                "A steady stream of coins",
                5_000.0,
                25.0,
                2_500.0,
                "Rocket",
            ),
            Upgrade::new(
                UpgradeId::PlanetaryBase,
                "Planetary Base",
                "Founds a mining colony",
                25_000.0,
                100.0,
                10_000.0,
                "Globe",
            ),
        ]
    }

    /// Built-in achievement catalogue, all locked.
    pub fn create_achievements() -> Vec<Achievement> {
        use AchievementCondition::*;
        vec![
            Achievement::new(
                "firstClick",
                "First Contact",
                "Make your first click",
                TotalCoinsAtLeast { threshold: 1.0 },
                5.0,
                "Hand",
            ),
            Achievement::new(
                "richBeginner",
                "Seed Capital",
                "Earn 100 coins",
                TotalCoinsAtLeast { threshold: 100.0 },
                20.0,
                "Wallet",
            ),
            Achievement::new(
                "spaceEntrepreneur",
                "Space Entrepreneur",
                "Earn 1,000 coins",
                TotalCoinsAtLeast { threshold: 1_000.0 },
                100.0,
                "TrendingUp",
            ),
            Achievement::new(
                "clickMaster",
                "Click Master",
                "Raise Click Power to level 10",
                UpgradeLevel {
                    upgrade: UpgradeId::ClickPower,
                    level: 10,
                },
                50.0,
                "MousePointer",
            ),
            Achievement::new(
                "autoIncome",
                "Passive Income",
                "Reach 100 coins per second",
                CoinsPerSecondAtLeast { threshold: 100.0 },
                200.0,
                "Clock",
            ),
            Achievement::new(
                "spaceIndustry",
                "Space Industry",
                "Earn 100,000 coins",
                TotalCoinsAtLeast {
                    threshold: 100_000.0,
                },
                1_000.0,
                "BarChart",
            ),
        ]
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Number of unlocked achievements.
    pub fn unlocked_achievement_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Credit earnings to both the balance and the lifetime counter.
    pub(crate) fn earn(&mut self, amount: f64) {
        self.coins += amount;
        self.total_coins += amount;
    }
}
