//! Cosmic Clicker セーブ/ロード機能。
//!
//! ## フォーマット
//!
//! スナップショットは GameState をそのまま写した 1 つの JSON オブジェクト
//! (フィールド名は camelCase)。実績の条件 (condition) はデータとして保存せず、
//! ロード時に組み込みカタログから id で照合して `unlocked` だけを復元する。
//! アップグレードも同様に id で照合し、`level` と `unlocked` を復元、
//! `cost` は `baseCost` と `level` から再計算する。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//! - `version` を持たないスナップショットは Web 版が書いた形式とみなし、バージョン 1 として読む。
//!
//! 未知のフィールドと未知の id は無視し、不足フィールドはデフォルト値で補完する。

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::state::{cost_at_level, GameState};
use crate::error::SaveError;
use crate::store::SaveStore;

/// セーブデータのフォーマットバージョン。
const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// `version` フィールドが無いスナップショットのバージョン。
const LEGACY_VERSION: u32 = 1;

/// ストレージのキー。
pub const SAVE_KEY: &str = "cosmic-clicker-save";

fn legacy_version() -> u32 {
    LEGACY_VERSION
}

/// シリアライズ用のセーブデータ構造体。GameState と 1 対 1 に対応する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SaveData {
    #[serde(default = "legacy_version")]
    version: u32,
    coins: f64,
    total_coins: f64,
    coins_per_click: f64,
    coins_per_second: f64,
    last_played: i64,
    offline_progress: bool,
    achievements: Vec<AchievementSave>,
    upgrades: Vec<UpgradeSave>,
    prestige_level: u32,
    prestige_multiplier: f64,
    daily_reward_claimed: bool,
    daily_reward_last: i64,
}

impl Default for SaveData {
    /// 不足フィールドは新規ゲームの値で補完する。
    fn default() -> Self {
        extract_save(&GameState::new(0))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UpgradeSave {
    id: String,
    name: String,
    description: String,
    base_cost: f64,
    cost: f64,
    level: u32,
    effect: f64,
    unlock_coins: f64,
    unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_level: Option<u32>,
    icon: String,
}

/// 条件 (condition) は保存しない。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AchievementSave {
    id: String,
    name: String,
    description: String,
    reward: f64,
    icon: String,
    unlocked: bool,
}

/// GameState からセーブ用データを抽出する。
fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        coins: state.coins,
        total_coins: state.total_coins,
        coins_per_click: state.coins_per_click,
        coins_per_second: state.coins_per_second,
        last_played: state.last_played,
        offline_progress: state.offline_progress,
        achievements: state
            .achievements
            .iter()
            .map(|a| AchievementSave {
                id: a.id.clone(),
                name: a.name.clone(),
                description: a.description.clone(),
                reward: a.reward,
                icon: a.icon.clone(),
                unlocked: a.unlocked,
            })
            .collect(),
        upgrades: state
            .upgrades
            .iter()
            .map(|u| UpgradeSave {
                id: u.id.key().to_string(),
                name: u.name.clone(),
                description: u.description.clone(),
                base_cost: u.base_cost,
                cost: u.cost,
                level: u.level,
                effect: u.effect,
                unlock_coins: u.unlock_coins,
                unlocked: u.unlocked,
                max_level: u.max_level,
                icon: u.icon.clone(),
            })
            .collect(),
        prestige_level: state.prestige_level,
        prestige_multiplier: state.prestige_multiplier,
        daily_reward_claimed: state.daily_reward_claimed,
        daily_reward_last: state.daily_reward_last,
    }
}

/// 数値が GameState の不変条件を満たすか確認する。満たさなければ理由を返す。
/// ロード時だけでなく書き込み前にも通し、読めないスナップショットは書かない。
fn validate(save: &SaveData) -> Result<(), &'static str> {
    let non_negative = [
        save.coins,
        save.total_coins,
        save.coins_per_second,
    ];
    if non_negative.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("negative or non-finite balance");
    }
    if !save.coins_per_click.is_finite() || save.coins_per_click < 1.0 {
        return Err("coinsPerClick below 1");
    }
    if !save.prestige_multiplier.is_finite() || save.prestige_multiplier < 1.0 {
        return Err("prestigeMultiplier below 1");
    }
    // 日付計算できない時刻は経過時間の引き算や日付比較を壊す。
    if [save.last_played, save.daily_reward_last]
        .iter()
        .any(|ms| DateTime::from_timestamp_millis(*ms).is_none())
    {
        return Err("timestamp out of range");
    }
    // レベルはカタログの基本コストで価格が有限になる範囲に限る。
    let catalogue = GameState::create_upgrades();
    for saved in &save.upgrades {
        let Some(upgrade) = catalogue.iter().find(|u| u.id.key() == saved.id) else {
            continue;
        };
        if !cost_at_level(upgrade.base_cost, saved.level).is_finite() {
            return Err("upgrade level out of range");
        }
    }
    Ok(())
}

/// セーブデータから GameState を復元する。
/// カタログに無い id は無視し、カタログ側の定義 (名前・基本コスト等) を優先する。
fn apply_save(save: &SaveData) -> GameState {
    let mut state = GameState::new(save.last_played);
    state.coins = save.coins;
    state.total_coins = save.total_coins;
    state.coins_per_click = save.coins_per_click;
    state.coins_per_second = save.coins_per_second;
    state.offline_progress = save.offline_progress;
    state.prestige_level = save.prestige_level;
    state.prestige_multiplier = save.prestige_multiplier;
    state.daily_reward_claimed = save.daily_reward_claimed;
    state.daily_reward_last = save.daily_reward_last;

    // アップグレード復元
    for saved in &save.upgrades {
        if let Some(u) = state.upgrades.iter_mut().find(|u| u.id.key() == saved.id) {
            u.level = saved.level;
            u.cost = cost_at_level(u.base_cost, u.level);
            u.unlocked |= saved.unlocked;
        } else {
            tracing::debug!(id = %saved.id, "ignoring unknown upgrade in snapshot");
        }
    }

    // 実績復元
    for saved in &save.achievements {
        if let Some(a) = state.achievements.iter_mut().find(|a| a.id == saved.id) {
            a.unlocked = saved.unlocked;
        } else {
            tracing::debug!(id = %saved.id, "ignoring unknown achievement in snapshot");
        }
    }

    state
}

/// GameState を JSON にする。`lastPlayed` は `now_ms` で上書きする。
/// 不変条件を満たさない状態 (無限大の価格など) はエラーにし、書き込まない。
pub fn to_json(state: &GameState, now_ms: i64) -> Result<String, SaveError> {
    let mut save = extract_save(state);
    save.last_played = now_ms;
    validate(&save).map_err(SaveError::Invalid)?;
    Ok(serde_json::to_string(&save)?)
}

/// スナップショットを読み込めなかった理由。
#[derive(Debug, thiserror::Error)]
enum Rejected {
    #[error("unparseable snapshot: {0}")]
    Parse(serde_json::Error),
    #[error("snapshot version {0} is no longer supported")]
    TooOld(u32),
    #[error("snapshot violates invariants: {0}")]
    Invalid(&'static str),
}

fn from_json(json: &str) -> Result<GameState, Rejected> {
    let save: SaveData = serde_json::from_str(json).map_err(Rejected::Parse)?;
    if save.version < MIN_COMPATIBLE_VERSION {
        return Err(Rejected::TooOld(save.version));
    }
    if save.version > SAVE_VERSION {
        tracing::warn!(
            saved = save.version,
            current = SAVE_VERSION,
            "snapshot written by a newer version; unknown fields are ignored"
        );
    }
    validate(&save).map_err(Rejected::Invalid)?;
    Ok(apply_save(&save))
}

/// 固定キー 1 つに対するロード/セーブ/削除。
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: SaveStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, SAVE_KEY)
    }

    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 保存済みスナップショットを読む。無い・読めない・壊れている場合は `None`
    /// を返し、呼び出し側は新規ゲームで始める。壊れたスナップショットは削除する。
    pub fn load(&mut self) -> Option<GameState> {
        let json = match self.store.read(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read save; starting fresh");
                return None;
            }
        };

        match from_json(&json) {
            Ok(state) => {
                tracing::info!(
                    coins = state.coins,
                    total_coins = state.total_coins,
                    "save loaded"
                );
                Some(state)
            }
            Err(rejected) => {
                tracing::warn!(reason = %rejected, "discarding corrupt save; starting fresh");
                if let Err(e) = self.store.remove(&self.key) {
                    tracing::warn!(error = %e, "could not delete corrupt save");
                }
                None
            }
        }
    }

    /// `lastPlayed = now_ms` としてスナップショットを書き込む。後勝ち。
    pub fn save(&mut self, state: &GameState, now_ms: i64) -> Result<(), SaveError> {
        let json = to_json(state, now_ms)?;
        self.store.write(&self.key, &json)?;
        tracing::debug!(bytes = json.len(), "game saved");
        Ok(())
    }

    /// スナップショットを完全に削除する。
    pub fn clear(&mut self) -> Result<(), SaveError> {
        self.store.remove(&self.key)?;
        tracing::info!("save cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::state::UpgradeId;
    use crate::store::MemoryStore;

    fn played_state() -> GameState {
        let mut state = GameState::new(1_000);
        state.coins = 12_345.5;
        state.total_coins = 99_999.0;
        state.coins_per_click = 3.0;
        state.coins_per_second = 31.0;
        state.upgrades[0].level = 4;
        state.upgrades[0].cost = cost_at_level(10.0, 4);
        state.upgrades[1].unlocked = true;
        state.upgrades[1].level = 2;
        state.upgrades[1].cost = cost_at_level(50.0, 2);
        state.achievements[0].unlocked = true;
        state.achievements[1].unlocked = true;
        state.prestige_level = 2;
        state.prestige_multiplier = 1.5;
        state.daily_reward_claimed = true;
        state.daily_reward_last = 900;
        state
    }

    #[test]
    fn extract_and_apply_roundtrip() {
        let original = played_state();
        let json = to_json(&original, 1_000).unwrap();
        let restored = from_json(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn to_json_stamps_last_played() {
        let state = GameState::new(5);
        let json = to_json(&state, 777).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lastPlayed"], 777);
        assert_eq!(value["version"], SAVE_VERSION);
        assert_eq!(value["coinsPerClick"], 1.0);
        assert!(value["achievements"][0].get("condition").is_none());
        assert_eq!(value["upgrades"][0]["id"], "clickPower");
    }

    #[test]
    fn web_snapshot_without_version_loads() {
        // Web 版が書いた形式: version が無く、一部フィールドは省略されている。
        let json = r#"{
            "coins": 500,
            "totalCoins": 1200,
            "coinsPerClick": 2,
            "coinsPerSecond": 6,
            "lastPlayed": 1710072000000,
            "offlineProgress": true,
            "achievements": [
                {"id": "firstClick", "name": "x", "description": "y", "reward": 5, "icon": "Hand", "unlocked": true}
            ],
            "upgrades": [
                {"id": "clickPower", "baseCost": 10, "cost": 11, "level": 1, "effect": 1, "unlockCoins": 0, "unlocked": true},
                {"id": "autoClicker", "baseCost": 50, "cost": 57, "level": 1, "effect": 1, "unlockCoins": 30, "unlocked": true}
            ],
            "prestigeLevel": 0,
            "prestigeMultiplier": 1,
            "dailyRewardClaimed": false,
            "dailyRewardLast": 0
        }"#;
        let state = from_json(json).unwrap();
        assert_eq!(state.coins, 500.0);
        assert_eq!(state.total_coins, 1_200.0);
        assert_eq!(state.last_played, 1_710_072_000_000);
        assert!(state.achievement("firstClick").unwrap().unlocked);
        assert!(!state.achievement("richBeginner").unwrap().unlocked);
        let auto = state.upgrade(UpgradeId::AutoClicker).unwrap();
        assert_eq!(auto.level, 1);
        assert_eq!(auto.cost, 57.0);
        assert!(auto.unlocked);
        // スナップショットに無いアップグレードはカタログの初期値。
        assert_eq!(state.upgrade(UpgradeId::PlanetaryBase).unwrap().level, 0);
    }

    #[test]
    fn missing_fields_take_new_game_defaults() {
        let state = from_json(r#"{"version": 2, "coins": 42}"#).unwrap();
        assert_eq!(state.coins, 42.0);
        assert_eq!(state.coins_per_click, 1.0);
        assert_eq!(state.prestige_multiplier, 1.0);
        assert!(state.offline_progress);
        assert_eq!(state.upgrades.len(), UpgradeId::all().len());
    }

    #[test]
    fn cost_is_recomputed_from_level() {
        let json = r#"{"upgrades": [{"id": "clickPower", "level": 2, "cost": 1}]}"#;
        let state = from_json(json).unwrap();
        assert_eq!(state.upgrade(UpgradeId::ClickPower).unwrap().cost, 13.0);
    }

    #[test]
    fn unknown_ids_and_fields_are_ignored() {
        let json = r#"{
            "coins": 1,
            "futureField": "ignored",
            "upgrades": [{"id": "warpDrive", "level": 3}],
            "achievements": [{"id": "galaxyBrain", "unlocked": true}]
        }"#;
        let state = from_json(json).unwrap();
        assert_eq!(state.coins, 1.0);
        assert_eq!(state.unlocked_achievement_count(), 0);
    }

    #[test]
    fn saved_unlock_cannot_relock_catalogue_default() {
        let json = r#"{"upgrades": [{"id": "clickPower", "unlocked": false}]}"#;
        let state = from_json(json).unwrap();
        assert!(state.upgrade(UpgradeId::ClickPower).unwrap().unlocked);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(from_json("not json"), Err(Rejected::Parse(_))));
        assert!(matches!(from_json(r#"{"coins": "lots"}"#), Err(Rejected::Parse(_))));
    }

    #[test]
    fn version_below_min_compatible_is_rejected() {
        assert!(matches!(
            from_json(r#"{"version": 0}"#),
            Err(Rejected::TooOld(0))
        ));
    }

    #[test]
    fn invariant_violations_are_rejected() {
        assert!(matches!(from_json(r#"{"coins": -5}"#), Err(Rejected::Invalid(_))));
        assert!(matches!(
            from_json(r#"{"coinsPerClick": 0}"#),
            Err(Rejected::Invalid(_))
        ));
        assert!(matches!(
            from_json(r#"{"prestigeMultiplier": 0.5}"#),
            Err(Rejected::Invalid(_))
        ));
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        // u32::MAX は価格が無限大になる
        assert!(matches!(
            from_json(r#"{"coins": 100, "upgrades": [{"id": "clickPower", "level": 4294967295}]}"#),
            Err(Rejected::Invalid(_))
        ));
        assert!(matches!(
            from_json(r#"{"upgrades": [{"id": "asteroidMiner", "level": 6000}]}"#),
            Err(Rejected::Invalid(_))
        ));
        // 未知の id はレベルに関係なく無視する
        assert!(from_json(r#"{"upgrades": [{"id": "warpDrive", "level": 4294967295}]}"#).is_ok());
    }

    #[test]
    fn extreme_timestamps_are_rejected() {
        assert!(matches!(
            from_json(r#"{"lastPlayed": -9223372036854775808, "coinsPerSecond": 1}"#),
            Err(Rejected::Invalid(_))
        ));
        assert!(matches!(
            from_json(r#"{"dailyRewardLast": 9223372036854775807}"#),
            Err(Rejected::Invalid(_))
        ));
    }

    #[test]
    fn infinite_cost_is_never_written() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let good = played_state();
        persistence.save(&good, 1_000).unwrap();

        let mut broken = good.clone();
        broken.upgrades[0].level = 6_000;
        broken.upgrades[0].cost = cost_at_level(10.0, 6_000);
        assert!(broken.upgrades[0].cost.is_infinite());
        assert!(matches!(
            persistence.save(&broken, 2_000),
            Err(SaveError::Invalid(_))
        ));

        // 直前の正常なスナップショットが残る
        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.last_played, 1_000);
        assert_eq!(loaded.upgrades[0].level, 4);
    }

    #[test]
    fn persistence_save_load_clear() {
        let mut persistence = Persistence::new(MemoryStore::new());
        assert!(persistence.load().is_none());

        let state = played_state();
        persistence.save(&state, 2_000).unwrap();
        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.last_played, 2_000);
        assert_eq!(loaded.coins, state.coins);

        persistence.clear().unwrap();
        assert!(persistence.load().is_none());
    }

    #[test]
    fn persistence_discards_corrupt_snapshot() {
        let mut store = MemoryStore::new();
        store.write(SAVE_KEY, "{broken").unwrap();
        let mut persistence = Persistence::new(store);
        assert!(persistence.load().is_none());
        assert_eq!(persistence.store().read(SAVE_KEY).unwrap(), None);
    }

    #[test]
    fn persistence_last_write_wins() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let mut state = GameState::new(0);
        state.coins = 1.0;
        persistence.save(&state, 10).unwrap();
        state.coins = 2.0;
        persistence.save(&state, 20).unwrap();
        assert_eq!(persistence.load().unwrap().coins, 2.0);
    }
}
