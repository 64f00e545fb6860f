//! Error types for the progression engine, persistence and driver.
//!
//! Engine errors are "typed no-ops": an operation that returns `Err` has
//! left the game state exactly as it found it.

use crate::clicker::state::UpgradeId;

/// Why an upgrade purchase was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    /// The id does not name any upgrade in the catalogue.
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),

    /// The balance does not cover the current price.
    #[error("not enough coins for {upgrade}: need {cost}, have {coins}")]
    InsufficientCoins {
        /// Upgrade the player tried to buy.
        upgrade: UpgradeId,
        /// Current price.
        cost: f64,
        /// Spendable balance at the time of the attempt.
        coins: f64,
    },

    /// The upgrade already sits at its level cap.
    #[error("{upgrade} is already at max level {max_level}")]
    MaxLevel {
        /// Capped upgrade.
        upgrade: UpgradeId,
        /// Its cap.
        max_level: u32,
    },
}

/// Why the daily reward could not be claimed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DailyRewardError {
    /// Already claimed during the current calendar day.
    #[error("daily reward already claimed today")]
    AlreadyClaimed,
}

/// Outcome of invoking prestige.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrestigeError {
    /// Prestige is declared but not available in this version.
    #[error("prestige is not implemented yet")]
    NotImplemented,
}

/// Errors raised while reading or writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Filesystem failure in a file-backed store.
    #[error("save storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing store is missing or refused the operation.
    #[error("save storage unavailable: {0}")]
    Unavailable(String),

    /// The state holds values a snapshot cannot represent (e.g. an
    /// infinite price); nothing was written.
    #[error("refusing to write an invalid snapshot: {0}")]
    Invalid(&'static str),
}

/// Errors that can occur when loading the driver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A line of driver input that is not a known command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    /// Blank line.
    #[error("empty command")]
    Empty,

    /// First word is not a command name.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// A command that needs an argument got none.
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// An argument could not be parsed.
    #[error("invalid argument for `{command}`: {value}")]
    InvalidArgument {
        /// Command name.
        command: &'static str,
        /// Offending text.
        value: String,
    },
}
