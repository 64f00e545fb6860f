//! Cosmic Clicker progression engine.
//!
//! Pure operations over [`state::GameState`]: each takes the state by
//! mutable reference, applies one rule and reports what changed. Failed
//! operations return `Err` and leave the state untouched. Timers, storage
//! and settling live in [`crate::session`].

pub mod accrual;
pub mod achievements;
pub mod prestige;
pub mod save;
pub mod state;
pub mod upgrades;
