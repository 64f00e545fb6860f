//! Idle "clicker" progression engine with a persistence adapter and a
//! single-threaded session driver.

pub mod clicker;
pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod session;
pub mod store;
pub mod time;
