//! Command implementations for the canary CLI

pub mod completions;
pub mod helpers;
pub mod matrix;
pub mod run;
pub mod version;
