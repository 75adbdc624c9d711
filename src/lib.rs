//! Personal stock investment tracker: owner-scoped investment records over
//! HTTP plus profit/loss metrics against daily market quotes.

pub mod api;
pub mod config;
pub mod error;
pub mod investments;
pub mod metrics;
pub mod persistence;
pub mod portfolio;
pub mod quotes;
pub mod types;
