//! Stable Match - stable matchings for two-sided markets
//!
//! This library computes the proposer-optimal stable matching with deferred
//! acceptance, checks arbitrary matchings for blocking pairs, and explores
//! stable matchings one partner exchange away from the solution.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    blocking_pairs, enumerate_stable, enumerate_stable_up_to, is_stable, solve, BlockingPair,
    MalformedPreferenceError, Matching, PreferenceModel, PreferenceTable, Side,
};
pub use models::{Market, MarketFileError, MatchingLimits, SolveRequest, SolveResponse};
