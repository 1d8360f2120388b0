//! Core library for the ticker-arbitrage project.
//!
//! One cycle flows collector → reconciler → arbitrage detector → notifier;
//! `aggregator` wires the stages together and repeats them on a fixed interval.

pub mod aggregator;
pub mod arbitrage;
pub mod collector;
pub mod config;
pub mod errors;
pub mod models;
pub mod notifier;
pub mod reconciler;
pub mod utils;
