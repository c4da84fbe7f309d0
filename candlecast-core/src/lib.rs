//! Candlecast Core: OHLCV indicator engine and online learners.
//!
//! This crate contains:
//! - Domain types (bars, feature rows)
//! - Causal indicators over bar series, NaN during warm-up
//! - The fixed 24-key feature vocabulary built from those indicators
//! - Learners behind one `Model` trait (linear SGD, residual boosting,
//!   RSI regime routing)
//! - CSV ingestion, synthetic bars, model configuration
//! - The train-then-predict entry point over raw candles

pub mod config;
pub mod data;
pub mod domain;
pub mod features;
pub mod indicators;
pub mod metrics;
pub mod models;
pub mod predict;
