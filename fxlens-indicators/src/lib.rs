#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Technical indicators, summary statistics, and signal classification for FX rate series.

/// Multi-pair comparison helpers.
pub mod comparison;
/// Foundational traits and shared abstractions.
pub mod core;
/// Full-series indicator computation.
pub mod engine;
/// Streaming indicator building blocks.
pub mod indicators;
/// Threshold classification of oscillator readings.
pub mod signals;
/// Whole-sample descriptive statistics.
pub mod stats;
/// Aggregate statistics over an indicator series.
pub mod summary;

pub use crate::comparison::{compare, Comparison, CorrelationMatrix, PairMetrics};
/// Re-export of the core traits and error type to make the crate easy to consume.
pub use crate::core::{Indicator, IndicatorError, Input};
pub use crate::engine::{compute, IndicatorEngine, IndicatorRow, IndicatorSeries};
pub use crate::signals::{classify, Signal, SignalLabel, SignalSource};
pub use crate::summary::{summarize, Summary, TrendDirection};
