//! # Trial Harness
//!
//! Runs a batch of games sequentially, aggregates the outcomes, compares the
//! win split against a fair coin, and writes the results out as JSON and a
//! plain-text report.
//!
//! Games run strictly one at a time with a cooldown between them; the point
//! of the harness is a clean sample under rate limits, not throughput.

pub mod binomial;
pub mod runner;
pub mod summary;

pub use binomial::{BinomialComparison, BinomialNull};
pub use runner::{TrialConfig, TrialRunner};
pub use summary::TrialSummary;
