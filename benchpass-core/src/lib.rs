//! Result-set model and speedup statistics for the benchpass workbench.
//!
//! Loads producer JSON documents, pairs baseline and with-pass timings by
//! benchmark name, and aggregates the resulting speedups into geometric and
//! arithmetic means with an overall verdict.

pub mod compare;
pub mod error;
pub mod results;
pub mod stats;

pub use compare::{Comparison, ComparisonSummary, SpeedupRow};
pub use error::{CompareError, CompareResult};
pub use results::ResultSet;
pub use stats::{arithmetic_mean, geometric_mean, Verdict};
