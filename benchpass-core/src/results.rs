//! Benchmark result sets loaded from producer JSON documents.
//!
//! Two producer formats exist in the wild: a flat mapping under a top-level
//! `"benchmarks"` key, and the same mapping nested under `"speed results"` ->
//! `"detailed speed results"`. Both are accepted; the flat key wins whenever
//! it holds at least one entry.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{CompareError, CompareResult};

/// Mapping from benchmark name to elapsed time in milliseconds.
///
/// Iteration is in sorted name order, which the comparison report relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    times: BTreeMap<String, f64>,
}

impl ResultSet {
    /// Create an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a result set from a JSON document on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CompareResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CompareError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&contents).map_err(|source| CompareError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_document(&document))
    }

    /// Extract the results mapping from a parsed producer document.
    ///
    /// A document with neither recognized key, or with only non-numeric
    /// entries, yields an empty set rather than an error.
    #[must_use]
    pub fn from_document(document: &Value) -> Self {
        let direct = collect_times(document.get("benchmarks"));
        if !direct.is_empty() {
            return Self { times: direct };
        }

        let nested = document
            .get("speed results")
            .and_then(|section| section.get("detailed speed results"));
        Self {
            times: collect_times(nested),
        }
    }

    /// Record an elapsed time for a benchmark.
    pub fn insert(&mut self, name: impl Into<String>, millis: f64) {
        self.times.insert(name.into(), millis);
    }

    /// Elapsed time for a benchmark, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.times.get(name).copied()
    }

    /// Number of benchmarks in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the set holds no benchmarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(name, millis)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.times.iter().map(|(name, millis)| (name.as_str(), *millis))
    }
}

fn collect_times(value: Option<&Value>) -> BTreeMap<String, f64> {
    let mut times = BTreeMap::new();
    if let Some(Value::Object(entries)) = value {
        for (name, entry) in entries {
            if let Some(millis) = entry.as_f64() {
                times.insert(name.clone(), millis);
            }
        }
    }
    times
}
