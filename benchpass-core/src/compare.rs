//! Pairing of baseline and with-pass result sets into a speedup report.

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};
use crate::results::ResultSet;
use crate::stats::{arithmetic_mean, geometric_mean, Verdict};

const MAJOR_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const MINOR_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────";

/// One matched benchmark pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedupRow {
    pub name: String,
    pub baseline_ms: f64,
    pub pass_ms: f64,
    /// Baseline time divided by with-pass time; above 1.0 is an improvement.
    pub speedup: f64,
    pub percent_change: f64,
}

/// Result of pairing two result sets, in sorted benchmark name order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comparison {
    pub rows: Vec<SpeedupRow>,
}

/// Serializable summary written by [`Comparison::save_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub rows: Vec<SpeedupRow>,
    pub geometric_mean: Option<f64>,
    pub arithmetic_mean: Option<f64>,
    pub verdict: Option<Verdict>,
}

impl Comparison {
    /// Pair up benchmarks present in both sets.
    ///
    /// Names present in only one set are skipped, as are entries whose
    /// with-pass time is zero or negative.
    #[must_use]
    pub fn between(baseline: &ResultSet, with_pass: &ResultSet) -> Self {
        let mut rows = Vec::new();
        for (name, baseline_ms) in baseline.iter() {
            let Some(pass_ms) = with_pass.get(name) else {
                continue;
            };
            if pass_ms <= 0.0 {
                continue;
            }
            rows.push(SpeedupRow {
                name: name.to_string(),
                baseline_ms,
                pass_ms,
                speedup: baseline_ms / pass_ms,
                percent_change: (pass_ms - baseline_ms) / baseline_ms * 100.0,
            });
        }
        Self { rows }
    }

    /// Speedup ratios for all compared benchmarks.
    #[must_use]
    pub fn speedups(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.speedup).collect()
    }

    /// Geometric mean speedup, `None` when no benchmarks were compared.
    #[must_use]
    pub fn geometric_mean(&self) -> Option<f64> {
        geometric_mean(&self.speedups())
    }

    /// Arithmetic mean speedup, `None` when no benchmarks were compared.
    #[must_use]
    pub fn arithmetic_mean(&self) -> Option<f64> {
        arithmetic_mean(&self.speedups())
    }

    /// Overall verdict, `None` when no benchmarks were compared.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.geometric_mean().map(Verdict::from_geometric_mean)
    }

    /// Build the serializable summary of this comparison.
    #[must_use]
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            rows: self.rows.clone(),
            geometric_mean: self.geometric_mean(),
            arithmetic_mean: self.arithmetic_mean(),
            verdict: self.verdict(),
        }
    }

    /// Write the summary as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> CompareResult<()> {
        let json = serde_json::to_string_pretty(&self.summary())?;
        std::fs::write(path, json).map_err(|source| CompareError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render the human-readable speedup report.
    ///
    /// `baseline_label` and `pass_label` echo where the raw results live,
    /// usually the two input file paths.
    pub fn render<W: Write>(
        &self,
        baseline_label: &str,
        pass_label: &str,
        writer: &mut W,
    ) -> io::Result<()> {
        writeln!(writer, "{MAJOR_RULE}")?;
        writeln!(writer, "Benchmark Comparison: baseline vs with-pass")?;
        writeln!(writer, "{MAJOR_RULE}")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "{:<20} {:<15} {:<15} {:<10} {}",
            "Benchmark", "Baseline (ms)", "With Pass (ms)", "Speedup", "% Change"
        )?;
        writeln!(writer, "{MINOR_RULE}")?;

        for row in &self.rows {
            writeln!(
                writer,
                "{:<20} {:<15.2} {:<15.2} {:<10.3} {:>+7.2}%",
                row.name, row.baseline_ms, row.pass_ms, row.speedup, row.percent_change
            )?;
        }

        writeln!(writer, "{MINOR_RULE}")?;

        match (self.geometric_mean(), self.arithmetic_mean()) {
            (Some(geomean), Some(mean)) => {
                writeln!(writer)?;
                writeln!(writer, "Geometric Mean Speedup: {geomean:.3}x")?;
                writeln!(writer, "Arithmetic Mean Speedup: {mean:.3}x")?;
                writeln!(writer)?;
                match Verdict::from_geometric_mean(geomean) {
                    Verdict::Improved => writeln!(
                        writer,
                        "Pass IMPROVED performance by {:.2}%",
                        (geomean - 1.0) * 100.0
                    )?,
                    Verdict::Degraded => writeln!(
                        writer,
                        "Pass DEGRADED performance by {:.2}%",
                        (1.0 - geomean) * 100.0
                    )?,
                    Verdict::NoEffect => writeln!(writer, "Pass had NO EFFECT on performance")?,
                }
            }
            _ => {
                writeln!(writer)?;
                writeln!(writer, "No valid benchmark comparisons found!")?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "Raw results saved in:")?;
        writeln!(writer, "  Baseline: {baseline_label}")?;
        writeln!(writer, "  With Pass: {pass_label}")?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn result_set(entries: &[(&str, f64)]) -> ResultSet {
        let mut set = ResultSet::new();
        for (name, millis) in entries {
            set.insert(*name, *millis);
        }
        set
    }

    fn rendered(comparison: &Comparison) -> String {
        let mut buffer = Vec::new();
        comparison
            .render("baseline.json", "with_pass.json", &mut buffer)
            .expect("render to buffer");
        String::from_utf8(buffer).expect("report is UTF-8")
    }

    #[test]
    fn speedup_and_percent_change_follow_definitions() {
        let baseline = result_set(&[("crc32", 12.0)]);
        let with_pass = result_set(&[("crc32", 6.0)]);

        let comparison = Comparison::between(&baseline, &with_pass);
        assert_eq!(comparison.rows.len(), 1);
        let row = &comparison.rows[0];
        assert!((row.speedup - 2.0).abs() < EPSILON);
        assert!((row.percent_change - -50.0).abs() < EPSILON);
    }

    #[test]
    fn unmatched_names_are_silently_skipped() {
        let baseline = result_set(&[("crc32", 12.0), ("baseline-only", 3.0)]);
        let with_pass = result_set(&[("crc32", 6.0), ("pass-only", 4.0)]);

        let comparison = Comparison::between(&baseline, &with_pass);
        assert_eq!(comparison.rows.len(), 1);
        assert_eq!(comparison.rows[0].name, "crc32");
    }

    #[test]
    fn nonpositive_pass_times_are_skipped() {
        let baseline = result_set(&[("zeroed", 12.0), ("negative", 9.0)]);
        let with_pass = result_set(&[("zeroed", 0.0), ("negative", -1.0)]);

        let comparison = Comparison::between(&baseline, &with_pass);
        assert!(comparison.rows.is_empty());
    }

    #[test]
    fn rows_follow_sorted_baseline_order() {
        let baseline = result_set(&[("zeta", 10.0), ("alpha", 10.0)]);
        let with_pass = result_set(&[("zeta", 5.0), ("alpha", 5.0)]);

        let comparison = Comparison::between(&baseline, &with_pass);
        let names: Vec<&str> = comparison.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn improved_report_carries_means_and_verdict() {
        let baseline = result_set(&[("crc32", 12.0), ("matmult", 30.0)]);
        let with_pass = result_set(&[("crc32", 6.0), ("matmult", 15.0)]);

        let comparison = Comparison::between(&baseline, &with_pass);
        let geomean = comparison.geometric_mean().expect("two rows");
        assert!((geomean - 2.0).abs() < EPSILON);

        let report = rendered(&comparison);
        assert!(report.contains("Geometric Mean Speedup: 2.000x"));
        assert!(report.contains("Arithmetic Mean Speedup: 2.000x"));
        assert!(report.contains("Pass IMPROVED performance by 100.00%"));
        assert!(report.contains("  Baseline: baseline.json"));
    }

    #[test]
    fn degraded_report_names_the_slowdown() {
        let baseline = result_set(&[("crc32", 10.0)]);
        let with_pass = result_set(&[("crc32", 20.0)]);

        let report = rendered(&Comparison::between(&baseline, &with_pass));
        assert!(report.contains("Pass DEGRADED performance by 50.00%"));
    }

    #[test]
    fn empty_comparison_prints_explicit_message() {
        let comparison = Comparison::between(&ResultSet::new(), &ResultSet::new());

        let report = rendered(&comparison);
        assert!(report.contains("No valid benchmark comparisons found!"));
        assert!(!report.contains("Geometric Mean Speedup"));
    }

    #[test]
    fn summary_mirrors_computed_aggregates() {
        let baseline = result_set(&[("crc32", 12.0)]);
        let with_pass = result_set(&[("crc32", 6.0)]);

        let summary = Comparison::between(&baseline, &with_pass).summary();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.verdict, Some(Verdict::Improved));
        assert!((summary.geometric_mean.expect("one row") - 2.0).abs() < EPSILON);
    }
}
