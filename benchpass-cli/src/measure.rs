//! Sequential measurement loop behind the `measure` subcommand.
//!
//! Runs the target executable a fixed number of times, timing each
//! invocation with the monotonic high-resolution clock, and prints the
//! machine-parseable `TIME=`/`RET=` lines the harness decoder consumes.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Outcome of a measurement loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureOutcome {
    /// Exit code reported on the `RET=` line.
    pub return_code: i32,
    /// Average seconds per iteration, when every invocation succeeded.
    pub avg_seconds: Option<f64>,
}

impl MeasureOutcome {
    /// True when every invocation of the target exited successfully.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.return_code == 0
    }
}

/// Run `bench` for `iterations` invocations, writing protocol lines to `out`.
///
/// Protocol lines go to `out` (stdout in production); progress goes to
/// stderr, so the machine-parseable stream stays clean. The loop aborts on
/// the first non-zero exit from the target, printing `RET=<code>` only.
/// The target's own output is discarded for the same reason.
pub fn run_loop<W: Write>(bench: &str, iterations: u32, out: &mut W) -> Result<MeasureOutcome> {
    ensure!(iterations > 0, "iterations must be at least 1");

    let progress = ProgressBar::new(u64::from(iterations));
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
            .context("failed to create progress bar template")?
            .progress_chars("##-"),
    );
    progress.set_message(format!("timing {bench}"));

    let mut total = Duration::ZERO;
    for _ in 0..iterations {
        let start = Instant::now();
        let status = Command::new(bench)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("failed to run benchmark executable '{bench}'"))?;
        let elapsed = start.elapsed();

        if !status.success() {
            // A signal-terminated target has no code; report -1, which the
            // decoder treats as a failed measurement either way.
            let code = status.code().unwrap_or(-1);
            progress.abandon_with_message(format!("{bench} exited with code {code}"));
            writeln!(out, "RET={code}")?;
            return Ok(MeasureOutcome {
                return_code: code,
                avg_seconds: None,
            });
        }

        total += elapsed;
        progress.inc(1);
    }
    progress.finish_with_message("measurement complete");

    let avg = total.as_secs_f64() / f64::from(iterations);
    writeln!(out, "TIME={avg:.9}")?;
    writeln!(out, "RET=0")?;

    Ok(MeasureOutcome {
        return_code: 0,
        avg_seconds: Some(avg),
    })
}
