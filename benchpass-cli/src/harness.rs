//! Native timing harness consumed by an external benchmark-running framework.
//!
//! The framework hands over its leftover command-line arguments, asks for a
//! runnable command per benchmark, and later passes the captured output back
//! to be decoded into a milliseconds value. Decoding never raises: anything
//! that cannot be parsed degrades to the 0.0 sentinel, which callers must
//! read as "could not determine timing", never as a zero-duration run.

use std::ffi::OsString;
use std::path::MAIN_SEPARATOR;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use tracing::debug;

/// Default number of iterations per benchmark.
pub const DEFAULT_ITERATIONS: u32 = 100;

/// Smallest reportable elapsed time in milliseconds. Successful runs are
/// clamped to this floor so they can never collide with the 0.0 sentinel.
pub const MIN_ELAPSED_MS: f64 = 0.0001;

/// Program the built command invokes; the framework's shell resolves it on
/// `PATH`, the same way the measurement loop's interpreter would be.
pub const MEASURE_PROGRAM: &str = "benchpass";

static RET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^RET=(\d+)").expect("return-code pattern compiles"));
static TIME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^TIME=([\d.]+)").expect("timing pattern compiles"));

/// Target-specific arguments parsed from the framework's leftover list.
#[derive(Parser, Debug, Clone)]
#[command(name = "benchpass-target", no_binary_name = true)]
pub struct TargetArgs {
    /// Number of iterations to run each benchmark
    #[arg(
        long,
        default_value_t = DEFAULT_ITERATIONS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub iterations: u32,
}

/// Parse the leftover argument list the framework did not recognize itself.
pub fn parse_target_args<I, T>(remnant: I) -> Result<TargetArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    TargetArgs::try_parse_from(remnant).context("failed to parse target arguments")
}

/// Construct the command that measures `bench`.
///
/// The returned argument vector invokes the `benchpass measure` loop, which
/// runs the target for the configured iteration count, timing each
/// invocation, and prints the `TIME=`/`RET=` protocol lines on stdout.
/// A bare benchmark name is resolved against the working directory, not
/// `PATH`.
#[must_use]
pub fn build_benchmark_cmd(bench: &str, args: &TargetArgs) -> Vec<String> {
    let target = if bench.contains(MAIN_SEPARATOR) {
        bench.to_string()
    } else {
        format!("./{bench}")
    };

    vec![
        MEASURE_PROGRAM.to_string(),
        "measure".to_string(),
        "--iterations".to_string(),
        args.iterations.to_string(),
        "--".to_string(),
        target,
    ]
}

/// Extract the elapsed time in milliseconds from a measurement run's
/// captured output, or 0.0 if the run failed.
///
/// Only stdout carries protocol lines; stderr is accepted for interface
/// parity and ignored. The result is clamped to [`MIN_ELAPSED_MS`] so a
/// genuinely fast run is never misread as the failure sentinel.
#[must_use]
pub fn decode_results(stdout_str: &str, _stderr_str: &str) -> f64 {
    let Some(ret) = RET_LINE.captures(stdout_str) else {
        debug!("failed to find return code in benchmark output");
        return 0.0;
    };

    let return_code = match ret[1].parse::<i64>() {
        Ok(code) => code,
        Err(_) => {
            debug!("malformed return code in benchmark output");
            return 0.0;
        }
    };
    if return_code != 0 {
        debug!("benchmark returned non-zero exit code: {return_code}");
        return 0.0;
    }

    let Some(time) = TIME_LINE.captures(stdout_str) else {
        debug!("failed to find timing in benchmark output");
        return 0.0;
    };

    match time[1].parse::<f64>() {
        Ok(seconds) => (seconds * 1000.0).max(MIN_ELAPSED_MS),
        Err(_) => {
            debug!("malformed timing value in benchmark output");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn decodes_successful_run_into_milliseconds() {
        let elapsed = decode_results("RET=0\nTIME=0.002500000\n", "");
        assert!((elapsed - 2.5).abs() < EPSILON);
    }

    #[test]
    fn decodes_protocol_lines_in_either_order() {
        let elapsed = decode_results("TIME=0.002500000\nRET=0\n", "");
        assert!((elapsed - 2.5).abs() < EPSILON);
    }

    #[test]
    fn non_zero_return_code_is_the_sentinel() {
        assert_eq!(decode_results("RET=1\n", ""), 0.0);
    }

    #[test]
    fn missing_return_code_is_the_sentinel() {
        assert_eq!(decode_results("TIME=0.002500000\n", ""), 0.0);
    }

    #[test]
    fn missing_timing_is_the_sentinel() {
        assert_eq!(decode_results("RET=0\n", ""), 0.0);
    }

    #[test]
    fn malformed_timing_is_the_sentinel() {
        assert_eq!(decode_results("RET=0\nTIME=1.2.3\n", ""), 0.0);
    }

    #[test]
    fn fast_runs_are_clamped_above_the_sentinel() {
        let elapsed = decode_results("RET=0\nTIME=0.000000050\n", "");
        assert_eq!(elapsed, MIN_ELAPSED_MS);
    }

    #[test]
    fn protocol_lines_must_be_line_anchored() {
        assert_eq!(decode_results("NOTRET=0\nNOTTIME=0.5\n", ""), 0.0);
    }

    #[test]
    fn target_args_default_to_one_hundred_iterations() {
        let args = parse_target_args::<_, &str>([]).expect("empty remnant parses");
        assert_eq!(args.iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn target_args_accept_an_iteration_count() {
        let args = parse_target_args(["--iterations", "5"]).expect("remnant parses");
        assert_eq!(args.iterations, 5);
    }

    #[test]
    fn unknown_target_args_are_rejected() {
        assert!(parse_target_args(["--wattage", "900"]).is_err());
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(parse_target_args(["--iterations", "0"]).is_err());
    }

    #[test]
    fn built_command_wraps_the_measure_loop() {
        let args = parse_target_args(["--iterations", "5"]).expect("remnant parses");
        let cmd = build_benchmark_cmd("crc32", &args);
        assert_eq!(
            cmd,
            vec!["benchpass", "measure", "--iterations", "5", "--", "./crc32"]
        );
    }

    #[test]
    fn built_command_keeps_explicit_paths() {
        let args = parse_target_args::<_, &str>([]).expect("empty remnant parses");
        let cmd = build_benchmark_cmd("/opt/bench/crc32", &args);
        assert_eq!(cmd.last().map(String::as_str), Some("/opt/bench/crc32"));
    }
}
