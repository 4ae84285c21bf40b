//! benchpass CLI - benchmark comparison and precise native timing

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use benchpass_cli::config::ConfigManager;
use benchpass_cli::measure;
use benchpass_core::{Comparison, ResultSet};

/// Benchmark comparison and precise native timing workbench
#[derive(Parser)]
#[command(name = "benchpass")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two benchmark result files and report speedups
    Compare {
        /// Baseline results (JSON)
        baseline: PathBuf,

        /// With-pass results (JSON)
        with_pass: PathBuf,
    },

    /// Run a benchmark executable repeatedly and emit timing protocol lines
    Measure {
        /// Number of iterations (defaults to the configured value)
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        iterations: Option<u32>,

        /// Benchmark executable to run
        #[arg(last = true)]
        bench: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<Level>()
        .context("invalid log level")?;
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Compare {
            baseline,
            with_pass,
        } => run_compare(&baseline, &with_pass),
        Commands::Measure { iterations, bench } => run_measure(iterations, &bench),
    }
}

fn run_compare(baseline: &Path, with_pass: &Path) -> Result<()> {
    let baseline_set = ResultSet::from_path(baseline)
        .with_context(|| format!("failed to load baseline results {}", baseline.display()))?;
    let pass_set = ResultSet::from_path(with_pass)
        .with_context(|| format!("failed to load with-pass results {}", with_pass.display()))?;

    let comparison = Comparison::between(&baseline_set, &pass_set);

    let stdout = std::io::stdout();
    comparison
        .render(
            &baseline.display().to_string(),
            &with_pass.display().to_string(),
            &mut stdout.lock(),
        )
        .context("failed to write comparison report")?;

    Ok(())
}

fn run_measure(iterations: Option<u32>, bench: &str) -> Result<()> {
    let iterations = match iterations {
        Some(count) => count,
        None => {
            let manager = ConfigManager::load().context("failed to load configuration")?;
            manager.config().measure.iterations
        }
    };

    let stdout = std::io::stdout();
    let outcome = measure::run_loop(bench, iterations, &mut stdout.lock())?;

    if !outcome.success() {
        std::process::exit(1);
    }
    Ok(())
}
