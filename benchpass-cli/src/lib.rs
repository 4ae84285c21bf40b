//! benchpass CLI library surface.
//!
//! The [`harness`] module is the plugin contract consumed by an external
//! benchmark-running framework; [`measure`] and [`config`] back the binary's
//! subcommands and are exposed here for integration tests.

pub mod config;
pub mod harness;
pub mod measure;

pub use harness::{build_benchmark_cmd, decode_results, parse_target_args, TargetArgs};
