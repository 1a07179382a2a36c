//! # splitbench
//!
//! Interleaved two-file append benchmark.
//!
//! Each of N writes appends `test-data\n` to one of two files. The
//! destination comes from comparing a randomly permuted identifier in
//! `1..=N` against `N × percentage / 100`. Every write is flushed before
//! its timer stops, and the mean per-write latency is reported as
//! `<mean> ns/op`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use splitbench::{BenchConfig, ConsoleReporter};
//!
//! let config = BenchConfig::from_env(25)?
//!     .configured_path("/tmp/conf.txt")
//!     .vanilla_path("/tmp/van.txt");
//!
//! let result = splitbench::run(config, &ConsoleReporter::new())?;
//! assert_eq!(result.configured_writes + result.vanilla_writes, result.total);
//! # Ok::<(), splitbench::Error>(())
//! ```
//!
//! ## Features
//!
//! - **`hdr`**: Enable HDR histogram for latency percentiles

mod config;
mod context;
mod error;
mod report;
mod result;
mod runner;
mod sequence;
mod split;
mod target;

pub use config::{
    BenchConfig, DEFAULT_CONFIGURED_PATH, DEFAULT_PAUSE, DEFAULT_TOTAL, DEFAULT_VANILLA_PATH,
};
pub use context::LatencyAccumulator;
pub use error::{Error, Result};
pub use report::{ConsoleReporter, JsonReporter, MultiReporter, Reporter};
pub use result::BenchResult;
pub use runner::{run, InterleavedBench};
pub use sequence::permuted_ids;
pub use split::{Destination, SplitThreshold};
pub use target::{Syncable, TargetFiles, RECORD};

#[cfg(feature = "hdr")]
pub mod histogram;
