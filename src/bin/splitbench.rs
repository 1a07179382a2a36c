//! splitbench: measure per-write latency of interleaved appends to two files.
//!
//! ```text
//! splitbench 30                       # 30% of writes to the configured file
//! splitbench 30 --total 10000 --seed 7
//! splitbench 30 --output-dir target/splitbench -v
//! ```
//!
//! Exactly one line, `<mean> ns/op`, goes to stdout. Everything else goes to
//! stderr.

use anyhow::{Context, Result};
use clap::Parser;
use splitbench::{BenchConfig, MultiReporter};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "splitbench",
    version,
    about = "Measure per-write latency when splitting appends across two files",
    long_about = "
splitbench appends `test-data` lines to two files in random order and
reports the mean per-write latency (write + flush) in nanoseconds.

PERCENT controls the share of writes routed to the configured file.
Settings can also come from SPLITBENCH_* environment variables; flags
take precedence.
"
)]
struct Cli {
    /// Share of writes routed to the configured file (expected 0-100)
    #[arg(allow_negative_numbers = true)]
    percent: i64,

    // ========================================================================
    // Workload
    // ========================================================================
    /// Number of writes
    #[arg(long)]
    total: Option<u64>,

    /// Pause after each write, in microseconds
    #[arg(long)]
    pause_us: Option<u64>,

    /// Seed for a reproducible write order
    #[arg(long)]
    seed: Option<u64>,

    /// Sync each write to disk after flushing
    #[arg(long)]
    sync: bool,

    // ========================================================================
    // Targets
    // ========================================================================
    /// File receiving writes at or below the split threshold
    #[arg(long)]
    configured_path: Option<PathBuf>,

    /// File receiving all other writes
    #[arg(long)]
    vanilla_path: Option<PathBuf>,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Print a summary to stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Output directory for JSON results
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Enable trace-level logging on stderr
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Layer flags over environment-derived settings.
    fn into_config(self) -> Result<BenchConfig> {
        let mut cfg =
            BenchConfig::from_env(self.percent).context("reading SPLITBENCH_* environment")?;

        if let Some(n) = self.total {
            cfg = cfg.total(n);
        }
        if let Some(us) = self.pause_us {
            cfg = cfg.pause(Duration::from_micros(us));
        }
        if let Some(seed) = self.seed {
            cfg = cfg.seed(seed);
        }
        if self.sync {
            cfg = cfg.sync(true);
        }
        if let Some(path) = self.configured_path {
            cfg = cfg.configured_path(path);
        }
        if let Some(path) = self.vanilla_path {
            cfg = cfg.vanilla_path(path);
        }
        if self.verbose {
            cfg = cfg.verbose(true);
        }
        if let Some(dir) = self.output_dir {
            cfg = cfg.output_dir(dir);
        }
        Ok(cfg)
    }
}

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.into_config()?;
    let reporter = MultiReporter::for_config(&config);
    let configured = config.configured_path.clone();
    let vanilla = config.vanilla_path.clone();

    splitbench::run(config, &reporter).with_context(|| {
        format!(
            "benchmark over {} and {} aborted",
            configured.display(),
            vanilla.display()
        )
    })?;
    Ok(())
}
