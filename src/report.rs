//! Pluggable reporters for benchmark output.

use crate::config::BenchConfig;
use crate::result::BenchResult;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Trait for benchmark result reporters.
pub trait Reporter {
    /// Called before the files are opened.
    fn run_start(&self, _config: &BenchConfig) {}

    /// Called once the run completes successfully.
    ///
    /// An error here fails the run.
    fn run_end(&self, _result: &BenchResult) -> io::Result<()> {
        Ok(())
    }
}

/// Console reporter.
///
/// Always prints the `<mean> ns/op` line, to stdout unless redirected with
/// [`with_writer`](Self::with_writer). In verbose mode a
/// framed summary goes to stderr as well.
pub struct ConsoleReporter {
    verbose: bool,
    out: RefCell<Box<dyn Write>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            verbose: false,
            out: RefCell::new(Box::new(io::stdout())),
        }
    }

    /// Send the result line somewhere other than stdout.
    pub fn with_writer(mut self, out: impl Write + 'static) -> Self {
        self.out = RefCell::new(Box::new(out));
        self
    }

    /// Print the stderr summary.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn format_duration(d: std::time::Duration) -> String {
        if d.as_secs() > 0 {
            format!("{:.2}s", d.as_secs_f64())
        } else if d.as_millis() > 0 {
            format!("{:.2}ms", d.as_secs_f64() * 1000.0)
        } else {
            format!("{:.2}µs", d.as_secs_f64() * 1_000_000.0)
        }
    }

    fn format_share(part: u64, total: u64) -> String {
        if total == 0 {
            return format!("{part}");
        }
        format!("{part} ({:.1}%)", part as f64 * 100.0 / total as f64)
    }

    fn format_throughput(result: &BenchResult) -> String {
        match result.writes_per_sec() {
            Some(wps) if wps > 1_000_000.0 => format!(" ({:.2}M writes/s)", wps / 1_000_000.0),
            Some(wps) if wps > 1000.0 => format!(" ({:.2}K writes/s)", wps / 1000.0),
            Some(wps) => format!(" ({:.0} writes/s)", wps),
            None => String::new(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn run_start(&self, config: &BenchConfig) {
        if !self.verbose {
            return;
        }
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("  Split write: {}% configured", config.percentage);
        eprintln!(
            "  Writes: {}, Pause: {}, Sync: {}",
            config.total,
            Self::format_duration(config.pause),
            config.sync
        );
        eprintln!("  Configured: {}", config.configured_path.display());
        eprintln!("  Vanilla:    {}", config.vanilla_path.display());
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    fn run_end(&self, result: &BenchResult) -> io::Result<()> {
        if self.verbose {
            eprintln!(
                "  configured: {}",
                Self::format_share(result.configured_writes, result.total)
            );
            eprintln!(
                "  vanilla:    {}",
                Self::format_share(result.vanilla_writes, result.total)
            );
            eprintln!(
                "  write time: {} of {} wall{}",
                Self::format_duration(result.total_latency),
                Self::format_duration(result.wall_time),
                Self::format_throughput(result)
            );
            #[cfg(feature = "hdr")]
            if let Some(p) = &result.percentiles {
                eprintln!(
                    "  p50 {}ns  p90 {}ns  p99 {}ns  p99.9 {}ns  max {}ns",
                    p.p50_ns, p.p90_ns, p.p99_ns, p.p999_ns, p.max_ns
                );
            }
            eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        }

        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", result.summary_line())?;
        out.flush()
    }
}

/// JSON reporter that writes results to a file.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Reporter for JsonReporter {
    /// Never fails the run: a write error is only logged.
    fn run_end(&self, result: &BenchResult) -> io::Result<()> {
        match write_json_results(&self.output_dir, result) {
            Ok(path) => tracing::info!(path = %path.display(), "results written"),
            Err(e) => tracing::warn!(error = %e, "failed to write JSON results"),
        }
        Ok(())
    }
}

pub(crate) fn write_json_results(
    output_dir: &Path,
    result: &BenchResult,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let filename = format!("splitbench-{}-{}.json", result.percentage, result.started_at);
    let path = output_dir.join(filename);

    let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;

    std::fs::write(&path, json)?;
    Ok(path)
}

/// Combines multiple reporters.
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }

    /// Reporters for a config: console always, JSON when an output dir is set.
    pub fn for_config(config: &BenchConfig) -> Self {
        let mut reporters: Vec<Box<dyn Reporter>> =
            vec![Box::new(ConsoleReporter::new().verbose(config.verbose))];
        if let Some(dir) = &config.output_dir {
            reporters.push(Box::new(JsonReporter::new(dir.clone())));
        }
        Self::new(reporters)
    }
}

impl Reporter for MultiReporter {
    fn run_start(&self, config: &BenchConfig) {
        for r in &self.reporters {
            r.run_start(config);
        }
    }

    /// Every reporter runs; the first error is returned.
    fn run_end(&self, result: &BenchResult) -> io::Result<()> {
        let mut first_err = None;
        for r in &self.reporters {
            if let Err(e) = r.run_end(result) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::sample;
    use std::rc::Rc;
    use std::time::Duration;

    struct Recording(Rc<RefCell<Vec<String>>>);

    impl Reporter for Recording {
        fn run_start(&self, config: &BenchConfig) {
            self.0.borrow_mut().push(format!("start {}", config.percentage));
        }

        fn run_end(&self, result: &BenchResult) -> io::Result<()> {
            self.0.borrow_mut().push(result.summary_line());
            Ok(())
        }
    }

    /// Clonable in-memory sink.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Failing;

    impl Reporter for Failing {
        fn run_end(&self, _result: &BenchResult) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn should_format_duration_in_appropriate_units() {
        assert!(ConsoleReporter::format_duration(Duration::from_secs(2)).contains("s"));
        assert!(ConsoleReporter::format_duration(Duration::from_millis(500)).contains("ms"));
        assert!(ConsoleReporter::format_duration(Duration::from_micros(20)).contains("µs"));
    }

    #[test]
    fn should_format_share_as_percentage() {
        assert_eq!(ConsoleReporter::format_share(5, 10), "5 (50.0%)");
        assert_eq!(ConsoleReporter::format_share(0, 0), "0");
    }

    #[test]
    fn should_fan_out_to_every_reporter() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let reporters: Vec<Box<dyn Reporter>> = vec![
            Box::new(Recording(log.clone())),
            Box::new(Recording(log.clone())),
        ];
        let multi = MultiReporter::new(reporters);

        multi.run_start(&BenchConfig::new(30));
        multi.run_end(&sample(12)).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["start 30", "start 30", "12 ns/op", "12 ns/op"]
        );
    }

    #[test]
    fn should_add_json_reporter_when_output_dir_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig::new(50).output_dir(dir.path().join("out"));

        MultiReporter::for_config(&config).run_end(&sample(5)).unwrap();

        let written = std::fs::read_dir(dir.path().join("out")).unwrap().count();
        assert_eq!(written, 1);
    }

    #[test]
    fn should_print_single_result_line() {
        let buf = SharedBuf::default();
        let reporter = ConsoleReporter::new().verbose(true).with_writer(buf.clone());

        reporter.run_end(&sample(321)).unwrap();

        assert_eq!(*buf.0.borrow(), b"321 ns/op\n");
    }

    #[test]
    fn should_fail_when_result_line_cannot_be_written() {
        let reporter = ConsoleReporter::new().with_writer(ClosedPipe);
        let err = reporter.run_end(&sample(1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn should_run_every_reporter_when_one_fails() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let reporters: Vec<Box<dyn Reporter>> =
            vec![Box::new(Failing), Box::new(Recording(log.clone()))];

        let err = MultiReporter::new(reporters).run_end(&sample(8)).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(*log.borrow(), vec!["8 ns/op"]);
    }

    #[test]
    fn should_format_throughput_from_wall_time() {
        assert_eq!(ConsoleReporter::format_throughput(&sample(1)), " (5 writes/s)");
    }

    #[test]
    fn should_write_json_file_when_output_dir_set() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");

        let path = write_json_results(&out, &sample(99)).unwrap();
        assert!(path.ends_with("splitbench-50-1700000000000.json"));

        let loaded = BenchResult::load(&path).unwrap();
        assert_eq!(loaded.mean_ns, 99);
    }
}
