//! Fan-out of one record to several sinks

use super::encoder::Encoder;
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use crate::appenders::{build_console_sink, build_file_sink, Sink};
use crate::config::LoggerConfig;

/// A sink with its encoder and minimum level
pub struct SinkCore {
    sink: Sink,
    encoder: Encoder,
    threshold: LogLevel,
}

impl SinkCore {
    pub fn new(sink: Sink, encoder: Encoder, threshold: LogLevel) -> Self {
        Self {
            sink,
            encoder,
            threshold,
        }
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.enabled(self.threshold)
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let encoded = self.encoder.encode(entry)?;
        self.sink.write(encoded.as_bytes())
    }
}

/// Composed writer delivering each record to every core that accepts its level
pub struct Tee {
    cores: Vec<SinkCore>,
}

impl Tee {
    /// Compose cores; delivery follows the order given here
    pub fn compose(cores: Vec<SinkCore>) -> Self {
        Self { cores }
    }

    /// Build the console core and, when enabled, the file core
    ///
    /// Nothing is returned unless every sink was built.
    pub fn from_config(cfg: &LoggerConfig) -> Result<Self> {
        let mut cores = vec![build_console_sink()];
        if cfg.file.enabled {
            cores.push(build_file_sink(&cfg.file, cfg.min_level())?);
        }
        Ok(Self::compose(cores))
    }

    /// Whether any core would accept a record at `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.cores.iter().any(|core| core.enabled(level))
    }

    /// Deliver `entry` synchronously to each accepting core
    ///
    /// A failing core is reported on stderr and skipped; the others still
    /// receive the record. Returns the number of cores that failed.
    pub fn write(&self, entry: &LogEntry, metrics: &LoggerMetrics) -> usize {
        let mut failures = 0;
        for (idx, core) in self.cores.iter().enumerate() {
            if !core.enabled(entry.level) {
                continue;
            }
            if let Err(e) = core.write(entry) {
                eprintln!(
                    "[LOGGER ERROR] Sink #{} ({}) failed: {}",
                    idx,
                    core.sink.name(),
                    e
                );
                failures += 1;
            }
        }

        if failures > 0 {
            metrics.record_write_failure();
        } else {
            metrics.record_logged();
        }
        failures
    }

    /// Flush every core; all are attempted, the first error is returned
    pub fn sync(&self) -> Result<()> {
        let mut first_err = None;
        for core in &self.cores {
            if let Err(e) = core.sink.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn cores(&self) -> &[SinkCore] {
        &self.cores
    }

    pub fn into_cores(self) -> Vec<SinkCore> {
        self.cores
    }
}
