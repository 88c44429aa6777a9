// src/config.rs
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::drivers::Capacity;

#[cfg(windows)]
const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
const DEFAULT_PORT: &str = "/dev/ttyUSB0";

const MIN_BUFFER_SAMPLES: usize = 10;

#[derive(Parser, Debug, Clone)]
#[command(name = "powerscope")]
#[command(about = "Real-time serial plotter for voltage, current and power", long_about = None)]
pub struct Cli {
    /// Serial port (e.g. COM3 or /dev/ttyUSB0)
    #[arg(long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Baud rate
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,

    /// Poll interval in ms
    #[arg(long, default_value_t = 20)]
    pub interval: u64,

    /// Max samples to keep in memory
    #[arg(long, default_value_t = 1000)]
    pub buf: usize,

    /// Keep every sample instead of a rolling window
    #[arg(long)]
    pub unbounded: bool,

    /// Print raw serial lines
    #[arg(long)]
    pub verbose: bool,

    /// Read timeout in ms (never longer than the poll interval)
    #[arg(long, default_value_t = 5)]
    pub timeout_ms: u64,

    /// Replay a captured log file instead of opening a serial port
    #[arg(long, conflicts_with = "simulate")]
    pub replay: Option<PathBuf>,

    /// Use a synthetic device instead of a serial port
    #[arg(long)]
    pub simulate: bool,

    /// Seed for --simulate
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Run without a window
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many polls (headless only)
    #[arg(long, requires = "headless")]
    pub ticks: Option<u64>,

    /// Write the final charts to this PNG file on exit
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SourceConfig {
    Serial {
        port: String,
        baud: u32,
        timeout: Duration,
    },
    Replay(PathBuf),
    Simulated {
        seed: u64,
    },
}

impl SourceConfig {
    pub fn describe(&self) -> String {
        match self {
            SourceConfig::Serial { port, baud, .. } => format!("{port} @ {baud}"),
            SourceConfig::Replay(path) => format!("replay {}", path.display()),
            SourceConfig::Simulated { seed } => format!("simulated (seed {seed})"),
        }
    }
}

/// Validated settings derived from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub poll_interval: Duration,
    pub capacity: Capacity,
    pub verbose: bool,
    pub headless: bool,
    pub max_ticks: Option<u64>,
    pub snapshot: Option<PathBuf>,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let interval_ms = cli.interval.max(1);
        // a read must return well before the next tick
        let timeout_ms = cli.timeout_ms.clamp(1, interval_ms);
        let source = if let Some(path) = cli.replay {
            SourceConfig::Replay(path)
        } else if cli.simulate {
            SourceConfig::Simulated { seed: cli.seed }
        } else {
            SourceConfig::Serial {
                port: cli.port,
                baud: cli.baud,
                timeout: Duration::from_millis(timeout_ms),
            }
        };
        let capacity = if cli.unbounded {
            Capacity::Unbounded
        } else {
            Capacity::Bounded(cli.buf.max(MIN_BUFFER_SAMPLES))
        };
        Self {
            source,
            poll_interval: Duration::from_millis(interval_ms),
            capacity,
            verbose: cli.verbose,
            headless: cli.headless,
            max_ticks: cli.ticks,
            snapshot: cli.snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let argv = std::iter::once("powerscope").chain(args.iter().copied());
        AppConfig::from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults_match_the_device_setup() {
        let config = parse(&[]);
        assert_eq!(
            config.source,
            SourceConfig::Serial {
                port: DEFAULT_PORT.to_owned(),
                baud: 115_200,
                timeout: Duration::from_millis(5),
            }
        );
        assert_eq!(config.poll_interval, Duration::from_millis(20));
        assert_eq!(config.capacity, Capacity::Bounded(1000));
        assert!(!config.verbose && !config.headless);
        assert_eq!(config.snapshot, None);
    }

    #[test]
    fn values_are_clamped() {
        let config = parse(&["--interval", "0", "--buf", "3", "--timeout-ms", "500"]);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert_eq!(config.capacity, Capacity::Bounded(10));
        match config.source {
            SourceConfig::Serial { timeout, .. } => assert_eq!(timeout, Duration::from_millis(1)),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn alternate_sources_and_unbounded_buffer() {
        let config = parse(&["--replay", "capture.log", "--unbounded", "--headless", "--ticks", "50"]);
        assert_eq!(config.source, SourceConfig::Replay(PathBuf::from("capture.log")));
        assert_eq!(config.capacity, Capacity::Unbounded);
        assert_eq!(config.max_ticks, Some(50));
        let config = parse(&["--simulate", "--seed", "3", "--port", "COM9", "--verbose"]);
        assert_eq!(config.source, SourceConfig::Simulated { seed: 3 });
        assert!(config.verbose);
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert!(Cli::try_parse_from(["powerscope", "--replay", "x.log", "--simulate"]).is_err());
        assert!(Cli::try_parse_from(["powerscope", "--ticks", "5"]).is_err());
    }
}
