//! Logging setup
//!
//! Logs go to stderr so command output on stdout stays parseable.
//! `RUST_LOG` replaces the computed filter when it is set.

use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Verbosity of this crate's own events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Level for kube's request logging: silent below `Trace`
    fn kube_level(self) -> LogLevel {
        match self {
            LogLevel::Trace => LogLevel::Debug,
            _ => LogLevel::Warn,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Filter directives for `level`, unless `rust_log` overrides them
fn directives(level: LogLevel, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        Some(custom) => custom.to_string(),
        None => format!("workload_scaler={},kube={}", level, level.kube_level()),
    }
}

/// Install the global subscriber
pub fn init_logger(level: LogLevel) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(directives(level, rust_log.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(directives(level, None)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
