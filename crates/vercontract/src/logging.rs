use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Directives in this variable (e.g. `vercontract_registry=debug`) take
/// precedence over `--log-level`.
pub const LOG_ENV: &str = "VERCONTRACT_LOG";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Filter from `directives` when they parse, otherwise `level` alone.
fn build_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    let fallback = || {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from(level).into())
            .parse_lossy("")
    };

    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

/// Install the stderr subscriber. Library events (schema compiles, endpoint
/// builds, version overwrites, lookups) surface here; stdout stays reserved
/// for command output.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let directives = std::env::var(LOG_ENV).ok();
    let filter = build_filter(level, directives.as_deref());

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);
    let layer = match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
    }

    #[test]
    fn falls_back_to_level_without_directives() {
        assert_eq!(
            build_filter(LogLevel::Error, None).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
        assert_eq!(
            build_filter(LogLevel::Info, Some("  ")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn directives_override_level() {
        let filter = build_filter(LogLevel::Error, Some("vercontract_registry=debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
