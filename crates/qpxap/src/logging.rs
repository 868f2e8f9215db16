use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Crates whose events `--log-level` applies to. Everything else stays at `warn`.
const QPXAP_TARGETS: [&str; 4] = ["qpxap", "qpxap_painter", "qpxap_frame", "qpxap_transport"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives for `level`, unless `RUST_LOG` supplies its own.
///
/// `--log-level trace` turns on frame byte dumps from the qpxap crates
/// without pulling in trace output from dependencies.
pub fn filter_directives(level: LogLevel, rust_log: Option<&str>) -> String {
    if let Some(custom) = rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        return custom.to_string();
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(
        QPXAP_TARGETS
            .iter()
            .map(|target| format!("{target}={}", level.directive())),
    );
    directives.join(",")
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(level, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("warning: ignoring invalid {}: {err}", EnvFilter::DEFAULT_ENV);
        EnvFilter::new(filter_directives(level, None))
    });

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
