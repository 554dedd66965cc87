use paydash_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

/// Installs the global tracing subscriber. Output goes to stderr so command
/// output on stdout stays scriptable.
pub fn initialize_tracing(logging: &LoggingConfig) {
    let fmt_builder = fmt::fmt()
        .with_env_filter(build_env_filter(logging))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    // A subscriber may already be installed when embedded; keep that one.
    let _ = if matches!(logging.format, LogFormat::Json) {
        fmt_builder.json().with_ansi(false).try_init()
    } else {
        fmt_builder.with_ansi(true).try_init()
    };
}

fn build_env_filter(logging: &LoggingConfig) -> EnvFilter {
    let default_level = logging
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .parse_lossy("")
    })
}
