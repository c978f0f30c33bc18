//! Global tracing subscriber setup

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level` when it parses.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = resolve_filter(env_directives.as_deref(), &config.level);

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()?;

    tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

fn resolve_filter(env_directives: Option<&str>, level: &str) -> EnvFilter {
    env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
