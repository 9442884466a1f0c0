//! Structured logging initialization.

use tracing_subscriber::{fmt::time::UtcTime, prelude::*, registry::Registry, Layer};

use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging: console output plus an optional rolling file
/// appender, driven by the configuration document.
///
/// Filter precedence: `logging.level` from config, then the `RUST_LOG`
/// environment variable, then "info".
pub fn init_with_config(cfg: &LoggingConfig) {
    let env_filter = if let Some(level) = &cfg.level {
        tracing_subscriber::EnvFilter::new(level.as_str())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let mut layers: Vec<BoxedLayer> = vec![console_layer(cfg.format)];
    if cfg.enable_file_logging {
        if let Some(layer) = file_layer(cfg) {
            layers.push(layer);
        }
    }

    // try_init so tests that initialize twice keep the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init();
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stdout);

    match format {
        LogFormat::Json => layer.json().with_ansi(false).boxed(),
        LogFormat::Text => layer.with_ansi(true).boxed(),
    }
}

fn file_layer(cfg: &LoggingConfig) -> Option<BoxedLayer> {
    let rotation = match cfg.rotation.to_lowercase().as_str() {
        "hourly" => tracing_appender::rolling::Rotation::HOURLY,
        "never" => tracing_appender::rolling::Rotation::NEVER,
        _ => tracing_appender::rolling::Rotation::DAILY,
    };

    if std::fs::create_dir_all(&cfg.dir).is_err() {
        eprintln!(
            "Failed to create log directory '{}', continuing with console logs only",
            cfg.dir
        );
        return None;
    }

    let file_appender =
        tracing_appender::rolling::RollingFileAppender::new(rotation, &cfg.dir, &cfg.filename);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    // Keep the flush guard alive for the process lifetime.
    let _leaked: &'static _ = Box::leak(Box::new(file_guard));

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(non_blocking);

    Some(match cfg.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    })
}
