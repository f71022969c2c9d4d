// Logging setup on tracing-subscriber
//
// Library crates log through the `log` facade. `tracing_log::LogTracer`
// forwards those records into the tracing subscriber installed here.

use std::collections::HashMap;

use docledger_configs::LoggingSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text format: timestamp LEVEL target - message
    Compact,
    /// JSON Lines format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Build the `EnvFilter` from the base level, noisy-crate overrides and
/// per-target overrides from config.
fn build_env_filter(level: &str, target_levels: &HashMap<String, String>) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];

    // RocksDB bindings are chatty at debug
    directives.push("rocksdb=warn".to_string());

    // Sorted so the filter string is stable
    let mut targets: Vec<_> = target_levels.iter().collect();
    targets.sort();
    for (target, lvl) in targets {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Initialize logging based on configuration.
///
/// Installs a console `fmt` layer (compact or JSON lines) behind an `EnvFilter`
/// and bridges `log::*` calls through `tracing_log::LogTracer`. Calling it again
/// after a subscriber is installed is a no-op.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let filter = build_env_filter(&settings.level, &settings.targets)?;

    // Bridge `log` crate → tracing
    tracing_log::LogTracer::init().ok(); // ok() in case already initialized

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match LogFormat::parse(&settings.format) {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    };

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        log::debug!("Logging already initialized, keeping the existing subscriber");
        return Ok(());
    }

    tracing::trace!(
        "Logging initialized: level={}, format={}",
        settings.level,
        settings.format
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSONL"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Compact);
    }

    #[test]
    fn test_env_filter_with_targets() {
        let mut targets = HashMap::new();
        targets.insert("docledger_store".to_string(), "trace".to_string());
        let filter = build_env_filter("info", &targets).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("docledger_store=trace"));
        assert!(rendered.contains("rocksdb=warn"));
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        let mut targets = HashMap::new();
        targets.insert("docledger_store".to_string(), "loud".to_string());
        assert!(build_env_filter("info", &targets).is_err());
    }

    #[test]
    fn test_init_is_idempotent() {
        let settings = LoggingSettings::default();
        init_logging(&settings).unwrap();
        init_logging(&settings).unwrap();
        log::info!("still logging");
    }
}
