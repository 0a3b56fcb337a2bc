use std::path::Path;
use std::sync::Arc;

use bikeshare_explorer::ingestion::{
    CompositeObserver, FileObserver, IngestionObserver, IngestionOptions, IngestionSeverity, TracingObserver,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialise the global `tracing` subscriber, writing to stderr.
///
/// `log_level` is an [`EnvFilter`] directive ("warn", "bikeshare_explorer=debug", ...).
/// Falls back to `"warn"` if it does not parse.
pub fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

/// Ingestion options that log through `tracing`, plus an append-only audit file when requested.
pub fn ingestion_options(audit_log: Option<&Path>) -> IngestionOptions {
    let tracing_observer: Arc<dyn IngestionObserver> = Arc::new(TracingObserver);
    let observer: Arc<dyn IngestionObserver> = match audit_log {
        Some(path) => Arc::new(CompositeObserver::new(vec![
            tracing_observer,
            Arc::new(FileObserver::new(path)),
        ])),
        None => tracing_observer,
    };

    IngestionOptions {
        observer: Some(observer),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    }
}
