use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber (env-filtered, JSON output).
///
/// Host binaries call this once at startup; calling it again is a no-op so
/// tests can use it freely.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}
