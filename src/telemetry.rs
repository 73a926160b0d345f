use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialises structured JSON logging on stdout.
///
/// `RUST_LOG` controls the level (default `info`). Records emitted through the
/// `log` facade (actix's request logger) are bridged into the same subscriber.
pub fn init_telemetry() {
    if let Err(e) = try_init_telemetry("info") {
        eprintln!("Telemetry already initialised: {}", e);
    }
}

/// Fallible variant, used when a subscriber may already be installed (tests).
pub fn try_init_telemetry(
    default_level: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()
}
