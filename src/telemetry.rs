use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

/// Installs the process-wide subscriber. Idempotent: worker templates call
/// this before loading their model, and the runner entry point calls it
/// again for templates that skipped it.
pub fn init_telemetry() {
    let _ = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
