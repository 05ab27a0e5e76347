use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// install a fmt subscriber filtered by RUST_LOG (defaults to "info").
/// returns false if the host already installed a global subscriber.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
