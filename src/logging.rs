//! Tracing subscriber setup for binaries and tests embedding the engine

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a global fmt subscriber once.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used, falling back
/// to "info". Later calls are ignored, as is a subscriber installed elsewhere.
pub fn init_tracing(default_filter: Option<&str>) {
    INIT.call_once(|| {
        let fallback = default_filter.unwrap_or("info").to_string();
        let result = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
            .try_init();

        if result.is_ok() {
            tracing::debug!("tracing initialized");
        }
    });
}
