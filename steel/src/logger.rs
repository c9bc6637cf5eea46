//! Log output for the server process.
//!
//! Library crates log through the `log` facade; installing the fmt subscriber
//! also bridges those records into `tracing`.

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` isn't set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// logger or subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .try_init()
}
