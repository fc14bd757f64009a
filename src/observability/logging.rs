//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber
//! - Take the default filter from configuration, `RUST_LOG` overriding it
//!
//! # Design Decisions
//! - The library never installs a subscriber; only binaries call [`init`]
//! - Installing twice is reported, not fatal

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ObservabilityConfig;

/// Install a `fmt` subscriber filtered by `RUST_LOG` or `config.log_level`.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if let Err(e) = installed {
        tracing::warn!(error = %e, "Tracing subscriber already installed");
    }
}
