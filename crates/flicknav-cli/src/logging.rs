//! Log subscriber setup
//!
//! Logs go to stderr. `RUST_LOG` takes precedence over the verbosity flags.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::CliConfig;

/// Filter from `RUST_LOG`, falling back to the verbosity level
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()))
}

/// Install the global subscriber; later calls are ignored
pub fn init(config: &CliConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let installed = if config.log_json {
        tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.color.should_color()),
            ),
        )
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
