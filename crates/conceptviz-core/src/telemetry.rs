//! Tracing setup for ConceptViz binaries.
//!
//! Logs go to stderr so stdout only ever carries diagram source.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// * `json`: when `true`, emit newline-delimited JSON log lines.
/// * `level`: default verbosity when `RUST_LOG` is not set.
///
/// `RUST_LOG` takes precedence over `level`. Only the first call in a process
/// has any effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
            .ok();
    }
}
