//! Tracing initialisation for interactor binaries.
//!
//! Call [`init_tracing`] once at program start. Later calls are ignored
//! since the global subscriber can only be set once per process.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive variable checked before `RUST_LOG`.
pub const ENV_LOG: &str = "INTERACTOR_LOG";

/// Install the global subscriber, writing to stderr.
///
/// * `json` emits newline-delimited JSON log lines.
/// * `level` is the verbosity used when neither `INTERACTOR_LOG` nor
///   `RUST_LOG` is set.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
