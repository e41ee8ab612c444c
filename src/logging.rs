//! Logging initialization.
//!
//! Diagnostics (per-file warnings, progress, skip reasons) go through
//! `tracing` to stderr; reports and summaries are printed to stdout by the
//! commands themselves.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable that overrides every other level source.
pub const LOG_ENV: &str = "GLEAN_LOG";

/// Initialize the global tracing subscriber.
///
/// The filter comes from `GLEAN_LOG` when set, otherwise from `level`.
/// Calling this twice is harmless: the second subscriber is rejected and
/// the first stays installed, which is what repeated `run` calls in tests
/// need.
///
/// # Formats
///
/// * `"json"` - one JSON object per event
/// * `"pretty"` - multi-line human-readable output
/// * anything else - compact single-line output
pub fn init(level: &str, format: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        "json" => registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init(),
        "pretty" => registry.with(fmt::layer().pretty().with_writer(std::io::stderr)).try_init(),
        _ => registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init("warn", "compact");
        init("debug", "json");
        tracing::info!("still logging");
    }
}
