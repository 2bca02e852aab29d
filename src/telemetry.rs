//! Logging setup.
//!
//! Events go to stderr so stdout stays machine-readable. The filter comes
//! from `RELEASE_RANGE_LOG`, defaulting to `warn`, or `debug` when the
//! workflow runs with `RUNNER_DEBUG=1`.

use tracing_subscriber::EnvFilter;

use crate::action;

pub const LOG_ENV: &str = "RELEASE_RANGE_LOG";

fn default_directive() -> &'static str {
    if action::is_debug() {
        "release_range=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; a second call is a no-op.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
