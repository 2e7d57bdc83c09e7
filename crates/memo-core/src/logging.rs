//! tracing subscriber setup for binaries and tests that want to see cache events.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the default filter, letting `RUST_LOG` override it
fn env_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "memo_core={},memo_cache={},memo_config={}",
            level, level, level
        ))
    })
}

/// Install a global fmt subscriber, failing if one is already set
pub fn try_init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .try_init()
}

/// Install a global fmt subscriber, keeping any subscriber that is already set
pub fn init(verbose: bool) {
    if let Err(e) = try_init(verbose) {
        debug!("tracing subscriber already installed: {}", e);
    }
}
