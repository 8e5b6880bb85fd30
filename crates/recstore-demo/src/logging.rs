#![forbid(unsafe_code)]

//! Tracing subscriber setup for the demo binary.

use tracing_subscriber::EnvFilter;

use crate::error::{DemoError, Result};

/// Build the filter: `RUST_LOG` wins when set, otherwise `default_directives`.
pub fn filter(default_directives: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directives)
            .map_err(|e| DemoError::invalid(format!("log filter `{default_directives}`: {e}"))),
    }
}

/// Install a stderr fmt subscriber. A subscriber that is already installed
/// (tests, embedding) is left in place.
pub fn init(default_directives: &str) -> Result<()> {
    let filter = filter(default_directives)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}
