//! Logging setup
//!
//! The crate emits `tracing` events; embedders that have no subscriber of
//! their own can install the default one here.

use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::{CommandError, Result};

/// Install a `fmt` subscriber
///
/// `RUST_LOG` wins over `default_filter`. Fails if a global subscriber is
/// already installed.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| CommandError::Config(format!("invalid log filter '{}': {}", default_filter, e)))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| CommandError::Other(format!("failed to initialize logging: {}", e)))?;

    tracing::info!("logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call comes first may succeed; the second never can.
        let _ = init_logging("warn");
        assert!(init_logging("warn").is_err());
    }
}
