//! JSON boundary
//!
//! Entry points for embedders that speak JSON rather than Rust types:
//! - Command dispatch
//! - Command listing
//! - One-time setup of the process-wide context
//!
//! Failures never escape as `Err`; they come back as error objects.

use serde_json::{json, Value};

use crate::commands;
use crate::config::Config;
use crate::cy::{self, Cy};
use crate::dom::Document;
use crate::errors::{CommandError, Result};
use crate::logging;

/// Main entry point for command execution
///
/// # Arguments
/// * `command` - Command name (e.g., "get", "dashboard.selectWindows")
/// * `args` - Positional arguments as a JSON array, a single value, or null
///
/// # Returns
/// The resulting subject as JSON, or an error object
pub fn call(command: &str, args: Value) -> Value {
    match commands::dispatch(command, args) {
        Ok(result) => result,
        Err(err) => create_error_object(&err),
    }
}

/// Registered command names as a JSON array
pub fn list() -> Value {
    json!(commands::list_commands())
}

/// Configure logging and install the process-wide context
///
/// Must run before anything touches the global context; later calls return
/// a `config` error object.
pub fn setup(config: Value) -> Value {
    match setup_impl(config) {
        Ok(commands) => json!({ "ok": true, "commands": commands }),
        Err(err) => create_error_object(&err),
    }
}

fn setup_impl(config: Value) -> Result<Vec<String>> {
    let config = Config::from_value(config)?;

    if let Err(err) = logging::init_logging(&config.log_filter) {
        tracing::debug!(error = %err, "keeping existing log subscriber");
    }

    let cy = cy::install(Cy::with_config(Document::default(), config))?;
    tracing::info!(commands = cy.list_commands().len(), "cmdchain initialized");
    Ok(cy.list_commands())
}

/// Create a structured error object
///
/// Fields:
/// - `error`: true (marker that this is an error response)
/// - `message`: user-friendly error message
/// - `category`: error category for logging/handling
/// - `docsUrl`: reference documentation, when the error has one
pub fn create_error_object(err: &CommandError) -> Value {
    let mut obj = json!({
        "error": true,
        "message": err.user_message(),
        "category": err.category(),
    });
    if let Some(url) = err.docs_url() {
        obj["docsUrl"] = json!(url);
    }
    obj
}
