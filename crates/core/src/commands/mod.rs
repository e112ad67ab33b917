//! Command registry and dispatch system
//!
//! Commands are looked up by name in a registry and dispatched to handler
//! closures. The free functions here operate on the process-wide context
//! ([`crate::cy::global`]); code that wants isolation builds its own
//! [`Cy`](crate::cy::Cy).
//!
//! ## Adding a custom command
//!
//! ```
//! use cmdchain_core::commands::{self, CommandOptions};
//! use cmdchain_core::Subject;
//!
//! commands::register_command("greet", CommandOptions::default(), |_, inv| {
//!     let name = inv.str_arg(0)?;
//!     Ok(Subject::from(format!("hello {}", name)).into())
//! })
//! .unwrap();
//!
//! let greeting = commands::invoke_command("greet", "world").unwrap();
//! assert_eq!(greeting, Subject::from("hello world"));
//! ```
//!
//! A handler may also return a [`Chain`](crate::chain::Chain); it is run to
//! completion and its final subject is what the command yields.

pub mod builtins;
pub mod registry;

use serde_json::Value;

pub use registry::{
    is_reserved, CommandEntry, CommandHandler, CommandOptions, CommandRegistry, PrevSubject, RESERVED_NAMES,
};

use crate::cy::{self, Cy};
use crate::errors::Result;
use crate::invoker::{Invocation, Outcome};
use crate::subject::{Args, Subject};

/// Register a command on the process-wide context
pub fn register_command<F>(name: impl Into<String>, options: CommandOptions, handler: F) -> Result<()>
where
    F: Fn(&Cy, Invocation) -> Result<Outcome> + Send + Sync + 'static,
{
    cy::global().register_command(name, options, handler)
}

/// Invoke a command on the process-wide context
pub fn invoke_command(name: &str, args: impl Into<Args>) -> Result<Subject> {
    cy::global().invoke_command(name, args)
}

/// Dispatch a command by name with JSON arguments
///
/// # Arguments
/// * `command` - Command name (e.g., "get", "dashboard.selectWindows")
/// * `args` - Array of positional arguments, a single argument, or `null`
///
/// # Returns
/// The command's subject as JSON, or an error if the command is unknown or
/// fails
pub fn dispatch(command: &str, args: Value) -> Result<Value> {
    invoke_command(command, args).map(|subject| subject.to_json())
}

/// List all available commands in registration order
pub fn list_commands() -> Vec<String> {
    cy::global().list_commands()
}
