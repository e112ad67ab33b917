//! Error types for cmdchain
//!
//! Every failure in the crate is a [`CommandError`]. Registration and lookup
//! failures carry exact, user-facing wording; the rest describe bad arguments,
//! bad subjects, or configuration problems.

use thiserror::Error;

/// Result type alias for cmdchain operations
pub type Result<T> = std::result::Result<T, CommandError>;

/// Main error type for cmdchain
#[derive(Debug, Error)]
pub enum CommandError {
    /// Attempt to register a name that is reserved internally
    #[error(
        "Cannot create custom command named: `{name}`.\n\nThis command name is reserved \
         internally by Cypress."
    )]
    Reserved { name: String },

    /// Command not found in registry
    #[error(
        "Could not find a command for: `{name}`.\n\nAvailable commands are: `{}`.\n",
        .available.join("`, `")
    )]
    NotFound {
        name:      String,
        available: Vec<String>,
        docs_url:  String,
    },

    /// Child command invoked without a prior subject
    #[error("`{command}` is a child command which operates on an existing subject, but no subject was yielded")]
    MissingSubject { command: String },

    /// Subject has the wrong shape for the command
    #[error("Invalid subject for command '{command}': {reason}")]
    InvalidSubject { command: String, reason: String },

    /// Invalid command arguments
    #[error("Invalid arguments for command '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Custom commands nested past the configured limit
    #[error("Command '{command}' exceeded the maximum nesting depth of {depth}")]
    NestingTooDeep { command: String, depth: usize },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error (catch-all)
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        CommandError::Other(format!("{:#}", err))
    }
}

impl From<String> for CommandError {
    fn from(err: String) -> Self {
        CommandError::Other(err)
    }
}

impl From<&str> for CommandError {
    fn from(err: &str) -> Self {
        CommandError::Other(err.to_string())
    }
}

impl CommandError {
    pub(crate) fn invalid_args(command: &str, reason: impl Into<String>) -> Self {
        CommandError::InvalidArgs {
            command: command.to_string(),
            reason:  reason.into(),
        }
    }

    pub(crate) fn invalid_subject(command: &str, reason: impl Into<String>) -> Self {
        CommandError::InvalidSubject {
            command: command.to_string(),
            reason:  reason.into(),
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Serde(err) => format!("Malformed JSON: {}", err),
            CommandError::Io(err) => format!("Could not read file: {}", err),
            _ => self.to_string(),
        }
    }

    /// Reference documentation for the failure, if any
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            CommandError::NotFound { docs_url, .. } => Some(docs_url),
            _ => None,
        }
    }

    /// Get error category for logging/telemetry
    pub fn category(&self) -> &'static str {
        match self {
            CommandError::Reserved { .. } => "registration",
            CommandError::NotFound { .. } => "command",
            CommandError::MissingSubject { .. } | CommandError::InvalidSubject { .. } => "subject",
            CommandError::InvalidArgs { .. } => "arguments",
            CommandError::InvalidSelector { .. } => "selector",
            CommandError::NestingTooDeep { .. } => "nesting",
            CommandError::Serde(_) => "serialization",
            CommandError::Io(_) => "io",
            CommandError::Config(_) => "config",
            CommandError::Other(_) => "other",
        }
    }
}
