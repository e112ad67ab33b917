//! Configuration
//!
//! Settings come from defaults, a JSON value (see [`crate::api::setup`]), a
//! JSON file, or `CMDCHAIN_*` environment variables (a `.env` file is loaded
//! first when present). [`Config::load`] layers the file at
//! [`Config::default_path`] under the environment.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CommandError, Result};

/// Documentation link attached to "command not found" errors
pub const DEFAULT_DOCS_URL: &str = "https://on.cypress.io/api";

/// Default limit for custom commands that return nested chains
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

const ENV_DOCS_URL: &str = "CMDCHAIN_DOCS_URL";
const ENV_MAX_NESTING_DEPTH: &str = "CMDCHAIN_MAX_NESTING_DEPTH";
const ENV_LOG: &str = "CMDCHAIN_LOG";
const ENV_REGISTER_BUILTINS: &str = "CMDCHAIN_REGISTER_BUILTINS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Reference documentation linked from lookup failures
    pub docs_url: String,
    /// How deep custom commands may nest chains inside chains
    pub max_nesting_depth: usize,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Populate new registries with the built-in commands
    pub register_builtins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_url:          DEFAULT_DOCS_URL.to_string(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            log_filter:        "info".to_string(),
            register_builtins: true,
        }
    }
}

impl Config {
    /// Build from a JSON value; missing fields take their defaults
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)?;
        Self::from_value(value)
    }

    /// `<config dir>/cmdchain/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cmdchain").join("config.json"))
    }

    /// Config file at [`Config::default_path`] if there is one, overridden by
    /// environment variables
    ///
    /// An unreadable file is skipped with a warning.
    pub fn load() -> Self {
        load_dotenv();
        Self::layered(Self::default_path().as_deref(), |key| std::env::var(key).ok())
    }

    /// Defaults overridden by environment variables
    ///
    /// Unparseable values are ignored with a warning rather than failing
    /// startup.
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn layered(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = match path {
            Some(path) if path.is_file() => Self::from_file(path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring config file");
                Self::default()
            }),
            _ => Self::default(),
        };
        base.with_overrides(lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_overrides(lookup)
    }

    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self;

        if let Some(url) = lookup(ENV_DOCS_URL) {
            config.docs_url = url;
        }
        if let Some(raw) = lookup(ENV_MAX_NESTING_DEPTH) {
            match raw.parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_nesting_depth = depth,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_MAX_NESTING_DEPTH),
            }
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }
        if let Some(raw) = lookup(ENV_REGISTER_BUILTINS) {
            match raw.as_str() {
                "1" | "true" => config.register_builtins = true,
                "0" | "false" => config.register_builtins = false,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_REGISTER_BUILTINS),
            }
        }

        config
    }

    fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(CommandError::Config(
                "maxNestingDepth must be at least 1".to_string(),
            ));
        }
        if self.docs_url.trim().is_empty() {
            return Err(CommandError::Config("docsUrl must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Load `.env` from the working directory or its parents
fn load_dotenv() {
    if let Some(err) = reportable(dotenvy::dotenv()) {
        tracing::warn!(error = %err, "failed to load .env file");
    }
}

/// A missing `.env` is normal; anything else is worth a warning
fn reportable<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    result.err().filter(|err| !err.not_found())
}
