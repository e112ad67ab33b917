//! Command registry
//!
//! Maps command names to handlers plus the metadata the invoker needs to
//! decide whether a handler receives the previous subject. Names are opaque,
//! case-sensitive strings: `dashboard.selectWindows` is just a name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::cy::Cy;
use crate::errors::{CommandError, Result};
use crate::invoker::{Invocation, Outcome};

/// Names that user code may never register
pub const RESERVED_NAMES: &[&str] = &[
    "addChainer",
    "addCommand",
    "command",
    "queue",
    "reset",
    "state",
    "then",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Signature shared by built-in and custom command handlers
pub type HandlerFn = dyn Fn(&Cy, Invocation) -> Result<Outcome> + Send + Sync;

/// Shared handle to a handler; cloned out of the registry before each call
pub type CommandHandler = Arc<HandlerFn>;

/// Whether a command receives the subject yielded by the previous link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrevSubject {
    /// Parent command: starts from scratch
    #[default]
    None,
    /// Child command: must have a subject
    Required,
    /// Receives the subject when there is one
    Optional,
}

impl<'de> Deserialize<'de> for PrevSubject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(PrevSubject::Required),
            Raw::Flag(false) => Ok(PrevSubject::None),
            Raw::Name(name) if name == "optional" => Ok(PrevSubject::Optional),
            Raw::Name(name) => Err(serde::de::Error::custom(format!(
                "invalid prevSubject '{}', expected true, false or \"optional\"",
                name
            ))),
        }
    }
}

/// Registration options, e.g. `{ "prevSubject": true }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandOptions {
    pub prev_subject: PrevSubject,
}

impl CommandOptions {
    pub fn parent() -> Self {
        Self {
            prev_subject: PrevSubject::None,
        }
    }

    pub fn child() -> Self {
        Self {
            prev_subject: PrevSubject::Required,
        }
    }

    pub fn optional() -> Self {
        Self {
            prev_subject: PrevSubject::Optional,
        }
    }
}

impl From<bool> for CommandOptions {
    fn from(prev_subject: bool) -> Self {
        if prev_subject {
            Self::child()
        } else {
            Self::parent()
        }
    }
}

#[derive(Clone)]
pub struct CommandEntry {
    pub name:    String,
    pub options: CommandOptions,
    pub handler: CommandHandler,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandEntry>,
    order:   Vec<String>,
}

impl CommandRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in commands
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtins::register_all(&mut registry);
        registry
    }

    /// Add or replace a command
    ///
    /// Reserved names are rejected before anything is touched. Re-registering
    /// a name replaces its handler but keeps its place in [`Self::list_names`].
    pub fn register<F>(&mut self, name: impl Into<String>, options: CommandOptions, handler: F) -> Result<()>
    where
        F: Fn(&Cy, Invocation) -> Result<Outcome> + Send + Sync + 'static,
    {
        let name = name.into();

        if is_reserved(&name) {
            return Err(CommandError::Reserved { name });
        }
        if name.trim().is_empty() {
            return Err(CommandError::invalid_args(&name, "command name must not be empty"));
        }

        let entry = CommandEntry {
            name: name.clone(),
            options,
            handler: Arc::new(handler),
        };

        if self.entries.insert(name.clone(), entry).is_some() {
            tracing::debug!(command = %name, "replaced command");
        } else {
            tracing::debug!(command = %name, prev_subject = ?options.prev_subject, "registered command");
            self.order.push(name);
        }
        Ok(())
    }

    /// Exact, case-sensitive lookup
    pub fn resolve(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order
    pub fn list_names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::subject::Subject;

    fn noop(_: &Cy, _: Invocation) -> Result<Outcome> {
        Ok(Subject::Undefined.into())
    }

    // ========================================
    // register() tests
    // ========================================

    #[test]
    fn test_register_and_resolve() {
        let mut registry = CommandRegistry::new();
        registry.register("login", CommandOptions::child(), noop).unwrap();

        let entry = registry.resolve("login").unwrap();
        assert_eq!(entry.name, "login");
        assert_eq!(entry.options.prev_subject, PrevSubject::Required);
        assert!(registry.resolve("Login").is_none());
    }

    #[test]
    fn test_register_reserved_name_fails() {
        let mut registry = CommandRegistry::new();
        let err = registry.register("reset", CommandOptions::default(), noop).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot create custom command named: `reset`.\n\nThis command name is reserved internally by Cypress."
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_registration_leaves_entries() {
        let mut registry = CommandRegistry::new();
        registry.register("a", CommandOptions::default(), noop).unwrap();
        assert!(registry.register("then", CommandOptions::default(), noop).is_err());

        assert_eq!(registry.list_names(), vec!["a".to_string()]);
    }

    #[test]
    fn test_register_empty_name_fails() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register("  ", CommandOptions::default(), noop).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins_and_keeps_order() {
        let mut registry = CommandRegistry::new();
        registry.register("a", CommandOptions::parent(), noop).unwrap();
        registry.register("b", CommandOptions::parent(), noop).unwrap();
        registry.register("a", CommandOptions::child(), noop).unwrap();

        assert_eq!(registry.list_names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.resolve("a").unwrap().options, CommandOptions::child());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_namespaced_name_is_opaque() {
        let mut registry = CommandRegistry::new();
        registry.register("dashboard.selectWindows", CommandOptions::default(), noop).unwrap();

        assert!(registry.contains("dashboard.selectWindows"));
        assert!(!registry.contains("dashboard"));
        assert!(!registry.contains("selectWindows"));
    }

    #[test]
    fn test_with_builtins() {
        let registry = CommandRegistry::with_builtins();
        for name in ["get", "find", "parent", "children", "first", "last", "wrap", "type"] {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
        assert!(RESERVED_NAMES.iter().all(|name| !registry.contains(name)));
    }

    // ========================================
    // options tests
    // ========================================

    #[test]
    fn test_options_deserialize() {
        let child: CommandOptions = serde_json::from_value(json!({"prevSubject": true})).unwrap();
        assert_eq!(child, CommandOptions::child());

        let parent: CommandOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parent, CommandOptions::parent());

        let optional: CommandOptions = serde_json::from_value(json!({"prevSubject": "optional"})).unwrap();
        assert_eq!(optional, CommandOptions::optional());

        assert!(serde_json::from_value::<CommandOptions>(json!({"prevSubject": "element"})).is_err());
    }

    #[test]
    fn test_options_from_bool() {
        assert_eq!(CommandOptions::from(true), CommandOptions::child());
        assert_eq!(CommandOptions::from(false), CommandOptions::parent());
    }

    proptest! {
        #[test]
        fn prop_reserved_names_always_rejected(index in 0..RESERVED_NAMES.len(), optional in any::<bool>()) {
            let mut registry = CommandRegistry::new();
            let options = if optional { CommandOptions::optional() } else { CommandOptions::child() };
            let err = registry.register(RESERVED_NAMES[index], options, noop).unwrap_err();
            let is_reserved_err = matches!(err, CommandError::Reserved { .. });
            prop_assert!(is_reserved_err);
            prop_assert!(registry.is_empty());
        }

        #[test]
        fn prop_namespaced_names_round_trip(ns in "[a-z]{1,8}", action in "[a-zA-Z]{1,12}") {
            let name = format!("{}.{}", ns, action);
            let mut registry = CommandRegistry::new();
            registry.register(name.clone(), CommandOptions::default(), noop).unwrap();
            prop_assert_eq!(registry.resolve(&name).map(|e| e.name.clone()), Some(name));
        }
    }
}
