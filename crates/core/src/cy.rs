//! Command context
//!
//! A [`Cy`] ties a command registry to the document built-in commands work
//! on and the active [`Config`]. Handlers receive the context they were
//! invoked from, so they can query the document, register commands, or build
//! nested chains.
//!
//! A process-wide context backs the free functions in [`crate::commands`];
//! it is created on first use, or installed up front with [`install`].

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::OnceCell;

use crate::commands::registry::{CommandEntry, CommandOptions, CommandRegistry};
use crate::config::Config;
use crate::dom::{Document, Selector};
use crate::errors::{CommandError, Result};
use crate::invoker::{self, Invocation, Outcome};
use crate::subject::{Args, Selection, Subject};

static GLOBAL: OnceCell<Cy> = OnceCell::new();

thread_local! {
    // Commands currently nested on this thread's call stack
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// The process-wide context
pub fn global() -> &'static Cy {
    GLOBAL.get_or_init(|| {
        let config = Config::load();
        tracing::debug!(?config, "creating global context");
        Cy::with_config(Document::default(), config)
    })
}

/// Install the process-wide context; fails once one exists
pub fn install(cy: Cy) -> Result<&'static Cy> {
    GLOBAL
        .set(cy)
        .map_err(|_| CommandError::Config("global context is already initialized".to_string()))?;
    Ok(global())
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Cy {
    registry:      RwLock<CommandRegistry>,
    document:      Mutex<Document>,
    config:        Config,
    active_chains: AtomicUsize,
}

impl Cy {
    /// Context with default configuration and the built-in commands
    pub fn new(document: Document) -> Self {
        Self::with_config(document, Config::default())
    }

    pub fn with_config(document: Document, config: Config) -> Self {
        let registry = if config.register_builtins {
            CommandRegistry::with_builtins()
        } else {
            CommandRegistry::new()
        };
        Self::with_registry(registry, document, config)
    }

    pub fn with_registry(registry: CommandRegistry, document: Document, config: Config) -> Self {
        Self {
            registry: RwLock::new(registry),
            document: Mutex::new(document),
            config,
            active_chains: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Register a custom command; see [`CommandRegistry::register`]
    pub fn register_command<F>(&self, name: impl Into<String>, options: CommandOptions, handler: F) -> Result<()>
    where
        F: Fn(&Cy, Invocation) -> Result<Outcome> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.is_running() {
            tracing::warn!(command = %name, "registering a command while a chain is running");
        }
        write(&self.registry).register(name, options, handler)
    }

    /// Snapshot of the entry for `name`
    pub fn resolve(&self, name: &str) -> Option<CommandEntry> {
        read(&self.registry).resolve(name).cloned()
    }

    /// Registered names in registration order
    pub fn list_commands(&self) -> Vec<String> {
        read(&self.registry).list_names()
    }

    pub(crate) fn not_found(&self, name: &str) -> CommandError {
        CommandError::NotFound {
            name:      name.to_string(),
            available: self.list_commands(),
            docs_url:  self.config.docs_url.clone(),
        }
    }

    /// Invoke a command outside of any chain
    pub fn invoke_command(&self, name: &str, args: impl Into<Args>) -> Result<Subject> {
        invoker::invoke(self, name, Subject::Undefined, args.into().into_vec())
    }

    // ------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------

    /// Run `selector` below `scope` (the whole document when `None`)
    pub fn query(&self, scope: Option<&Selection>, selector: &str) -> Result<Selection> {
        let selector = Selector::parse(selector)?;
        let ids = selector.query(&lock(&self.document), scope.map(Selection::ids));
        Ok(Selection::new(ids))
    }

    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&*lock(&self.document))
    }

    pub fn update_document<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut *lock(&self.document))
    }

    /// Swap in a fresh document, e.g. between test cases
    pub fn set_document(&self, document: Document) {
        *lock(&self.document) = document;
    }

    // ------------------------------------------------------------------
    // Execution bookkeeping
    // ------------------------------------------------------------------

    /// True while any chain on this context is running
    pub fn is_running(&self) -> bool {
        self.active_chains.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn begin_chain(&self) -> RunningChain<'_> {
        self.active_chains.fetch_add(1, Ordering::SeqCst);
        RunningChain { cy: self }
    }

    /// Count one more level of command nesting on the current thread
    pub(crate) fn enter(&self, command: &str) -> Result<NestingGuard> {
        let max = self.config.max_nesting_depth;
        DEPTH.with(|depth| {
            if depth.get() >= max {
                return Err(CommandError::NestingTooDeep {
                    command: command.to_string(),
                    depth:   max,
                });
            }
            depth.set(depth.get() + 1);
            Ok(NestingGuard { _thread: PhantomData })
        })
    }
}

pub(crate) struct RunningChain<'a> {
    cy: &'a Cy,
}

impl Drop for RunningChain<'_> {
    fn drop(&mut self) {
        self.cy.active_chains.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Releases one nesting level; must be dropped on the thread that took it
pub(crate) struct NestingGuard {
    _thread: PhantomData<*const ()>,
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
