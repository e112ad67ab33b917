//! cmdchain: named commands, invoked directly or through chains
//!
//! Commands live in a registry keyed by name. A [`Chain`] queues command
//! links and runs them in order, threading each link's result (the
//! *subject*) into the next. Child commands receive that subject; parent
//! commands start fresh. Custom commands can be registered at runtime,
//! including namespaced names like `dashboard.selectWindows`, and can
//! themselves return chains.
//!
//! ## Architecture
//!
//! - **commands**: registry, built-ins, process-wide entry points
//! - **invoker**: name resolution, subject policy, nested chain settling
//! - **chain**: fluent builder, run ledger and lifecycle
//! - **cy**: context binding a registry, a fixture document and config
//! - **dom**: HTML fixture documents and selectors used by built-ins
//! - **api** / **script**: JSON entry points

// Module declarations
pub mod api;
pub mod chain;
pub mod commands;
pub mod config;
pub mod cy;
pub mod dom;
pub mod errors;
pub mod invoker;
pub mod logging;
pub mod script;
pub mod subject;

pub use chain::{Chain, ChainState, ChainStatus};
pub use commands::{CommandOptions, CommandRegistry, PrevSubject};
pub use config::Config;
pub use cy::Cy;
pub use dom::{Document, NodeId};
pub use errors::{CommandError, Result};
pub use invoker::{Invocation, Outcome};
pub use subject::{Args, Selection, Subject};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modules_exist() {
        // Ensure modules compile and are accessible
        let _error: errors::CommandError = "test".into();
        let _chain = Chain::new();
    }
}
