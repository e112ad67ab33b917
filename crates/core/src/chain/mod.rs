//! Chain builder
//!
//! A [`Chain`] is a queue of links built fluently and run later:
//!
//! ```
//! use cmdchain_core::{Chain, Cy, Document};
//!
//! let cy = Cy::new(Document::default());
//! let state = Chain::new().wrap("hello").run(&cy).unwrap();
//! assert_eq!(state.names(), &["wrap".to_string()]);
//! ```
//!
//! Running a chain threads the subject from link to link. Each link records
//! its name before it is invoked; the first failure ends the chain.

pub mod state;

use std::fmt;

pub use state::{ChainState, ChainStatus};

use crate::cy::Cy;
use crate::errors::Result;
use crate::invoker;
use crate::subject::{Args, Subject};

type ThenFn = dyn FnOnce(&Cy, &Subject) -> Result<Option<Subject>> + Send;

enum Link {
    Command { name: String, args: Vec<Subject> },
    Then(Box<ThenFn>),
}

impl Link {
    fn name(&self) -> &str {
        match self {
            Link::Command { name, .. } => name,
            Link::Then(_) => "then",
        }
    }
}

#[derive(Default)]
pub struct Chain {
    links: Vec<Link>,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("links", &self.names()).finish()
    }
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command by name
    pub fn command(mut self, name: impl Into<String>, args: impl Into<Args>) -> Self {
        self.links.push(Link::Command {
            name: name.into(),
            args: args.into().into_vec(),
        });
        self
    }

    pub fn get(self, selector: &str) -> Self {
        self.command("get", selector)
    }

    pub fn find(self, selector: &str) -> Self {
        self.command("find", selector)
    }

    pub fn parent(self) -> Self {
        self.command("parent", ())
    }

    pub fn children(self) -> Self {
        self.command("children", ())
    }

    pub fn first(self) -> Self {
        self.command("first", ())
    }

    pub fn last(self) -> Self {
        self.command("last", ())
    }

    pub fn wrap(self, subject: impl Into<Subject>) -> Self {
        self.command("wrap", subject.into())
    }

    pub fn type_text(self, text: &str) -> Self {
        self.command("type", text)
    }

    /// Queue a callback that sees the current subject
    ///
    /// Returning `Some` replaces the subject; `None` keeps it.
    pub fn then<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&Cy, &Subject) -> Result<Option<Subject>> + Send + 'static,
    {
        self.links.push(Link::Then(Box::new(callback)));
        self
    }

    /// Link names in queue order
    pub fn names(&self) -> Vec<String> {
        self.links.iter().map(|link| link.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Run every link and return the final state, failed or not
    pub fn settle(self, cy: &Cy) -> ChainState {
        let mut state = ChainState::new();
        let span = tracing::debug_span!("chain", id = %state.id());
        let _entered = span.enter();
        let _running = cy.begin_chain();

        state.start();
        for (index, link) in self.links.into_iter().enumerate() {
            state.record(link.name());
            tracing::debug!(index, link = link.name(), "running link");

            let result = match link {
                Link::Command { name, args } => invoker::invoke(cy, &name, state.subject().clone(), args),
                Link::Then(callback) => {
                    callback(cy, state.subject()).map(|next| next.unwrap_or_else(|| state.subject().clone()))
                },
            };

            match result {
                Ok(subject) => state.advance(subject),
                Err(err) => {
                    tracing::debug!(index, error = %err, "chain failed");
                    state.fail(err);
                    return state;
                },
            }
        }

        state.succeed();
        state
    }

    /// Run every link, surfacing the first failure as `Err`
    pub fn run(self, cy: &Cy) -> Result<ChainState> {
        self.settle(cy).into_result()
    }
}
