//! Command invocation
//!
//! Resolves a name, applies the command's subject policy, runs the handler
//! and settles any nested chain the handler hands back. Every chain link and
//! every standalone `invoke_command` call goes through [`invoke`].

use crate::chain::Chain;
use crate::commands::registry::PrevSubject;
use crate::cy::Cy;
use crate::errors::{CommandError, Result};
use crate::subject::{Selection, Subject};

/// What a handler receives
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Name the command was invoked under
    pub name:    String,
    /// Previous subject; always `None` for commands registered without
    /// `prevSubject`
    pub subject: Option<Subject>,
    pub args:    Vec<Subject>,
}

impl Invocation {
    pub fn subject(&self) -> Result<&Subject> {
        self.subject.as_ref().ok_or_else(|| CommandError::MissingSubject {
            command: self.name.clone(),
        })
    }

    /// The previous subject as an element selection
    pub fn elements(&self) -> Result<&Selection> {
        match self.subject()? {
            Subject::Elements(selection) => Ok(selection),
            Subject::Value(_) => Err(CommandError::invalid_subject(
                &self.name,
                "expected DOM elements but the subject is a plain value",
            )),
            Subject::Undefined => Err(CommandError::MissingSubject {
                command: self.name.clone(),
            }),
        }
    }

    pub fn arg(&self, index: usize) -> Option<&Subject> {
        self.args.get(index)
    }

    /// Required string argument
    pub fn str_arg(&self, index: usize) -> Result<&str> {
        match self.opt_str_arg(index)? {
            Some(s) => Ok(s),
            None => Err(CommandError::invalid_args(
                &self.name,
                format!("missing argument {}", index + 1),
            )),
        }
    }

    /// Optional string argument; present but not a string is an error
    pub fn opt_str_arg(&self, index: usize) -> Result<Option<&str>> {
        match self.args.get(index) {
            None => Ok(None),
            Some(arg) => arg.as_str().map(Some).ok_or_else(|| {
                CommandError::invalid_args(&self.name, format!("argument {} must be a string", index + 1))
            }),
        }
    }
}

/// What a handler returns: a subject, or a chain still to be run
pub enum Outcome {
    Subject(Subject),
    Chain(Chain),
}

impl From<Subject> for Outcome {
    fn from(subject: Subject) -> Self {
        Outcome::Subject(subject)
    }
}

impl From<Selection> for Outcome {
    fn from(selection: Selection) -> Self {
        Outcome::Subject(Subject::Elements(selection))
    }
}

impl From<Chain> for Outcome {
    fn from(chain: Chain) -> Self {
        Outcome::Chain(chain)
    }
}

/// Invoke `name` with the incoming `subject` and `args`
///
/// The handler's result becomes the new subject. A returned chain is run to
/// completion first and its final subject is used; if it fails, so does this
/// invocation.
pub fn invoke(cy: &Cy, name: &str, subject: Subject, args: Vec<Subject>) -> Result<Subject> {
    let entry = cy.resolve(name).ok_or_else(|| cy.not_found(name))?;

    let subject = match entry.options.prev_subject {
        PrevSubject::None => None,
        PrevSubject::Required if subject.is_undefined() => {
            return Err(CommandError::MissingSubject {
                command: name.to_string(),
            });
        },
        PrevSubject::Required => Some(subject),
        PrevSubject::Optional => (!subject.is_undefined()).then_some(subject),
    };

    let _depth = cy.enter(name)?;
    tracing::debug!(command = %name, args = args.len(), with_subject = subject.is_some(), "invoking");

    let outcome = (entry.handler)(
        cy,
        Invocation {
            name: name.to_string(),
            subject,
            args,
        },
    )?;

    match outcome {
        Outcome::Subject(subject) => Ok(subject),
        Outcome::Chain(chain) => {
            tracing::debug!(command = %name, links = chain.len(), "settling nested chain");
            Ok(chain.run(cy)?.into_subject())
        },
    }
}
