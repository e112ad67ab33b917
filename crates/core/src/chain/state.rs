//! Chain lifecycle and ledger

use serde::Serialize;
use uuid::Uuid;

use crate::errors::{CommandError, Result};
use crate::subject::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl ChainStatus {
    pub fn is_settled(self) -> bool {
        matches!(self, ChainStatus::Succeeded | ChainStatus::Failed)
    }
}

/// Everything a chain run leaves behind
///
/// `names` holds one entry per link that started, in order, including the
/// link that failed. `error` is set exactly when `status` is `Failed`.
#[derive(Debug)]
pub struct ChainState {
    id:      Uuid,
    names:   Vec<String>,
    subject: Subject,
    status:  ChainStatus,
    error:   Option<CommandError>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainState {
    pub fn new() -> Self {
        Self {
            id:      Uuid::new_v4(),
            names:   Vec::new(),
            subject: Subject::Undefined,
            status:  ChainStatus::Idle,
            error:   None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn status(&self) -> ChainStatus {
        self.status
    }

    pub fn error(&self) -> Option<&CommandError> {
        self.error.as_ref()
    }

    pub fn into_subject(self) -> Subject {
        self.subject
    }

    /// `Err` with the failing link's error if the chain failed
    pub fn into_result(mut self) -> Result<Self> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    pub(crate) fn start(&mut self) {
        if self.status == ChainStatus::Idle {
            self.status = ChainStatus::Running;
        }
    }

    pub(crate) fn record(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    pub(crate) fn advance(&mut self, subject: Subject) {
        if self.status == ChainStatus::Running {
            self.subject = subject;
        }
    }

    pub(crate) fn fail(&mut self, err: CommandError) {
        if !self.status.is_settled() {
            self.status = ChainStatus::Failed;
            self.error = Some(err);
        }
    }

    pub(crate) fn succeed(&mut self) {
        if !self.status.is_settled() {
            self.status = ChainStatus::Succeeded;
        }
    }
}
