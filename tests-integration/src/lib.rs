//! Workspace-level integration tests for cmdchain
//!
//! These exercise the process-wide entry points (`commands::*`, `api::*`)
//! and chain scripts the way an embedder would, through the public API only.

#[cfg(test)]
mod commands;
#[cfg(test)]
mod scripts;
