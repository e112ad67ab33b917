//! Selectors
//!
//! Anything CSS can express is matched by `scraper`. On top of that a
//! trailing `:first` or `:last` narrows the matched set to one element, the
//! way jQuery's positional pseudos do (`body>div:first`, `input:last`).

use super::document::{Document, NodeId};
use crate::errors::{CommandError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Last,
}

/// A parsed selector
#[derive(Debug, Clone)]
pub struct Selector {
    css:      scraper::Selector,
    position: Option<Position>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        let (css, position) = if let Some(rest) = trimmed.strip_suffix(":first") {
            (rest, Some(Position::First))
        } else if let Some(rest) = trimmed.strip_suffix(":last") {
            (rest, Some(Position::Last))
        } else {
            (trimmed, None)
        };

        // `:first` on its own, or after a combinator, applies to any element.
        let dangling = css.is_empty() || css.ends_with(char::is_whitespace) || css.ends_with('>');
        let css = if position.is_some() && dangling {
            format!("{}*", css)
        } else {
            css.to_string()
        };

        let css = scraper::Selector::parse(&css).map_err(|err| CommandError::InvalidSelector {
            selector: source.to_string(),
            reason:   err.to_string(),
        })?;
        Ok(Self { css, position })
    }

    /// Elements matching the selector in document order, limited to
    /// descendants of `scope` when one is given
    pub fn query(&self, doc: &Document, scope: Option<&[NodeId]>) -> Vec<NodeId> {
        let matched = doc
            .elements()
            .filter(|(id, element)| {
                self.css.matches(element) && scope.map_or(true, |scope| doc.is_inside(*id, scope))
            })
            .map(|(id, _)| id);
        self.narrow(matched)
    }

    /// Keep the ids in `candidates` that the selector matches
    pub fn filter(&self, doc: &Document, candidates: &[NodeId]) -> Vec<NodeId> {
        let matched = candidates.iter().copied().filter(|&id| {
            doc.element(id)
                .map(|element| self.css.matches(&element))
                .unwrap_or(false)
        });
        self.narrow(matched)
    }

    fn narrow(&self, ids: impl Iterator<Item = NodeId>) -> Vec<NodeId> {
        match self.position {
            Some(Position::First) => ids.take(1).collect(),
            Some(Position::Last) => ids.last().into_iter().collect(),
            None => ids.collect(),
        }
    }
}
