//! HTML fixture documents
//!
//! Built-in commands such as `get` and `find` operate on a [`Document`]: a
//! parsed HTML page whose elements are addressed by [`NodeId`] and queried
//! with [`Selector`].

pub mod document;
pub mod selector;

pub use document::{Document, NodeId, ROOT};
pub use selector::Selector;
