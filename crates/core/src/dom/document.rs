//! Parsed HTML fixture with stable element ids

use std::collections::HashMap;
use std::fmt;

use scraper::{ElementRef, Html};

/// Position of an element in its [`Document`]
pub type NodeId = usize;

/// Id of the document node every element descends from
pub const ROOT: NodeId = 0;

/// An HTML document whose elements are numbered in document (pre-)order,
/// starting at 1
///
/// Text typed into elements is kept beside the parsed tree; it shadows the
/// element's `value` attribute.
pub struct Document {
    html:    Html,
    parents: Vec<Option<NodeId>>,
    values:  HashMap<NodeId, String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_html(Html::new_document())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &(self.len() - 1))
            .field("typed", &self.values.len())
            .finish()
    }
}

impl Document {
    /// Parse a full HTML document
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        if !html.errors.is_empty() {
            tracing::debug!(errors = html.errors.len(), "fixture parsed with recoverable errors");
        }
        Self::from_html(html)
    }

    fn from_html(html: Html) -> Self {
        let root = html.tree.root();
        let mut index = HashMap::new();
        let mut parents = vec![None];
        index.insert(root.id(), ROOT);

        for node in root.descendants().filter(|node| node.value().is_element()) {
            let parent = node.parent().and_then(|p| index.get(&p.id()).copied());
            index.insert(node.id(), parents.len());
            parents.push(parent);
        }

        Self {
            html,
            parents,
            values: HashMap::new(),
        }
    }

    /// Every element with its id, in document order
    pub fn elements(&self) -> impl Iterator<Item = (NodeId, ElementRef<'_>)> + '_ {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .map(|(index, element)| (index + 1, element))
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        if id == ROOT {
            return None;
        }
        self.elements().nth(id - 1).map(|(_, element)| element)
    }

    /// Number of ids in use, counting [`ROOT`]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True when the document has no elements at all
    pub fn is_empty(&self) -> bool {
        self.parents.len() <= 1
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.value().name())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.value().attr(name))
    }

    /// Current value: typed text if any, else the `value` attribute
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.values
            .get(&id)
            .map(String::as_str)
            .or_else(|| self.attr(id, "value"))
    }

    /// Append `text` to the element's value; false if there is no such element
    pub fn type_into(&mut self, id: NodeId, text: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        let initial = self.attr(id, "value").unwrap_or_default().to_string();
        self.values.entry(id).or_insert(initial).push_str(text);
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied().flatten()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| **parent == Some(id))
            .map(|(child, _)| child)
            .collect()
    }

    /// True when `id` is a strict descendant of any node in `scope`
    pub fn is_inside(&self, id: NodeId, scope: &[NodeId]) -> bool {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if scope.contains(&ancestor) {
                return true;
            }
            current = self.parent(ancestor);
        }
        false
    }
}
