//! The value threaded from one chain link to the next
//!
//! Command arguments use the same type, so anything a link yields can be
//! handed to another command (e.g. `wrap`).

use serde::Serialize;
use serde_json::Value;

use crate::dom::NodeId;

/// Ordered, de-duplicated set of fixture nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    elements: Vec<NodeId>,
}

impl Selection {
    /// Build from ids, dropping repeats but keeping first-seen order
    pub fn new(ids: impl IntoIterator<Item = NodeId>) -> Self {
        let mut elements = Vec::new();
        for id in ids {
            if !elements.contains(&id) {
                elements.push(id);
            }
        }
        Self { elements }
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.elements
    }

    /// The element at `index`, like jQuery's `.get(index)`
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.elements.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.elements.last().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<NodeId> for Selection {
    fn from(id: NodeId) -> Self {
        Self { elements: vec![id] }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Subject {
    /// Nothing yielded yet
    #[default]
    Undefined,
    Elements(Selection),
    Value(Value),
}

impl Subject {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Subject::Undefined)
    }

    pub fn as_elements(&self) -> Option<&Selection> {
        match self {
            Subject::Elements(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Subject::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// JSON form used at the API boundary
    pub fn to_json(&self) -> Value {
        match self {
            Subject::Undefined => Value::Null,
            Subject::Elements(selection) => serde_json::json!({ "elements": selection.ids() }),
            Subject::Value(value) => value.clone(),
        }
    }
}

impl From<Selection> for Subject {
    fn from(selection: Selection) -> Self {
        Subject::Elements(selection)
    }
}

impl From<Value> for Subject {
    fn from(value: Value) -> Self {
        Subject::Value(value)
    }
}

impl From<&str> for Subject {
    fn from(s: &str) -> Self {
        Subject::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Subject {
    fn from(s: String) -> Self {
        Subject::Value(Value::String(s))
    }
}

/// Positional command arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(pub Vec<Subject>);

impl Args {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn into_vec(self) -> Vec<Subject> {
        self.0
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Self::none()
    }
}

impl From<&str> for Args {
    fn from(s: &str) -> Self {
        Self(vec![s.into()])
    }
}

impl From<String> for Args {
    fn from(s: String) -> Self {
        Self(vec![s.into()])
    }
}

impl From<Subject> for Args {
    fn from(subject: Subject) -> Self {
        Self(vec![subject])
    }
}

impl From<Vec<Subject>> for Args {
    fn from(args: Vec<Subject>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[&str; N]> for Args {
    fn from(args: [&str; N]) -> Self {
        Self(args.into_iter().map(Subject::from).collect())
    }
}

/// Arguments arriving as JSON: an array is positional, `null` is no
/// arguments, anything else is a single argument.
impl From<Value> for Args {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::none(),
            Value::Array(items) => Self(items.into_iter().map(Subject::Value).collect()),
            other => Self(vec![Subject::Value(other)]),
        }
    }
}
