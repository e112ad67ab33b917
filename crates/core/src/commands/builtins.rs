//! Built-in commands
//!
//! Parent commands (`get`, `wrap`) start a new subject; child commands
//! operate on the element selection yielded by the previous link.

use crate::commands::registry::{CommandOptions, CommandRegistry};
use crate::cy::Cy;
use crate::dom::{Selector, ROOT};
use crate::errors::{CommandError, Result};
use crate::invoker::{Invocation, Outcome};
use crate::subject::{Selection, Subject};

type BuiltinFn = fn(&Cy, Invocation) -> Result<Outcome>;

const BUILTINS: &[(&str, bool, BuiltinFn)] = &[
    ("get", false, get),
    ("find", true, find),
    ("parent", true, parent),
    ("children", true, children),
    ("first", true, first),
    ("last", true, last),
    ("wrap", false, wrap),
    ("type", true, type_text),
];

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for &(name, prev_subject, handler) in BUILTINS {
        if let Err(err) = registry.register(name, CommandOptions::from(prev_subject), handler) {
            tracing::error!(command = name, error = %err, "failed to register builtin");
        }
    }
}

/// `get(selector)`: query the whole document
fn get(cy: &Cy, inv: Invocation) -> Result<Outcome> {
    let selector = inv.str_arg(0)?;
    Ok(cy.query(None, selector)?.into())
}

/// `find(selector)`: query below the current elements
fn find(cy: &Cy, inv: Invocation) -> Result<Outcome> {
    let scope = inv.elements()?;
    let selector = inv.str_arg(0)?;
    Ok(cy.query(Some(scope), selector)?.into())
}

/// `parent(selector?)`
fn parent(cy: &Cy, inv: Invocation) -> Result<Outcome> {
    let elements = inv.elements()?;
    let filter = inv.opt_str_arg(0)?.map(Selector::parse).transpose()?;

    let parents = cy.with_document(|doc| {
        let ids = Selection::new(
            elements
                .ids()
                .iter()
                .filter_map(|&id| doc.parent(id))
                .filter(|&id| id != ROOT),
        );
        match &filter {
            Some(selector) => selector.filter(doc, ids.ids()),
            None => ids.ids().to_vec(),
        }
    });
    Ok(Selection::new(parents).into())
}

/// `children(selector?)`
fn children(cy: &Cy, inv: Invocation) -> Result<Outcome> {
    let elements = inv.elements()?;
    let filter = inv.opt_str_arg(0)?.map(Selector::parse).transpose()?;

    let kids = cy.with_document(|doc| {
        let ids: Vec<_> = elements
            .ids()
            .iter()
            .flat_map(|&id| doc.children(id))
            .collect();
        match &filter {
            Some(selector) => selector.filter(doc, &ids),
            None => ids,
        }
    });
    Ok(Selection::new(kids).into())
}

fn first(_: &Cy, inv: Invocation) -> Result<Outcome> {
    Ok(Selection::new(inv.elements()?.first()).into())
}

fn last(_: &Cy, inv: Invocation) -> Result<Outcome> {
    Ok(Selection::new(inv.elements()?.last()).into())
}

/// `wrap(value)`: yield the argument itself
fn wrap(_: &Cy, mut inv: Invocation) -> Result<Outcome> {
    if inv.args.is_empty() {
        return Err(CommandError::invalid_args(&inv.name, "missing value to wrap"));
    }
    Ok(inv.args.swap_remove(0).into())
}

/// `type(text)`: append text to the element's value, yield the same element
fn type_text(cy: &Cy, inv: Invocation) -> Result<Outcome> {
    let elements = inv.elements()?;
    let text = inv.str_arg(0)?;
    let id = match elements.ids() {
        [id] => *id,
        [] => {
            return Err(CommandError::invalid_subject(&inv.name, "requires an element to type into"));
        },
        many => {
            return Err(CommandError::invalid_subject(
                &inv.name,
                format!("can only be called on a single element, the subject contained {} elements", many.len()),
            ));
        },
    };

    if !cy.update_document(|doc| doc.type_into(id, text)) {
        return Err(CommandError::invalid_subject(&inv.name, format!("element {} is not in the document", id)));
    }
    Ok(Subject::Elements(elements.clone()).into())
}
