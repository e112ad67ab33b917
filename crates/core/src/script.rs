//! Chain scripts
//!
//! Runs a chain described as JSON. Two shapes are accepted:
//! - a bare array of links: `[{"command": "get", "args": ["body"]}]`
//! - an object with an optional HTML fixture: `{"document": "<body>...</body>",
//!   "chain": [...]}`
//!
//! Link `args` follow the same rules as [`crate::api::call`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::chain::{Chain, ChainStatus};
use crate::cy::Cy;
use crate::dom::Document;
use crate::errors::{CommandError, Result};
use crate::subject::Args;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSpec {
    pub command: String,
    #[serde(default)]
    pub args:    Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// HTML that replaces the context's document before the chain runs
    #[serde(default)]
    pub document: Option<String>,
    pub chain:    Vec<LinkSpec>,
}

impl Script {
    /// Parse script text, auto-detecting which shape it uses
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;

        if value.is_array() {
            let chain: Vec<LinkSpec> = serde_json::from_value(value)?;
            Ok(Script { document: None, chain })
        } else if value.get("chain").is_some() {
            Ok(serde_json::from_value(value)?)
        } else {
            Err(CommandError::Other(
                "Unknown script format - expected an array of links or an object with a chain field".into(),
            ))
        }
    }

    pub fn to_chain(&self) -> Chain {
        self.chain.iter().fold(Chain::new(), |chain, link| {
            chain.command(link.command.clone(), Args::from(link.args.clone()))
        })
    }
}

/// Outcome of running a script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    pub id:      Uuid,
    pub names:   Vec<String>,
    pub subject: Value,
    pub status:  ChainStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:   Option<Value>,
}

/// Parse and run a script against `cy`
///
/// A malformed script is an `Err`; a chain that fails while running is
/// reported through `status` and `error`.
pub fn run_script(cy: &Cy, text: &str) -> Result<ScriptReport> {
    let script = Script::parse(text)?;

    if let Some(html) = &script.document {
        cy.set_document(Document::parse(html));
    }

    let state = script.to_chain().settle(cy);
    tracing::debug!(id = %state.id(), status = ?state.status(), "script settled");

    Ok(ScriptReport {
        id:      state.id(),
        names:   state.names().to_vec(),
        subject: state.subject().to_json(),
        status:  state.status(),
        error:   state.error().map(crate::api::create_error_object),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let script = Script::parse(r#"[{"command": "get", "args": ["body"]}, {"command": "first"}]"#).unwrap();
        assert!(script.document.is_none());
        assert_eq!(script.chain.len(), 2);
        assert_eq!(script.chain[1].args, Value::Null);
        assert_eq!(script.to_chain().names(), vec!["get", "first"]);
    }

    #[test]
    fn test_parse_unknown_shape() {
        assert!(matches!(Script::parse(r#"{"links": []}"#), Err(CommandError::Other(_))));
        assert!(matches!(Script::parse("not json"), Err(CommandError::Serde(_))));
        assert!(matches!(
            Script::parse(r#"[{"command": "get", "bogus": 1}]"#),
            Err(CommandError::Serde(_))
        ));
    }

    #[test]
    fn test_run_script_with_document() {
        let cy = Cy::new(Document::default());
        let text = json!({
            "document": "<body><p>one</p><p>two</p></body>",
            "chain": [
                {"command": "get", "args": "p"},
                {"command": "last"}
            ]
        })
        .to_string();

        let report = run_script(&cy, &text).unwrap();
        assert_eq!(report.status, ChainStatus::Succeeded);
        assert_eq!(report.names, vec!["get", "last"]);
        assert_eq!(report.subject, json!({"elements": [5]}));
        assert!(report.error.is_none());
    }

    #[test]
    fn test_run_script_failure_is_reported() {
        let cy = Cy::new(Document::default());
        let report = run_script(&cy, r#"[{"command": "wrap", "args": [1]}, {"command": "nope"}]"#).unwrap();

        assert_eq!(report.status, ChainStatus::Failed);
        assert_eq!(report.names, vec!["wrap", "nope"]);
        assert_eq!(report.subject, json!(1));
        let error = report.error.unwrap();
        assert_eq!(error["category"], json!("command"));
        assert_eq!(error["docsUrl"], json!("https://on.cypress.io/api"));
    }

    #[test]
    fn test_report_serializes() {
        let cy = Cy::new(Document::default());
        let report = run_script(&cy, r#"[{"command": "wrap", "args": "x"}]"#).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], json!("succeeded"));
        assert!(value.get("error").is_none());
    }
}
