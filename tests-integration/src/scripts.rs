//! Integration tests for JSON chain scripts

use cmdchain_core as cmdchain;
use cmdchain::script::run_script;
use cmdchain::{ChainStatus, CommandOptions, Cy, Document};
use serde_json::json;

const FIXTURE: &str = include_str!("../../crates/core/fixtures/dom.html");

fn cy() -> Cy {
    Cy::new(Document::parse(FIXTURE))
}

#[test]
fn test_script_invokes_builtins_by_name() {
    let cy = cy();
    let report = run_script(
        &cy,
        r#"[
            {"command": "get", "args": ["body"]},
            {"command": "find", "args": ["div:first"]}
        ]"#,
    )
    .unwrap();

    let expected = cy.query(None, "body>div:first").unwrap();
    assert_eq!(report.status, ChainStatus::Succeeded);
    assert_eq!(report.subject, json!({"elements": expected.ids()}));
}

#[test]
fn test_script_with_custom_login_command() {
    let cy = cy();
    cy.register_command("login", CommandOptions::child(), |cy, inv| {
        let input = cy.query(Some(inv.elements()?), "input:first")?;
        Ok(cmdchain::Chain::new().wrap(input).type_text(inv.str_arg(0)?).into())
    })
    .unwrap();

    let report = run_script(
        &cy,
        r#"[
            {"command": "get", "args": "input:first"},
            {"command": "parent"},
            {"command": "login", "args": ["brian@foo.com"]}
        ]"#,
    )
    .unwrap();

    let input = cy.query(None, "input:first").unwrap();
    assert_eq!(report.names, vec!["get", "parent", "login"]);
    assert_eq!(report.subject, json!({"elements": input.ids()}));
}

#[test]
fn test_script_reports_unknown_command() {
    let cy = cy();
    let report = run_script(&cy, r#"[{"command": "get", "args": "body"}, {"command": "fooDoesNotExist", "args": ["bar", "baz"]}]"#).unwrap();

    assert_eq!(report.status, ChainStatus::Failed);
    let error = report.error.expect("error object");
    assert_eq!(error["category"], json!("command"));
    assert!(error["message"]
        .as_str()
        .unwrap()
        .starts_with("Could not find a command for: `fooDoesNotExist`."));
}

#[test]
fn test_script_rejects_garbage() {
    assert!(run_script(&cy(), r#"{"nope": true}"#).is_err());
}
