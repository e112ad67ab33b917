//! Integration tests for the process-wide command surface

use cmdchain_core as cmdchain;
use cmdchain::commands::{self, CommandOptions};
use cmdchain::{api, Chain, CommandError, Subject};
use serde_json::json;

#[test]
fn test_register_and_invoke_global_command() {
    commands::register_command("it.greet", CommandOptions::default(), |_, inv| {
        Ok(Subject::from(format!("hi {}", inv.str_arg(0)?)).into())
    })
    .unwrap();

    let direct = commands::invoke_command("it.greet", "there").unwrap();
    let via_json = api::call("it.greet", json!(["there"]));

    assert_eq!(direct, Subject::from("hi there"));
    assert_eq!(via_json, json!("hi there"));
    assert!(commands::list_commands().contains(&"it.greet".to_string()));
}

#[test]
fn test_global_child_command_in_chain() {
    commands::register_command("it.shout", CommandOptions::child(), |_, inv| {
        let text = inv.subject()?.as_str().unwrap_or_default().to_uppercase();
        Ok(Subject::from(text).into())
    })
    .unwrap();

    let state = Chain::new()
        .wrap("quiet")
        .command("it.shout", ())
        .run(cmdchain::cy::global())
        .unwrap();

    assert_eq!(state.subject(), &Subject::from("QUIET"));
    assert_eq!(state.names(), &["wrap".to_string(), "it.shout".to_string()]);
}

#[test]
fn test_reserved_names_rejected_globally() {
    for name in commands::RESERVED_NAMES {
        let err = commands::register_command(*name, CommandOptions::default(), |_, _| {
            Ok(Subject::Undefined.into())
        })
        .unwrap_err();
        assert!(matches!(err, CommandError::Reserved { .. }), "{} should be reserved", name);
    }
}

#[test]
fn test_command_not_found() {
    let result = commands::dispatch("nonexistent_command", json!({}));
    assert!(matches!(result, Err(CommandError::NotFound { .. })));

    let obj = api::call("nonexistent_command", json!(null));
    assert_eq!(obj["error"], json!(true));
    assert_eq!(obj["docsUrl"], json!("https://on.cypress.io/api"));
}

#[test]
fn test_list_commands() {
    let commands = commands::list_commands();

    assert!(!commands.is_empty());
    assert!(commands.contains(&"get".to_string()));
    // Reserved names are never listed
    assert!(!commands.contains(&"reset".to_string()));
    assert!(!commands.contains(&"then".to_string()));
}
