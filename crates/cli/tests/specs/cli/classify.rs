//! Classify command specs

use crate::prelude::*;

#[test]
fn classifies_builtin_names() {
    let temp = Project::empty();

    temp.kvt()
        .args(&["classify", "ping", "AUTH", "pipeline", "set"])
        .passes()
        .stdout_eq(
            "ping                 restricted\n\
             AUTH                 restricted\n\
             pipeline             batch-control\n\
             set                  command\n",
        );
}

#[test]
fn classifies_configured_scripts() {
    let temp = Project::empty();
    temp.file(
        "kvt.toml",
        "[[scripts]]\nname = \"echoKeys\"\nkeys = 2\n\n[[scripts]]\nname = \"echoDynamic\"\nkeys = \"dynamic\"\n",
    );

    temp.kvt()
        .args(&["--config", "kvt.toml", "classify", "echoKeys", "echoDynamic"])
        .passes()
        .stdout_has("echoKeys             script (keys: 2)\n")
        .stdout_has("echoDynamic          script (keys: dynamic)\n");
}

#[test]
fn classify_json() {
    let temp = Project::empty();

    let json = temp
        .kvt()
        .args(&["--format", "json", "classify", "echo", "get"])
        .passes()
        .json();

    assert_eq!(json[0]["name"], "echo");
    assert_eq!(json[0]["traced"], false);
    assert_eq!(json[1]["category"], "command");
    assert_eq!(json[1]["traced"], true);
}
