//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.kvt()
        .args(&["--help"])
        .passes()
        .stdout_has("replay")
        .stdout_has("classify")
        .stdout_has("--cluster")
        .stdout_has("--format");
}

#[test]
fn classify_requires_a_name() {
    let temp = Project::empty();
    assert!(temp.path().is_dir());

    temp.kvt().args(&["classify"]).fails();
}

#[test]
fn version_names_the_binary() {
    let temp = Project::empty();

    temp.kvt()
        .args(&["--version"])
        .passes()
        .stdout_has("kvt ");
}
