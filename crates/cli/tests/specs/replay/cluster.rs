//! Cluster replay specs

use crate::prelude::*;

#[test]
fn custom_command_in_pipeline_fails_batch() {
    let temp = Project::empty();
    temp.file(
        "script.kvt",
        "define echoKeys 2\npipeline\nset {t}a 1\nechoKeys {t}a {t}b\nexec\n",
    );

    temp.kvt()
        .args(&["--cluster", "replay", "script.kvt"])
        .passes()
        .stdout_has(
            "(error) Sending custom commands in pipeline is not supported in Cluster mode.\n",
        )
        .stdout_has("pipeline             finished error=true");
}

#[test]
fn script_keys_across_slots_fail() {
    let temp = Project::empty();
    temp.file("script.kvt", "define echoKeys 2\nechoKeys foo bar\n");

    temp.kvt()
        .args(&["--nodes", "3", "replay", "script.kvt"])
        .passes()
        .stdout_has("(error) CROSSSLOT Keys in request don't hash to the same slot\n")
        .stdout_has("echoKeys             finished error=true");
}

#[test]
fn same_slot_pipeline_succeeds() {
    let temp = Project::empty();
    temp.file(
        "script.kvt",
        "pipeline\nset {user}:a 1\nset {user}:b 2\nmget {user}:a {user}:b\nexec\n",
    );

    temp.kvt()
        .args(&["--cluster", "replay", "script.kvt"])
        .passes()
        .stdout_has("[\"1\", \"2\"]\n")
        .stdout_lacks("error");
}

#[test]
fn cluster_mode_from_config() {
    let temp = Project::empty();
    temp.file("kvt.toml", "[cluster]\nnodes = 2\n");
    temp.file("script.kvt", "mget foo bar\n");

    temp.kvt()
        .args(&["--config", "kvt.toml", "replay", "script.kvt"])
        .passes()
        .stdout_has("(error) CROSSSLOT");

    // Without cluster mode the same keys are fine
    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_has("[(nil), (nil)]\n");
}
