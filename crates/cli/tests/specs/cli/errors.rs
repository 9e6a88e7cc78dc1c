//! CLI error specs
//!
//! Script and config problems exit non-zero with a line-numbered message.

use crate::prelude::*;

#[test]
fn missing_script_fails() {
    let temp = Project::empty();

    temp.kvt()
        .args(&["replay", "nope.kvt"])
        .fails()
        .stderr_has("failed to read script");
}

#[test]
fn syntax_error_reports_line() {
    let temp = Project::empty();
    temp.file("script.kvt", "set a 1\nspan\n");

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .fails()
        .stderr_has("line 2: usage: span LABEL [PARENT]");
}

#[test]
fn unknown_span_reports_line() {
    let temp = Project::empty();
    temp.file("script.kvt", "set a 1\n@missing get a\n");

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .fails()
        .stderr_has("line 2: unknown span 'missing'");
}

#[test]
fn unterminated_pipeline_fails() {
    let temp = Project::empty();
    temp.file("script.kvt", "pipeline\nset a 1\n");

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .fails()
        .stderr_has("line 1: pipeline is never executed");
}

#[test]
fn invalid_config_fails() {
    let temp = Project::empty();
    temp.file("kvt.toml", "[cluster]\nnodes = 0\n");
    temp.file("script.kvt", "ping\n");

    temp.kvt()
        .args(&["--config", "kvt.toml", "replay", "script.kvt"])
        .fails()
        .stderr_has("cluster.nodes must be at least 1");
}

#[test]
fn unknown_config_key_fails() {
    let temp = Project::empty();
    temp.file("kvt.toml", "[log]\nlevel = \"debug\"\n");

    temp.kvt()
        .args(&["--config", "kvt.toml", "classify", "get"])
        .fails()
        .stderr_has("unknown field");
}

#[test]
fn zero_nodes_flag_is_rejected() {
    let temp = Project::empty();
    temp.file("script.kvt", "ping\n");

    temp.kvt()
        .args(&["--nodes", "0", "replay", "script.kvt"])
        .fails();
}

#[test]
fn store_errors_do_not_fail_the_process() {
    let temp = Project::empty();
    temp.file("script.kvt", "frobnicate\n");

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_has("(error) ERR unknown command 'frobnicate'\n");
}
