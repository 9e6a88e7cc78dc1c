//! Standalone replay specs
//!
//! Replies print in order, followed by the span report.

use crate::prelude::*;

const HEADER: &str = "ID   PARENT NAME                 STATE    TAGS\n";

#[test]
fn traced_set_reports_one_span() {
    let temp = Project::empty();
    temp.file("script.kvt", "set xxx 10\n");

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_eq(&format!(
            "OK\n\n{}1    -      set                  finished -\n",
            HEADER
        ));
}

#[test]
fn call_under_caller_span() {
    let temp = Project::empty();
    temp.file(
        "script.kvt",
        "# parent span held by the caller\nspan P\n@P set xxx choo\nfinish P\n",
    );

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_eq(&format!(
            "OK\n\n{}{}{}",
            HEADER,
            "1    -      P                    finished -\n",
            "2    1      set                  finished -\n",
        ));
}

#[test]
fn failed_command_is_a_reply_and_tags_span() {
    let temp = Project::empty();
    temp.file("script.kvt", "direct set counter abc\nincr counter\n");

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_eq(&format!(
            "OK\n(error) ERR value is not an integer or out of range\n\n{}{}",
            HEADER, "1    -      incr                 finished error=true\n",
        ));
}

#[test]
fn restricted_and_direct_calls_have_no_spans() {
    let temp = Project::empty();
    temp.file(
        "script.kvt",
        "span P\n@P ping\n@P select 1\ndirect set k v\ndirect get k\n",
    );

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_eq(&format!(
            "PONG\nOK\nOK\n\"v\"\n\n{}{}",
            HEADER, "1    -      P                    open     -\n",
        ));
}

#[test]
fn pipeline_has_exactly_one_span() {
    let temp = Project::empty();
    temp.file(
        "script.kvt",
        "pipeline\nset a 1\nincr a\nincrby a 5\nget a\nexec\n",
    );

    temp.kvt()
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_eq(&format!(
            "OK\n(integer) 2\n(integer) 7\n\"7\"\n\n{}{}",
            HEADER, "1    -      pipeline             finished -\n",
        ));
}

#[test]
fn scripts_from_config_and_script_are_traced() {
    let temp = Project::empty();
    temp.file(
        "kvt.toml",
        "[[scripts]]\nname = \"echoKeys\"\nkeys = 2\n",
    );
    temp.file(
        "script.kvt",
        "define echoDynamic dynamic\nechoKeys k1 k2 a1\nechoDynamic 1 k1 a1 a2\n",
    );

    temp.kvt()
        .args(&["--config", "kvt.toml", "replay", "script.kvt"])
        .passes()
        .stdout_has("[\"k1\", \"k2\", \"a1\"]\n")
        .stdout_has("[\"k1\", \"a1\", \"a2\"]\n")
        .stdout_has("echoKeys")
        .stdout_has("echoDynamic")
        .stdout_lacks("error=true");
}

#[test]
fn debug_logging_goes_to_stderr() {
    let temp = Project::empty();
    temp.file("script.kvt", "set k v\n");

    temp.kvt()
        .env("KVT_LOG", "debug")
        .args(&["replay", "script.kvt"])
        .passes()
        .stdout_has("OK\n")
        .stdout_lacks("span opened")
        .stderr_has("span opened");
}
