//! JSON report specs

use crate::prelude::*;

#[test]
fn json_report_has_replies_and_spans() {
    let temp = Project::empty();
    temp.file(
        "script.kvt",
        "span P\n@P set xxx 10\n@P incr nothing-here\nget xxx\nfinish P\n",
    );

    let run = temp
        .kvt()
        .args(&["--format", "json", "replay", "script.kvt"])
        .passes();
    let report = run.json();

    let replies = report["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["line"], 2);
    assert_eq!(replies[0]["command"], "set");
    assert_eq!(replies[0]["reply"], "OK");
    assert_eq!(replies[1]["reply"], 1);
    assert_eq!(replies[2]["reply"], "10");

    let spans = report["spans"].as_array().unwrap();
    let names: Vec<&str> = spans.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["P", "set", "incr", "get"]);

    let parent_id = &spans[0]["id"];
    assert_eq!(&spans[1]["parent_id"], parent_id);
    assert_eq!(&spans[2]["parent_id"], parent_id);
    assert!(spans[3]["parent_id"].is_null());
    assert!(spans.iter().all(|s| !s["finished_at"].is_null()));
    assert!(spans.iter().all(|s| s["tags"].as_object().unwrap().is_empty()));
}

#[test]
fn json_errors_carry_kind() {
    let temp = Project::empty();
    temp.file("script.kvt", "define echoKeys 2\nechoKeys foo bar\n");

    let report = temp
        .kvt()
        .args(&["--cluster", "--format", "json", "replay", "script.kvt"])
        .passes()
        .json();

    let error = &report["replies"][0]["error"];
    assert_eq!(error["kind"], "cross_slot");
    assert_eq!(
        error["message"],
        "CROSSSLOT Keys in request don't hash to the same slot"
    );
    assert_eq!(report["spans"][0]["tags"]["error"], true);
}
