// CLI integration tests for the load/unload host and the parse command.
use std::process::{Command, Output};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_intseq");
    let mut command = Command::new(exe);
    command.env_remove("INTSEQ_INT_STR").env_remove("RUST_LOG");
    command
}

fn parse_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().next().expect("json line");
    serde_json::from_str(line).expect("valid json")
}

fn entries(report: &Value) -> Vec<i64> {
    report["report"]["entries"]
        .as_array()
        .expect("entries array")
        .iter()
        .map(|value| value.as_i64().expect("integer entry"))
        .collect()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn load_reports_values_in_order() {
    let load = cmd()
        .args(["load", "--int-str", "1,2,3", "--json"])
        .output()
        .expect("load");
    assert!(load.status.success());

    let report = parse_json_line(&load.stdout);
    assert_eq!(report["report"]["status"], "ok");
    assert_eq!(entries(&report), vec![1, 2, 3]);
    assert_eq!(report["report"]["tokens"], 3);

    let lines = report["report"]["lines"].as_array().expect("lines");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3]["kind"], "cleanup");
}

#[test]
fn load_logs_each_value_before_cleanup() {
    let load = cmd()
        .args(["load", "--int-str", "7,8"])
        .output()
        .expect("load");
    assert!(load.status.success());

    let stderr = stderr_text(&load);
    let first = stderr.find("value=7").expect("first value logged");
    let second = stderr.find("value=8").expect("second value logged");
    let cleanup = stderr.find("cleaning up").expect("cleanup logged");
    assert!(first < second);
    assert!(second < cleanup);
}

#[test]
fn missing_input_exit_code() {
    let load = cmd().args(["load"]).output().expect("load");
    assert_eq!(load.status.code().unwrap(), 3);

    let stderr = stderr_text(&load);
    let notice = stderr
        .find("missing parameter")
        .expect("missing parameter logged");
    assert!(stderr[notice..].contains("int_str"));
    assert!(!stderr.contains("cleaning up"));

    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("json error line");
    let err: Value = serde_json::from_str(line).expect("valid json");
    assert_eq!(err["error"]["kind"], "MissingInput");
    assert!(err["error"]["hint"].as_str().unwrap().contains("--int-str"));
}

#[test]
fn empty_input_is_not_missing() {
    let load = cmd()
        .args(["load", "--int-str", ",,,", "--json"])
        .output()
        .expect("load");
    assert!(load.status.success());
    let report = parse_json_line(&load.stdout);
    assert!(entries(&report).is_empty());
    assert_eq!(report["report"]["skipped"], 4);
}

#[test]
fn malformed_token_exit_code_and_partial_report() {
    let load = cmd()
        .args(["load", "--int-str", "5,abc,6", "--json"])
        .output()
        .expect("load");
    assert_eq!(load.status.code().unwrap(), 4);

    let report = parse_json_line(&load.stdout);
    assert_eq!(report["report"]["status"], "failed");
    assert_eq!(entries(&report), vec![5]);
    assert_eq!(report["report"]["error"]["token"], "abc");
}

#[test]
fn entry_limit_exit_code() {
    let load = cmd()
        .args(["load", "--int-str", "1,2,3", "--max-entries", "2", "--json"])
        .output()
        .expect("load");
    assert_eq!(load.status.code().unwrap(), 5);

    let report = parse_json_line(&load.stdout);
    assert_eq!(entries(&report), vec![1, 2]);
    assert_eq!(report["report"]["error"]["kind"], "Allocation");
}

#[test]
fn int_str_falls_back_to_env() {
    let load = cmd()
        .env("INTSEQ_INT_STR", "0x1F,017,9")
        .args(["load", "--json"])
        .output()
        .expect("load");
    assert!(load.status.success());
    assert_eq!(entries(&parse_json_line(&load.stdout)), vec![31, 15, 9]);
}

#[test]
fn parse_prints_values_one_per_line() {
    let parse = cmd().args(["parse", "10,,20"]).output().expect("parse");
    assert!(parse.status.success());
    assert_eq!(String::from_utf8_lossy(&parse.stdout), "10\n20\n");
}

#[test]
fn parse_accepts_leading_negative_value() {
    let parse = cmd()
        .args(["parse", "-3,4", "--json"])
        .output()
        .expect("parse");
    assert!(parse.status.success());
    let value = parse_json_line(&parse.stdout);
    assert_eq!(value["values"][0], -3);
    assert_eq!(value["values"][1], 4);
}

#[test]
fn usage_exit_code() {
    let load = cmd()
        .args(["load", "--max-entries", "lots"])
        .output()
        .expect("load");
    assert_eq!(load.status.code().unwrap(), 2);
}
