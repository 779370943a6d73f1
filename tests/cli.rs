#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "USE_AI",
    "OPEN_AI_API_KEY",
    "JIRA_URL",
    "JIRA_EMAIL",
    "JIRA_TOKEN",
    "JIRA_PROJECT_KEY",
    "QUIP_TOKEN",
    "RUST_LOG",
];

/// `mytodo` bound to a task file inside `dir`, with no agent or remote configured.
fn mytodo(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mytodo").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("MYTODO_FILE", dir.path().join("tasks.json"))
        .env("NO_COLOR", "1");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Like `mytodo`, with Jira pointed at an unroutable address.
fn mytodo_with_jira(dir: &TempDir) -> Command {
    let mut cmd = mytodo(dir);
    cmd.env("JIRA_URL", "http://127.0.0.1:9").env("JIRA_TOKEN", "token");
    cmd
}

fn read_tasks(dir: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

// ---------------------------------------------------------------------------
// task list
// ---------------------------------------------------------------------------

#[test]
fn list_empty() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn add_and_list() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir)
        .args(["add", "Write", "tests"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0. Write tests: Pending"));

    mytodo(&dir)
        .args(["add", "Ship"])
        .assert()
        .success();

    mytodo(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0. Write tests: Pending"))
        .stdout(predicate::str::contains("1. Ship: Pending"));

    let doc = read_tasks(&dir);
    assert_eq!(doc["tasks"][0]["content"], "Write tests");
    assert_eq!(doc["tasks"][0]["done"], false);
}

#[test]
fn done_undone_edit_comment_remove() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir).args(["add", "First"]).assert().success();
    mytodo(&dir).args(["add", "Second"]).assert().success();

    mytodo(&dir)
        .args(["done", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0. First: Completed"));

    mytodo(&dir)
        .args(["undone", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0. First: Pending"));

    mytodo(&dir)
        .args(["edit", "1", "Second, revised"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Second, revised: Pending"));

    mytodo(&dir)
        .args(["comment", "1", "waiting on review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t\t- waiting on review"));

    mytodo(&dir)
        .args(["remove", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0. Second, revised: Pending"));

    let doc = read_tasks(&dir);
    assert_eq!(doc["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(doc["tasks"][0]["comments"][0], "waiting on review");
}

#[test]
fn list_json() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir).args(["add", "One"]).assert().success();

    let output = mytodo(&dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["tasks"][0]["content"], "One");
}

#[test]
fn explicit_file_flag_wins() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.json");
    mytodo(&dir)
        .arg("--file")
        .arg(&other)
        .args(["add", "Elsewhere"])
        .assert()
        .success();

    assert!(other.exists());
    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn invalid_index_exits_not_found() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir).args(["add", "Only"]).assert().success();

    mytodo(&dir)
        .args(["done", "5"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Task not found"))
        .stderr(predicate::str::contains("0..=0"));
}

#[test]
fn empty_list_index_exits_not_found() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir)
        .args(["remove", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn blank_edit_is_rejected() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir).args(["add", "Keep me"]).assert().success();

    mytodo(&dir).args(["edit", "0", "   "]).assert().code(4);

    let doc = read_tasks(&dir);
    assert_eq!(doc["tasks"][0]["content"], "Keep me");
}

#[test]
fn non_numeric_index_is_usage_error() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir).args(["done", "first"]).assert().code(2);
}

#[test]
fn summary_without_agent_is_config_error() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir)
        .args(["list", "--summary"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("USE_AI"));
}

// ---------------------------------------------------------------------------
// jira configuration and argument validation (no network)
// ---------------------------------------------------------------------------

#[test]
fn tracker_without_jira_config() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir)
        .args(["jira-epic-tracker", "E-1"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("JIRA_URL"));
}

#[test]
fn tracker_config_error_as_json() {
    let dir = TempDir::new().unwrap();
    let output = mytodo(&dir)
        .args(["jira-epic-tracker", "E-1", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7));
    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"]["code"], "CONFIG_ERROR");
    assert_eq!(value["error"]["exit_code"], 7);
}

#[test]
fn tracker_blank_epic_key() {
    let dir = TempDir::new().unwrap();
    mytodo_with_jira(&dir)
        .args(["jira-epic-tracker", "  "])
        .assert()
        .code(4);
}

#[test]
fn tracker_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    mytodo_with_jira(&dir)
        .args(["jira-epic-tracker", "E-1", "--format", "xml"])
        .assert()
        .code(2);
}

#[test]
fn tracker_quip_requires_token() {
    let dir = TempDir::new().unwrap();
    mytodo_with_jira(&dir)
        .args(["jira-epic-tracker", "E-1", "--quip", "https://acme.quip.com/ePhz/Tracker"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("QUIP_TOKEN"));
}

#[test]
fn tracker_quip_url_is_validated() {
    let dir = TempDir::new().unwrap();
    mytodo_with_jira(&dir)
        .env("QUIP_TOKEN", "quip")
        .args(["jira-epic-tracker", "E-1", "--quip", "https://example.com/doc"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not a Quip document URL"));
}

#[test]
fn summary_requires_project_key() {
    let dir = TempDir::new().unwrap();
    mytodo_with_jira(&dir)
        .args(["jira-summary", "--yes"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("JIRA_PROJECT_KEY"));
}

#[test]
fn create_rejects_blank_summary() {
    let dir = TempDir::new().unwrap();
    mytodo_with_jira(&dir)
        .env("JIRA_PROJECT_KEY", "P")
        .args(["jira-create", "--summary", " ", "--yes"])
        .assert()
        .code(4);
}

// ---------------------------------------------------------------------------
// completions
// ---------------------------------------------------------------------------

#[test]
fn completions_bash() {
    let dir = TempDir::new().unwrap();
    mytodo(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mytodo"));
}
