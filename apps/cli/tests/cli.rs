//! End-to-end coverage for the `nebula` binary: a workflow definition on
//! disk, trigger input and resume payloads piped through stdin.

use std::collections::HashMap;
use std::io::Write;

use assert_cmd::Command;
use nebula_core::{NodeId, WorkflowId};
use nebula_workflow::{Connection, NodeDefinition, NodeType, WorkflowDefinition};
use predicates::str::contains;
use serde_json::json;

fn linear_workflow() -> WorkflowDefinition {
    let trigger = NodeDefinition::new(NodeId::v4(), "start", NodeType::Trigger, "MANUAL");
    let transform = NodeDefinition::new(NodeId::v4(), "transform", NodeType::Action, "DATA_TRANSFORMATION");
    let connections = vec![Connection::new(trigger.id, transform.id)];
    WorkflowDefinition {
        id: WorkflowId::v4(),
        name: "linear".into(),
        description: None,
        version: semver::Version::new(0, 1, 0),
        nodes: vec![trigger, transform],
        connections,
        variables: HashMap::new(),
        config: Default::default(),
        tags: Vec::new(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

fn approval_workflow() -> (WorkflowDefinition, NodeId) {
    let trigger = NodeDefinition::new(NodeId::v4(), "start", NodeType::Trigger, "MANUAL");
    let hil = NodeDefinition::new(NodeId::v4(), "approve", NodeType::HumanInTheLoop, "APPROVAL");
    let connections = vec![Connection::new(trigger.id, hil.id)];
    let hil_id = hil.id;
    let workflow = WorkflowDefinition {
        id: WorkflowId::v4(),
        name: "approval".into(),
        description: None,
        version: semver::Version::new(0, 1, 0),
        nodes: vec![trigger, hil],
        connections,
        variables: HashMap::new(),
        config: Default::default(),
        tags: Vec::new(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    (workflow, hil_id)
}

fn write_workflow(dir: &tempfile::TempDir, name: &str, workflow: &WorkflowDefinition) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture file");
    file.write_all(serde_json::to_string_pretty(workflow).unwrap().as_bytes()).unwrap();
    path
}

#[test]
fn run_finishes_a_linear_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workflow(&dir, "linear.json", &linear_workflow());

    Command::cargo_bin("nebula")
        .unwrap()
        .arg("run")
        .arg(&path)
        .write_stdin(json!({"hello": "world"}).to_string())
        .assert()
        .success()
        .stdout(contains("\"Finished\""))
        .stdout(contains("\"Success\""));
}

#[test]
fn run_pauses_on_a_human_in_the_loop_node_and_resume_finishes_it() {
    let dir = tempfile::tempdir().unwrap();
    let (workflow, hil_id) = approval_workflow();
    let path = write_workflow(&dir, "approval.json", &workflow);

    let run_output = Command::cargo_bin("nebula")
        .unwrap()
        .arg("run")
        .arg(&path)
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("\"Paused\""))
        .get_output()
        .stdout
        .clone();

    let outcome: serde_json::Value = serde_json::from_slice(&run_output).expect("run output is JSON");
    let pause = outcome["Paused"]["pause"].clone();
    let state = outcome["Paused"]["state"].clone();

    let resume_input = json!({
        "pause": pause,
        "state": state,
        "node_id": hil_id.to_string(),
        "response": {"approved": true},
    });

    Command::cargo_bin("nebula")
        .unwrap()
        .arg("resume")
        .arg(&path)
        .write_stdin(resume_input.to_string())
        .assert()
        .success()
        .stdout(contains("\"Finished\""))
        .stdout(contains("\"Success\""));
}

#[test]
fn run_rejects_a_missing_workflow_file() {
    Command::cargo_bin("nebula")
        .unwrap()
        .arg("run")
        .arg("/nonexistent/workflow.json")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("reading"));
}
