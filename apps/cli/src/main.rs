//! Thin demonstration binary for the workflow engine.
//!
//! Not a product surface — just enough to exercise `Run` and
//! `ResumeExecution` end to end from the shell: a workflow definition comes
//! from a file argument (too large to pipe comfortably), everything else
//! flows through stdin/stdout as JSON.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nebula_core::NodeId;
use nebula_engine::{Engine, RunOutcome};
use nebula_execution::ExecutionState;
use nebula_workflow::WorkflowDefinition;
use serde::Deserialize;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "nebula", about = "Run and resume workflow executions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a workflow definition to completion or its first pause.
    ///
    /// Trigger input is read as JSON from stdin (an empty stdin means
    /// `null`). The resulting `RunOutcome` is printed to stdout as JSON.
    Run {
        /// Path to a workflow definition JSON file.
        workflow: PathBuf,
    },
    /// Resume a previously paused execution.
    ///
    /// Reads a JSON object from stdin: `{"pause", "state", "node_id",
    /// "response"}`, where `pause`/`state` are the `ExecutionPause`/
    /// `ExecutionState` from a prior `Run`'s `Paused` outcome.
    Resume {
        /// Path to the same workflow definition JSON file used to start the run.
        workflow: PathBuf,
    },
}

#[derive(Deserialize)]
struct ResumeInput {
    pause: nebula_engine::ExecutionPause,
    state: ExecutionState,
    node_id: String,
    #[serde(default)]
    response: Value,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = nebula_log::auto_init().context("failed to initialize logging")?;
    let cli = Cli::parse();

    match cli.command {
        Command::Run { workflow } => run_workflow(&workflow).await,
        Command::Resume { workflow } => resume_workflow(&workflow).await,
    }
}

async fn run_workflow(path: &PathBuf) -> Result<()> {
    let workflow = load_workflow(path)?;
    let trigger_info = read_stdin_json()?;

    let engine = Engine::with_builtins();
    let outcome = engine.run(&workflow, trigger_info).await.context("run failed")?;
    print_outcome(&outcome)
}

async fn resume_workflow(path: &PathBuf) -> Result<()> {
    let workflow = load_workflow(path)?;
    let input: ResumeInput = read_stdin_json_as()?;
    let node_id = NodeId::parse(&input.node_id).map_err(|e| anyhow::anyhow!("invalid node id: {e}"))?;

    let engine = Engine::with_builtins();
    let outcome = engine
        .resume_from_pause(&workflow, input.pause, input.state, node_id, input.response)
        .await
        .context("resume failed")?;
    print_outcome(&outcome)
}

fn load_workflow(path: &PathBuf) -> Result<WorkflowDefinition> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing workflow definition from {}", path.display()))
}

fn read_stdin_json() -> Result<Value> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).context("parsing stdin as JSON")
}

fn read_stdin_json_as<T: for<'de> Deserialize<'de>>() -> Result<T> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
    serde_json::from_str(&text).context("parsing stdin as JSON")
}

fn print_outcome(outcome: &RunOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    match outcome {
        RunOutcome::Finished { execution_id, state } => {
            tracing::info!(%execution_id, status = ?state.status, "execution finished");
        }
        RunOutcome::Paused { execution_id, pause, .. } => {
            tracing::info!(%execution_id, node_id = %pause.current_node_id, "execution paused");
        }
    }
    Ok(())
}
