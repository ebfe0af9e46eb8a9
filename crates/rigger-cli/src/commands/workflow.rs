//! `rigger workflow` — Run, validate and explain workflow files locally.

use std::path::Path;

use rigger_core::state::AppState;
use rigger_core::workflow::executor::{ExecutionListener, ExecutorOptions, WorkflowExecutor};
use rigger_core::workflow::model::{StepResult, Workflow, WorkflowResult};
use rigger_core::workflow::parser::{empty_parameters, Parser};

/// Load template parameters from a JSON or YAML file. YAML is used for
/// anything that is not a `.json` file.
pub fn load_params(path: Option<&str>) -> Result<serde_json::Value, String> {
    let Some(path) = path else {
        return Ok(empty_parameters());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read params file '{}': {}", path, e))?;

    let is_json = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON params in '{}': {}", path, e))
    } else {
        serde_yaml::from_str(&raw).map_err(|e| format!("Invalid YAML params in '{}': {}", path, e))
    }
}

/// Read and parse a workflow file. The file stem becomes the workflow id.
pub fn load_workflow(
    state: &AppState,
    workflow_file: &str,
    params_file: Option<&str>,
) -> Result<Workflow, String> {
    let source = std::fs::read_to_string(workflow_file)
        .map_err(|e| format!("Failed to read workflow '{}': {}", workflow_file, e))?;
    let params = load_params(params_file)?;
    let name = Path::new(workflow_file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "workflow".to_string());

    tracing::debug!("[Cli] parsing workflow '{}' from {}", name, workflow_file);
    Parser::with_registry(state.registry.clone())
        .parse_workflow(&source, &name, &params)
        .map_err(|e| e.to_string())
}

/// Prints one line per finished command.
struct ConsoleListener {
    verbose: bool,
}

impl ExecutionListener for ConsoleListener {
    fn command_started(&self, workflow: &Workflow, index: usize) {
        if self.verbose {
            println!(
                "▶ [{}/{}] {}",
                index + 1,
                workflow.len(),
                workflow.commands[index].user_string()
            );
        }
    }

    fn command_finished(&self, workflow: &Workflow, step: &StepResult) {
        let marker = if step.success { "✅" } else { "❌" };
        println!(
            "{} [{}/{}] {}",
            marker,
            step.index + 1,
            workflow.len(),
            workflow.commands[step.index]
        );
        if self.verbose && !step.output.is_empty() {
            println!("   {}", step.output);
        }
        if let Some(err) = &step.error {
            println!("   {}", err);
        }
    }
}

/// Run a workflow file in-process, or only print its plan (returns `None`).
/// `sequential_async` awaits async commands inline, as `rigger server
/// --sequential-async` does.
pub async fn run(
    state: &AppState,
    workflow_file: &str,
    params_file: Option<&str>,
    explain_plan: bool,
    sequential_async: bool,
    verbose: bool,
) -> Result<Option<WorkflowResult>, String> {
    let workflow = load_workflow(state, workflow_file, params_file)?;

    println!("📄 Loaded workflow: {} ({})", workflow.description, workflow_file);
    println!("   {} command(s)", workflow.len());
    println!();

    if explain_plan {
        println!("{}", workflow.pretty_print());
        return Ok(None);
    }

    let executor = WorkflowExecutor::with_options(ExecutorOptions {
        concurrent_async: !sequential_async,
    });
    let result = executor
        .execute(&workflow, &ConsoleListener { verbose })
        .await;

    if result.success {
        println!("\n🎉 Workflow completed successfully!");
        Ok(Some(result))
    } else {
        Err(format!(
            "Workflow failed ({} of {} command(s) not run): {}",
            result.skipped(&workflow),
            workflow.len(),
            result.error.as_deref().unwrap_or("unknown error")
        ))
    }
}

/// Parse a workflow file without running it.
pub async fn validate(
    state: &AppState,
    workflow_file: &str,
    params_file: Option<&str>,
) -> Result<(), String> {
    let workflow = load_workflow(state, workflow_file, params_file)?;
    println!(
        "✅ Workflow '{}' is valid ({} command(s))",
        workflow.description,
        workflow.len()
    );
    for (i, step) in workflow.user_steps().iter().enumerate() {
        println!("   {}. {}", i + 1, step);
    }
    Ok(())
}

/// List every registered command discriminant.
pub async fn list_commands(state: &AppState) -> Result<(), String> {
    println!("┌──────────┬──────────────┐");
    println!("│ Type     │ Name         │");
    println!("├──────────┼──────────────┤");
    for cmd in state.registry.commands() {
        println!("│ {:<8} │ {:<12} │", cmd.category.as_str(), cmd.name);
    }
    println!("└──────────┴──────────────┘");
    Ok(())
}
