//! rigger CLI — run install workflows locally or serve the install control plane.

use clap::{Parser, Subcommand};

use rigger_cli::commands;

/// rigger — cluster install workflow engine
#[derive(Parser)]
#[command(name = "rigger", version, about = "rigger — cluster install workflow engine")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the rigger HTTP control plane
    Server {
        /// Host to bind to
        #[arg(long, env = "RIGGER_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "RIGGER_PORT", default_value_t = 3310)]
        port: u16,
        /// Await async commands inline instead of overlapping them
        #[arg(long)]
        sequential_async: bool,
    },

    /// Run, validate or inspect workflow files
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// Send a raw JSON-RPC request to an in-process control plane
    Rpc {
        /// JSON-RPC method name (e.g. "installs.list")
        #[arg(long)]
        method: String,
        /// JSON-RPC params as a JSON string
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

#[derive(Subcommand)]
enum WorkflowAction {
    /// Execute a workflow file
    Run {
        /// Path to the workflow file
        file: String,
        /// Template parameters (JSON or YAML file)
        #[arg(long)]
        params: Option<String>,
        /// Print the install plan without executing anything
        #[arg(long)]
        explain_plan: bool,
        /// Await async commands inline instead of overlapping them
        #[arg(long)]
        sequential_async: bool,
        /// Show each command and its output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Parse a workflow file without executing it
    Validate {
        /// Path to the workflow file
        file: String,
        /// Template parameters (JSON or YAML file)
        #[arg(long)]
        params: Option<String>,
    },
    /// List the registered command types
    Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rigger_core=warn,rigger_server=info,rigger_cli=info".into()),
        )
        .init();

    let result = match cli.command {
        Some(Commands::Server {
            host,
            port,
            sequential_async,
        }) => commands::server::run(host, port, sequential_async).await,

        Some(Commands::Workflow { action }) => {
            let state = commands::init_state();
            match action {
                WorkflowAction::Run {
                    file,
                    params,
                    explain_plan,
                    sequential_async,
                    verbose,
                } => commands::workflow::run(
                    &state,
                    &file,
                    params.as_deref(),
                    explain_plan,
                    sequential_async,
                    verbose,
                )
                .await
                .map(|_| ()),
                WorkflowAction::Validate { file, params } => {
                    commands::workflow::validate(&state, &file, params.as_deref()).await
                }
                WorkflowAction::Commands => commands::workflow::list_commands(&state).await,
            }
        }

        Some(Commands::Rpc { method, params }) => {
            let state = commands::init_state();
            commands::rpc::call(&state, &method, &params).await.map(|_| ())
        }

        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
