//! Workflow engine — templated definitions turned into runnable commands.
//!
//! A workflow source is rendered with install parameters, decoded through
//! the `CommandRegistry`, and handed to the `WorkflowExecutor`, which runs
//! the commands in order and stops on the first failure.

pub mod command;
pub mod commands;
pub mod executor;
pub mod model;
pub mod parser;
pub mod poll;
pub mod registry;

pub use command::{Category, Command, CommandId, CommandResult};
pub use executor::{ExecutionListener, ExecutorOptions, NoopListener, WorkflowExecutor};
pub use model::{StepResult, Workflow, WorkflowResult};
pub use parser::Parser;
pub use registry::CommandRegistry;
