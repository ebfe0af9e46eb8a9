//! Workflow parser — template rendering + JSON decoding.
//!
//! A workflow source is JSON with `//` line comments and Handlebars
//! directives:
//!
//! ```text
//! {
//!  "description": "Install application cluster",
//!  // One command per node
//!  "commands": [
//!   {"type":"sync", "name": "exec", "cmd": "prepare", "args":["{{InstallRequest.InstallId}}"]}
//!   {{#each InstallRequest.Nodes}}
//!   ,{"type":"sync", "name": "exec", "cmd": "node{{@index}}", "args":["{{this}}"]}
//!   {{/each}}
//!  ]
//! }
//! ```
//!
//! Parsing runs in four steps, each of which aborts the whole parse:
//! strip comments, render the template (strict: unknown fields are
//! errors), decode the JSON document, decode every command through the
//! `CommandRegistry`.

use std::sync::Arc;

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WorkflowError;
use crate::workflow::command::Command;
use crate::workflow::model::Workflow;
use crate::workflow::registry::{self, CommandRegistry};

/// Top-level shape of a rendered workflow document.
#[derive(Debug, Deserialize)]
struct WorkflowDocument {
    #[serde(default)]
    description: String,
    commands: Vec<Value>,
}

pub struct Parser {
    registry: Arc<CommandRegistry>,
    templates: Handlebars<'static>,
}

impl Parser {
    /// Parser backed by the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(registry::global())
    }

    pub fn with_registry(registry: Arc<CommandRegistry>) -> Self {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        // Output is JSON, not HTML
        templates.register_escape_fn(handlebars::no_escape);
        Self { registry, templates }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Turn `source` into a `Workflow` called `name`, rendering the template
    /// against `params`.
    pub fn parse_workflow<P: Serialize>(
        &self,
        source: &str,
        name: &str,
        params: &P,
    ) -> Result<Workflow, WorkflowError> {
        let rendered = self.render(source, name, params)?;

        let document: WorkflowDocument = serde_json::from_str(&rendered).map_err(|e| {
            WorkflowError::MalformedDefinition(format!("workflow '{}': {}", name, e))
        })?;

        let commands: Vec<Arc<dyn Command>> = document
            .commands
            .iter()
            .map(|raw| self.registry.decode(raw).map(Arc::from))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "[Parser] workflow '{}' parsed with {} command(s)",
            name,
            commands.len()
        );
        Ok(Workflow::new(name, document.description, commands))
    }

    /// Strip comments and render the template, returning the JSON text.
    pub fn render<P: Serialize>(&self, source: &str, name: &str, params: &P) -> Result<String, WorkflowError> {
        let stripped = strip_comments(source);
        self.templates
            .render_template(&stripped, params)
            .map_err(|e| WorkflowError::Template(format!("workflow '{}': {}", name, e)))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty parameter bag for sources without template references.
pub fn empty_parameters() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Remove `//` line comments. Text inside JSON string literals is left
/// untouched so URLs such as `"http://host"` survive.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' || c == '\n' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Skip to end of line, keep the newline
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::command::Category;
    use crate::workflow::commands::{Exec, Scp, Try};

    const BASIC_DEFINITION_NO_TEMPLATE: &str = r#"
{
 "description": "basicDefinitionNoTemplate",
 // This is a comment
 "commands": [
  {"type":"sync", "name": "exec", "cmd": "cmd1"},
  {"type":"sync", "name": "exec", "cmd": "cmd2", "args":["arg1"]}
 ]
}
"#;

    const BASIC_DEFINITION_TWO_COMMANDS: &str = r#"
{
 "description": "basicDefinitionTwoCommands",
 "commands": [
  {"type":"sync", "name": "exec", "cmd": "cmd1"},
  {"type":"sync", "name": "scp", "targetHost": "127.0.0.1", "credentials":{"username": "username", "password":"passwd", "privateKey":""}, "source":"script.sh", "destination":"/opt/scripts/."}
 ]
}
"#;

    const BASIC_TEMPLATE_ITERATION: &str = r#"
{
 "description": "basicTemplateIteration",
 "commands": [
  {"type":"sync", "name": "exec", "cmd": "generalCmd", "args":["{{InstallRequest.InstallId}}", "{{InstallRequest.ClusterId}}"]}
  {{#each InstallRequest.Nodes}}
  ,{"type":"sync", "name": "exec", "cmd": "cmd{{@index}}", "args":["{{this}}"]}
  {{/each}}
 ]
}
"#;

    fn test_parameters(num_nodes: usize) -> Value {
        let nodes: Vec<String> = (0..num_nodes).map(|i| format!("10.1.1.{}", i)).collect();
        serde_json::json!({
            "InstallRequest": {
                "InstallId": "install-0001",
                "ClusterId": "cluster-0001",
                "Nodes": nodes,
            }
        })
    }

    fn exec_of(workflow: &Workflow, index: usize) -> &Exec {
        workflow.commands[index]
            .as_any()
            .downcast_ref::<Exec>()
            .expect("expected an exec command")
    }

    #[test]
    fn test_parse_without_template() {
        let parser = Parser::new();
        let workflow = parser
            .parse_workflow(BASIC_DEFINITION_NO_TEMPLATE, "TestParseWorkflow_Basic", &empty_parameters())
            .unwrap();
        assert_eq!(workflow.id, "TestParseWorkflow_Basic");
        assert_eq!(workflow.description, "basicDefinitionNoTemplate");
        assert_eq!(workflow.len(), 2);
        assert_eq!(exec_of(&workflow, 0).cmd, "cmd1");
        assert_eq!(exec_of(&workflow, 1).args, vec!["arg1".to_string()]);
    }

    #[test]
    fn test_parse_single_line_source() {
        let source = r#"{"description":"d","commands":[{"type":"sync","name":"exec","cmd":"cmd1"},{"type":"sync","name":"exec","cmd":"cmd2","args":["arg1"]}]}"#;
        let workflow = Parser::new().parse_workflow(source, "inline", &empty_parameters()).unwrap();
        assert_eq!(workflow.len(), 2);
        assert_eq!(exec_of(&workflow, 0).cmd, "cmd1");
    }

    #[test]
    fn test_parse_iterates_nodes() {
        let num_nodes = 10;
        let params = test_parameters(num_nodes);
        let workflow = Parser::new()
            .parse_workflow(BASIC_TEMPLATE_ITERATION, "TestParseWorkflow_SimpleTemplate", &params)
            .unwrap();
        assert_eq!(workflow.len(), num_nodes + 1);

        let first = exec_of(&workflow, 0);
        assert_eq!(first.args, vec!["install-0001".to_string(), "cluster-0001".to_string()]);
        for i in 0..num_nodes {
            let node_cmd = exec_of(&workflow, i + 1);
            assert_eq!(node_cmd.cmd, format!("cmd{}", i));
            assert_eq!(node_cmd.args[0], format!("10.1.1.{}", i));
        }
    }

    #[test]
    fn test_parse_no_nodes_yields_static_command_only() {
        let workflow = Parser::new()
            .parse_workflow(BASIC_TEMPLATE_ITERATION, "empty", &test_parameters(0))
            .unwrap();
        assert_eq!(workflow.len(), 1);
    }

    #[test]
    fn test_parse_two_different_commands() {
        let workflow = Parser::new()
            .parse_workflow(BASIC_DEFINITION_TWO_COMMANDS, "TestParseWorkflow_TwoCommands", &empty_parameters())
            .unwrap();
        assert_eq!(workflow.commands[0].name(), "exec");
        assert_eq!(exec_of(&workflow, 0).cmd, "cmd1");
        assert_eq!(workflow.commands[1].name(), "scp");
        let scp = workflow.commands[1].as_any().downcast_ref::<Scp>().unwrap();
        assert_eq!(scp.target_host, "127.0.0.1");
    }

    #[test]
    fn test_parse_nested_try() {
        let source = r#"{"description": "fallback", "commands": [
            {"type":"sync", "name":"try",
             "cmd": {"type":"async", "name":"fail"},
             "onFail": {"type":"sync", "name":"logger", "msg":"recovered"}}
        ]}"#;
        let workflow = Parser::new().parse_workflow(source, "try", &empty_parameters()).unwrap();
        let try_cmd = workflow.commands[0].as_any().downcast_ref::<Try>().unwrap();
        assert_eq!(try_cmd.try_command.category(), Category::Async);
        assert_eq!(try_cmd.on_fail_command.name(), "logger");
    }

    #[test]
    fn test_unknown_command_aborts_parse() {
        let source = r#"{"description": "d", "commands": [
            {"type":"sync", "name":"exec", "cmd":"ok"},
            {"type":"sync", "name":"installIstio"}
        ]}"#;
        match Parser::new().parse_workflow(source, "unknown", &empty_parameters()) {
            Err(WorkflowError::UnknownCommand { category, name }) => {
                assert_eq!(category, "sync");
                assert_eq!(name, "installIstio");
            }
            other => panic!("expected UnknownCommand, got {:?}", other.map(|w| w.len())),
        }
    }

    #[test]
    fn test_missing_parameter_is_template_error() {
        let source = r#"{"description": "{{InstallRequest.Missing}}", "commands": []}"#;
        let err = Parser::new()
            .parse_workflow(source, "missing", &test_parameters(1))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Template(_)));
    }

    #[test]
    fn test_template_syntax_error() {
        let source = r#"{"description": "{{#each}}", "commands": []}"#;
        let err = Parser::new()
            .parse_workflow(source, "syntax", &empty_parameters())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Template(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let source = r#"{"description": "d", "commands": [ {"type":"sync"  "name":"exec"} ]}"#;
        let err = Parser::new()
            .parse_workflow(source, "broken", &empty_parameters())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::MalformedDefinition(_)));
    }

    #[test]
    fn test_strip_comments_keeps_strings() {
        let source = "{\"url\": \"http://example.com\", // trailing\n// full line\n\"a\": \"b\\\"//c\"}";
        let stripped = strip_comments(source);
        assert_eq!(stripped, "{\"url\": \"http://example.com\", \n\n\"a\": \"b\\\"//c\"}");
        assert!(serde_json::from_str::<Value>(&stripped).is_ok());
    }

    #[test]
    fn test_pretty_print_does_not_run_commands() {
        let source = r#"{"description": "plan", "commands": [
            {"type":"sync", "name":"exec", "cmd":"rm", "args":["-rf", "/tmp/never"]},
            {"type":"async", "name":"sleep", "duration":"3600"}
        ]}"#;
        let workflow = Parser::new().parse_workflow(source, "plan", &empty_parameters()).unwrap();
        let plan = workflow.pretty_print();
        assert!(plan.starts_with("Workflow plan: plan"));
        assert!(plan.contains("  SYNC Exec: rm -rf /tmp/never"));
        assert!(plan.contains("  ASYNC Sleep for 3600"));
        assert_eq!(workflow.user_steps(), vec!["Executing rm", "Waiting 3600 seconds"]);
    }
}
