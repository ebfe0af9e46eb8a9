//! Command registry — maps a `(type, name)` discriminant to a decoder.
//!
//! The parser never branches on concrete command types; it asks the
//! registry to decode each JSON object. Collaborators add their own
//! command kinds by registering a decoder on an owned `CommandRegistry`
//! and installing it as the process-wide registry before any parsing:
//!
//! ```ignore
//! let mut registry = CommandRegistry::with_builtins();
//! registry.register(Category::Sync, "launchComponents", LaunchComponents::decode);
//! registry::install_global(registry)?;
//! ```
//!
//! Once installed the registry is shared read-only behind an `Arc`, so
//! registration cannot run concurrently with lookups.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::WorkflowError;
use crate::workflow::command::{Category, Command};
use crate::workflow::commands;

/// Builds a command from its JSON object. The registry is passed along so
/// composite commands can decode their children.
pub type CommandDecoder =
    fn(&Value, &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError>;

#[derive(Default)]
pub struct CommandRegistry {
    decoders: BTreeMap<(Category, String), CommandDecoder>,
}

/// A registered discriminant pair, as listed by `commands()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredCommand {
    #[serde(rename = "type")]
    pub category: Category,
    pub name: String,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated with every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        commands::register_builtins(&mut registry);
        registry
    }

    /// Register a decoder. Returns the decoder it replaced, if any.
    pub fn register(
        &mut self,
        category: Category,
        name: impl Into<String>,
        decoder: CommandDecoder,
    ) -> Option<CommandDecoder> {
        self.decoders.insert((category, name.into()), decoder)
    }

    pub fn resolve(&self, category: Category, name: &str) -> Result<CommandDecoder, WorkflowError> {
        self.decoders
            .get(&(category, name.to_string()))
            .copied()
            .ok_or_else(|| WorkflowError::UnknownCommand {
                category: category.to_string(),
                name: name.to_string(),
            })
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.decoders.contains_key(&(category, name.to_string()))
    }

    pub fn commands(&self) -> Vec<RegisteredCommand> {
        self.decoders
            .keys()
            .map(|(category, name)| RegisteredCommand {
                category: *category,
                name: name.clone(),
            })
            .collect()
    }

    /// Decode one command object by reading its `type` and `name` fields.
    pub fn decode(&self, value: &Value) -> Result<Box<dyn Command>, WorkflowError> {
        let object = value.as_object().ok_or_else(|| {
            WorkflowError::MalformedDefinition(format!("command must be a JSON object, got {}", value))
        })?;
        let raw_category = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| WorkflowError::MalformedDefinition(format!("command without \"type\": {}", value)))?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| WorkflowError::MalformedDefinition(format!("command without \"name\": {}", value)))?;

        let category = Category::from_str(raw_category).ok_or_else(|| WorkflowError::UnknownCommand {
            category: raw_category.to_string(),
            name: name.to_string(),
        })?;

        let decoder = self.resolve(category, name)?;
        decoder(value, self)
    }
}

/// Deserialize the variant-specific fields of a command object.
pub fn decode_fields<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, WorkflowError> {
    serde_json::from_value(value.clone())
        .map_err(|e| WorkflowError::MalformedDefinition(format!("invalid \"{}\" command: {}", name, e)))
}

// ─── Process-wide registry ────────────────────────────────────────────────

static GLOBAL: OnceLock<Arc<CommandRegistry>> = OnceLock::new();

/// Install the process-wide registry. Must happen during start-up, before
/// the first call to [`global`]; fails if a registry is already in place.
pub fn install_global(registry: CommandRegistry) -> Result<(), CommandRegistry> {
    let mut pending = Some(registry);
    GLOBAL.get_or_init(|| Arc::new(pending.take().unwrap_or_default()));
    match pending {
        None => Ok(()),
        Some(rejected) => Err(rejected),
    }
}

/// The process-wide registry (the built-in set if none was installed).
pub fn global() -> Arc<CommandRegistry> {
    GLOBAL
        .get_or_init(|| Arc::new(CommandRegistry::with_builtins()))
        .clone()
}
