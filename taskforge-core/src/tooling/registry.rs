//! Name-keyed tool registry.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::interface::Tool;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool '{name}' is already registered")]
    Duplicate { name: String },
}

/// Immutable-after-setup map of the capabilities one agent can dispatch.
/// BTreeMap keeps the catalog in a stable order for the master prompt.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        debug!(tool = name.as_str(), "Registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Human-readable catalog embedded in the master prompt.
    pub fn catalog(&self) -> String {
        let mut out = String::new();
        for tool in self.tools.values() {
            let _ = writeln!(out, "- {}: {}", tool.name(), tool.description());
            for param in tool.params() {
                let requirement = if param.required { "required" } else { "optional" };
                let _ = writeln!(
                    out,
                    "    - {} ({}, {}): {}",
                    param.name,
                    param.kind.as_str(),
                    requirement,
                    param.description
                );
            }
        }
        out
    }
}
