//! Tool registry: one tool per enabled operation, named `{domain}_{op}`.
//!
//! Definitions come from the operation contracts, so what `tools/list`
//! advertises is exactly what the validation engine enforces.

use std::collections::HashMap;
use std::sync::Arc;

use ideate_core::enums::Operation;
use ideate_schema::OperationContract;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::protocol::ToolDefinition;
use crate::surface::{ApiRequest, EntityApi};

/// Failure of a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The entity operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A single registered tool backed by one entity operation.
#[derive(Debug, Clone)]
pub struct EntityTool {
    operation: Operation,
    contract: OperationContract,
}

impl EntityTool {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.contract.tool_name
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.contract.tool_name.clone(),
            description: self.contract.description.clone(),
            input_schema: self.contract.input.clone(),
            output_schema: Some(self.contract.output.clone()),
        }
    }
}

/// Registry of the tools of one domain.
#[derive(Debug)]
pub struct ToolRegistry {
    api: Arc<EntityApi>,
    tools: HashMap<String, EntityTool>,
    /// Tool names in exposure order.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Register a tool for every operation the surface exposes.
    #[must_use]
    pub fn new(api: Arc<EntityApi>) -> Self {
        let loaded = Arc::clone(api.store().schema());
        let mut registry = Self {
            api,
            tools: HashMap::new(),
            order: Vec::new(),
        };

        for contract in ideate_schema::contracts(&loaded) {
            registry.register(EntityTool {
                operation: contract.operation,
                contract,
            });
        }

        debug!("Registered {} tools", registry.tools.len());
        registry
    }

    fn register(&mut self, tool: EntityTool) {
        let name = tool.name().to_string();
        debug!("Registering tool: {}", name);
        self.order.push(name.clone());
        self.tools.insert(name, tool);
    }

    /// List all available tools in exposure order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(EntityTool::definition)
            .collect()
    }

    /// Check if a tool exists
    #[must_use]
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Call a tool by name.
    ///
    /// The result is `{result, schema}`: the operation's response body and
    /// the active domain schema.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::UnknownTool` for an unregistered name, otherwise
    /// the operation's `ApiError`.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let request = ApiRequest::from_arguments(tool.operation, arguments)?;
        let response = self.api.handle(request).await?;

        Ok(json!({
            "result": response.to_json(),
            "schema": self.api.describe(),
        }))
    }
}
