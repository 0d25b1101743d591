//! Response envelopes returned by the entity API and printed by `ideate`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Response from `list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse {
    pub items: Vec<Entity>,
    pub count: usize,
}

impl ListResponse {
    #[must_use]
    pub fn new(items: Vec<Entity>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

/// Response from `delete`, `archive` and `restore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
