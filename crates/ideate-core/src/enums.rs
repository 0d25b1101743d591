//! Operation and validation-mode enums for Ideate.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// An entity operation a domain may expose.
///
/// `list` and `get` are always available. The rest are gated by the domain's
/// feature flags (see [`crate::schema::Features::allows`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Archive,
    Restore,
}

impl Operation {
    /// Every operation, in the order they are exposed.
    pub const ALL: [Self; 7] = [
        Self::List,
        Self::Get,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Archive,
        Self::Restore,
    ];

    /// Return the string representation used in tool names and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Archive => "archive",
            Self::Restore => "restore",
        }
    }

    /// Parse the string form. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// Whether the operation changes stored state.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::List | Self::Get)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValidateMode
// ---------------------------------------------------------------------------

/// Which rule set the validation engine applies.
///
/// ```text
/// create: required fields enforced, defaults substituted
/// update: only present fields checked, null clears optional fields
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidateMode {
    Create,
    Update,
}

impl ValidateMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for ValidateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
