//! Domain descriptor types.
//!
//! A `DomainSchema` is the parsed, checked form of a JSON domain descriptor.
//! Construction goes through the loader in `ideate-schema`, which enforces the
//! structural invariants (unique keys, known type tokens, typed defaults).
//! These types serialize back to the descriptor's camelCase JSON form so the
//! rendering layer can consume them unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::Operation;

const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";
const DEFAULT_SECONDARY_COLOR: &str = "#10B981";

const fn default_true() -> bool {
    true
}

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

fn default_secondary_color() -> String {
    DEFAULT_SECONDARY_COLOR.to_string()
}

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Short text.
    String,
    /// Long text.
    Text,
    Number,
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp.
    Datetime,
}

impl FieldType {
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Text,
        Self::Number,
        Self::Boolean,
        Self::Date,
        Self::Datetime,
    ];

    /// Return the descriptor type token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
        }
    }

    /// Parse a descriptor type token. Tokens are case-sensitive.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }

    /// Whether values of this type are carried as free text.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// One field of a domain, as declared in the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Stable identifier, unique within the domain.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Hidden fields are never shown and never required on create.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub show_in_list: bool,
    #[serde(default = "default_true")]
    pub show_in_detail: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Inclusive lower bound. Number fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound. Number fields only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Value substituted on create when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl FieldDescriptor {
    /// A minimal descriptor with the descriptor-format defaults applied.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            required: false,
            hidden: false,
            show_in_list: false,
            show_in_detail: true,
            placeholder: None,
            help_text: None,
            min: None,
            max: None,
            default: None,
        }
    }

    /// Whether create must receive a value for this field.
    #[must_use]
    pub const fn required_on_create(&self) -> bool {
        self.required && !self.hidden && self.default.is_none()
    }
}

// ---------------------------------------------------------------------------
// Branding / Features
// ---------------------------------------------------------------------------

/// Presentation hints passed through to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            logo: None,
        }
    }
}

/// Operation gates. `list` and `get` are always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    #[serde(default = "default_true")]
    pub create: bool,
    #[serde(default = "default_true")]
    pub update: bool,
    #[serde(default = "default_true")]
    pub delete: bool,
    #[serde(default)]
    pub archive: bool,
    /// Carried for the rendering layer. No operation is gated on it.
    #[serde(default)]
    pub search: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            create: true,
            update: true,
            delete: true,
            archive: false,
            search: false,
        }
    }
}

impl Features {
    /// Whether the flags enable the given operation.
    #[must_use]
    pub const fn allows(&self, operation: Operation) -> bool {
        match operation {
            Operation::List | Operation::Get => true,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
            Operation::Archive | Operation::Restore => self.archive,
        }
    }

    /// Enabled operations in exposure order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.allows(*op))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DomainSchema
// ---------------------------------------------------------------------------

/// A complete domain: identity, presentation, feature flags, ordered fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainSchema {
    /// URL-safe slug. Immutable once a store exists for it.
    pub domain: String,
    pub label: String,
    pub label_plural: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub features: Features,
    pub fields: Vec<FieldDescriptor>,
}

impl DomainSchema {
    /// Look up a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Required, visible fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required && !f.hidden)
    }

    /// Fields shown in list views.
    pub fn list_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.show_in_list && !f.hidden)
    }

    /// Fields shown in detail views.
    pub fn detail_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.show_in_detail && !f.hidden)
    }
}
