//! Field constraints compiled once from a `DomainSchema`.
//!
//! Both the validation engine and the contract generator read these, so a
//! rule can only change in one place.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use ideate_core::value::DATE_FORMAT;
use ideate_core::{DomainSchema, FieldType, FieldValue, Violation, ViolationKind};
use serde_json::{Value, json};

use crate::error::SchemaError;

/// Decimal notation accepted for numbers sent as strings. Mirrors
/// [`parse_numeric`].
pub const NUMERIC_PATTERN: &str = r"^\s*[-+]?(\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?\s*$";

/// Parse a numeric string into a JSON number. Integers stay integers.
/// Non-finite results (`inf`, `NaN`, overflow) are rejected.
#[must_use]
pub fn parse_numeric(text: &str) -> Option<serde_json::Number> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .and_then(serde_json::Number::from_f64)
}

/// Type-specific acceptance rule.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRule {
    /// Any JSON string. `non_blank` rejects whitespace-only values.
    Text { non_blank: bool },
    /// A JSON number, or a string that parses as a finite number, within
    /// the inclusive bounds.
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    /// `YYYY-MM-DD`.
    Date,
    /// RFC 3339.
    DateTime,
}

/// Everything needed to check one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConstraint {
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
    pub rule: TypeRule,
    /// Required and visible. Null and blank text are rejected in both modes.
    pub required: bool,
    /// Must be supplied on create (required, visible, no default).
    pub required_on_create: bool,
    /// Typed default substituted on create.
    pub default: Option<FieldValue>,
    pub help_text: Option<String>,
}

impl FieldConstraint {
    fn from_descriptor(field: &ideate_core::FieldDescriptor) -> Result<Self, SchemaError> {
        let required = field.required && !field.hidden;
        let rule = match field.field_type {
            FieldType::String | FieldType::Text => TypeRule::Text {
                non_blank: required,
            },
            FieldType::Number => TypeRule::Number {
                min: field.min,
                max: field.max,
            },
            FieldType::Boolean => TypeRule::Boolean,
            FieldType::Date => TypeRule::Date,
            FieldType::Datetime => TypeRule::DateTime,
        };

        let mut constraint = Self {
            key: field.key.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            rule,
            required,
            required_on_create: field.required_on_create(),
            default: None,
            help_text: field.help_text.clone(),
        };

        if let Some(raw) = field.default.as_ref().filter(|v| !v.is_null()) {
            let typed = constraint
                .coerce(raw)
                .map_err(|violation| SchemaError::InvalidDefault {
                    key: field.key.clone(),
                    reason: violation.message,
                })?;
            constraint.default = Some(typed);
        }

        Ok(constraint)
    }

    /// Check a non-null JSON value against the rule and produce its typed form.
    ///
    /// # Errors
    ///
    /// Returns the single violation the value triggers.
    pub fn coerce(&self, value: &Value) -> Result<FieldValue, Violation> {
        match &self.rule {
            TypeRule::Text { non_blank } => {
                let s = value.as_str().ok_or_else(|| self.mismatch())?;
                if *non_blank && s.trim().is_empty() {
                    return Err(self.missing());
                }
                Ok(FieldValue::Text(s.to_string()))
            }
            TypeRule::Number { min, max } => {
                let n = match value {
                    Value::Number(n) => n.clone(),
                    Value::String(text) => parse_numeric(text).ok_or_else(|| self.mismatch())?,
                    _ => return Err(self.mismatch()),
                };
                let x = n.as_f64().ok_or_else(|| self.mismatch())?;
                if let Some(min) = min
                    && x < *min
                {
                    return Err(self.out_of_range(format!("must be at least {min}")));
                }
                if let Some(max) = max
                    && x > *max
                {
                    return Err(self.out_of_range(format!("must be at most {max}")));
                }
                Ok(FieldValue::Number(n))
            }
            TypeRule::Boolean => value
                .as_bool()
                .map(FieldValue::Boolean)
                .ok_or_else(|| self.mismatch()),
            TypeRule::Date => value
                .as_str()
                .filter(|s| s.len() == 10)
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .map(FieldValue::Date)
                .ok_or_else(|| self.mismatch()),
            TypeRule::DateTime => value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(FieldValue::DateTime)
                .ok_or_else(|| self.mismatch()),
        }
    }

    pub(crate) fn missing(&self) -> Violation {
        Violation::new(
            &self.key,
            ViolationKind::MissingRequired,
            format!("{} is required", self.label),
        )
    }

    fn mismatch(&self) -> Violation {
        let expected = match self.rule {
            TypeRule::Text { .. } => "a string",
            TypeRule::Number { .. } => "a number",
            TypeRule::Boolean => "true or false",
            TypeRule::Date => "a date (YYYY-MM-DD)",
            TypeRule::DateTime => "an RFC 3339 date-time",
        };
        Violation::new(
            &self.key,
            ViolationKind::TypeMismatch,
            format!("{} must be {expected}", self.label),
        )
    }

    fn out_of_range(&self, detail: String) -> Violation {
        Violation::new(
            &self.key,
            ViolationKind::OutOfRange,
            format!("{} {detail}", self.label),
        )
    }

    /// JSON Schema for this field's input value.
    ///
    /// `nullable` widens the type to accept `null` (optional fields). Bounds
    /// on numbers sent as strings are only enforced by [`Self::coerce`].
    #[must_use]
    pub fn json_schema(&self, nullable: bool) -> Value {
        let mut types = match self.rule {
            TypeRule::Text { .. } | TypeRule::Date | TypeRule::DateTime => vec!["string"],
            TypeRule::Number { .. } => vec!["number", "string"],
            TypeRule::Boolean => vec!["boolean"],
        };
        if nullable {
            types.push("null");
        }

        let mut schema = self.annotations();
        schema.insert(
            "type".into(),
            if types.len() == 1 {
                json!(types[0])
            } else {
                json!(types)
            },
        );

        match &self.rule {
            TypeRule::Text { non_blank: true } => {
                schema.insert("pattern".into(), json!("\\S"));
            }
            TypeRule::Number { min, max } => {
                schema.insert("pattern".into(), json!(NUMERIC_PATTERN));
                if let Some(min) = min {
                    schema.insert("minimum".into(), json!(min));
                }
                if let Some(max) = max {
                    schema.insert("maximum".into(), json!(max));
                }
            }
            TypeRule::Date => {
                schema.insert("format".into(), json!("date"));
            }
            TypeRule::DateTime => {
                schema.insert("format".into(), json!("date-time"));
            }
            TypeRule::Text { non_blank: false } | TypeRule::Boolean => {}
        }

        if let Some(default) = &self.default {
            schema.insert("default".into(), default.to_json());
        }

        Value::Object(schema)
    }

    /// JSON Schema for this field in a returned record: annotations only.
    /// Records keep the values they were written with, so a field that was
    /// since retyped or re-bounded may hold anything.
    #[must_use]
    pub fn output_schema(&self) -> Value {
        Value::Object(self.annotations())
    }

    fn annotations(&self) -> serde_json::Map<String, Value> {
        let mut schema = serde_json::Map::new();
        schema.insert("title".into(), json!(self.label));
        if let Some(help) = &self.help_text {
            schema.insert("description".into(), json!(help));
        }
        schema
    }
}

/// All constraints of one schema, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledSchema {
    constraints: Vec<FieldConstraint>,
    index: HashMap<String, usize>,
}

impl CompiledSchema {
    /// Look up a constraint by field key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldConstraint> {
        self.index.get(key).map(|&i| &self.constraints[i])
    }

    /// Constraints in schema field order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldConstraint> {
        self.constraints.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Compile the constraint set of a schema.
///
/// # Errors
///
/// Returns `SchemaError::InvalidDefault` if a declared default fails its own
/// field's rule.
pub fn compile(schema: &DomainSchema) -> Result<CompiledSchema, SchemaError> {
    let mut constraints = Vec::with_capacity(schema.fields.len());
    let mut index = HashMap::with_capacity(schema.fields.len());
    for (i, field) in schema.fields.iter().enumerate() {
        index.insert(field.key.clone(), i);
        constraints.push(FieldConstraint::from_descriptor(field)?);
    }
    Ok(CompiledSchema { constraints, index })
}
