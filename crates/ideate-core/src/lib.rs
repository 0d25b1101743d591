//! # ideate-core
//!
//! Core types and error taxonomy for Ideate.
//!
//! This crate provides the foundational types shared across all Ideate crates:
//! - Domain descriptors (`DomainSchema`, `FieldDescriptor`, `FieldType`)
//! - Typed field values and the ordered `FieldMap`
//! - The stored `Entity` and its flat wire form
//! - Validation violations and results
//! - Operation and validation-mode enums
//! - A strictly monotonic timestamp clock
//! - Cross-cutting error types
//! - Response envelopes shared by the API and the CLI

pub mod clock;
pub mod entity;
pub mod enums;
pub mod errors;
pub mod responses;
pub mod schema;
pub mod validation;
pub mod value;

pub use entity::{Entity, SYSTEM_FIELDS};
pub use errors::CoreError;
pub use schema::{Branding, DomainSchema, Features, FieldDescriptor, FieldType};
pub use validation::{ValidationResult, Violation, ViolationKind};
pub use value::{FieldMap, FieldValue};
