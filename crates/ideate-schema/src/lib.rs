//! # ideate-schema
//!
//! Schema model, validation engine, and protocol contracts for Ideate.
//!
//! This crate provides:
//! - [`loader`]: descriptor JSON to checked `DomainSchema`
//! - [`constraint`]: per-field rules compiled once per schema
//! - [`validate`]: payload validation in create or update mode
//! - [`contract`]: JSON Schema per enabled operation
//! - [`cell::SchemaCell`]: first-load guard and reload for the active schema
//! - [`SchemaRegistry`]: static schemas of the descriptor format itself
//!
//! ## Architecture
//!
//! Descriptor types are defined in `ideate-core` with `#[derive(JsonSchema)]`.
//! The validation engine and the contract generator both read
//! [`constraint::FieldConstraint`], so storage-side checks and published
//! contracts cannot drift apart.

pub mod cell;
pub mod constraint;
pub mod contract;
pub mod error;
pub mod loader;
pub mod registry;
pub mod validate;

pub use cell::{LoadedSchema, SchemaCell};
pub use contract::{OperationContract, contracts};
pub use error::SchemaError;
pub use loader::{load, load_file, load_str};
pub use registry::SchemaRegistry;
pub use validate::validate;
