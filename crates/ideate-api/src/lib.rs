//! # ideate-api
//!
//! Operation surface, tool registry, and JSON-RPC server for one Ideate domain.
//!
//! - [`surface::EntityApi`]: list/get/create/update/delete/archive/restore,
//!   synthesized from the domain's feature flags
//! - [`tools::ToolRegistry`]: one `{domain}_{op}` tool per enabled operation
//! - [`server::RpcServer`]: line-delimited JSON-RPC 2.0 (`initialize`,
//!   `tools/list`, `tools/call`)
//! - [`seed`]: demo data for an empty store

pub mod error;
pub mod protocol;
pub mod seed;
pub mod server;
pub mod surface;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use server::RpcServer;
pub use surface::{ApiRequest, ApiResponse, EntityApi};
pub use tools::{ToolError, ToolRegistry};
