//! Entity operation surface synthesized from a domain's feature flags.
//!
//! `EntityApi` is transport-agnostic: the CLI calls it directly and the tool
//! registry calls it on behalf of JSON-RPC clients. Every store failure is
//! mapped to an [`ApiError`] here; nothing below this layer reaches a client.

use std::sync::Arc;

use ideate_core::enums::Operation;
use ideate_core::responses::{ActionResponse, ListResponse};
use ideate_core::{CoreError, DomainSchema, Entity, Violation, ViolationKind};
use ideate_db::error::StoreError;
use ideate_db::{DocumentStore, ListFilter};
use serde_json::{Map, Value};

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

/// One call against the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    List {
        include_archived: bool,
        archived_only: bool,
    },
    Get {
        id: String,
    },
    Create {
        body: Value,
    },
    Update {
        id: String,
        body: Value,
    },
    Delete {
        id: String,
    },
    Archive {
        id: String,
    },
    Restore {
        id: String,
    },
}

impl ApiRequest {
    /// The operation this request invokes.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List { .. } => Operation::List,
            Self::Get { .. } => Operation::Get,
            Self::Create { .. } => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
            Self::Archive { .. } => Operation::Archive,
            Self::Restore { .. } => Operation::Restore,
        }
    }

    /// Build a request from tool arguments shaped like the operation's
    /// input contract.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the arguments are not an object, a
    /// list flag is not a boolean, or a required `id` is missing.
    pub fn from_arguments(operation: Operation, arguments: Value) -> Result<Self, ApiError> {
        let mut args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(ApiError::validation(vec![Violation::new(
                    "$",
                    ViolationKind::TypeMismatch,
                    "Arguments must be a JSON object",
                )]));
            }
        };

        let request = match operation {
            Operation::List => Self::List {
                include_archived: flag(&args, "includeArchived")?,
                archived_only: flag(&args, "archivedOnly")?,
            },
            Operation::Create => Self::Create {
                body: Value::Object(args),
            },
            Operation::Update => {
                let id = take_id(&mut args)?;
                Self::Update {
                    id,
                    body: Value::Object(args),
                }
            }
            Operation::Get => Self::Get {
                id: take_id(&mut args)?,
            },
            Operation::Delete => Self::Delete {
                id: take_id(&mut args)?,
            },
            Operation::Archive => Self::Archive {
                id: take_id(&mut args)?,
            },
            Operation::Restore => Self::Restore {
                id: take_id(&mut args)?,
            },
        };
        Ok(request)
    }
}

fn flag(args: &Map<String, Value>, key: &str) -> Result<bool, ApiError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ApiError::validation(vec![Violation::new(
            key,
            ViolationKind::TypeMismatch,
            format!("{key} must be a boolean"),
        )])),
    }
}

fn take_id(args: &mut Map<String, Value>) -> Result<String, ApiError> {
    match args.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id),
        Some(Value::String(_) | Value::Null) | None => Err(ApiError::validation(vec![
            Violation::new("id", ViolationKind::MissingRequired, "id is required"),
        ])),
        Some(_) => Err(ApiError::validation(vec![Violation::new(
            "id",
            ViolationKind::TypeMismatch,
            "id must be a string",
        )])),
    }
}

/// Successful outcome of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Newly created entity (status 201).
    Created(Entity),
    Entity(Entity),
    List(ListResponse),
    Action(ActionResponse),
}

impl ApiResponse {
    /// HTTP-style status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Created(_) => 201,
            _ => 200,
        }
    }

    /// Response body in wire form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Created(entity) | Self::Entity(entity) => entity.to_json(),
            Self::List(list) => serde_json::json!({
                "items": list.items.iter().map(Entity::to_json).collect::<Vec<_>>(),
                "count": list.count,
            }),
            Self::Action(action) => serde_json::json!({
                "success": action.success,
                "message": action.message,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityApi
// ---------------------------------------------------------------------------

/// The operation set of one domain over its store.
#[derive(Debug, Clone)]
pub struct EntityApi {
    store: Arc<DocumentStore>,
    operations: Vec<Operation>,
}

impl EntityApi {
    /// Synthesize the surface from the store's schema.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        let operations = store.schema().schema.features.operations();
        tracing::debug!(
            domain = store.domain(),
            operations = ?operations,
            "entity surface synthesized"
        );
        Self { store, operations }
    }

    /// Operations this surface exposes, in exposure order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Whether `operation` was synthesized.
    #[must_use]
    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    /// The active schema, for rendering collaborators.
    #[must_use]
    pub fn describe(&self) -> &DomainSchema {
        &self.store.schema().schema
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Run one request.
    ///
    /// # Errors
    ///
    /// Returns `FeatureDisabled` for an operation that was not synthesized,
    /// otherwise the mapped outcome of the store call.
    pub async fn handle(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let operation = request.operation();
        if !self.supports(operation) {
            return Err(self.disabled(operation));
        }

        let label = &self.describe().label;
        let outcome = match request {
            ApiRequest::List {
                include_archived,
                archived_only,
            } => self
                .store
                .list(ListFilter {
                    include_archived: include_archived || archived_only,
                    archived_only,
                })
                .await
                .map(|items| ApiResponse::List(ListResponse::new(items))),
            ApiRequest::Get { id } => self.store.get(&id).await.map(ApiResponse::Entity),
            ApiRequest::Create { body } => self.store.insert(&body).await.map(ApiResponse::Created),
            ApiRequest::Update { id, body } => {
                self.store.update(&id, &body).await.map(ApiResponse::Entity)
            }
            ApiRequest::Delete { id } => self.store.delete(&id).await.map(|()| {
                ApiResponse::Action(ActionResponse::ok(format!("{label} deleted successfully")))
            }),
            ApiRequest::Archive { id } => self
                .store
                .archive(&id)
                .await
                .map(|_| ApiResponse::Action(ActionResponse::ok(format!("{label} archived")))),
            ApiRequest::Restore { id } => self
                .store
                .restore(&id)
                .await
                .map(|_| ApiResponse::Action(ActionResponse::ok(format!("{label} restored")))),
        };

        outcome.map_err(|err| self.map_error(operation, err))
    }

    fn disabled(&self, operation: Operation) -> ApiError {
        let message = match operation {
            Operation::Archive | Operation::Restore => {
                "Archive feature not enabled for this domain".to_string()
            }
            _ => format!("{} is not enabled for this domain", capitalize(operation.as_str())),
        };
        ApiError::FeatureDisabled { message }
    }

    fn map_error(&self, operation: Operation, err: StoreError) -> ApiError {
        match err {
            StoreError::Core(CoreError::NotFound { .. }) => ApiError::NotFound {
                message: format!("{} not found", self.describe().label),
            },
            StoreError::Core(CoreError::Validation { violations }) => {
                ApiError::validation(violations)
            }
            StoreError::Core(CoreError::FeatureDisabled { operation: op, .. }) => self.disabled(op),
            other => {
                tracing::error!(
                    domain = self.store.domain(),
                    operation = %operation,
                    error = %other,
                    "store operation failed"
                );
                ApiError::Internal
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
