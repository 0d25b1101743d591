use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Inspect the active domain schema and its contracts.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
    /// List entities (oldest first).
    List(ListArgs),
    /// Get one entity by id.
    Get(IdArgs),
    /// Create an entity.
    Create(BodyArgs),
    /// Update fields of an entity; omitted fields are left unchanged.
    Update(UpdateArgs),
    /// Permanently delete an entity.
    Delete(IdArgs),
    /// Archive an entity.
    Archive(IdArgs),
    /// Restore an archived entity.
    Restore(IdArgs),
    /// Insert sample data if the store is empty.
    Seed,
    /// Serve the domain's tools over JSON-RPC on stdin/stdout.
    Serve,
}

/// `ideate schema` subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// Print the active domain schema.
    Show,
    /// Print the JSON Schema contract of every enabled operation.
    Contracts,
    /// Print the JSON Schema of the descriptor format itself.
    DescriptorSchema,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Include archived entities.
    #[arg(long)]
    pub include_archived: bool,
    /// Only archived entities.
    #[arg(long)]
    pub archived_only: bool,
}

#[derive(Clone, Debug, Args)]
pub struct IdArgs {
    /// Entity id.
    pub id: String,
}

/// Payload given either field by field or as one JSON object.
#[derive(Clone, Debug, Args)]
pub struct BodyArgs {
    /// Field value as key=value; the value is read as JSON when it parses.
    #[arg(long = "set", value_name = "KEY=VALUE", conflicts_with = "json")]
    pub set: Vec<String>,
    /// Whole payload as a JSON object.
    #[arg(long, value_name = "BODY")]
    pub json: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    /// Entity id.
    pub id: String,
    #[command(flatten)]
    pub body: BodyArgs,
}
