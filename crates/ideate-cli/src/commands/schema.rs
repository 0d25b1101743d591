use anyhow::Context;
use ideate_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ideate schema show|contracts`.
pub fn handle(action: &SchemaCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SchemaCommands::Show => output(&ctx.schema()?.schema, flags.format),
        SchemaCommands::Contracts => {
            let contracts = ideate_schema::contracts(&*ctx.schema()?);
            output(&contracts, flags.format)
        }
        SchemaCommands::DescriptorSchema => handle_descriptor_schema(flags),
    }
}

/// Handle `ideate schema descriptor-schema`. Needs no loaded domain.
pub fn handle_descriptor_schema(flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    let schema = registry
        .get("domain_descriptor")
        .context("descriptor schema is not registered")?;
    output(schema, flags.format)
}
