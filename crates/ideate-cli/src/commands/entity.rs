use ideate_api::{ApiRequest, ApiResponse};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{BodyArgs, IdArgs, ListArgs, UpdateArgs};
use crate::commands::shared::api_error;
use crate::commands::shared::parse::parse_body;
use crate::context::AppContext;
use crate::output::{output, render_list};

async fn call(ctx: &AppContext, request: ApiRequest) -> anyhow::Result<ApiResponse> {
    ctx.api.handle(request).await.map_err(api_error)
}

/// Handle `ideate list`.
pub async fn handle_list(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = call(
        ctx,
        ApiRequest::List {
            include_archived: args.include_archived,
            archived_only: args.archived_only,
        },
    )
    .await?;
    let rendered = render_list(ctx.api.describe(), &response.to_json(), flags.format)?;
    println!("{rendered}");
    Ok(())
}

/// Handle `ideate get`.
pub async fn handle_get(args: IdArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = call(ctx, ApiRequest::Get { id: args.id }).await?;
    output(&response.to_json(), flags.format)
}

/// Handle `ideate create`.
pub async fn handle_create(args: &BodyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let body = parse_body(args)?;
    let response = call(ctx, ApiRequest::Create { body }).await?;
    output(&response.to_json(), flags.format)
}

/// Handle `ideate update`.
pub async fn handle_update(args: UpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let body = parse_body(&args.body)?;
    let response = call(ctx, ApiRequest::Update { id: args.id, body }).await?;
    output(&response.to_json(), flags.format)
}

/// Handle `ideate delete`.
pub async fn handle_delete(args: IdArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = call(ctx, ApiRequest::Delete { id: args.id }).await?;
    output(&response.to_json(), flags.format)
}

/// Handle `ideate archive`.
pub async fn handle_archive(args: IdArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = call(ctx, ApiRequest::Archive { id: args.id }).await?;
    output(&response.to_json(), flags.format)
}

/// Handle `ideate restore`.
pub async fn handle_restore(args: IdArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = call(ctx, ApiRequest::Restore { id: args.id }).await?;
    output(&response.to_json(), flags.format)
}
