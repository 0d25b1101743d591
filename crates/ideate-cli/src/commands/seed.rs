use crate::cli::GlobalFlags;
use crate::commands::shared::api_error;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ideate seed`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ideate_api::seed::seed_if_empty(&ctx.api)
        .await
        .map_err(api_error)?;
    if report.store_was_populated {
        tracing::warn!("store already has records; nothing seeded");
    }
    output(&report, flags.format)
}
