use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    tracing::debug!(db = %ctx.db_path, domain = %ctx.api.describe().domain, "dispatching");
    match command {
        Commands::Schema { action } => commands::schema::handle(&action, ctx, flags),
        Commands::List(args) => commands::entity::handle_list(&args, ctx, flags).await,
        Commands::Get(args) => commands::entity::handle_get(args, ctx, flags).await,
        Commands::Create(args) => commands::entity::handle_create(&args, ctx, flags).await,
        Commands::Update(args) => commands::entity::handle_update(args, ctx, flags).await,
        Commands::Delete(args) => commands::entity::handle_delete(args, ctx, flags).await,
        Commands::Archive(args) => commands::entity::handle_archive(args, ctx, flags).await,
        Commands::Restore(args) => commands::entity::handle_restore(args, ctx, flags).await,
        Commands::Seed => commands::seed::handle(ctx, flags).await,
        Commands::Serve => commands::serve::handle(ctx).await,
    }
}
