use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("ideate error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = bootstrap::load_config()?;
    let default_format = cli::OutputFormat::from_config(&config.general.default_format)
        .unwrap_or(cli::OutputFormat::Json);
    let flags = cli.global_flags(default_format);
    ui::init(&flags);
    context::warn_unconfigured(&config);

    // Describes the descriptor format itself; no domain needs to be loaded.
    if let cli::Commands::Schema {
        action: cli::root_commands::SchemaCommands::DescriptorSchema,
    } = &cli.command
    {
        return commands::schema::handle_descriptor_schema(&flags);
    }

    let ctx = context::AppContext::init(&config, &flags)
        .await
        .context("failed to initialize ideate application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

/// Logs go to stderr so `serve` keeps stdout for protocol frames.
fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("IDEATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
