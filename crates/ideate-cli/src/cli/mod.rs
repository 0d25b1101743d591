use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `ideate` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ideate",
    version,
    about = "Ideate - schema-driven CRUD for one domain"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to general.default_format)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Color table output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Domain descriptor file (overrides domain.descriptor)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub descriptor: Option<String>,

    /// Store database path (overrides store.path)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    ///
    /// `default_format` is used when `--format` was not given.
    #[must_use]
    pub fn global_flags(&self, default_format: OutputFormat) -> GlobalFlags {
        GlobalFlags {
            format: self.format.unwrap_or(default_format),
            color: self.color,
            quiet: self.quiet,
            descriptor: self.descriptor.clone(),
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::root_commands::SchemaCommands;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "ideate",
            "--format",
            "table",
            "--descriptor",
            "products.json",
            "--verbose",
            "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert_eq!(cli.descriptor.as_deref(), Some("products.json"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["ideate", "seed", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Seed));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["ideate", "--format", "xml", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_format_falls_back_to_config_default() {
        let cli = Cli::try_parse_from(["ideate", "list"]).expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags(OutputFormat::Table);
        assert_eq!(flags.format, OutputFormat::Table);
    }

    #[test]
    fn explicit_format_beats_config_default() {
        let cli = Cli::try_parse_from(["ideate", "-f", "raw", "list"]).expect("cli should parse");
        assert_eq!(cli.global_flags(OutputFormat::Table).format, OutputFormat::Raw);
    }

    #[test]
    fn list_filters_parse() {
        let cli = Cli::try_parse_from(["ideate", "list", "--archived-only"])
            .expect("cli should parse");
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert!(args.archived_only);
        assert!(!args.include_archived);
    }

    #[test]
    fn create_accepts_repeated_set() {
        let cli = Cli::try_parse_from([
            "ideate", "create", "--set", "name=Mouse", "--set", "price=25",
        ])
        .expect("cli should parse");
        let Commands::Create(body) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(body.set, vec!["name=Mouse", "price=25"]);
    }

    #[test]
    fn set_and_json_conflict() {
        let parsed = Cli::try_parse_from([
            "ideate", "create", "--set", "name=Mouse", "--json", "{}",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn update_takes_id_and_body() {
        let cli = Cli::try_parse_from(["ideate", "update", "products-1", "--json", r#"{"price":30}"#])
            .expect("cli should parse");
        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.id, "products-1");
        assert_eq!(args.body.json.as_deref(), Some(r#"{"price":30}"#));
    }

    #[test]
    fn schema_subcommands_parse() {
        let cli = Cli::try_parse_from(["ideate", "schema", "descriptor-schema"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Schema {
                action: SchemaCommands::DescriptorSchema
            }
        ));
    }
}
