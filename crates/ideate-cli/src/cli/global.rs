use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

impl OutputFormat {
    /// Parse the `general.default_format` config value.
    #[must_use]
    pub fn from_config(value: &str) -> Option<Self> {
        Self::from_str(value, true).ok()
    }
}

/// When to color table output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Global flags available before or after subcommands.
///
/// `format` is resolved against the config file's default before commands run.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
    pub descriptor: Option<String>,
    pub db: Option<String>,
}
