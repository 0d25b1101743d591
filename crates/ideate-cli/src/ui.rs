//! Terminal presentation settings, fixed once per run.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

/// Below this, `COLUMNS` is ignored and tables render at natural width.
const MIN_TABLE_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    /// Color status cells in `--format table` output.
    pub table_color: bool,
    /// Width tables are squeezed to, from `COLUMNS`.
    pub term_width: Option<usize>,
}

impl UiPrefs {
    fn resolve(flags: &GlobalFlags, stdout_is_tty: bool, no_color: bool, columns: Option<&str>) -> Self {
        let is_table = flags.format == OutputFormat::Table;
        let table_color = is_table
            && match flags.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => stdout_is_tty && !flags.quiet && !no_color,
            };
        let term_width = columns
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|width| *width >= MIN_TABLE_WIDTH);

        Self {
            table_color,
            term_width,
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

/// Fix the preferences for this process. Later calls are ignored.
pub fn init(flags: &GlobalFlags) {
    let columns = std::env::var("COLUMNS").ok();
    let prefs = UiPrefs::resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        columns.as_deref(),
    );
    let _ = UI_PREFS.set(prefs);
}

#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
