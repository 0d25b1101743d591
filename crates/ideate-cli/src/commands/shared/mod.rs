pub mod parse;

use ideate_api::ApiError;

/// Turn an entity-surface error into a CLI error, one line per violation.
pub fn api_error(error: ApiError) -> anyhow::Error {
    let violations = error.violations();
    if violations.is_empty() {
        return anyhow::Error::new(error);
    }
    let details = violations
        .iter()
        .map(|violation| format!("  - {}: {}", violation.field, violation.message))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow::anyhow!("{error}\n{details}")
}
