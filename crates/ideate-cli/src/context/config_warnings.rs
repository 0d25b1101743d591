use ideate_config::IdeateConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &IdeateConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &IdeateConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.domain.is_configured() && has_env_prefix(&env_keys, "IDEATE_DOMAIN") {
        warnings.push(
            "Domain config appears default while IDEATE_DOMAIN* env vars exist. Use double underscores (example: IDEATE_DOMAIN__DESCRIPTOR)."
                .to_string(),
        );
    }

    if config.store.path.is_empty() && has_env_prefix(&env_keys, "IDEATE_STORE") {
        warnings.push(
            "Store config appears default while IDEATE_STORE* env vars exist. Use double underscores (example: IDEATE_STORE__PATH)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
