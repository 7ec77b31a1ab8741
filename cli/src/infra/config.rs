//! Environment-backed configuration loading.

use anyhow::{Context, Result};
use refresh_common::RefreshConfig;

/// Load and validate configuration from the process environment.
///
/// # Errors
///
/// Returns an error if a required variable is missing or empty, or a tunable
/// cannot be parsed.
pub fn load_config() -> Result<RefreshConfig> {
    load_config_from(std::env::vars())
}

/// Load and validate configuration from an explicit set of variables.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from<I>(vars: I) -> Result<RefreshConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let config: RefreshConfig =
        envy::from_iter(vars).context("failed to parse configuration from environment")?;
    config.validate()?;
    Ok(config)
}
