//! Environment variable reader.
//!
//! Every field can be supplied as `SBOM_TOOL_<FIELD>`, where `<FIELD>` is the
//! upper-cased snake_case field name (`SBOM_TOOL_BUILD_DROP_PATH`,
//! `SBOM_TOOL_PARALLELISM`, ...). Lists of manifest formats are
//! comma-separated; structured lists and maps are JSON.

use super::setting::SettingSource;
use super::types::{ConfigField, InputConfiguration};
use crate::error::{ErrorContext, Result};

/// Prefix shared by all recognised variables.
pub const ENV_PREFIX: &str = "SBOM_TOOL_";

/// Build a partial configuration from variables found by `lookup`.
///
/// `lookup` returns the value of a variable, or `None` if it is not set.
/// Empty values are treated as not set.
pub fn read_environment<F>(lookup: F) -> Result<InputConfiguration>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = InputConfiguration::new();

    for field in ConfigField::all().iter().copied() {
        let var = field.env_var();
        let Some(raw) = lookup(&var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        config
            .set_raw(field, &raw, SettingSource::Environment)
            .with_context(|| format!("environment variable {var}"))?;
        tracing::debug!(variable = %var, field = field.name(), "read environment setting");
    }

    Ok(config)
}

/// Build a partial configuration from the process environment.
pub fn read_process_environment() -> Result<InputConfiguration> {
    read_environment(|name| std::env::var(name).ok())
}
