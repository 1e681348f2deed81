//! Configuration file reader.
//!
//! Reads a JSON or YAML file of camelCase keys into a partial configuration
//! whose values are tagged [`SettingSource::ConfigFile`].
//!
//! ```json
//! {
//!   "buildDropPath": "/out/drop",
//!   "parallelism": 16,
//!   "manifestInfo": ["spdx:2.2"]
//! }
//! ```

use super::setting::SettingSource;
use super::types::{ConfigFileValues, InputConfiguration};
use crate::error::{ConfigFileErrorKind, Result, SbomConfigError};
use std::path::Path;

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileFormat {
    Json,
    Yaml,
}

impl ConfigFileFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> std::result::Result<Self, ConfigFileErrorKind> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigFileErrorKind::UnsupportedExtension(ext)),
        }
    }
}

/// Parse config file content.
pub fn parse_config_str(
    content: &str,
    format: ConfigFileFormat,
) -> std::result::Result<ConfigFileValues, ConfigFileErrorKind> {
    let values = match format {
        ConfigFileFormat::Json => serde_json::from_str(content)?,
        ConfigFileFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(values)
}

/// Read `path` into a partial configuration tagged as coming from a file.
pub fn read_config_file(path: &Path) -> Result<InputConfiguration> {
    if !path.exists() {
        return Err(SbomConfigError::config_file(path, ConfigFileErrorKind::NotFound));
    }

    let format =
        ConfigFileFormat::from_path(path).map_err(|e| SbomConfigError::config_file(path, e))?;
    let content = std::fs::read_to_string(path).map_err(|e| SbomConfigError::io(path, e))?;
    let values =
        parse_config_str(&content, format).map_err(|e| SbomConfigError::config_file(path, e))?;

    let config = values.into_configuration(SettingSource::ConfigFile);
    tracing::debug!(
        path = %path.display(),
        fields = config.set_fields().len(),
        "loaded config file"
    );
    Ok(config)
}
