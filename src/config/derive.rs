//! System-generated settings derived from a validated configuration.
//!
//! These are the only writes made to a configuration after merging. They run
//! once validation has passed, so derived paths (which may not exist yet)
//! are never subjected to the existence rules.

use super::defaults::MANIFEST_DIR_NAME;
use super::setting::SettingSource;
use super::types::{ConfigField, InputConfiguration};
use crate::model::ManifestInfo;
use std::path::Path;

/// Fill in system-generated fields, returning the fields that were written.
///
/// - `manifestDirPath` defaults to `<buildDropPath>/_manifest` when unset.
/// - `manifestPath` is always derived from `manifestDirPath` and the first
///   requested manifest format (SPDX 2.2 when none is requested).
pub fn apply_system_overrides(config: &mut InputConfiguration) -> Vec<ConfigField> {
    let mut written = Vec::new();

    if !config.manifest_dir_path.is_set() {
        if let Some(drop) = config.build_drop_path.value() {
            let dir = Path::new(drop).join(MANIFEST_DIR_NAME).display().to_string();
            config
                .manifest_dir_path
                .replace(dir, SettingSource::SystemGenerated);
            written.push(ConfigField::ManifestDirPath);
        }
    }

    if let Some(dir) = config.manifest_dir_path.value() {
        let info = config
            .manifest_info
            .value()
            .and_then(|list| list.first().cloned())
            .unwrap_or_else(ManifestInfo::spdx_22);
        let path = manifest_file_path(dir, &info);
        config
            .manifest_path
            .replace(path, SettingSource::SystemGenerated);
        written.push(ConfigField::ManifestPath);
    }

    for field in &written {
        tracing::debug!(
            field = field.name(),
            value = %config.entry(*field).value.map(|v| v.to_string()).unwrap_or_default(),
            "derived system-generated setting"
        );
    }
    written
}

/// `<dir>/<name>_<version>/manifest.<name>.json`, lower-cased.
#[must_use]
pub fn manifest_file_path(manifest_dir: &str, info: &ManifestInfo) -> String {
    let name = info.name().to_lowercase();
    let version = info.version().to_lowercase();
    Path::new(manifest_dir)
        .join(format!("{name}_{version}"))
        .join(format!("manifest.{name}.json"))
        .display()
        .to_string()
}
