//! Declared defaults and numeric limits.
//!
//! Defaults live in a side table keyed by [`ConfigField`] rather than on the
//! aggregate itself. They are installed with [`SettingSource::Default`] on
//! fields still unset after merging, before any rule runs.
//!
//! [`SettingSource::Default`]: super::SettingSource::Default

use super::types::{ConfigField, InputConfiguration};
use crate::error::{Result, SbomConfigError};
use indexmap::IndexMap;

/// Fewest parallel workers accepted.
pub const MIN_PARALLELISM: i64 = 2;
/// Most parallel workers accepted.
pub const MAX_PARALLELISM: i64 = 48;
/// Parallel workers used when none are configured.
pub const DEFAULT_PARALLELISM: i64 = 8;

/// Shortest license lookup timeout, in seconds.
pub const MIN_LICENSE_FETCH_TIMEOUT_SECONDS: i64 = 1;
/// Longest license lookup timeout, in seconds (one day).
pub const MAX_LICENSE_FETCH_TIMEOUT_SECONDS: i64 = 86_400;
/// License lookup timeout used when none is configured, in seconds.
pub const DEFAULT_LICENSE_FETCH_TIMEOUT_SECONDS: i64 = 30;

/// Directory created under the build drop to hold generated manifests.
pub const MANIFEST_DIR_NAME: &str = "_manifest";

/// A declared default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Integer(i64),
    Flag(bool),
    Text(&'static str),
}

/// Side table of declared defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTable {
    entries: IndexMap<ConfigField, DefaultValue>,
}

impl DefaultTable {
    /// A table with no defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Declare (or replace) the default for `field`.
    ///
    /// Fails with [`SbomConfigError::MalformedInput`] when `value` does not
    /// convert to the field's type, e.g. `Text("md5")` for `hashAlgorithm`.
    pub fn with(self, field: ConfigField, value: DefaultValue) -> Result<Self> {
        if !field.accepts_default(&value) {
            return Err(SbomConfigError::malformed(
                field.name(),
                format!("declared default {value:?} does not fit the field's type"),
            ));
        }
        Ok(self.declare(field, value))
    }

    fn declare(mut self, field: ConfigField, value: DefaultValue) -> Self {
        self.entries.insert(field, value);
        self
    }

    /// Iterate declared defaults in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &DefaultValue)> {
        self.entries.iter().map(|(field, value)| (*field, value))
    }

    /// Install every applicable default into unset fields of `config`,
    /// returning the fields that received one.
    pub fn apply(&self, config: &mut InputConfiguration) -> Vec<ConfigField> {
        let mut installed = Vec::new();
        for (field, value) in self.iter() {
            if config.install_default(field, value) {
                tracing::debug!(field = field.name(), ?value, "installed default");
                installed.push(field);
            }
        }
        installed
    }
}

impl Default for DefaultTable {
    /// The tool's stock defaults.
    fn default() -> Self {
        use ConfigField as F;
        use DefaultValue::{Flag, Integer};

        Self::empty()
            .declare(F::Parallelism, Integer(DEFAULT_PARALLELISM))
            .declare(F::ValidateSignature, Flag(false))
            .declare(F::IgnoreMissing, Flag(false))
            .declare(F::FollowSymlinks, Flag(true))
            .declare(F::DeleteManifestDirIfPresent, Flag(false))
            .declare(F::FailIfNoPackages, Flag(false))
            .declare(F::FetchLicenseInformation, Flag(false))
            .declare(
                F::LicenseInformationTimeoutInSeconds,
                Integer(DEFAULT_LICENSE_FETCH_TIMEOUT_SECONDS),
            )
            .declare(F::EnablePackageMetadataParsing, Flag(false))
    }
}
