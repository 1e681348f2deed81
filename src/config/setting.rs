//! Provenance-tracked setting values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a setting's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingSource {
    /// Installed from the field's declared default
    Default,
    /// Supplied as a command-line argument
    CommandLine,
    /// Read from a configuration file
    ConfigFile,
    /// Read from an environment variable
    Environment,
    /// Derived by the tool itself after merging
    SystemGenerated,
}

impl SettingSource {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CommandLine => "command-line",
            Self::ConfigFile => "config-file",
            Self::Environment => "environment",
            Self::SystemGenerated => "system-generated",
        }
    }

    /// True for sources a user controls directly.
    #[must_use]
    pub const fn is_user_source(&self) -> bool {
        matches!(self, Self::CommandLine | Self::ConfigFile | Self::Environment)
    }
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sourced<T> {
    value: T,
    source: SettingSource,
}

/// A configuration value together with the source that supplied it.
///
/// A setting with no source is *unset*: it holds no value at all rather than
/// a zero value of `T`. Callers reach the value through [`Setting::value`],
/// which makes absence explicit at every call site.
///
/// Equality compares values only; two settings holding the same value from
/// different sources are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Setting<T> {
    slot: Option<Sourced<T>>,
}

impl<T> Setting<T> {
    /// A setting no source has supplied.
    #[must_use]
    pub const fn unset() -> Self {
        Self { slot: None }
    }

    /// A setting holding `value` supplied by `source`.
    #[must_use]
    pub const fn new(value: T, source: SettingSource) -> Self {
        Self {
            slot: Some(Sourced { value, source }),
        }
    }

    /// Whether any source has supplied a value.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    /// The current value, if set.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.slot.as_ref().map(|s| &s.value)
    }

    /// The source of the current value, if set.
    #[must_use]
    pub fn source(&self) -> Option<SettingSource> {
        self.slot.as_ref().map(|s| s.source)
    }

    /// Value and source together, if set.
    #[must_use]
    pub fn get(&self) -> Option<(&T, SettingSource)> {
        self.slot.as_ref().map(|s| (&s.value, s.source))
    }

    /// Replace the value and its provenance, returning the previous value.
    pub fn replace(&mut self, value: T, source: SettingSource) -> Option<T> {
        self.slot
            .replace(Sourced { value, source })
            .map(|previous| previous.value)
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T: PartialEq> PartialEq for Setting<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl<T: Eq> Eq for Setting<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_has_no_value_or_source() {
        let setting: Setting<i64> = Setting::default();
        assert!(!setting.is_set());
        assert_eq!(setting.value(), None);
        assert_eq!(setting.source(), None);
    }

    #[test]
    fn test_replace_swaps_value_and_source() {
        let mut setting = Setting::new(4_i64, SettingSource::ConfigFile);
        let previous = setting.replace(16, SettingSource::CommandLine);
        assert_eq!(previous, Some(4));
        assert_eq!(setting.get(), Some((&16, SettingSource::CommandLine)));
    }

    #[test]
    fn test_equality_ignores_source() {
        let a = Setting::new("drop".to_string(), SettingSource::CommandLine);
        let b = Setting::new("drop".to_string(), SettingSource::Environment);
        assert_eq!(a, b);
        assert_ne!(a, Setting::unset());
    }

    #[test]
    fn test_serializes_value_with_source() {
        let setting = Setting::new(8_i64, SettingSource::Default);
        let json = serde_json::to_value(&setting).unwrap();
        assert_eq!(json, serde_json::json!({ "value": 8, "source": "default" }));

        let unset: Setting<i64> = Setting::unset();
        assert_eq!(serde_json::to_value(&unset).unwrap(), serde_json::Value::Null);
    }
}
