//! Document format identifiers of the form `name:version`.
//!
//! An [`SbomSpecification`] names a manifest format and its version, for
//! example `spdx:2.2`. Both parts are compared case-insensitively, so
//! `SPDX:2.2` and `spdx:2.2` are the same specification.

use crate::error::{Result, SbomConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Separator between the name and version parts.
const SEPARATOR: char = ':';

/// Identifies a document format and version, e.g. SPDX 2.2.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SbomSpecification {
    name: String,
    version: String,
}

/// A manifest descriptor is an [`SbomSpecification`] naming an output format.
pub type ManifestInfo = SbomSpecification;

impl SbomSpecification {
    /// Create a specification from its two parts.
    ///
    /// Fails with [`SbomConfigError::MalformedInput`] when either part is
    /// empty or whitespace-only.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();

        if name.trim().is_empty() {
            return Err(SbomConfigError::malformed(
                "name",
                "specification name cannot be empty",
            ));
        }
        if version.trim().is_empty() {
            return Err(SbomConfigError::malformed(
                "version",
                "specification version cannot be empty",
            ));
        }

        Ok(Self { name, version })
    }

    /// The SPDX 2.2 specification, the tool's default manifest format.
    #[must_use]
    pub fn spdx_22() -> Self {
        Self {
            name: "SPDX".to_string(),
            version: "2.2".to_string(),
        }
    }

    /// Parse a `name:version` string.
    ///
    /// ```
    /// use sbom_config::model::SbomSpecification;
    ///
    /// let spec = SbomSpecification::parse("spdx:2.2").unwrap();
    /// assert_eq!(spec.name(), "spdx");
    /// assert_eq!(spec.version(), "2.2");
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(SbomConfigError::malformed(
                "specification",
                "the SBOM specification string is empty",
            ));
        }

        let parts: Vec<&str> = value.split(SEPARATOR).collect();
        match parts.as_slice() {
            [name, version] if !name.trim().is_empty() && !version.trim().is_empty() => {
                Self::new(*name, *version)
            }
            _ => Err(SbomConfigError::malformed(
                "specification",
                format!(
                    "'{value}' is not formatted correctly, the correct format is <name>:<version>"
                ),
            )),
        }
    }

    /// Specification name as supplied, e.g. `SPDX`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Specification version as supplied, e.g. `2.2`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl PartialEq for SbomSpecification {
    fn eq(&self, other: &Self) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
            && self.version.to_lowercase() == other.version.to_lowercase()
    }
}

impl Hash for SbomSpecification {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_lowercase().hash(state);
        self.version.to_lowercase().hash(state);
    }
}

impl fmt::Display for SbomSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.name, self.version)
    }
}

impl FromStr for SbomSpecification {
    type Err = SbomConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SbomSpecification {
    type Error = SbomConfigError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SbomSpecification> for String {
    fn from(spec: SbomSpecification) -> Self {
        spec.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of(spec: &SbomSpecification) -> u64 {
        let mut hasher = DefaultHasher::new();
        spec.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_parse_valid() {
        let spec = SbomSpecification::parse("spdx:2.2").unwrap();
        assert_eq!(spec.name(), "spdx");
        assert_eq!(spec.version(), "2.2");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", ":", "a:", ":b", "a:b:c", "spdx", " : ", "a: "] {
            let err = SbomSpecification::parse(input).unwrap_err();
            assert!(
                matches!(err, SbomConfigError::MalformedInput { .. }),
                "{input:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_new_rejects_blank_parts() {
        assert!(SbomSpecification::new("", "2.2").is_err());
        assert!(SbomSpecification::new("spdx", "   ").is_err());
        assert!(SbomSpecification::new("spdx", "2.2").is_ok());
    }

    #[test]
    fn test_display_roundtrip() {
        let spec = SbomSpecification::new("SPDX", "2.2").unwrap();
        assert_eq!(spec.to_string(), "SPDX:2.2");
        assert_eq!(SbomSpecification::parse(&spec.to_string()).unwrap(), spec);
    }

    #[test]
    fn test_case_insensitive_equality_and_hash() {
        let upper = SbomSpecification::new("SPDX", "2.2-RC").unwrap();
        let lower = SbomSpecification::new("spdx", "2.2-rc").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(hash_of(&upper), hash_of(&lower));

        let set: HashSet<_> = [upper, lower].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_versions_not_equal() {
        let a = SbomSpecification::parse("spdx:2.2").unwrap();
        let b = SbomSpecification::parse("spdx:3.0").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde_as_string() {
        let spec = SbomSpecification::spdx_22();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, "\"SPDX:2.2\"");

        let back: SbomSpecification = serde_json::from_str("\"spdx:2.2\"").unwrap();
        assert_eq!(back, spec);

        assert!(serde_json::from_str::<SbomSpecification>("\"spdx\"").is_err());
    }
}
