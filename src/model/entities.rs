//! Value types carried by configuration fields.
//!
//! These are the enum and record types held inside the structured settings:
//! hash algorithms, log levels, conformance standards, and the file, package
//! and artifact records callers may supply instead of scanning a drop.

use crate::error::SbomConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Enumerated values
// ============================================================================

/// Hash algorithm used to fingerprint files in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlgorithmName {
    Sha1,
    Sha256,
    Sha512,
}

impl AlgorithmName {
    /// Canonical upper-case name, e.g. `SHA256`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

impl FromStr for AlgorithmName {
    type Err = SbomConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(SbomConfigError::malformed(
                "hashAlgorithm",
                format!("unknown hash algorithm '{s}'. Valid options: SHA1, SHA256, SHA512"),
            )),
        }
    }
}

impl fmt::Display for AlgorithmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum level of log events the tool emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Verbose,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Verbose => "Verbose",
            Self::Debug => "Debug",
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }

    /// The `tracing` filter directive equivalent to this level.
    #[must_use]
    pub const fn filter_directive(&self) -> &'static str {
        match self {
            Self::Verbose => "trace",
            Self::Debug => "debug",
            Self::Information => "info",
            Self::Warning => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = SbomConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verbose" | "trace" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            "information" | "info" => Ok(Self::Information),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(SbomConfigError::malformed(
                "verbosity",
                format!(
                    "unknown log level '{s}'. Valid options: Verbose, Debug, Information, Warning, Error, Fatal"
                ),
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conformance standard the generated document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConformanceType {
    None,
    #[serde(rename = "NTIAMin")]
    NtiaMin,
}

impl ConformanceType {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::NtiaMin => "NTIAMin",
        }
    }
}

impl FromStr for ConformanceType {
    type Err = SbomConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "ntiamin" | "ntia-min" | "ntia" => Ok(Self::NtiaMin),
            _ => Err(SbomConfigError::malformed(
                "conformance",
                format!("unknown conformance '{s}'. Valid options: None, NTIAMin"),
            )),
        }
    }
}

impl fmt::Display for ConformanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Structured records
// ============================================================================

/// A file checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksum {
    pub algorithm: AlgorithmName,
    pub checksum_value: String,
}

/// A file supplied directly instead of being discovered by scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbomFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<Checksum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
}

/// A package supplied directly instead of being discovered by detectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbomPackage {
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
}

/// Per-artifact overrides used when aggregating several SBOMs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_missing_files: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_signing_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_manifest_dir: Option<String>,
}
