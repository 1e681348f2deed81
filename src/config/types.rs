//! The configuration aggregate and its generic field views.
//!
//! [`InputConfiguration`] is a plain data holder: one [`Setting`] per tunable.
//! It knows nothing about validation. The rule engine walks it through
//! [`InputConfiguration::entries`], which exposes every field as a
//! [`FieldEntry`] without the caller needing to know its Rust type.

use super::defaults::DefaultValue;
use super::setting::{Setting, SettingSource};
use crate::error::{Result, SbomConfigError};
use crate::model::{
    AlgorithmName, ArtifactInfo, ConformanceType, LogLevel, ManifestInfo, SbomFile, SbomPackage,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Action
// ============================================================================

/// The top-level operation the tool has been asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestToolAction {
    /// Generate a manifest for a build drop
    Generate,
    /// Validate a build drop against an existing manifest
    Validate,
}

impl ManifestToolAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for ManifestToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ManifestToolAction {
    type Err = SbomConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "generate" => Ok(Self::Generate),
            "validate" => Ok(Self::Validate),
            _ => Err(SbomConfigError::malformed(
                "action",
                format!("unknown action '{s}'. Valid options: generate, validate"),
            )),
        }
    }
}

// ============================================================================
// Generic field views
// ============================================================================

/// A borrowed, type-erased view of a field's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    Flag(bool),
    Choice(&'static str),
    Manifests(&'a [ManifestInfo]),
    Files(&'a [SbomFile]),
    Packages(&'a [SbomPackage]),
    Artifacts(&'a IndexMap<String, ArtifactInfo>),
}

impl FieldValue<'_> {
    /// Short name of the value's shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Integer(_) => "integer",
            Self::Flag(_) => "boolean",
            Self::Choice(_) => "enum",
            Self::Manifests(_) => "manifest list",
            Self::Files(_) => "file list",
            Self::Packages(_) => "package list",
            Self::Artifacts(_) => "artifact map",
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Choice(name) => f.write_str(name),
            Self::Manifests(list) => {
                let names: Vec<String> = list.iter().map(ToString::to_string).collect();
                f.write_str(&names.join(","))
            }
            Self::Files(list) => write!(f, "[{} files]", list.len()),
            Self::Packages(list) => write!(f, "[{} packages]", list.len()),
            Self::Artifacts(map) => write!(f, "[{} artifacts]", map.len()),
        }
    }
}

/// One field of the aggregate, as seen by generic walkers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldEntry<'a> {
    pub field: ConfigField,
    pub source: Option<SettingSource>,
    pub value: Option<FieldValue<'a>>,
}

impl FieldEntry<'_> {
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Types that can be held by an [`InputConfiguration`] field.
pub trait FieldType: Clone {
    /// Borrow the value as a [`FieldValue`].
    fn as_field_value(&self) -> FieldValue<'_>;

    /// Parse the textual form used by environment variables.
    fn parse_raw(raw: &str) -> Result<Self>;

    /// Convert a declared default, if the default has this field's type.
    ///
    /// Textual defaults are parsed the same way as environment values.
    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Text(raw) => Self::parse_raw(raw).ok(),
            _ => None,
        }
    }
}

impl FieldType for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

impl FieldType for i64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Integer(*self)
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        raw.trim()
            .parse()
            .map_err(|e| SbomConfigError::malformed("", format!("'{raw}' is not an integer: {e}")))
    }

    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Integer(n) => Some(*n),
            DefaultValue::Text(raw) => Self::parse_raw(raw).ok(),
            DefaultValue::Flag(_) => None,
        }
    }
}

impl FieldType for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Flag(*self)
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(SbomConfigError::malformed(
                "",
                format!("'{raw}' is not a boolean (expected true or false)"),
            )),
        }
    }

    fn from_default(default: &DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Flag(b) => Some(*b),
            DefaultValue::Text(raw) => Self::parse_raw(raw).ok(),
            DefaultValue::Integer(_) => None,
        }
    }
}

impl FieldType for AlgorithmName {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Choice(self.name())
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        raw.parse()
    }
}

impl FieldType for LogLevel {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Choice(self.name())
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        raw.parse()
    }
}

impl FieldType for ConformanceType {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Choice(self.name())
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        raw.parse()
    }
}

impl FieldType for Vec<ManifestInfo> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Manifests(self)
    }

    /// Comma-separated `name:version` list, e.g. `spdx:2.2,spdx:3.0`.
    fn parse_raw(raw: &str) -> Result<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ManifestInfo::parse)
            .collect()
    }
}

impl FieldType for Vec<SbomFile> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Files(self)
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        parse_json(raw)
    }
}

impl FieldType for Vec<SbomPackage> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Packages(self)
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        parse_json(raw)
    }
}

impl FieldType for IndexMap<String, ArtifactInfo> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Artifacts(self)
    }

    fn parse_raw(raw: &str) -> Result<Self> {
        parse_json(raw)
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| SbomConfigError::malformed("", format!("expected a JSON value: {e}")))
}

/// Re-label a parse error with the field it was parsed for.
fn label_error(err: SbomConfigError, field: ConfigField) -> SbomConfigError {
    match err {
        SbomConfigError::MalformedInput { message, .. } => {
            SbomConfigError::malformed(field.name(), message)
        }
        other => other,
    }
}

// ============================================================================
// The aggregate
// ============================================================================

macro_rules! input_configuration {
    ($( $(#[$doc:meta])* $variant:ident, $field:ident, $key:literal: $ty:ty; )+) => {
        /// Identifies one field of [`InputConfiguration`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ConfigField {
            $( $variant, )+
        }

        impl ConfigField {
            /// Key used in config files and diagnostics, e.g. `buildDropPath`.
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $key, )+
                }
            }

            /// Rust field name, e.g. `build_drop_path`.
            #[must_use]
            pub const fn snake_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($field), )+
                }
            }

            /// Every field in declaration order.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[ $( Self::$variant, )+ ]
            }

            /// Whether `default` converts to this field's type.
            #[must_use]
            pub fn accepts_default(&self, default: &DefaultValue) -> bool {
                match self {
                    $( Self::$variant => <$ty as FieldType>::from_default(default).is_some(), )+
                }
            }
        }

        /// Every tunable of the tool, each with its provenance.
        #[derive(Debug, Clone, Default, PartialEq, Serialize)]
        #[serde(rename_all = "camelCase")]
        pub struct InputConfiguration {
            $( $(#[$doc])* pub $field: Setting<$ty>, )+
        }

        impl InputConfiguration {
            /// Every field in declaration order.
            #[must_use]
            pub fn entries(&self) -> Vec<FieldEntry<'_>> {
                ConfigField::all().iter().map(|field| self.entry(*field)).collect()
            }

            /// A single field's generic view.
            #[must_use]
            pub fn entry(&self, field: ConfigField) -> FieldEntry<'_> {
                match field {
                    $( ConfigField::$variant => FieldEntry {
                        field,
                        source: self.$field.source(),
                        value: self.$field.value().map(FieldType::as_field_value),
                    }, )+
                }
            }

            /// Parse `raw` into the field's type and store it with `source`.
            pub fn set_raw(&mut self, field: ConfigField, raw: &str, source: SettingSource) -> Result<()> {
                match field {
                    $( ConfigField::$variant => {
                        let value = <$ty as FieldType>::parse_raw(raw)
                            .map_err(|e| label_error(e, field))?;
                        self.$field.replace(value, source);
                    } )+
                }
                Ok(())
            }

            /// Copy `field` from `other` if `other` has it set.
            pub(crate) fn adopt(&mut self, field: ConfigField, other: &Self) -> bool {
                match field {
                    $( ConfigField::$variant => match other.$field.get() {
                        Some((value, source)) => {
                            self.$field.replace(value.clone(), source);
                            true
                        }
                        None => false,
                    }, )+
                }
            }

            /// Install `default` into `field` when the field is unset and
            /// the default has a matching type.
            pub(crate) fn install_default(&mut self, field: ConfigField, default: &DefaultValue) -> bool {
                match field {
                    $( ConfigField::$variant => {
                        if self.$field.is_set() {
                            return false;
                        }
                        match <$ty as FieldType>::from_default(default) {
                            Some(value) => {
                                self.$field.replace(value, SettingSource::Default);
                                true
                            }
                            None => false,
                        }
                    } )+
                }
            }
        }

        /// On-disk shape of a configuration file: every key optional.
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", deny_unknown_fields)]
        pub struct ConfigFileValues {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        impl ConfigFileValues {
            /// Lift plain values into settings tagged with `source`.
            #[must_use]
            pub fn into_configuration(self, source: SettingSource) -> InputConfiguration {
                InputConfiguration {
                    $( $field: self.$field.map_or_else(Setting::unset, |v| Setting::new(v, source)), )+
                }
            }
        }
    };
}

input_configuration! {
    /// Root of the build drop to describe or validate
    BuildDropPath, build_drop_path, "buildDropPath": String;
    /// Directory scanned for components
    BuildComponentPath, build_component_path, "buildComponentPath": String;
    /// File listing the files of the drop, one per line
    BuildListFile, build_list_file, "buildListFile": String;
    /// Full path of the manifest file; always derived by the tool
    ManifestPath, manifest_path, "manifestPath": String;
    /// Directory that holds (or will hold) the manifest
    ManifestDirPath, manifest_dir_path, "manifestDirPath": String;
    /// Where validation output is written
    OutputPath, output_path, "outputPath": String;
    /// Number of parallel workers
    Parallelism, parallelism, "parallelism": i64;
    Verbosity, verbosity, "verbosity": LogLevel;
    ConfigFilePath, config_file_path, "configFilePath": String;
    /// Manifest formats to generate or validate
    ManifestInfo, manifest_info, "manifestInfo": Vec<ManifestInfo>;
    HashAlgorithm, hash_algorithm, "hashAlgorithm": AlgorithmName;
    /// Only files under this relative path are validated
    RootPathFilter, root_path_filter, "rootPathFilter": String;
    CatalogFilePath, catalog_file_path, "catalogFilePath": String;
    ValidateSignature, validate_signature, "validateSignature": bool;
    /// Do not fail validation for files missing from the drop
    IgnoreMissing, ignore_missing, "ignoreMissing": bool;
    PackageName, package_name, "packageName": String;
    PackageVersion, package_version, "packageVersion": String;
    /// Supplier recorded in the generated document
    PackageSupplier, package_supplier, "packageSupplier": String;
    FilesList, files_list, "filesList": Vec<SbomFile>;
    PackagesList, packages_list, "packagesList": Vec<SbomPackage>;
    TelemetryFilePath, telemetry_file_path, "telemetryFilePath": String;
    DockerImagesToScan, docker_images_to_scan, "dockerImagesToScan": String;
    ExternalDocumentReferenceListFile, external_document_reference_list_file, "externalDocumentReferenceListFile": String;
    AdditionalComponentDetectorArgs, additional_component_detector_args, "additionalComponentDetectorArgs": String;
    NamespaceUriUniquePart, namespace_uri_unique_part, "namespaceUriUniquePart": String;
    /// Base URI of the generated document namespace
    NamespaceUriBase, namespace_uri_base, "namespaceUriBase": String;
    GenerationTimestamp, generation_timestamp, "generationTimestamp": String;
    FollowSymlinks, follow_symlinks, "followSymlinks": bool;
    DeleteManifestDirIfPresent, delete_manifest_dir_if_present, "deleteManifestDirIfPresent": bool;
    FailIfNoPackages, fail_if_no_packages, "failIfNoPackages": bool;
    FetchLicenseInformation, fetch_license_information, "fetchLicenseInformation": bool;
    LicenseInformationTimeoutInSeconds, license_information_timeout_in_seconds, "licenseInformationTimeoutInSeconds": i64;
    EnablePackageMetadataParsing, enable_package_metadata_parsing, "enablePackageMetadataParsing": bool;
    SbomDir, sbom_dir, "sbomDir": String;
    SbomPath, sbom_path, "sbomPath": String;
    Conformance, conformance, "conformance": ConformanceType;
    ArtifactInfoMap, artifact_info_map, "artifactInfoMap": IndexMap<String, ArtifactInfo>;
}

impl ConfigField {
    /// Fields only the tool itself may set.
    #[must_use]
    pub const fn is_system_generated(&self) -> bool {
        matches!(self, Self::ManifestPath)
    }

    /// Environment variable read for this field, e.g. `SBOM_TOOL_PARALLELISM`.
    #[must_use]
    pub fn env_var(&self) -> String {
        format!("{}{}", super::env::ENV_PREFIX, self.snake_name().to_uppercase())
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = SbomConfigError;

    /// Accepts either the camelCase key or the snake_case name.
    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(s) || field.snake_name() == s)
            .ok_or_else(|| SbomConfigError::malformed("field", format!("unknown field '{s}'")))
    }
}

impl InputConfiguration {
    /// Create an empty configuration with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source of `field`'s current value, if set.
    #[must_use]
    pub fn source_of(&self, field: ConfigField) -> Option<SettingSource> {
        self.entry(field).source
    }

    /// Whether `field` currently holds a value.
    #[must_use]
    pub fn is_set(&self, field: ConfigField) -> bool {
        self.entry(field).is_set()
    }

    /// Fields that hold a value.
    #[must_use]
    pub fn set_fields(&self) -> Vec<ConfigField> {
        self.entries()
            .into_iter()
            .filter(FieldEntry::is_set)
            .map(|entry| entry.field)
            .collect()
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|entry| !entry.is_set())
    }
}
