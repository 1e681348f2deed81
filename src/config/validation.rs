//! Declarative, action-scoped validation rules.
//!
//! A [`RuleRegistry`] maps each [`ConfigField`] to an ordered list of
//! [`Rule`]s. [`RuleRegistry::evaluate`] walks a merged configuration through
//! its generic field view and returns every failure at once. Filesystem
//! checks go through the injected [`PathProbe`], so the engine itself does no
//! I/O.

use super::defaults::{
    MAX_LICENSE_FETCH_TIMEOUT_SECONDS, MAX_PARALLELISM, MIN_LICENSE_FETCH_TIMEOUT_SECONDS,
    MIN_PARALLELISM,
};
use super::types::{ConfigField, FieldEntry, FieldValue, InputConfiguration, ManifestToolAction};
use crate::model::ManifestInfo;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

// ============================================================================
// Rule vocabulary
// ============================================================================

/// Whether a path rule targets a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    File,
    Directory,
}

/// The shape of URI a [`RuleKind::ValidUri`] rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriKind {
    /// Any absolute URI (scheme required)
    Absolute,
    /// An absolute `http` or `https` URI
    Http,
}

/// What a rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// The field must be set.
    Required,
    /// The field must be set whenever the sibling field is set.
    RequiredWith(ConfigField),
    /// The path must exist.
    PathExists(PathKind),
    /// The path must be writable.
    PathWritable(PathKind),
    /// The integer must lie in `[min, max]`.
    IntRange { min: i64, max: i64 },
    /// The string must parse as a URI of the given kind.
    ValidUri(UriKind),
    /// The manifest list must be non-empty and free of duplicates.
    WellFormedManifestDescriptor,
    /// The path string must be usable as a path.
    PathSyntax,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::RequiredWith(sibling) => write!(f, "RequiredWith({sibling})"),
            Self::PathExists(PathKind::File) => f.write_str("FileExists"),
            Self::PathExists(PathKind::Directory) => f.write_str("DirectoryExists"),
            Self::PathWritable(PathKind::File) => f.write_str("FilePathIsWritable"),
            Self::PathWritable(PathKind::Directory) => f.write_str("DirectoryPathIsWritable"),
            Self::IntRange { min, max } => write!(f, "IntRange({min}..={max})"),
            Self::ValidUri(UriKind::Absolute) => f.write_str("ValidUri(Absolute)"),
            Self::ValidUri(UriKind::Http) => f.write_str("ValidUri(Http)"),
            Self::WellFormedManifestDescriptor => f.write_str("ValidManifestInfo"),
            Self::PathSyntax => f.write_str("Path"),
        }
    }
}

/// When a rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Always,
    OnlyForAction(ManifestToolAction),
}

impl Scope {
    /// Whether a rule with this scope runs under `action`.
    #[must_use]
    pub fn applies_to(&self, action: ManifestToolAction) -> bool {
        match self {
            Self::Always => true,
            Self::OnlyForAction(scoped) => *scoped == action,
        }
    }
}

/// A rule attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    pub kind: RuleKind,
    pub scope: Scope,
    /// An unset field fails this rule as if it were also `Required`.
    pub implies_required: bool,
}

impl Rule {
    /// An always-evaluated rule of `kind`.
    #[must_use]
    pub const fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            scope: Scope::Always,
            implies_required: false,
        }
    }

    /// Restrict the rule to `action`.
    #[must_use]
    pub const fn only_for(mut self, action: ManifestToolAction) -> Self {
        self.scope = Scope::OnlyForAction(action);
        self
    }

    /// Make an unset field fail this rule.
    #[must_use]
    pub const fn implying_required(mut self) -> Self {
        self.implies_required = true;
        self
    }
}

// ============================================================================
// Failures
// ============================================================================

/// The category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A field that must be set was not
    MissingRequiredValue,
    /// A set value violated a constraint
    ConstraintViolated,
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: ConfigField,
    pub rule: RuleKind,
    pub scope: Scope,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Scope::OnlyForAction(action) = self.scope {
            write!(f, " (only for {action})")?;
        }
        Ok(())
    }
}

// ============================================================================
// Filesystem capability
// ============================================================================

/// Filesystem checks the rule engine delegates to.
pub trait PathProbe {
    fn directory_exists(&self, path: &Path) -> bool;
    fn file_exists(&self, path: &Path) -> bool;
    fn directory_is_writable(&self, path: &Path) -> bool;
    fn file_is_writable(&self, path: &Path) -> bool;
}

/// [`PathProbe`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdPathProbe;

impl PathProbe for StdPathProbe {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Writable when the current user can create a file in the directory.
    /// The scratch file is removed again on drop.
    fn directory_is_writable(&self, path: &Path) -> bool {
        path.is_dir()
            && tempfile::Builder::new()
                .prefix(".sbom-config-")
                .tempfile_in(path)
                .is_ok()
    }

    /// An existing file must open for writing; a new file needs a writable
    /// parent directory.
    fn file_is_writable(&self, path: &Path) -> bool {
        if path.exists() {
            return path.is_file() && OpenOptions::new().append(true).open(path).is_ok();
        }
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.directory_is_writable(parent)
    }
}

// ============================================================================
// Registry and evaluator
// ============================================================================

/// Rules attached to each field, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRegistry {
    rules: IndexMap<ConfigField, Vec<Rule>>,
}

impl RuleRegistry {
    /// A registry with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Append `rule` to `field`'s rules.
    #[must_use]
    pub fn with_rule(mut self, field: ConfigField, rule: Rule) -> Self {
        self.rules.entry(field).or_default().push(rule);
        self
    }

    /// Rules attached to `field`.
    #[must_use]
    pub fn rules_for(&self, field: ConfigField) -> &[Rule] {
        self.rules.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Evaluate every rule in scope for `action` against `config`.
    ///
    /// Failures are collected across all fields; evaluation never stops at
    /// the first one. An empty result means the configuration is valid.
    pub fn evaluate(
        &self,
        config: &InputConfiguration,
        action: ManifestToolAction,
        probe: &dyn PathProbe,
    ) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        for entry in config.entries() {
            for rule in self.rules_for(entry.field) {
                if !rule.scope.applies_to(action) {
                    continue;
                }
                if let Some((kind, message)) = check(rule, &entry, config, probe) {
                    tracing::debug!(
                        field = entry.field.name(),
                        rule = %rule.kind,
                        %message,
                        "validation rule failed"
                    );
                    failures.push(ValidationFailure {
                        field: entry.field,
                        rule: rule.kind,
                        scope: rule.scope,
                        kind,
                        message,
                    });
                }
            }
        }

        failures
    }
}

impl Default for RuleRegistry {
    /// The tool's stock rules.
    fn default() -> Self {
        use ConfigField as F;
        use ManifestToolAction::{Generate, Validate};
        use PathKind::{Directory, File};
        use RuleKind::{
            IntRange, PathExists, PathSyntax, PathWritable, Required, RequiredWith, ValidUri,
            WellFormedManifestDescriptor,
        };

        Self::empty()
            .with_rule(F::BuildDropPath, Rule::new(PathExists(Directory)))
            .with_rule(F::BuildDropPath, Rule::new(PathWritable(Directory)).only_for(Generate))
            .with_rule(F::BuildDropPath, Rule::new(Required))
            .with_rule(F::BuildDropPath, Rule::new(PathSyntax))
            .with_rule(F::BuildComponentPath, Rule::new(PathExists(Directory)))
            .with_rule(F::BuildComponentPath, Rule::new(PathSyntax))
            .with_rule(F::BuildListFile, Rule::new(PathExists(File)))
            .with_rule(F::ManifestDirPath, Rule::new(PathExists(Directory)))
            .with_rule(F::ManifestDirPath, Rule::new(PathWritable(Directory)).only_for(Generate))
            .with_rule(F::ManifestDirPath, Rule::new(PathSyntax))
            .with_rule(F::OutputPath, Rule::new(PathWritable(File)))
            .with_rule(F::OutputPath, Rule::new(Required).only_for(Validate))
            .with_rule(F::OutputPath, Rule::new(PathSyntax))
            .with_rule(
                F::Parallelism,
                Rule::new(IntRange {
                    min: MIN_PARALLELISM,
                    max: MAX_PARALLELISM,
                }),
            )
            .with_rule(F::ConfigFilePath, Rule::new(PathSyntax))
            .with_rule(F::ManifestInfo, Rule::new(WellFormedManifestDescriptor))
            .with_rule(F::RootPathFilter, Rule::new(PathSyntax))
            .with_rule(F::CatalogFilePath, Rule::new(PathSyntax))
            .with_rule(
                F::PackageName,
                Rule::new(RequiredWith(F::PackageVersion)).only_for(Generate),
            )
            .with_rule(
                F::PackageVersion,
                Rule::new(RequiredWith(F::PackageName)).only_for(Generate),
            )
            .with_rule(F::PackageSupplier, Rule::new(Required).only_for(Generate))
            .with_rule(F::TelemetryFilePath, Rule::new(PathSyntax))
            .with_rule(F::ExternalDocumentReferenceListFile, Rule::new(PathExists(File)))
            .with_rule(
                F::NamespaceUriBase,
                Rule::new(ValidUri(UriKind::Absolute)).only_for(Generate),
            )
            .with_rule(F::NamespaceUriBase, Rule::new(Required).only_for(Generate))
            .with_rule(
                F::LicenseInformationTimeoutInSeconds,
                Rule::new(IntRange {
                    min: MIN_LICENSE_FETCH_TIMEOUT_SECONDS,
                    max: MAX_LICENSE_FETCH_TIMEOUT_SECONDS,
                }),
            )
            .with_rule(F::SbomDir, Rule::new(PathExists(Directory)))
            .with_rule(F::SbomDir, Rule::new(PathSyntax))
            .with_rule(F::SbomPath, Rule::new(PathSyntax))
    }
}

/// Evaluate one rule against one field. `None` means the rule passed or did
/// not apply.
fn check(
    rule: &Rule,
    entry: &FieldEntry<'_>,
    config: &InputConfiguration,
    probe: &dyn PathProbe,
) -> Option<(FailureKind, String)> {
    let Some(value) = entry.value else {
        return check_unset(rule, config);
    };

    let message = match (rule.kind, value) {
        (RuleKind::Required | RuleKind::RequiredWith(_), _) => None,
        (RuleKind::PathExists(kind), FieldValue::Text(path)) => check_exists(kind, path, probe),
        (RuleKind::PathWritable(kind), FieldValue::Text(path)) => {
            check_writable(kind, path, probe)
        }
        (RuleKind::IntRange { min, max }, FieldValue::Integer(n)) => check_range(n, min, max),
        (RuleKind::ValidUri(kind), FieldValue::Text(uri)) => check_uri(kind, uri),
        (RuleKind::WellFormedManifestDescriptor, FieldValue::Manifests(list)) => {
            check_manifests(list)
        }
        (RuleKind::PathSyntax, FieldValue::Text(path)) => check_path_syntax(path),
        (kind, value) => Some(format!(
            "rule {kind} cannot be applied to a {} value",
            value.kind()
        )),
    };

    message.map(|m| (FailureKind::ConstraintViolated, m))
}

fn check_unset(rule: &Rule, config: &InputConfiguration) -> Option<(FailureKind, String)> {
    let message = match rule.kind {
        RuleKind::Required => "a value is required".to_string(),
        RuleKind::RequiredWith(sibling) if config.is_set(sibling) => {
            format!("a value is required when {sibling} is set")
        }
        _ if rule.implies_required => format!("a value is required by rule {}", rule.kind),
        _ => return None,
    };
    Some((FailureKind::MissingRequiredValue, message))
}

fn check_exists(kind: PathKind, path: &str, probe: &dyn PathProbe) -> Option<String> {
    match kind {
        PathKind::Directory if !probe.directory_exists(Path::new(path)) => {
            Some(format!("directory '{path}' does not exist"))
        }
        PathKind::File if !probe.file_exists(Path::new(path)) => {
            Some(format!("file '{path}' does not exist"))
        }
        _ => None,
    }
}

fn check_writable(kind: PathKind, path: &str, probe: &dyn PathProbe) -> Option<String> {
    match kind {
        PathKind::Directory if !probe.directory_is_writable(Path::new(path)) => {
            Some(format!("directory '{path}' is not writable"))
        }
        PathKind::File if !probe.file_is_writable(Path::new(path)) => {
            Some(format!("file '{path}' is not writable"))
        }
        _ => None,
    }
}

/// Inclusive on both bounds.
fn check_range(value: i64, min: i64, max: i64) -> Option<String> {
    if value < min {
        Some(format!("value {value} is below minimum {min}"))
    } else if value > max {
        Some(format!("value {value} exceeds maximum {max}"))
    } else {
        None
    }
}

fn check_uri(kind: UriKind, uri: &str) -> Option<String> {
    match url::Url::parse(uri) {
        Err(e) => Some(format!("'{uri}' is not a valid absolute URI: {e}")),
        Ok(parsed) => match kind {
            UriKind::Absolute => None,
            UriKind::Http if matches!(parsed.scheme(), "http" | "https") => None,
            UriKind::Http => Some(format!(
                "'{uri}' must use the http or https scheme, found '{}'",
                parsed.scheme()
            )),
        },
    }
}

fn check_manifests(list: &[ManifestInfo]) -> Option<String> {
    if list.is_empty() {
        return Some("at least one manifest format is required".to_string());
    }

    let mut seen = HashSet::new();
    for info in list {
        if !seen.insert(info) {
            return Some(format!("manifest format '{info}' is listed more than once"));
        }
    }
    None
}

fn check_path_syntax(path: &str) -> Option<String> {
    if path.trim().is_empty() {
        return Some("path cannot be empty".to_string());
    }
    path.chars()
        .find(|c| c.is_control())
        .map(|c| format!("path '{}' contains the control character {c:?}", path.escape_debug()))
}
