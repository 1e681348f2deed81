//! Unified error types for sbom-config.
//!
//! Reader-level problems (a malformed value, an unreadable config file) are
//! reported immediately through [`SbomConfigError`]. Rule failures found on a
//! merged configuration are collected in full and carried as a batch in
//! [`SbomConfigError::Validation`].

use crate::config::ValidationFailure;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-config operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomConfigError {
    /// A source produced a value of the wrong shape
    #[error("Malformed value for '{field}': {message}")]
    MalformedInput { field: String, message: String },

    /// Errors reading or parsing a configuration file
    #[error("Failed to load config file {path:?}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: ConfigFileErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a resolved configuration failed
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// One or more validation rules failed on the merged configuration
    #[error("Configuration is invalid:\n{0}")]
    Validation(ValidationFailures),
}

/// Specific config file error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigFileErrorKind {
    #[error("Config file not found")]
    NotFound,

    #[error("Unsupported config file extension: {0} (expected .json, .yaml or .yml)")]
    UnsupportedExtension(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

// ============================================================================
// Validation failure batch
// ============================================================================

/// Every rule failure produced by a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailures(pub Vec<ValidationFailure>);

impl ValidationFailures {
    /// Number of failures in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the batch holds no failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the failures in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {failure}")?;
        }
        Ok(())
    }
}

impl From<Vec<ValidationFailure>> for ValidationFailures {
    fn from(failures: Vec<ValidationFailure>) -> Self {
        Self(failures)
    }
}

impl IntoIterator for ValidationFailures {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-config operations
pub type Result<T> = std::result::Result<T, SbomConfigError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomConfigError {
    /// Create a malformed-input error for a named field or variable
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a config file error
    pub fn config_file(path: impl Into<PathBuf>, source: ConfigFileErrorKind) -> Self {
        Self::ConfigFile {
            path: path.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// The batched validation failures, if this is a validation error.
    #[must_use]
    pub fn validation_failures(&self) -> Option<&ValidationFailures> {
        match self {
            Self::Validation(failures) => Some(failures),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SbomConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<ValidationFailures> for SbomConfigError {
    fn from(failures: ValidationFailures) -> Self {
        Self::Validation(failures)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained onto the existing message, so the outermost
/// caller appears first: `"reading environment: SBOM_TOOL_PARALLELISM: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomConfigError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Validation batches and config file errors already name their field or
/// path and are passed through untouched.
fn add_context_to_error(err: SbomConfigError, new_ctx: &str) -> SbomConfigError {
    match err {
        SbomConfigError::MalformedInput { field, message } => SbomConfigError::MalformedInput {
            field,
            message: chain_context(new_ctx, &message),
        },
        SbomConfigError::Io {
            path,
            message,
            source,
        } => SbomConfigError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
