//! **Provenance-tracked configuration for SBOM generation and validation.**
//!
//! `sbom-config` resolves the settings of an SBOM manifest tool from several
//! sources (command line, environment, config file, declared defaults) into
//! a single [`InputConfiguration`]. Every value remembers where it came from,
//! and the merged result is checked against declarative rules whose scope can
//! be limited to one [`ManifestToolAction`].
//!
//! ## Core Concepts & Modules
//!
//! - **[`config`]**: [`Setting`], the [`InputConfiguration`] aggregate, the
//!   file and environment readers, the [`SourceMerger`], the
//!   [`RuleRegistry`] and [`resolve`].
//! - **[`model`]**: [`SbomSpecification`], the `name:version` identifier for
//!   document formats, plus the value types held by structured settings.
//! - **[`cli`]**: clap arguments for the command-line reader and the handler
//!   used by the `sbom-config` binary.
//! - **[`error`]**: [`SbomConfigError`] and the batched [`ValidationFailures`].
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_config::{resolve, ManifestToolAction, SbomConfigError, StdPathProbe};
//! use sbom_config::config::{read_config_file, read_process_environment};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env = read_process_environment()?;
//!     let file = read_config_file(Path::new("sbom.config.json"))?;
//!
//!     match resolve([env, file], ManifestToolAction::Validate, &StdPathProbe) {
//!         Ok(config) => {
//!             for entry in config.entries().iter().filter(|e| e.is_set()) {
//!                 println!("{} from {:?}", entry.field, entry.source);
//!             }
//!         }
//!         Err(SbomConfigError::Validation(failures)) => {
//!             eprintln!("{failures}");
//!         }
//!         Err(other) => return Err(other.into()),
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use config::{
    resolve, ConfigField, ConfigResolver, InputConfiguration, ManifestToolAction, PathProbe,
    RuleRegistry, Setting, SettingSource, SourceMerger, SourcePrecedence, StdPathProbe,
    ValidationFailure,
};
pub use error::{ErrorContext, Result, SbomConfigError, ValidationFailures};
pub use model::{ManifestInfo, SbomSpecification};
