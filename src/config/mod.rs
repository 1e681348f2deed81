//! Configuration core for sbom-config.
//!
//! This module provides:
//! - [`Setting`], a value tagged with the [`SettingSource`] that supplied it
//! - [`InputConfiguration`], the aggregate holding every tunable
//! - Readers for config files and the environment (the command line lives
//!   in [`crate::cli`])
//! - [`SourceMerger`], folding partial configurations by precedence
//! - [`RuleRegistry`], declarative rules scoped per [`ManifestToolAction`]
//! - [`resolve`], which ties the above together
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sbom_config::config::{
//!     read_config_file, read_process_environment, resolve, ManifestToolAction, StdPathProbe,
//! };
//! use std::path::Path;
//!
//! # fn main() -> sbom_config::Result<()> {
//! let file = read_config_file(Path::new("sbom.config.json"))?;
//! let env = read_process_environment()?;
//!
//! let config = resolve([env, file], ManifestToolAction::Generate, &StdPathProbe)?;
//! println!("{:?}", config.parallelism.get());
//! # Ok(())
//! # }
//! ```

mod defaults;
mod derive;
pub mod env;
pub mod file;
mod merge;
mod resolve;
mod setting;
mod types;
mod validation;

pub use defaults::{
    DefaultTable, DefaultValue, DEFAULT_LICENSE_FETCH_TIMEOUT_SECONDS, DEFAULT_PARALLELISM,
    MANIFEST_DIR_NAME, MAX_LICENSE_FETCH_TIMEOUT_SECONDS, MAX_PARALLELISM,
    MIN_LICENSE_FETCH_TIMEOUT_SECONDS, MIN_PARALLELISM,
};
pub use derive::{apply_system_overrides, manifest_file_path};
pub use env::{read_environment, read_process_environment, ENV_PREFIX};
pub use file::{parse_config_str, read_config_file, ConfigFileFormat};
pub use merge::{merge_sources, SourceMerger, SourcePrecedence};
pub use resolve::{resolve, ConfigResolver};
pub use setting::{Setting, SettingSource};
pub use types::{
    ConfigField, ConfigFileValues, FieldEntry, FieldType, FieldValue, InputConfiguration,
    ManifestToolAction,
};
pub use validation::{
    FailureKind, PathKind, PathProbe, Rule, RuleKind, RuleRegistry, Scope, StdPathProbe, UriKind,
    ValidationFailure,
};
