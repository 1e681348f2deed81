//! CLI command handlers.
//!
//! This module provides testable handlers that are invoked by main.rs.

mod args;

pub use args::ConfigArgs;

use crate::config::{
    read_config_file, read_environment, ConfigResolver, InputConfiguration, ManifestToolAction,
    PathProbe,
};
use crate::error::{Result, SbomConfigError};
use std::fmt::Write as _;
use std::path::PathBuf;

/// How the resolved configuration is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned `field  source  value` table
    #[default]
    Table,
    /// JSON object of `{ value, source }` pairs
    Json,
}

/// Read every source and resolve them for `action`.
///
/// The config file is taken from the command line, falling back to the
/// environment.
pub fn run_resolve<F>(
    action: ManifestToolAction,
    args: ConfigArgs,
    env_lookup: F,
    probe: &dyn PathProbe,
) -> Result<InputConfiguration>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit_path = args.config_file_path.clone();
    let cli = args.into_configuration();
    let env = read_environment(env_lookup)?;

    let config_path =
        explicit_path.or_else(|| env.config_file_path.value().map(PathBuf::from));

    let mut sources = vec![cli, env];
    if let Some(path) = config_path {
        sources.push(read_config_file(&path)?);
    }

    ConfigResolver::new().resolve(sources, action, probe)
}

/// Process exit code for a failed run.
///
/// Rule failures exit with 1. Anything that kept the configuration from
/// being read or printed exits with 2.
#[must_use]
pub fn exit_code(err: &SbomConfigError) -> i32 {
    match err {
        SbomConfigError::Validation(_) => 1,
        _ => 2,
    }
}

/// Render `config` in the requested format.
pub fn render(config: &InputConfiguration, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Table => Ok(render_table(config)),
    }
}

/// One line per set field: name, source, value.
#[must_use]
pub fn render_table(config: &InputConfiguration) -> String {
    let rows: Vec<(&str, String, String)> = config
        .entries()
        .into_iter()
        .filter_map(|entry| {
            let value = entry.value?;
            let source = entry.source.map(|s| s.to_string()).unwrap_or_default();
            Some((entry.field.name(), source, value.to_string()))
        })
        .collect();

    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let source_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, source, value) in rows {
        let _ = writeln!(out, "{name:<name_width$}  {source:<source_width$}  {value}");
    }
    out
}
