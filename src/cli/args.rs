//! Command-line reader.
//!
//! Every tunable is an optional flag; a flag that is not passed leaves the
//! field unset so lower-precedence sources can supply it.

use crate::config::{InputConfiguration, Setting, SettingSource};
use crate::model::{AlgorithmName, ConformanceType, LogLevel, ManifestInfo};
use clap::Args;
use std::path::PathBuf;

/// Flags shared by the `generate` and `validate` subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Root of the build drop
    #[arg(short = 'b', long)]
    pub build_drop_path: Option<String>,

    /// Directory scanned for components
    #[arg(long)]
    pub build_component_path: Option<String>,

    /// File listing the files of the drop
    #[arg(long)]
    pub build_list_file: Option<String>,

    /// Directory holding the manifest (defaults to <build-drop-path>/_manifest)
    #[arg(short = 'm', long)]
    pub manifest_dir_path: Option<String>,

    /// Validation output file
    #[arg(short = 'o', long)]
    pub output_path: Option<String>,

    /// Number of parallel workers
    #[arg(long)]
    pub parallelism: Option<i64>,

    /// Log level: Verbose, Debug, Information, Warning, Error, Fatal
    #[arg(long)]
    pub verbosity: Option<LogLevel>,

    /// JSON or YAML configuration file
    #[arg(short = 'c', long)]
    pub config_file_path: Option<PathBuf>,

    /// Manifest format as <name>:<version>; repeatable
    #[arg(long = "manifest-info", value_name = "NAME:VERSION")]
    pub manifest_info: Vec<ManifestInfo>,

    /// Hash algorithm: SHA1, SHA256, SHA512
    #[arg(long)]
    pub hash_algorithm: Option<AlgorithmName>,

    /// Only validate files under this relative path
    #[arg(long)]
    pub root_path_filter: Option<String>,

    #[arg(long)]
    pub catalog_file_path: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub validate_signature: Option<bool>,

    /// Do not fail when drop files are missing
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub ignore_missing: Option<bool>,

    #[arg(long)]
    pub package_name: Option<String>,

    #[arg(long)]
    pub package_version: Option<String>,

    /// Supplier recorded in the generated document
    #[arg(long)]
    pub package_supplier: Option<String>,

    #[arg(long)]
    pub telemetry_file_path: Option<String>,

    /// Comma-separated container images to scan
    #[arg(long)]
    pub docker_images_to_scan: Option<String>,

    #[arg(long)]
    pub external_document_reference_list_file: Option<String>,

    #[arg(long)]
    pub additional_component_detector_args: Option<String>,

    #[arg(long)]
    pub namespace_uri_unique_part: Option<String>,

    /// Base URI of the document namespace
    #[arg(long)]
    pub namespace_uri_base: Option<String>,

    #[arg(long)]
    pub generation_timestamp: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub follow_symlinks: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub delete_manifest_dir_if_present: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub fail_if_no_packages: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub fetch_license_information: Option<bool>,

    #[arg(long)]
    pub license_information_timeout_in_seconds: Option<i64>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub enable_package_metadata_parsing: Option<bool>,

    #[arg(long)]
    pub sbom_dir: Option<String>,

    #[arg(long)]
    pub sbom_path: Option<String>,

    /// Conformance standard: None, NTIAMin
    #[arg(long)]
    pub conformance: Option<ConformanceType>,
}

fn from_cli<T>(value: Option<T>) -> Setting<T> {
    value.map_or_else(Setting::unset, |v| Setting::new(v, SettingSource::CommandLine))
}

impl ConfigArgs {
    /// The partial configuration supplied on the command line.
    #[must_use]
    pub fn into_configuration(self) -> InputConfiguration {
        InputConfiguration {
            build_drop_path: from_cli(self.build_drop_path),
            build_component_path: from_cli(self.build_component_path),
            build_list_file: from_cli(self.build_list_file),
            manifest_dir_path: from_cli(self.manifest_dir_path),
            output_path: from_cli(self.output_path),
            parallelism: from_cli(self.parallelism),
            verbosity: from_cli(self.verbosity),
            config_file_path: from_cli(
                self.config_file_path.map(|p| p.display().to_string()),
            ),
            manifest_info: from_cli(Some(self.manifest_info).filter(|list| !list.is_empty())),
            hash_algorithm: from_cli(self.hash_algorithm),
            root_path_filter: from_cli(self.root_path_filter),
            catalog_file_path: from_cli(self.catalog_file_path),
            validate_signature: from_cli(self.validate_signature),
            ignore_missing: from_cli(self.ignore_missing),
            package_name: from_cli(self.package_name),
            package_version: from_cli(self.package_version),
            package_supplier: from_cli(self.package_supplier),
            telemetry_file_path: from_cli(self.telemetry_file_path),
            docker_images_to_scan: from_cli(self.docker_images_to_scan),
            external_document_reference_list_file: from_cli(
                self.external_document_reference_list_file,
            ),
            additional_component_detector_args: from_cli(self.additional_component_detector_args),
            namespace_uri_unique_part: from_cli(self.namespace_uri_unique_part),
            namespace_uri_base: from_cli(self.namespace_uri_base),
            generation_timestamp: from_cli(self.generation_timestamp),
            follow_symlinks: from_cli(self.follow_symlinks),
            delete_manifest_dir_if_present: from_cli(self.delete_manifest_dir_if_present),
            fail_if_no_packages: from_cli(self.fail_if_no_packages),
            fetch_license_information: from_cli(self.fetch_license_information),
            license_information_timeout_in_seconds: from_cli(
                self.license_information_timeout_in_seconds,
            ),
            enable_package_metadata_parsing: from_cli(self.enable_package_metadata_parsing),
            sbom_dir: from_cli(self.sbom_dir),
            sbom_path: from_cli(self.sbom_path),
            conformance: from_cli(self.conformance),
            ..InputConfiguration::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigField;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ConfigArgs,
    }

    fn parse(argv: &[&str]) -> InputConfiguration {
        let cli = TestCli::try_parse_from(std::iter::once("sbom-config").chain(argv.iter().copied()))
            .unwrap();
        cli.args.into_configuration()
    }

    #[test]
    fn test_unpassed_flags_stay_unset() {
        let config = parse(&["-b", "/drop"]);
        assert_eq!(config.set_fields(), vec![ConfigField::BuildDropPath]);
        assert_eq!(config.build_drop_path.source(), Some(SettingSource::CommandLine));
    }

    #[test]
    fn test_typed_flags() {
        let config = parse(&[
            "--parallelism",
            "16",
            "--manifest-info",
            "spdx:2.2",
            "--manifest-info",
            "spdx:3.0",
            "--hash-algorithm",
            "sha512",
            "--follow-symlinks",
            "false",
            "--ignore-missing",
        ]);
        assert_eq!(config.parallelism.value(), Some(&16));
        assert_eq!(config.manifest_info.value().map(Vec::len), Some(2));
        assert_eq!(config.hash_algorithm.value(), Some(&AlgorithmName::Sha512));
        assert_eq!(config.follow_symlinks.value(), Some(&false));
        assert_eq!(config.ignore_missing.value(), Some(&true));
    }

    #[test]
    fn test_malformed_manifest_info_rejected_by_parser() {
        let result = TestCli::try_parse_from(["sbom-config", "--manifest-info", "spdx"]);
        assert!(result.is_err());
    }
}
