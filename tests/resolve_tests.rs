//! End-to-end resolution tests.
//!
//! These drive the public API the way the generation and validation
//! pipelines do: read sources, resolve for an action, inspect provenance or
//! the failure batch.

use sbom_config::config::{
    parse_config_str, read_config_file, read_environment, ConfigFileFormat, DefaultTable,
    DefaultValue, FailureKind, PathProbe, Rule, RuleKind, RuleRegistry, Scope,
    DEFAULT_PARALLELISM, MAX_PARALLELISM, MIN_PARALLELISM,
};
use sbom_config::error::ConfigFileErrorKind;
use sbom_config::model::AlgorithmName;
use sbom_config::{
    resolve, ConfigField, ConfigResolver, InputConfiguration, ManifestInfo, ManifestToolAction,
    SbomConfigError, Setting, SettingSource, SourcePrecedence, ValidationFailures,
};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

/// Every path exists and is writable.
struct AllPathsExist;

impl PathProbe for AllPathsExist {
    fn directory_exists(&self, _: &Path) -> bool {
        true
    }
    fn file_exists(&self, _: &Path) -> bool {
        true
    }
    fn directory_is_writable(&self, _: &Path) -> bool {
        true
    }
    fn file_is_writable(&self, _: &Path) -> bool {
        true
    }
}

fn cli(build: impl FnOnce(&mut InputConfiguration)) -> InputConfiguration {
    let mut config = InputConfiguration::new();
    build(&mut config);
    config
}

fn config_file(content: &str, format: ConfigFileFormat) -> InputConfiguration {
    parse_config_str(content, format)
        .unwrap()
        .into_configuration(SettingSource::ConfigFile)
}

fn text(value: &str, source: SettingSource) -> Setting<String> {
    Setting::new(value.to_string(), source)
}

/// A command-line source that satisfies every stock generate rule.
fn valid_generate_cli() -> InputConfiguration {
    cli(|c| {
        c.build_drop_path = text("/drop", SettingSource::CommandLine);
        c.package_supplier = text("Contoso", SettingSource::CommandLine);
        c.namespace_uri_base = text("https://sbom.contoso.com", SettingSource::CommandLine);
    })
}

fn expect_failures(result: sbom_config::Result<InputConfiguration>) -> ValidationFailures {
    match result {
        Err(SbomConfigError::Validation(failures)) => failures,
        Err(other) => panic!("expected validation failures, got {other:?}"),
        Ok(config) => panic!("expected validation failures, got {config:?}"),
    }
}

// ============================================================================
// Requiredness and defaults
// ============================================================================

#[test]
fn required_field_without_default_reports_missing_value() {
    let sources = [cli(|c| {
        c.package_supplier = text("Contoso", SettingSource::CommandLine);
        c.namespace_uri_base = text("https://sbom.contoso.com", SettingSource::CommandLine);
    })];

    let failures = expect_failures(resolve(sources, ManifestToolAction::Generate, &AllPathsExist));

    assert_eq!(failures.len(), 1, "{failures}");
    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.field, ConfigField::BuildDropPath);
    assert_eq!(failure.kind, FailureKind::MissingRequiredValue);
    assert_eq!(failure.rule, RuleKind::Required);
}

#[test]
fn required_field_with_default_resolves_from_default() {
    let resolver = ConfigResolver::new()
        .registry(RuleRegistry::empty().with_rule(ConfigField::Parallelism, Rule::new(RuleKind::Required)));

    let config = resolver
        .resolve([InputConfiguration::new()], ManifestToolAction::Validate, &AllPathsExist)
        .unwrap();

    assert_eq!(
        config.parallelism.get(),
        Some((&DEFAULT_PARALLELISM, SettingSource::Default))
    );
}

#[test]
fn custom_default_table_replaces_stock_defaults() {
    let defaults = DefaultTable::empty()
        .with(ConfigField::PackageSupplier, DefaultValue::Text("Contoso"))
        .unwrap();
    let sources = [cli(|c| {
        c.build_drop_path = text("/drop", SettingSource::CommandLine);
        c.namespace_uri_base = text("https://sbom.contoso.com", SettingSource::CommandLine);
    })];

    let config = ConfigResolver::new()
        .defaults(defaults)
        .resolve(sources, ManifestToolAction::Generate, &AllPathsExist)
        .unwrap();

    assert_eq!(config.package_supplier.source(), Some(SettingSource::Default));
    assert!(!config.parallelism.is_set());
}

#[test]
fn declared_defaults_satisfy_required_enum_and_list_fields() {
    let defaults = DefaultTable::empty()
        .with(ConfigField::HashAlgorithm, DefaultValue::Text("SHA256"))
        .unwrap()
        .with(ConfigField::ManifestInfo, DefaultValue::Text("spdx:2.2"))
        .unwrap();
    let registry = RuleRegistry::empty()
        .with_rule(ConfigField::HashAlgorithm, Rule::new(RuleKind::Required))
        .with_rule(ConfigField::ManifestInfo, Rule::new(RuleKind::Required))
        .with_rule(
            ConfigField::ManifestInfo,
            Rule::new(RuleKind::WellFormedManifestDescriptor),
        );

    let config = ConfigResolver::new()
        .defaults(defaults)
        .registry(registry)
        .resolve([InputConfiguration::new()], ManifestToolAction::Generate, &AllPathsExist)
        .unwrap();

    assert_eq!(
        config.hash_algorithm.get(),
        Some((&AlgorithmName::Sha256, SettingSource::Default))
    );
    assert_eq!(
        config.manifest_info.get(),
        Some((&vec![ManifestInfo::spdx_22()], SettingSource::Default))
    );
}

#[test]
fn mismatched_declared_default_is_rejected_up_front() {
    let err = DefaultTable::empty()
        .with(ConfigField::Conformance, DefaultValue::Flag(true))
        .unwrap_err();
    assert!(matches!(err, SbomConfigError::MalformedInput { .. }), "{err:?}");
}

// ============================================================================
// Action scoping
// ============================================================================

#[test]
fn action_scoped_rule_is_skipped_for_other_action() {
    // outputPath is required only for validate
    let sources = [cli(|c| {
        c.build_drop_path = text("/drop", SettingSource::CommandLine);
        c.output_path = text("/out/validation.json", SettingSource::CommandLine);
    })];
    let config = resolve(sources, ManifestToolAction::Validate, &AllPathsExist).unwrap();
    assert!(config.package_supplier.value().is_none());

    let generate = expect_failures(resolve(
        [cli(|c| c.build_drop_path = text("/drop", SettingSource::CommandLine))],
        ManifestToolAction::Generate,
        &AllPathsExist,
    ));
    let fields: Vec<ConfigField> = generate.iter().map(|f| f.field).collect();
    assert_eq!(
        fields,
        vec![ConfigField::PackageSupplier, ConfigField::NamespaceUriBase]
    );
    assert!(generate
        .iter()
        .all(|f| f.scope == Scope::OnlyForAction(ManifestToolAction::Generate)));
}

#[test]
fn validate_skips_generate_only_uri_rule() {
    let mut source = cli(|c| {
        c.build_drop_path = text("/drop", SettingSource::CommandLine);
        c.output_path = text("/out.json", SettingSource::CommandLine);
        c.namespace_uri_base = text("not a uri", SettingSource::CommandLine);
    });

    let config = resolve([source.clone()], ManifestToolAction::Validate, &AllPathsExist).unwrap();
    assert_eq!(config.namespace_uri_base.value().map(String::as_str), Some("not a uri"));

    source.package_supplier = text("Contoso", SettingSource::CommandLine);
    let failures = expect_failures(resolve([source], ManifestToolAction::Generate, &AllPathsExist));
    assert_eq!(failures.len(), 1, "{failures}");
    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.field, ConfigField::NamespaceUriBase);
    assert_eq!(failure.kind, FailureKind::ConstraintViolated);
}

#[test]
fn scoped_failure_display_names_the_action() {
    let failures = expect_failures(resolve(
        [cli(|c| c.build_drop_path = text("/drop", SettingSource::CommandLine))],
        ManifestToolAction::Validate,
        &AllPathsExist,
    ));
    let rendered = failures.to_string();
    assert!(rendered.contains("outputPath"), "{rendered}");
    assert!(rendered.contains("(only for validate)"), "{rendered}");
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn command_line_beats_config_file() {
    let file = config_file(
        r#"{ "buildDropPath": "/file-drop", "parallelism": 4 }"#,
        ConfigFileFormat::Json,
    );
    let command_line = cli(|c| {
        c.build_drop_path = text("/cli-drop", SettingSource::CommandLine);
        c.output_path = text("/out.json", SettingSource::CommandLine);
    });

    // The order sources are handed over in does not matter.
    for sources in [
        [file.clone(), command_line.clone()],
        [command_line.clone(), file.clone()],
    ] {
        let config = resolve(sources, ManifestToolAction::Validate, &AllPathsExist).unwrap();
        assert_eq!(
            config.build_drop_path.get(),
            Some((&"/cli-drop".to_string(), SettingSource::CommandLine))
        );
        assert_eq!(config.parallelism.get(), Some((&4, SettingSource::ConfigFile)));
    }
}

#[test]
fn environment_beats_config_file_and_loses_to_command_line() {
    let vars: HashMap<&str, &str> = [
        ("SBOM_TOOL_PACKAGE_SUPPLIER", "Env Supplier"),
        ("SBOM_TOOL_PARALLELISM", "6"),
    ]
    .into_iter()
    .collect();
    let env = read_environment(|name| vars.get(name).map(|v| (*v).to_string())).unwrap();
    let file = config_file(
        "packageSupplier: File Supplier\nparallelism: 3\nfetchLicenseInformation: true\n",
        ConfigFileFormat::Yaml,
    );
    let command_line = cli(|c| {
        c.build_drop_path = text("/drop", SettingSource::CommandLine);
        c.namespace_uri_base = text("https://sbom.contoso.com", SettingSource::CommandLine);
        c.parallelism = Setting::new(12, SettingSource::CommandLine);
    });

    let config = resolve([file, env, command_line], ManifestToolAction::Generate, &AllPathsExist)
        .unwrap();

    assert_eq!(config.parallelism.get(), Some((&12, SettingSource::CommandLine)));
    assert_eq!(
        config.package_supplier.get(),
        Some((&"Env Supplier".to_string(), SettingSource::Environment))
    );
    assert_eq!(
        config.fetch_license_information.get(),
        Some((&true, SettingSource::ConfigFile))
    );
}

#[test]
fn custom_precedence_lets_config_file_win() {
    let precedence = SourcePrecedence::new([
        SettingSource::ConfigFile,
        SettingSource::CommandLine,
        SettingSource::Environment,
        SettingSource::Default,
        SettingSource::SystemGenerated,
    ])
    .unwrap();
    let mut file = valid_generate_cli();
    file.package_supplier = text("From File", SettingSource::ConfigFile);
    let mut command_line = InputConfiguration::new();
    command_line.package_supplier = text("From CLI", SettingSource::CommandLine);

    let config = ConfigResolver::new()
        .precedence(precedence)
        .resolve([command_line, file], ManifestToolAction::Generate, &AllPathsExist)
        .unwrap();

    assert_eq!(config.package_supplier.value().map(String::as_str), Some("From File"));
}

// ============================================================================
// Ranges and batching
// ============================================================================

#[test]
fn parallelism_bounds_are_inclusive() {
    for (value, ok) in [
        (MIN_PARALLELISM - 1, false),
        (MIN_PARALLELISM, true),
        (MAX_PARALLELISM, true),
        (MAX_PARALLELISM + 1, false),
    ] {
        let mut source = valid_generate_cli();
        source.parallelism = Setting::new(value, SettingSource::CommandLine);
        let result = resolve([source], ManifestToolAction::Generate, &AllPathsExist);

        if ok {
            assert!(result.is_ok(), "parallelism {value} should be accepted");
        } else {
            let failures = expect_failures(result);
            assert_eq!(failures.len(), 1);
            let failure = failures.iter().next().unwrap();
            assert_eq!(failure.field, ConfigField::Parallelism);
            assert_eq!(failure.kind, FailureKind::ConstraintViolated);
        }
    }
}

#[test]
fn every_failure_is_reported_in_one_call() {
    let sources = [cli(|c| {
        c.parallelism = Setting::new(100, SettingSource::CommandLine);
        c.package_supplier = text("Contoso", SettingSource::CommandLine);
        c.namespace_uri_base = text("https://sbom.contoso.com", SettingSource::CommandLine);
    })];

    let failures = expect_failures(resolve(sources, ManifestToolAction::Generate, &AllPathsExist));

    let kinds: Vec<(ConfigField, FailureKind)> = failures.iter().map(|f| (f.field, f.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (ConfigField::BuildDropPath, FailureKind::MissingRequiredValue),
            (ConfigField::Parallelism, FailureKind::ConstraintViolated),
        ]
    );
}

#[test]
fn package_name_and_version_travel_together() {
    let mut source = valid_generate_cli();
    source.package_name = text("contoso-app", SettingSource::CommandLine);

    let failures = expect_failures(resolve([source.clone()], ManifestToolAction::Generate, &AllPathsExist));
    assert_eq!(failures.len(), 1);
    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.field, ConfigField::PackageVersion);
    assert_eq!(failure.rule, RuleKind::RequiredWith(ConfigField::PackageName));

    source.package_version = text("1.0.0", SettingSource::CommandLine);
    assert!(resolve([source], ManifestToolAction::Generate, &AllPathsExist).is_ok());
}

// ============================================================================
// Derived settings
// ============================================================================

#[test]
fn manifest_path_is_derived_after_validation() {
    let mut source = valid_generate_cli();
    source.manifest_info = Setting::new(
        vec!["SPDX:2.2".parse().unwrap()],
        SettingSource::CommandLine,
    );

    let config = resolve([source], ManifestToolAction::Generate, &AllPathsExist).unwrap();

    let dir = Path::new("/drop").join("_manifest");
    assert_eq!(
        config.manifest_dir_path.get(),
        Some((&dir.display().to_string(), SettingSource::SystemGenerated))
    );
    let expected = dir.join("spdx_2.2").join("manifest.spdx.json");
    assert_eq!(
        config.manifest_path.get(),
        Some((&expected.display().to_string(), SettingSource::SystemGenerated))
    );
}

#[test]
fn user_supplied_manifest_path_is_ignored() {
    let mut source = valid_generate_cli();
    source.manifest_dir_path = text("/custom/manifest", SettingSource::CommandLine);
    source.manifest_path = text("/evil/manifest.json", SettingSource::CommandLine);

    let config = resolve([source], ManifestToolAction::Generate, &AllPathsExist).unwrap();

    assert_eq!(config.manifest_dir_path.source(), Some(SettingSource::CommandLine));
    let manifest_path = config.manifest_path.value().unwrap();
    assert!(manifest_path.starts_with("/custom/manifest"), "{manifest_path}");
    assert_eq!(config.manifest_path.source(), Some(SettingSource::SystemGenerated));
}

// ============================================================================
// Real filesystem
// ============================================================================

#[test]
fn config_file_on_disk_resolves_with_real_probe() {
    let tmp = TempDir::new().unwrap();
    let drop = tmp.path().join("drop");
    std::fs::create_dir(&drop).unwrap();
    let path = tmp.path().join("sbom.json");
    std::fs::write(
        &path,
        format!(
            r#"{{
                "buildDropPath": {drop:?},
                "outputPath": {out:?},
                "manifestInfo": ["SPDX:2.2"],
                "hashAlgorithm": "SHA256"
            }}"#,
            drop = drop.display().to_string(),
            out = tmp.path().join("out.json").display().to_string(),
        ),
    )
    .unwrap();

    let file = read_config_file(&path).unwrap();
    let config = resolve(
        [file],
        ManifestToolAction::Validate,
        &sbom_config::StdPathProbe,
    )
    .unwrap();

    assert_eq!(config.build_drop_path.source(), Some(SettingSource::ConfigFile));
    assert_eq!(config.follow_symlinks.get(), Some((&true, SettingSource::Default)));
}

#[test]
fn missing_drop_directory_fails_with_real_probe() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("no-such-drop");
    let source = cli(|c| {
        c.build_drop_path = text(&missing.display().to_string(), SettingSource::CommandLine);
        c.output_path = text(
            &tmp.path().join("out.json").display().to_string(),
            SettingSource::CommandLine,
        );
    });

    let failures = expect_failures(resolve(
        [source],
        ManifestToolAction::Validate,
        &sbom_config::StdPathProbe,
    ));
    assert_eq!(failures.len(), 1);
    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.rule.to_string(), "DirectoryExists");
}

#[test]
fn unknown_config_file_key_is_rejected() {
    let err = parse_config_str(
        r#"{ "buildDropPath": "/drop", "bogusKey": 1 }"#,
        ConfigFileFormat::Json,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigFileErrorKind::InvalidJson(_)), "{err:?}");
    assert!(err.to_string().contains("bogusKey"), "{err}");
}
