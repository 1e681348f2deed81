//! Resolution: merge, default, validate, derive.
//!
//! [`resolve`] is the single entry point the generation and validation
//! pipelines use. It either returns a configuration every in-scope rule
//! accepted, or every failure at once.

use super::defaults::DefaultTable;
use super::derive::apply_system_overrides;
use super::merge::{SourceMerger, SourcePrecedence};
use super::types::{InputConfiguration, ManifestToolAction};
use super::validation::{PathProbe, RuleRegistry};
use crate::error::{Result, SbomConfigError, ValidationFailures};

/// Configurable resolution pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    precedence: SourcePrecedence,
    registry: RuleRegistry,
    defaults: DefaultTable,
}

impl ConfigResolver {
    /// A resolver with stock precedence, rules and defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn precedence(mut self, precedence: SourcePrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: DefaultTable) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolve `sources` for `action`.
    ///
    /// 1. Merge the partial configurations by precedence.
    /// 2. Install declared defaults into fields still unset.
    /// 3. Evaluate every rule in scope for `action`, collecting all failures.
    /// 4. On success, derive the system-generated fields.
    ///
    /// Fails with [`SbomConfigError::Validation`] carrying every failure, or
    /// [`SbomConfigError::MalformedInput`] if the sources conflict.
    pub fn resolve(
        &self,
        sources: impl IntoIterator<Item = InputConfiguration>,
        action: ManifestToolAction,
        probe: &dyn PathProbe,
    ) -> Result<InputConfiguration> {
        let mut config = sources
            .into_iter()
            .fold(
                SourceMerger::new().with_precedence(self.precedence.clone()),
                SourceMerger::with_source,
            )
            .merge()?;

        self.defaults.apply(&mut config);

        let failures = self.registry.evaluate(&config, action, probe);
        if !failures.is_empty() {
            tracing::debug!(%action, failures = failures.len(), "configuration rejected");
            return Err(SbomConfigError::Validation(ValidationFailures(failures)));
        }

        apply_system_overrides(&mut config);

        tracing::info!(
            %action,
            fields = config.set_fields().len(),
            "configuration resolved"
        );
        Ok(config)
    }
}

/// Resolve `sources` for `action` with the stock resolver.
pub fn resolve(
    sources: impl IntoIterator<Item = InputConfiguration>,
    action: ManifestToolAction,
    probe: &dyn PathProbe,
) -> Result<InputConfiguration> {
    ConfigResolver::new().resolve(sources, action, probe)
}
