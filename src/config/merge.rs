//! Folding partial configurations from several sources into one.
//!
//! Each reader produces a partial [`InputConfiguration`] whose set fields are
//! tagged with that reader's [`SettingSource`]. [`SourceMerger`] collects the
//! partials and, field by field, keeps the value from the highest-ranked
//! source in its [`SourcePrecedence`].
//!
//! The merger is consumed by [`SourceMerger::merge`], so sources can only be
//! added while collecting, and the merged aggregate it returns is never
//! touched by the merger again.

use super::setting::SettingSource;
use super::types::{ConfigField, InputConfiguration};
use crate::error::{Result, SbomConfigError};

/// Order in which sources win, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePrecedence {
    order: Vec<SettingSource>,
}

impl SourcePrecedence {
    /// command line > environment > config file > default > system baseline.
    pub const DEFAULT_ORDER: [SettingSource; 5] = [
        SettingSource::CommandLine,
        SettingSource::Environment,
        SettingSource::ConfigFile,
        SettingSource::Default,
        SettingSource::SystemGenerated,
    ];

    /// Build a precedence from `order`, highest first.
    ///
    /// Sources may not repeat. Sources left out rank below every listed one.
    pub fn new(order: impl IntoIterator<Item = SettingSource>) -> Result<Self> {
        let order: Vec<SettingSource> = order.into_iter().collect();
        for (i, source) in order.iter().enumerate() {
            if order[..i].contains(source) {
                return Err(SbomConfigError::malformed(
                    "precedence",
                    format!("source '{source}' is listed more than once"),
                ));
            }
        }
        Ok(Self { order })
    }

    /// Sources in precedence order, highest first.
    #[must_use]
    pub fn order(&self) -> &[SettingSource] {
        &self.order
    }

    /// Position of `source`; lower wins.
    #[must_use]
    pub fn rank(&self, source: SettingSource) -> usize {
        self.order
            .iter()
            .position(|s| *s == source)
            .unwrap_or(self.order.len())
    }
}

impl Default for SourcePrecedence {
    fn default() -> Self {
        Self {
            order: Self::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// Collects partial configurations and merges them by precedence.
#[derive(Debug, Clone, Default)]
pub struct SourceMerger {
    precedence: SourcePrecedence,
    sources: Vec<InputConfiguration>,
}

impl SourceMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a non-default precedence order.
    #[must_use]
    pub fn with_precedence(mut self, precedence: SourcePrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Add a partial configuration.
    pub fn add_source(&mut self, partial: InputConfiguration) {
        self.sources.push(partial);
    }

    /// Add a partial configuration, builder style.
    #[must_use]
    pub fn with_source(mut self, partial: InputConfiguration) -> Self {
        self.add_source(partial);
        self
    }

    /// Merge every collected partial into a single configuration.
    ///
    /// For each field, the value from the highest-ranked source wins; fields
    /// no source supplies stay unset. User-supplied values for
    /// system-generated fields are discarded. Fails with
    /// [`SbomConfigError::MalformedInput`] if two partials supply the same
    /// field from the same source.
    pub fn merge(self) -> Result<InputConfiguration> {
        tracing::debug!(
            sources = self.sources.len(),
            precedence = ?self.precedence.order(),
            "merging configuration sources"
        );

        let mut merged = InputConfiguration::new();
        for field in ConfigField::all().iter().copied() {
            if let Some(index) = self.winning_source(field)? {
                merged.adopt(field, &self.sources[index]);
                tracing::debug!(
                    field = field.name(),
                    source = ?merged.source_of(field),
                    "field resolved"
                );
            }
        }
        Ok(merged)
    }

    /// Index of the partial whose value for `field` wins, if any.
    fn winning_source(&self, field: ConfigField) -> Result<Option<usize>> {
        let mut best: Option<(usize, SettingSource)> = None;
        let mut seen: Vec<SettingSource> = Vec::new();

        for (index, partial) in self.sources.iter().enumerate() {
            let Some(source) = partial.source_of(field) else {
                continue;
            };

            if field.is_system_generated() && source.is_user_source() {
                tracing::warn!(
                    field = field.name(),
                    %source,
                    "ignoring user-supplied value for a system-generated field"
                );
                continue;
            }

            if seen.contains(&source) {
                return Err(SbomConfigError::malformed(
                    field.name(),
                    format!("supplied more than once by the {source} source"),
                ));
            }
            seen.push(source);

            match best {
                Some((_, current))
                    if self.precedence.rank(current) <= self.precedence.rank(source) => {}
                _ => best = Some((index, source)),
            }
        }

        Ok(best.map(|(index, _)| index))
    }
}

/// Merge `sources` with the default precedence.
pub fn merge_sources(sources: impl IntoIterator<Item = InputConfiguration>) -> Result<InputConfiguration> {
    sources
        .into_iter()
        .fold(SourceMerger::new(), SourceMerger::with_source)
        .merge()
}
