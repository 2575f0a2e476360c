//! Configuration for a comparison.
//!
//! `ComparisonOptions` carries the per-invocation user choices (normalization, strategy,
//! key column, ignored columns, display filters). `MatchTuning` centralizes the matcher
//! thresholds and scheduling intervals so they are not hardcoded across the alignment code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row alignment algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchingStrategy {
    /// Row `i` pairs with row `i`.
    Position,
    /// Rows pair by the value in `key_column_index`.
    KeyColumn,
    /// Weighted fuzzy matching: optimal assignment, greedy above the size threshold.
    #[default]
    #[serde(alias = "smart")]
    Adaptive,
    /// Order-preserving exact-row alignment (longest common subsequence).
    #[serde(alias = "lcs")]
    Sequence,
}

impl MatchingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingStrategy::Position => "position",
            MatchingStrategy::KeyColumn => "key-column",
            MatchingStrategy::Adaptive => "adaptive",
            MatchingStrategy::Sequence => "sequence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTuning {
    /// First greedy pass accepts a pair at or above this similarity.
    pub anchor_similarity: f64,
    /// Second greedy pass accepts a pair at or above this similarity.
    pub secondary_similarity: f64,
    /// Above this many rows (larger side) the greedy matcher replaces the optimal solver.
    pub greedy_row_threshold: usize,
    pub threshold_floor: f64,
    pub threshold_ceiling: f64,
    /// Acceptance threshold used when there are no candidate scores.
    pub default_threshold: f64,
    /// Solver outer iterations between progress reports and yields.
    pub solver_checkpoint_interval: usize,
    /// Rows between progress reports and yields in row loops.
    pub row_checkpoint_interval: usize,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            anchor_similarity: 0.95,
            secondary_similarity: 0.5,
            greedy_row_threshold: 1_000,
            threshold_floor: 0.3,
            threshold_ceiling: 0.7,
            default_threshold: 0.5,
            solver_checkpoint_interval: 50,
            row_checkpoint_interval: 100,
        }
    }
}

impl MatchTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit_interval(self.anchor_similarity, "anchor_similarity")?;
        ensure_unit_interval(self.secondary_similarity, "secondary_similarity")?;
        ensure_unit_interval(self.threshold_floor, "threshold_floor")?;
        ensure_unit_interval(self.threshold_ceiling, "threshold_ceiling")?;
        ensure_unit_interval(self.default_threshold, "default_threshold")?;

        if self.threshold_floor > self.threshold_ceiling {
            return Err(ConfigError::InvertedRange {
                low_field: "threshold_floor",
                low: self.threshold_floor,
                high_field: "threshold_ceiling",
                high: self.threshold_ceiling,
            });
        }
        if self.secondary_similarity > self.anchor_similarity {
            return Err(ConfigError::InvertedRange {
                low_field: "secondary_similarity",
                low: self.secondary_similarity,
                high_field: "anchor_similarity",
                high: self.anchor_similarity,
            });
        }

        ensure_non_zero(self.greedy_row_threshold, "greedy_row_threshold")?;
        ensure_non_zero(self.solver_checkpoint_interval, "solver_checkpoint_interval")?;
        ensure_non_zero(self.row_checkpoint_interval, "row_checkpoint_interval")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparisonOptions {
    /// Collapse whitespace runs and trim before comparing.
    pub ignore_whitespace: bool,
    pub ignore_case: bool,
    /// A formula-text mismatch alone marks a cell modified.
    pub compare_formulas: bool,
    pub matching_strategy: MatchingStrategy,
    /// Required by [`MatchingStrategy::KeyColumn`]; without it position matching runs.
    pub key_column_index: Option<usize>,
    /// Excluded from weighting and never trigger a diff.
    pub ignored_columns: Vec<usize>,
    pub hide_unchanged_rows: bool,
    pub hide_unchanged_columns: bool,
    pub tuning: MatchTuning,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            ignore_case: false,
            compare_formulas: false,
            matching_strategy: MatchingStrategy::Adaptive,
            key_column_index: None,
            ignored_columns: Vec::new(),
            hide_unchanged_rows: false,
            hide_unchanged_columns: false,
            tuning: MatchTuning::default(),
        }
    }
}

impl ComparisonOptions {
    /// Switches to the greedy matcher early and only keeps near-certain anchors.
    pub fn fastest() -> Self {
        Self {
            tuning: MatchTuning {
                greedy_row_threshold: 250,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }

    /// Keeps the optimal solver for larger inputs at the cost of cubic runtime.
    pub fn most_precise() -> Self {
        Self {
            tuning: MatchTuning {
                greedy_row_threshold: 3_000,
                anchor_similarity: 0.98,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn builder() -> ComparisonOptionsBuilder {
        ComparisonOptionsBuilder {
            inner: ComparisonOptions::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        if self.matching_strategy == MatchingStrategy::KeyColumn {
            if let Some(key) = self.key_column_index {
                if self.ignored_columns.contains(&key) {
                    return Err(ConfigError::IgnoredKeyColumn { column: key });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be in [0.0, 1.0] and finite (got {value})")]
    OutOfUnitInterval { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveLimit { field: &'static str, value: u64 },
    #[error("{low_field} ({low}) must not exceed {high_field} ({high})")]
    InvertedRange {
        low_field: &'static str,
        low: f64,
        high_field: &'static str,
        high: f64,
    },
    #[error("key column {column} is also listed in ignored_columns")]
    IgnoredKeyColumn { column: usize },
}

fn ensure_unit_interval(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfUnitInterval { field, value });
    }
    Ok(())
}

fn ensure_non_zero(value: usize, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveLimit {
            field,
            value: value as u64,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ComparisonOptionsBuilder {
    inner: ComparisonOptions,
}

impl Default for ComparisonOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonOptionsBuilder {
    pub fn new() -> Self {
        ComparisonOptions::builder()
    }

    pub fn ignore_whitespace(mut self, value: bool) -> Self {
        self.inner.ignore_whitespace = value;
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.inner.ignore_case = value;
        self
    }

    pub fn compare_formulas(mut self, value: bool) -> Self {
        self.inner.compare_formulas = value;
        self
    }

    pub fn matching_strategy(mut self, value: MatchingStrategy) -> Self {
        self.inner.matching_strategy = value;
        self
    }

    pub fn key_column_index(mut self, value: usize) -> Self {
        self.inner.key_column_index = Some(value);
        self
    }

    pub fn ignored_columns(mut self, value: impl IntoIterator<Item = usize>) -> Self {
        self.inner.ignored_columns = value.into_iter().collect();
        self
    }

    pub fn hide_unchanged_rows(mut self, value: bool) -> Self {
        self.inner.hide_unchanged_rows = value;
        self
    }

    pub fn hide_unchanged_columns(mut self, value: bool) -> Self {
        self.inner.hide_unchanged_columns = value;
        self
    }

    pub fn anchor_similarity(mut self, value: f64) -> Self {
        self.inner.tuning.anchor_similarity = value;
        self
    }

    pub fn secondary_similarity(mut self, value: f64) -> Self {
        self.inner.tuning.secondary_similarity = value;
        self
    }

    pub fn greedy_row_threshold(mut self, value: usize) -> Self {
        self.inner.tuning.greedy_row_threshold = value;
        self
    }

    pub fn threshold_bounds(mut self, floor: f64, ceiling: f64) -> Self {
        self.inner.tuning.threshold_floor = floor;
        self.inner.tuning.threshold_ceiling = ceiling;
        self
    }

    pub fn default_threshold(mut self, value: f64) -> Self {
        self.inner.tuning.default_threshold = value;
        self
    }

    pub fn solver_checkpoint_interval(mut self, value: usize) -> Self {
        self.inner.tuning.solver_checkpoint_interval = value;
        self
    }

    pub fn row_checkpoint_interval(mut self, value: usize) -> Self {
        self.inner.tuning.row_checkpoint_interval = value;
        self
    }

    pub fn build(self) -> Result<ComparisonOptions, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = ComparisonOptions::default();
        assert_eq!(cfg.matching_strategy, MatchingStrategy::Adaptive);
        assert_eq!(cfg.tuning.greedy_row_threshold, 1_000);
        assert_eq!(cfg.tuning.anchor_similarity, 0.95);
        assert_eq!(cfg.tuning.secondary_similarity, 0.5);
        assert_eq!(cfg.tuning.solver_checkpoint_interval, 50);
        assert_eq!(cfg.tuning.row_checkpoint_interval, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn serde_roundtrip_preserves_defaults() {
        let cfg = ComparisonOptions::default();
        let json = serde_json::to_string(&cfg).expect("serialize default options");
        let parsed: ComparisonOptions =
            serde_json::from_str(&json).expect("deserialize default options");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn camel_case_fields_and_strategy_aliases_parse() {
        let json = r#"{
            "ignoreWhitespace": true,
            "ignoreCase": true,
            "matchingStrategy": "key-column",
            "keyColumnIndex": 2,
            "ignoredColumns": [4, 5],
            "tuning": { "greedyRowThreshold": 10 }
        }"#;
        let cfg: ComparisonOptions = serde_json::from_str(json).expect("deserialize options");
        assert!(cfg.ignore_whitespace && cfg.ignore_case);
        assert_eq!(cfg.matching_strategy, MatchingStrategy::KeyColumn);
        assert_eq!(cfg.key_column_index, Some(2));
        assert_eq!(cfg.ignored_columns, vec![4, 5]);
        assert_eq!(cfg.tuning.greedy_row_threshold, 10);
        assert_eq!(cfg.tuning.anchor_similarity, 0.95);

        let smart: MatchingStrategy = serde_json::from_str(r#""smart""#).expect("alias");
        assert_eq!(smart, MatchingStrategy::Adaptive);
        let lcs: MatchingStrategy = serde_json::from_str(r#""lcs""#).expect("alias");
        assert_eq!(lcs, MatchingStrategy::Sequence);
    }

    #[test]
    fn builder_rejects_invalid_similarity() {
        let err = ComparisonOptions::builder()
            .anchor_similarity(1.5)
            .build()
            .expect_err("builder should reject invalid probability");
        assert!(matches!(
            err,
            ConfigError::OutOfUnitInterval { field: "anchor_similarity", value } if (value - 1.5).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn builder_rejects_inverted_threshold_bounds() {
        let err = ComparisonOptions::builder()
            .threshold_bounds(0.8, 0.2)
            .build()
            .expect_err("floor above ceiling");
        assert!(matches!(err, ConfigError::InvertedRange { .. }));
    }

    #[test]
    fn builder_rejects_zero_intervals_and_ignored_key() {
        let err = ComparisonOptions::builder()
            .solver_checkpoint_interval(0)
            .build()
            .expect_err("zero interval");
        assert!(matches!(
            err,
            ConfigError::NonPositiveLimit { field: "solver_checkpoint_interval", .. }
        ));

        let err = ComparisonOptions::builder()
            .matching_strategy(MatchingStrategy::KeyColumn)
            .key_column_index(1)
            .ignored_columns([1])
            .build()
            .expect_err("ignored key");
        assert_eq!(err, ConfigError::IgnoredKeyColumn { column: 1 });
    }

    #[test]
    fn presets_differ_in_expected_directions() {
        let fastest = ComparisonOptions::fastest();
        let balanced = ComparisonOptions::balanced();
        let precise = ComparisonOptions::most_precise();

        assert!(fastest.tuning.greedy_row_threshold < balanced.tuning.greedy_row_threshold);
        assert!(precise.tuning.greedy_row_threshold > balanced.tuning.greedy_row_threshold);
        assert!(precise.tuning.anchor_similarity >= balanced.tuning.anchor_similarity);
        for preset in [fastest, balanced, precise] {
            assert!(preset.validate().is_ok());
        }
    }
}
