//! Engine configuration
//!
//! Heuristic constants, the failed-dimension policy, and optional overrides
//! of the static dimension and consistency tables. Loaded once at startup;
//! weight tables are validated there rather than on every call.

pub mod loader;

pub use loader::ConfigLoader;

use crate::assessment::DimensionTables;
use crate::consistency::ConsistencyRules;
use crate::errors::EngineResult;
use serde::{Deserialize, Serialize};

/// Engine configuration root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Replaces the standard per-stage dimension tables
    #[serde(default)]
    pub dimensions: Option<DimensionTables>,
    /// Replaces the standard set of validated stage pairs
    #[serde(default)]
    pub consistency: Option<ConsistencyRules>,
}

impl EngineConfig {
    /// Dimension tables in effect
    pub fn dimension_tables(&self) -> DimensionTables {
        self.dimensions.clone().unwrap_or_else(DimensionTables::standard)
    }

    /// Consistency rules in effect
    pub fn consistency_rules(&self) -> ConsistencyRules {
        self.consistency
            .clone()
            .unwrap_or_else(ConsistencyRules::standard)
    }

    /// Validate every weight table in effect
    pub fn validate_tables(&self) -> EngineResult<()> {
        self.dimension_tables().validate()?;
        self.consistency_rules().validate()?;
        Ok(())
    }
}

/// Named heuristic constants. None of them has a derivation beyond
/// experience with the pipeline, so all of them are overridable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    /// Drop from the previous stage that triggers regression recovery
    #[serde(
        rename = "regressionPoints",
        alias = "regression_points",
        default = "default_regression_points",
    )]
    pub regression_points: f64,
    /// Missing fields at or above which a gap is high severity
    #[serde(
        rename = "gapHighMinMissing",
        alias = "gap_high_min_missing",
        default = "default_gap_high",
    )]
    pub gap_high_min_missing: usize,
    /// Missing fields at or above which a gap is medium severity
    #[serde(
        rename = "gapMediumMinMissing",
        alias = "gap_medium_min_missing",
        default = "default_gap_medium",
    )]
    pub gap_medium_min_missing: usize,
    /// Consistency score below which an improvement is suggested
    #[serde(
        rename = "consistencyImprovementBelow",
        alias = "consistency_improvement_below",
        default = "default_consistency_improvement",
    )]
    pub consistency_improvement_below: f64,
    /// Consistency score below which that suggestion is high priority
    #[serde(
        rename = "consistencyHighPriorityBelow",
        alias = "consistency_high_priority_below",
        default = "default_consistency_high",
    )]
    pub consistency_high_priority_below: f64,
    /// Points above recommended that make a gate excellent
    #[serde(
        rename = "excellenceMargin",
        alias = "excellence_margin",
        default = "default_excellence_margin",
    )]
    pub excellence_margin: f64,
    /// Minimum distance between recommended and minimum thresholds
    #[serde(
        rename = "recommendedFloorMargin",
        alias = "recommended_floor_margin",
        default = "default_recommended_margin",
    )]
    pub recommended_floor_margin: f64,
    /// Dimension shortfall above which a suggestion is high priority
    #[serde(
        rename = "dimensionHighGap",
        alias = "dimension_high_gap",
        default = "default_dimension_high_gap",
    )]
    pub dimension_high_gap: f64,
    /// Dimension shortfall at or above which a suggestion is medium priority
    #[serde(
        rename = "dimensionMediumGap",
        alias = "dimension_medium_gap",
        default = "default_dimension_medium_gap",
    )]
    pub dimension_medium_gap: f64,
    #[serde(rename = "minimumFloor", alias = "minimum_floor", default = "default_minimum_floor")]
    pub minimum_floor: f64,
    #[serde(
        rename = "minimumCeiling",
        alias = "minimum_ceiling",
        default = "default_minimum_ceiling",
    )]
    pub minimum_ceiling: f64,
}

fn default_regression_points() -> f64 {
    10.0
}
fn default_gap_high() -> usize {
    3
}
fn default_gap_medium() -> usize {
    2
}
fn default_consistency_improvement() -> f64 {
    0.75
}
fn default_consistency_high() -> f64 {
    0.60
}
fn default_excellence_margin() -> f64 {
    10.0
}
fn default_recommended_margin() -> f64 {
    5.0
}
fn default_dimension_high_gap() -> f64 {
    15.0
}
fn default_dimension_medium_gap() -> f64 {
    5.0
}
fn default_minimum_floor() -> f64 {
    50.0
}
fn default_minimum_ceiling() -> f64 {
    100.0
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            regression_points: default_regression_points(),
            gap_high_min_missing: default_gap_high(),
            gap_medium_min_missing: default_gap_medium(),
            consistency_improvement_below: default_consistency_improvement(),
            consistency_high_priority_below: default_consistency_high(),
            excellence_margin: default_excellence_margin(),
            recommended_floor_margin: default_recommended_margin(),
            dimension_high_gap: default_dimension_high_gap(),
            dimension_medium_gap: default_dimension_medium_gap(),
            minimum_floor: default_minimum_floor(),
            minimum_ceiling: default_minimum_ceiling(),
        }
    }
}

/// What to record for a dimension whose evaluation failed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedDimensionPolicy {
    /// Leave the dimension pending and renormalize the others
    Exclude,
    /// Record this score instead
    Substitute(f64),
}

impl Default for FailedDimensionPolicy {
    fn default() -> Self {
        FailedDimensionPolicy::Exclude
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(rename = "failedDimension", alias = "failed_dimension", default)]
    pub failed_dimension: FailedDimensionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let h = HeuristicsConfig::default();
        assert_eq!(h.regression_points, 10.0);
        assert_eq!(h.gap_high_min_missing, 3);
        assert_eq!(h.gap_medium_min_missing, 2);
        assert_eq!(h.consistency_improvement_below, 0.75);
        assert_eq!(h.consistency_high_priority_below, 0.60);
        assert_eq!(
            EngineConfig::default().scoring.failed_dimension,
            FailedDimensionPolicy::Exclude
        );
    }

    #[test]
    fn test_standard_tables_validate() {
        assert!(EngineConfig::default().validate_tables().is_ok());
    }
}
