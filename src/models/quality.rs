//! Quality scores, thresholds and gate decisions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Score of one quality dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    /// Evaluated score (0-100)
    pub score: f64,
    /// Configured weight of the dimension (0-1)
    pub weight: f64,
    /// Bar the dimension is expected to clear (0-100)
    pub threshold: f64,
}

impl DimensionScore {
    pub fn is_below_threshold(&self) -> bool {
        self.score < self.threshold
    }

    /// Points missing to reach the threshold (0 when met)
    pub fn shortfall(&self) -> f64 {
        (self.threshold - self.score).max(0.0)
    }
}

/// Weighted multi-dimension score of a stage.
///
/// `overall` is always derived from `dimensions`; it is never set on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    /// Weighted score (0-100), one decimal place
    pub overall: f64,
    pub dimensions: BTreeMap<String, DimensionScore>,
    /// Dimensions whose evaluation failed and were left out of `overall`
    #[serde(default)]
    pub unavailable_dimensions: Vec<String>,
}

impl QualityScore {
    /// The distinguished "assessment unavailable" score
    pub fn unavailable(failed: Vec<String>) -> Self {
        Self {
            overall: 0.0,
            dimensions: BTreeMap::new(),
            unavailable_dimensions: failed,
        }
    }

    /// True when no dimension could be evaluated
    pub fn is_unavailable(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Dimensions scoring under their threshold, in name order
    pub fn dimensions_below_threshold(&self) -> Vec<(&str, &DimensionScore)> {
        self.dimensions
            .iter()
            .filter(|(_, d)| d.is_below_threshold())
            .map(|(name, d)| (name.as_str(), d))
            .collect()
    }

    /// Lowest scoring dimension
    pub fn weakest_dimension(&self) -> Option<(&str, &DimensionScore)> {
        self.dimensions
            .iter()
            .min_by(|a, b| a.1.score.total_cmp(&b.1.score))
            .map(|(name, d)| (name.as_str(), d))
    }
}

/// Pass bar of a stage. Invariant: `minimum <= recommended`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub minimum: f64,
    pub recommended: f64,
}

impl Threshold {
    pub fn new(minimum: f64, recommended: f64) -> Self {
        Self {
            minimum,
            recommended,
        }
    }
}

/// Outcome class of a quality gate. Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateVerdict {
    /// Score below the minimum
    Blocked,
    /// Minimum met, recommended not
    ProceedWithCaution,
    /// Recommended met
    Recommended,
    /// Recommended exceeded by the excellence margin
    Excellent,
}

impl GateVerdict {
    /// Whether the pipeline may advance past the stage
    pub fn allows_progress(&self) -> bool {
        !matches!(self, GateVerdict::Blocked)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GateVerdict::Blocked => "Blocked",
            GateVerdict::ProceedWithCaution => "Proceed with caution",
            GateVerdict::Recommended => "Recommended",
            GateVerdict::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for GateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A gate verdict together with the score and threshold that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub verdict: GateVerdict,
    pub score: QualityScore,
    pub threshold: Threshold,
}

impl GateDecision {
    pub fn is_blocked(&self) -> bool {
        self.verdict == GateVerdict::Blocked
    }
}
