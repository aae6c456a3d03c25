//! Quality assessment engine
//!
//! Turns stage content into a [`QualityScore`] by scoring every dimension of
//! the stage's table through the evaluator and aggregating the results, then
//! classifies the score against a [`Threshold`] into a [`GateDecision`].
//!
//! Dimension evaluations are independent. Callers that fan them out
//! concurrently can feed the collected results into
//! [`QualityAssessor::score_from_results`] instead of calling
//! [`QualityAssessor::assess`].

pub mod dimensions;
pub mod history;

pub use dimensions::{DimensionSpec, DimensionTables, WEIGHT_TOLERANCE};
pub use history::{AssessmentHistory, AssessmentIteration};

use crate::config::{FailedDimensionPolicy, HeuristicsConfig};
use crate::errors::{EngineError, EngineResult};
use crate::models::{
    DimensionScore, GateDecision, GateVerdict, QualityScore, StageId, StageRecord, Threshold,
};
use crate::scoring::{aggregate, score_dimension, Evaluator};
use serde_json::Value;
use std::collections::BTreeMap;

/// Scores stage content against the dimension tables
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    tables: DimensionTables,
    failed_dimension: FailedDimensionPolicy,
}

impl QualityAssessor {
    /// Create an assessor. Validates the tables once, here.
    pub fn new(
        tables: DimensionTables,
        failed_dimension: FailedDimensionPolicy,
    ) -> EngineResult<Self> {
        tables.validate()?;
        Ok(Self {
            tables,
            failed_dimension,
        })
    }

    pub fn tables(&self) -> &DimensionTables {
        &self.tables
    }

    /// Assess a stage's content.
    ///
    /// Every dimension of the stage is scored through `evaluator`. When no
    /// dimension could be evaluated the result is the distinguished
    /// unavailable score (`overall = 0`, no dimensions).
    pub fn assess(
        &self,
        stage: StageId,
        record: &StageRecord,
        threshold: &Threshold,
        evaluator: &dyn Evaluator,
    ) -> EngineResult<QualityScore> {
        record.validate_shape(stage)?;

        let content = record.content_value();

        let mut results = BTreeMap::new();
        for spec in self.tables.for_stage(stage) {
            let score = score_dimension(evaluator, &content, &spec.prompt, &spec.criteria);
            if score.is_none() {
                log::warn!(
                    "Dimension '{}' of stage '{}' could not be evaluated",
                    spec.name,
                    stage
                );
            }
            results.insert(spec.name.clone(), score);
        }

        Ok(self.score_from_results(stage, &results, threshold))
    }

    /// Evaluate a single dimension, surfacing the evaluator failure.
    ///
    /// For callers that fan dimension evaluations out themselves; collect
    /// the results with `.ok()` and pass them to
    /// [`score_from_results`](Self::score_from_results).
    pub fn evaluate_dimension(
        &self,
        stage: StageId,
        spec: &DimensionSpec,
        content: &Value,
        evaluator: &dyn Evaluator,
    ) -> EngineResult<f64> {
        let unavailable = |reason: String| EngineError::EvaluatorUnavailable {
            stage,
            dimension: spec.name.clone(),
            reason,
        };
        match evaluator.evaluate(&spec.prompt, content, &spec.criteria) {
            Ok(score) if score.is_finite() => Ok(score.clamp(0.0, 100.0)),
            Ok(score) => Err(unavailable(format!("non-finite score {}", score))),
            Err(e) => Err(unavailable(e.to_string())),
        }
    }

    /// Build a [`QualityScore`] from already-collected dimension results.
    ///
    /// `None` (or a missing entry) marks a failed evaluation. Names outside
    /// the stage's table are ignored.
    pub fn score_from_results(
        &self,
        stage: StageId,
        results: &BTreeMap<String, Option<f64>>,
        threshold: &Threshold,
    ) -> QualityScore {
        let specs = self.tables.for_stage(stage);

        let failed: Vec<String> = specs
            .iter()
            .filter(|spec| !matches!(results.get(&spec.name), Some(Some(_))))
            .map(|spec| spec.name.clone())
            .collect();

        if failed.len() == specs.len() {
            log::warn!(
                "Assessment unavailable for stage '{}': evaluator failed for every dimension",
                stage
            );
            return QualityScore::unavailable(failed);
        }

        let mut dimensions = BTreeMap::new();
        let mut unavailable = Vec::new();
        for spec in specs {
            let score = match (results.get(&spec.name).copied().flatten(), self.failed_dimension) {
                (Some(score), _) => score.clamp(0.0, 100.0),
                (None, FailedDimensionPolicy::Substitute(default)) => default.clamp(0.0, 100.0),
                (None, FailedDimensionPolicy::Exclude) => {
                    unavailable.push(spec.name.clone());
                    continue;
                }
            };
            dimensions.insert(
                spec.name.clone(),
                DimensionScore {
                    score,
                    weight: spec.weight,
                    threshold: threshold.minimum,
                },
            );
        }

        let scores: BTreeMap<String, f64> = dimensions
            .iter()
            .map(|(name, d)| (name.clone(), d.score))
            .collect();
        let overall = aggregate(&scores, &self.tables.weights(stage));

        log::info!(
            "Assessed stage '{}': overall {:.1} ({} dimensions, {} unavailable)",
            stage,
            overall,
            dimensions.len(),
            unavailable.len()
        );

        QualityScore {
            overall,
            dimensions,
            unavailable_dimensions: unavailable,
        }
    }
}

/// Classify a score against a threshold with the default excellence margin
pub fn evaluate_gate(score: &QualityScore, threshold: &Threshold) -> GateDecision {
    evaluate_gate_with_margin(
        score,
        threshold,
        HeuristicsConfig::default().excellence_margin,
    )
}

/// Classify a score: below minimum is blocked, below recommended is caution,
/// below recommended + margin is recommended, otherwise excellent.
pub fn evaluate_gate_with_margin(
    score: &QualityScore,
    threshold: &Threshold,
    excellence_margin: f64,
) -> GateDecision {
    let overall = score.overall;
    let verdict = if overall < threshold.minimum {
        GateVerdict::Blocked
    } else if overall < threshold.recommended {
        GateVerdict::ProceedWithCaution
    } else if overall < threshold.recommended + excellence_margin {
        GateVerdict::Recommended
    } else {
        GateVerdict::Excellent
    };

    GateDecision {
        verdict,
        score: score.clone(),
        threshold: *threshold,
    }
}
