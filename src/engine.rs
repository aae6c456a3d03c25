//! Engine facade
//!
//! [`QualityEngine`] holds the validated tables and heuristics and exposes
//! every outbound operation. It owns no mutable state: each call takes a
//! document snapshot and returns fresh values.

use crate::assessment::{evaluate_gate_with_margin, QualityAssessor};
use crate::config::EngineConfig;
use crate::consistency::ConsistencyValidator;
use crate::errors::EngineResult;
use crate::gaps::GapDetector;
use crate::models::{
    ActionPlan, ConsistencyResult, GapReport, GateDecision, ImprovementSuggestion,
    ProjectDocument, QualityScore, StageId, StageRecord, Threshold,
};
use crate::scoring::{Evaluator, Similarity};
use crate::suggestions::{self, SuggestionEngine};
use crate::thresholds::{self, ProjectContext};
use serde::{Deserialize, Serialize};

/// Everything the workflow needs to decide on one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReview {
    pub stage: StageId,
    pub threshold: Threshold,
    pub score: QualityScore,
    /// `None` when the assessment was unavailable
    pub decision: Option<GateDecision>,
    pub suggestions: Vec<ImprovementSuggestion>,
    /// The stage record with the new score attached
    pub record: StageRecord,
}

impl StageReview {
    /// Whether the workflow may mark the stage complete
    pub fn allows_progress(&self) -> bool {
        self.decision
            .as_ref()
            .is_some_and(|d| d.verdict.allows_progress())
    }
}

/// Quality engine facade
#[derive(Debug, Clone)]
pub struct QualityEngine {
    config: EngineConfig,
    assessor: QualityAssessor,
    validator: ConsistencyValidator,
    gaps: GapDetector,
    suggestions: SuggestionEngine,
}

impl QualityEngine {
    /// Build an engine. Every weight table is validated here, once.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let assessor =
            QualityAssessor::new(config.dimension_tables(), config.scoring.failed_dimension)?;
        let validator = ConsistencyValidator::new(config.consistency_rules())?;
        let gaps = GapDetector::new(&config.heuristics);
        let suggestions = SuggestionEngine::new(config.heuristics.clone(), validator.clone());

        log::info!(
            "Quality engine ready ({} validated stage pairs)",
            validator.rules().pairs.len()
        );

        Ok(Self {
            config,
            assessor,
            validator,
            gaps,
            suggestions,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn assessor(&self) -> &QualityAssessor {
        &self.assessor
    }

    pub fn compute_threshold(&self, stage: StageId, context: &ProjectContext) -> Threshold {
        thresholds::compute_threshold(
            stage,
            context.complexity,
            context.experience,
            context.project_type,
            &self.config.heuristics,
        )
    }

    pub fn assess(
        &self,
        stage: StageId,
        document: &ProjectDocument,
        threshold: &Threshold,
        evaluator: &dyn Evaluator,
    ) -> EngineResult<QualityScore> {
        self.assessor
            .assess(stage, document.stage(stage)?, threshold, evaluator)
    }

    pub fn evaluate_gate(&self, score: &QualityScore, threshold: &Threshold) -> GateDecision {
        evaluate_gate_with_margin(score, threshold, self.config.heuristics.excellence_margin)
    }

    pub fn validate_consistency(
        &self,
        source: StageId,
        target: StageId,
        document: &ProjectDocument,
        similarity: &dyn Similarity,
    ) -> EngineResult<ConsistencyResult> {
        self.validator
            .validate_consistency(source, target, document, similarity)
    }

    pub fn validate_all(
        &self,
        document: &ProjectDocument,
        similarity: &dyn Similarity,
    ) -> EngineResult<Vec<ConsistencyResult>> {
        self.validator.validate_all(document, similarity)
    }

    pub fn detect_gaps(&self, document: &ProjectDocument) -> EngineResult<GapReport> {
        self.gaps.detect_gaps(document)
    }

    pub fn generate_suggestions(
        &self,
        document: &ProjectDocument,
        stage: StageId,
        similarity: &dyn Similarity,
    ) -> EngineResult<Vec<ImprovementSuggestion>> {
        self.suggestions
            .generate_suggestions(document, stage, similarity)
    }

    pub fn build_action_plan(&self, suggestions: &[ImprovementSuggestion]) -> ActionPlan {
        suggestions::build_action_plan(suggestions)
    }

    pub fn success_indicators(&self, suggestions: &[ImprovementSuggestion]) -> Vec<String> {
        suggestions::success_indicators(suggestions)
    }

    /// Threshold, assessment, gate decision and suggestions for one stage.
    ///
    /// Suggestions are generated against the document with the new score
    /// attached. A blocked stage always carries at least one suggestion.
    pub fn review_stage(
        &self,
        document: &ProjectDocument,
        stage: StageId,
        context: &ProjectContext,
        evaluator: &dyn Evaluator,
        similarity: &dyn Similarity,
    ) -> EngineResult<StageReview> {
        let threshold = self.compute_threshold(stage, context);
        let score = self.assess(stage, document, &threshold, evaluator)?;

        let record = document
            .stage(stage)?
            .clone()
            .with_quality_score(score.clone());
        let updated = document.clone().with_stage(stage, record.clone());

        let decision = if score.is_unavailable() {
            log::warn!("No gate decision for stage '{}': assessment unavailable", stage);
            None
        } else {
            Some(self.evaluate_gate(&score, &threshold))
        };

        let mut suggestions = self.generate_suggestions(&updated, stage, similarity)?;

        if decision.as_ref().is_some_and(GateDecision::is_blocked) && suggestions.is_empty() {
            if let Some((name, dimension)) = score.weakest_dimension() {
                suggestions.push(
                    self.suggestions
                        .dimension_suggestion(stage, name, dimension),
                );
            }
        }

        if let Some(ref d) = decision {
            log::info!(
                "Stage '{}' review: {} ({:.1} vs {:.1}/{:.1}), {} suggestions",
                stage,
                d.verdict,
                score.overall,
                threshold.minimum,
                threshold.recommended,
                suggestions.len()
            );
        }

        Ok(StageReview {
            stage,
            threshold,
            score,
            decision,
            suggestions,
            record,
        })
    }
}
