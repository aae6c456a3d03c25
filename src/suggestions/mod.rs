//! Improvement suggestions
//!
//! Turns a stage's latest assessment, the consistency results that touch
//! it, and its score relative to the previous stage into prioritized
//! suggestions, then schedules those suggestions into a phased
//! [`ActionPlan`](crate::models::ActionPlan).

pub mod plan;
pub mod templates;

pub use plan::{build_action_plan, success_indicators};
pub use templates::{dimension_template, DimensionTemplate};

use crate::config::HeuristicsConfig;
use crate::consistency::ConsistencyValidator;
use crate::errors::EngineResult;
use crate::models::{
    ConsistencyResult, DimensionScore, Effort, ImprovementSuggestion, Priority, ProjectDocument,
    QualityScore, StageId, StageStatus, SuggestionType,
};
use crate::scoring::{success_probability, Similarity};
use templates::REGRESSION_ACTIONS;

/// Generates improvement suggestions for one stage at a time
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    heuristics: HeuristicsConfig,
    validator: ConsistencyValidator,
}

impl SuggestionEngine {
    pub fn new(heuristics: HeuristicsConfig, validator: ConsistencyValidator) -> Self {
        Self {
            heuristics,
            validator,
        }
    }

    /// Suggestions for `stage`, most urgent first.
    ///
    /// Dimension and regression suggestions need an available quality score
    /// on the stage; consistency suggestions only need content.
    pub fn generate_suggestions(
        &self,
        document: &ProjectDocument,
        stage: StageId,
        similarity: &dyn Similarity,
    ) -> EngineResult<Vec<ImprovementSuggestion>> {
        document.validate()?;

        let mut suggestions = Vec::new();

        if let Some(score) = document.quality_score(stage) {
            suggestions.extend(self.dimension_suggestions(stage, score));
        }

        for rule in &self.validator.rules().pairs {
            if rule.source != stage && rule.target != stage {
                continue;
            }
            let result =
                self.validator
                    .validate_consistency(rule.source, rule.target, document, similarity)?;
            if let Some(suggestion) = self.consistency_suggestion(stage, &result) {
                suggestions.push(suggestion);
            }
        }

        if let Some(suggestion) = self.regression_suggestion(document, stage) {
            suggestions.push(suggestion);
        }

        suggestions.sort_by_key(|s| s.priority);

        log::info!(
            "Generated {} suggestions for stage '{}'",
            suggestions.len(),
            stage
        );

        Ok(suggestions)
    }

    /// One suggestion per dimension scoring below its threshold
    pub fn dimension_suggestions(
        &self,
        stage: StageId,
        score: &QualityScore,
    ) -> Vec<ImprovementSuggestion> {
        score
            .dimensions_below_threshold()
            .into_iter()
            .map(|(name, dimension)| self.dimension_suggestion(stage, name, dimension))
            .collect()
    }

    /// Suggestion built from a dimension's improvement template
    pub fn dimension_suggestion(
        &self,
        stage: StageId,
        name: &str,
        dimension: &DimensionScore,
    ) -> ImprovementSuggestion {
        let template = dimension_template(name);
        let gap = dimension.threshold - dimension.score;

        let priority = if gap > self.heuristics.dimension_high_gap {
            Priority::High
        } else if gap >= self.heuristics.dimension_medium_gap {
            Priority::Medium
        } else {
            Priority::Low
        };

        ImprovementSuggestion {
            suggestion_type: SuggestionType::DimensionImprovement,
            stage,
            dimension: Some(name.to_string()),
            priority,
            title: template.title.to_string(),
            description: format!(
                "{} Scored {:.0} against a threshold of {:.0}.",
                template.description, dimension.score, dimension.threshold
            ),
            actions: template.actions.iter().map(|a| a.to_string()).collect(),
            estimated_impact: template.estimated_impact.to_string(),
            implementation_effort: template.effort,
            success_probability: success_probability(dimension.score),
        }
    }

    fn consistency_suggestion(
        &self,
        stage: StageId,
        result: &ConsistencyResult,
    ) -> Option<ImprovementSuggestion> {
        if !result.touches(stage)
            || result.consistency_score >= self.heuristics.consistency_improvement_below
        {
            return None;
        }

        let priority = if result.consistency_score < self.heuristics.consistency_high_priority_below
        {
            Priority::High
        } else {
            Priority::Medium
        };

        let description = if result.recommendations.is_empty() {
            format!(
                "{} and {} drift apart; align their shared content.",
                result.source.display_name(),
                result.target.display_name()
            )
        } else {
            result.recommendations.join(" ")
        };

        Some(ImprovementSuggestion {
            suggestion_type: SuggestionType::ConsistencyImprovement,
            stage,
            dimension: None,
            priority,
            title: format!(
                "Align {} with {}",
                result.target.display_name(),
                result.source.display_name()
            ),
            description,
            actions: result.recommendations.clone(),
            estimated_impact: format!(
                "Consistency from {:.0}% to at least {:.0}%",
                result.consistency_score * 100.0,
                self.heuristics.consistency_improvement_below * 100.0
            ),
            implementation_effort: Effort::Medium,
            success_probability: success_probability(result.consistency_score * 100.0),
        })
    }

    /// Critical suggestion when `stage` scores well below the nearest earlier
    /// assessed stage
    fn regression_suggestion(
        &self,
        document: &ProjectDocument,
        stage: StageId,
    ) -> Option<ImprovementSuggestion> {
        let current = document.quality_score(stage)?;
        let (previous_stage, previous) = stage
            .earlier_stages()
            .filter(|s| {
                document
                    .stages
                    .get(s)
                    .is_some_and(|r| r.status != StageStatus::Skipped)
            })
            .find_map(|s| document.quality_score(s).map(|score| (s, score)))?;

        let drop = previous.overall - current.overall;
        if drop <= self.heuristics.regression_points {
            return None;
        }

        log::warn!(
            "Stage '{}' scores {:.1} points below '{}'",
            stage,
            drop,
            previous_stage
        );

        Some(ImprovementSuggestion {
            suggestion_type: SuggestionType::RegressionRecovery,
            stage,
            dimension: None,
            priority: Priority::Critical,
            title: format!("Recover quality lost since {}", previous_stage.display_name()),
            description: format!(
                "{} scores {:.1}, {:.1} points below {} ({:.1}).",
                stage.display_name(),
                current.overall,
                drop,
                previous_stage.display_name(),
                previous.overall
            ),
            actions: REGRESSION_ACTIONS.iter().map(|a| a.to_string()).collect(),
            estimated_impact: format!("+{:.0} points", drop),
            implementation_effort: Effort::Medium,
            success_probability: success_probability(current.overall),
        })
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(HeuristicsConfig::default(), ConsistencyValidator::default())
    }
}
