//! Cross-stage consistency validation
//!
//! Each validated stage pair carries a small set of weighted checks. A check
//! compares one field of the earlier stage with one field of the later stage
//! through the [`Similarity`] primitive; the pair's score is the weighted sum
//! of the check similarities.

pub mod rules;

pub use rules::{ConsistencyCheck, ConsistencyRules, PairRule};

use crate::errors::{EngineError, EngineResult};
use crate::models::{ConsistencyResult, ProjectDocument, StageId, StageStatus};
use crate::scoring::Similarity;

/// Validates stage pairs against a [`ConsistencyRules`] table
#[derive(Debug, Clone)]
pub struct ConsistencyValidator {
    rules: ConsistencyRules,
}

impl ConsistencyValidator {
    /// Create a validator. Validates the rule table once, here.
    pub fn new(rules: ConsistencyRules) -> EngineResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &ConsistencyRules {
        &self.rules
    }

    /// Validate one ordered pair.
    ///
    /// Fails with [`EngineError::InvalidStagePair`] when `source` is later than
    /// `target` or the pair is not in the rule table. A target that has not
    /// started, or either side being skipped, yields a trivially consistent
    /// result. A check with an empty field on either side scores 0.
    pub fn validate_consistency(
        &self,
        source: StageId,
        target: StageId,
        document: &ProjectDocument,
        similarity: &dyn Similarity,
    ) -> EngineResult<ConsistencyResult> {
        let rule = match self.rules.find(source, target) {
            Some(rule) if source < target => rule,
            _ => {
                return Err(EngineError::InvalidStagePair {
                    from: source,
                    to: target,
                })
            }
        };

        let source_record = document.stage(source)?;
        let target_record = document.stage(target)?;
        source_record.validate_shape(source)?;
        target_record.validate_shape(target)?;

        if target_record.status == StageStatus::NotStarted
            || target_record.status == StageStatus::Skipped
            || source_record.status == StageStatus::Skipped
        {
            log::debug!("Consistency {} -> {}: nothing to compare yet", source, target);
            return Ok(ConsistencyResult::trivially_consistent(source, target));
        }

        let mut consistency_score = 0.0;
        let mut validation_errors = Vec::new();
        let mut recommendations = Vec::new();

        for check in &rule.checks {
            let a = source_record.field_text(&check.source_field);
            let b = target_record.field_text(&check.target_field);

            // An empty side has nothing to agree with
            let missing: Vec<String> = [
                (source, &check.source_field, &a),
                (target, &check.target_field, &b),
            ]
            .into_iter()
            .filter(|(_, _, text)| text.trim().is_empty())
            .map(|(stage, field, _)| format!("{}.{}", stage, field))
            .collect();

            if !missing.is_empty() {
                validation_errors.push(format!(
                    "{} {} empty, so {}.{} and {}.{} cannot be compared",
                    missing.join(" and "),
                    if missing.len() > 1 { "are" } else { "is" },
                    source,
                    check.source_field,
                    target,
                    check.target_field
                ));
                recommendations.push(check.recommendation.clone());
                continue;
            }

            let sim = similarity.similarity(&a, &b).clamp(0.0, 1.0);
            consistency_score += sim * check.weight;

            if sim < check.similarity_threshold {
                validation_errors.push(format!(
                    "{}.{} and {}.{} are only {:.0}% similar ({:.0} points below the expected {:.0}%)",
                    source,
                    check.source_field,
                    target,
                    check.target_field,
                    sim * 100.0,
                    (check.similarity_threshold - sim) * 100.0,
                    check.similarity_threshold * 100.0
                ));
                recommendations.push(check.recommendation.clone());
            }
        }

        let consistency_score = consistency_score.clamp(0.0, 1.0);
        let is_consistent = consistency_score >= rule.required_score();

        log::debug!(
            "Consistency {} -> {}: score {:.2}, {} failing checks",
            source,
            target,
            consistency_score,
            validation_errors.len()
        );

        Ok(ConsistencyResult {
            source,
            target,
            is_consistent,
            consistency_score,
            validation_errors,
            recommendations,
        })
    }

    /// Validate every configured pair, in table order
    pub fn validate_all(
        &self,
        document: &ProjectDocument,
        similarity: &dyn Similarity,
    ) -> EngineResult<Vec<ConsistencyResult>> {
        let results = self
            .rules
            .pairs
            .iter()
            .map(|rule| self.validate_consistency(rule.source, rule.target, document, similarity))
            .collect::<EngineResult<Vec<_>>>()?;

        log::info!(
            "Validated {} stage pairs, {} inconsistent",
            results.len(),
            results.iter().filter(|r| !r.is_consistent).count()
        );

        Ok(results)
    }
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self {
            rules: ConsistencyRules::standard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StageRecord;
    use crate::scoring::TokenCosineSimilarity;

    fn constant(value: f64) -> impl Similarity {
        move |_: &str, _: &str| value
    }

    fn started(status: StageStatus) -> StageRecord {
        StageRecord::new().with_status(status)
    }

    fn requirements() -> StageRecord {
        started(StageStatus::Completed)
            .with_field("businessObjectives", "Reduce missed deadlines for remote teams")
            .with_field("userStories", "As an engineering lead I want to see unowned tasks")
            .with_field(
                "functionalRequirements",
                "The system must flag tasks without an owner",
            )
            .with_field("nonFunctionalRequirements", "Board loads in under one second")
            .with_field("acceptanceCriteria", "Unowned tasks trigger an alert")
    }

    #[test]
    fn test_not_started_target_is_trivially_consistent() {
        let doc = ProjectDocument::new().with_stage(StageId::Requirements, requirements());

        let result = ConsistencyValidator::default()
            .validate_consistency(StageId::Requirements, StageId::Design, &doc, &constant(0.0))
            .unwrap();

        assert!(result.is_consistent);
        assert_eq!(result.consistency_score, 1.0);
        assert!(result.validation_errors.is_empty());
    }

    #[test]
    fn test_skipped_design_is_trivially_consistent() {
        let doc = ProjectDocument::new()
            .with_stage(StageId::Design, started(StageStatus::Skipped))
            .with_stage(StageId::Architecture, started(StageStatus::InProgress));

        let result = ConsistencyValidator::default()
            .validate_consistency(StageId::Design, StageId::Architecture, &doc, &constant(0.0))
            .unwrap();
        assert!(result.is_consistent);
    }

    #[test]
    fn test_weighted_score_and_errors() {
        let doc = ProjectDocument::new()
            .with_stage(
                StageId::Idea,
                started(StageStatus::Completed)
                    .with_field("problemStatement", "alpha")
                    .with_field("targetAudience", "beta")
                    .with_field("keyFeatures", "gamma"),
            )
            .with_stage(StageId::Requirements, requirements());

        // problemStatement pair scores 0.9, everything else 0.2
        let sim = |a: &str, _: &str| if a == "alpha" { 0.9 } else { 0.2 };
        let result = ConsistencyValidator::default()
            .validate_consistency(StageId::Idea, StageId::Requirements, &doc, &sim)
            .unwrap();

        // 0.4 * 0.9 + 0.35 * 0.2 + 0.25 * 0.2
        assert!((result.consistency_score - 0.48).abs() < 1e-9);
        assert!(!result.is_consistent);
        assert_eq!(result.validation_errors.len(), 2);
        assert!(result.validation_errors[0].contains("idea.targetAudience"));
        assert!(result.validation_errors[0].contains("requirements.userStories"));
        assert!(result.validation_errors[0].contains("30 points below"));
        assert_eq!(result.recommendations.len(), 2);
    }

    fn idea() -> StageRecord {
        started(StageStatus::Completed)
            .with_field("problemStatement", "Remote teams miss deadlines")
            .with_field("targetAudience", "Engineering leads")
            .with_field("keyFeatures", "Ownership board")
    }

    #[test]
    fn test_consistent_when_score_meets_weighted_threshold() {
        let doc = ProjectDocument::new()
            .with_stage(StageId::Idea, idea())
            .with_stage(StageId::Requirements, requirements());

        let result = ConsistencyValidator::default()
            .validate_consistency(StageId::Idea, StageId::Requirements, &doc, &constant(0.6))
            .unwrap();
        assert!(result.is_consistent);
        assert!((result.consistency_score - 0.6).abs() < 1e-9);
        assert!(result.validation_errors.is_empty());
    }

    #[test]
    fn test_empty_fields_score_zero() {
        let doc = ProjectDocument::new()
            .with_stage(
                StageId::Idea,
                started(StageStatus::Completed)
                    .with_field("problemStatement", "Remote teams miss deadlines"),
            )
            .with_stage(StageId::Requirements, started(StageStatus::InProgress));

        let result = ConsistencyValidator::default()
            .validate_consistency(
                StageId::Idea,
                StageId::Requirements,
                &doc,
                &TokenCosineSimilarity,
            )
            .unwrap();

        assert_eq!(result.consistency_score, 0.0);
        assert!(!result.is_consistent);
        assert_eq!(result.validation_errors.len(), 3);
        assert_eq!(result.recommendations.len(), 3);
        assert!(result.validation_errors[0]
            .starts_with("requirements.businessObjectives is empty"));
        assert!(result.validation_errors[1]
            .starts_with("idea.targetAudience and requirements.userStories are empty"));
    }

    #[test]
    fn test_empty_source_field_is_not_compared() {
        let doc = ProjectDocument::new()
            .with_stage(
                StageId::Idea,
                started(StageStatus::Completed).with_field("targetAudience", "Engineering leads"),
            )
            .with_stage(
                StageId::Design,
                started(StageStatus::InProgress).with_field("userPersonas", "Engineering leads"),
            );

        // a similarity that would call any pair identical
        let result = ConsistencyValidator::default()
            .validate_consistency(StageId::Idea, StageId::Design, &doc, &constant(1.0))
            .unwrap();

        // only audience -> personas (weight 0.6) counts
        assert!((result.consistency_score - 0.6).abs() < 1e-9);
        assert_eq!(result.validation_errors.len(), 1);
        assert!(result.validation_errors[0].contains("idea.valueProposition"));
    }

    #[test]
    fn test_invalid_pairs() {
        let doc = ProjectDocument::new();
        let validator = ConsistencyValidator::default();

        for (source, target) in [
            (StageId::Design, StageId::Requirements),
            (StageId::Idea, StageId::ImplementationPlan),
            (StageId::Idea, StageId::Idea),
        ] {
            assert_eq!(
                validator.validate_consistency(source, target, &doc, &constant(1.0)),
                Err(EngineError::InvalidStagePair {
                    from: source,
                    to: target
                })
            );
        }
    }

    #[test]
    fn test_validate_all_returns_every_pair() {
        let validator = ConsistencyValidator::default();
        let sim = TokenCosineSimilarity;

        let empty = validator.validate_all(&ProjectDocument::new(), &sim).unwrap();
        assert_eq!(empty.len(), 9);
        assert!(empty.iter().all(|r| r.is_consistent));

        let partial = ProjectDocument::new()
            .with_stage(StageId::Idea, started(StageStatus::Completed))
            .with_stage(StageId::Requirements, requirements());
        assert_eq!(validator.validate_all(&partial, &sim).unwrap().len(), 9);
    }

    #[test]
    fn test_identical_fields_are_consistent() {
        let text = "Remote engineering teams of five to twenty people";
        let doc = ProjectDocument::new()
            .with_stage(
                StageId::Idea,
                started(StageStatus::Completed)
                    .with_field("targetAudience", text)
                    .with_field("valueProposition", "See who owns every task"),
            )
            .with_stage(
                StageId::Design,
                started(StageStatus::InProgress)
                    .with_field("userPersonas", text)
                    .with_field("userJourneys", "See who owns every task"),
            );

        let result = ConsistencyValidator::default()
            .validate_consistency(StageId::Idea, StageId::Design, &doc, &TokenCosineSimilarity)
            .unwrap();
        assert!(result.is_consistent);
        assert_eq!(result.consistency_score, 1.0);
    }
}
