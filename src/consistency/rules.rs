//! Stage pair table: which pairs are validated and by which checks

use crate::assessment::WEIGHT_TOLERANCE;
use crate::errors::{EngineError, EngineResult};
use crate::models::StageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One field-to-field comparison between two stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyCheck {
    pub name: String,
    /// Field read from the earlier stage
    pub source_field: String,
    /// Field read from the later stage
    pub target_field: String,
    pub weight: f64,
    /// Similarity (0-1) the check is expected to reach
    pub similarity_threshold: f64,
    /// Shown when the check falls short
    pub recommendation: String,
}

/// Checks for one ordered stage pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRule {
    pub source: StageId,
    pub target: StageId,
    pub checks: Vec<ConsistencyCheck>,
}

impl PairRule {
    pub fn weight_sum(&self) -> f64 {
        self.checks.iter().map(|c| c.weight).sum()
    }

    /// Weighted average of the check thresholds
    pub fn required_score(&self) -> f64 {
        let total = self.weight_sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.checks
            .iter()
            .map(|c| c.weight * c.similarity_threshold)
            .sum::<f64>()
            / total
    }

    fn table_name(&self) -> String {
        format!("consistency.{}->{}", self.source, self.target)
    }

    fn invalid(&self, reason: String) -> EngineError {
        EngineError::InvalidTable {
            table: self.table_name(),
            reason,
        }
    }

    fn validate_check(&self, check: &ConsistencyCheck) -> EngineResult<()> {
        if !self.source.schema().accepts(&check.source_field) {
            return Err(self.invalid(format!(
                "check '{}' reads unknown field {}.{}",
                check.name, self.source, check.source_field
            )));
        }
        if !self.target.schema().accepts(&check.target_field) {
            return Err(self.invalid(format!(
                "check '{}' reads unknown field {}.{}",
                check.name, self.target, check.target_field
            )));
        }
        if !check.weight.is_finite() || check.weight < 0.0 {
            return Err(self.invalid(format!(
                "check '{}' has weight {}",
                check.name, check.weight
            )));
        }
        if !(0.0..=1.0).contains(&check.similarity_threshold) {
            return Err(self.invalid(format!(
                "check '{}' has similarity threshold {} outside 0-1",
                check.name, check.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// The validated stage pairs, in validation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyRules {
    pub pairs: Vec<PairRule>,
}

impl ConsistencyRules {
    /// Look up the rule for an ordered pair
    pub fn find(&self, source: StageId, target: StageId) -> Option<&PairRule> {
        self.pairs
            .iter()
            .find(|p| p.source == source && p.target == target)
    }

    /// Every pair must run forward through the pipeline, appear once, and
    /// carry checks on schema fields with non-negative weights summing to
    /// 1.0 (±0.01) and similarity thresholds within 0-1
    pub fn validate(&self) -> EngineResult<()> {
        let mut seen = BTreeSet::new();
        for pair in &self.pairs {
            if pair.source >= pair.target {
                return Err(EngineError::InvalidStagePair {
                    from: pair.source,
                    to: pair.target,
                });
            }
            if !seen.insert((pair.source, pair.target)) {
                return Err(pair.invalid("pair listed more than once".to_string()));
            }
            for check in &pair.checks {
                pair.validate_check(check)?;
            }
            let sum = pair.weight_sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(EngineError::WeightTableInconsistency {
                    table: pair.table_name(),
                    sum,
                });
            }
        }
        Ok(())
    }

    /// Four adjacent pairs plus five cross pairs. idea -> implementation_plan
    /// is not validated.
    pub fn standard() -> Self {
        use StageId::*;

        let pairs = vec![
            pair(
                Idea,
                Requirements,
                vec![
                    check(
                        "problem_objective_alignment",
                        "problemStatement",
                        "businessObjectives",
                        0.40,
                        0.60,
                        "Restate the business objectives so each one addresses the problem described in the idea.",
                    ),
                    check(
                        "audience_story_coverage",
                        "targetAudience",
                        "userStories",
                        0.35,
                        0.50,
                        "Write user stories from the point of view of every audience segment named in the idea.",
                    ),
                    check(
                        "feature_requirement_coverage",
                        "keyFeatures",
                        "functionalRequirements",
                        0.25,
                        0.55,
                        "Add functional requirements for each key feature listed in the idea.",
                    ),
                ],
            ),
            pair(
                Requirements,
                Design,
                vec![
                    check(
                        "story_journey_coverage",
                        "userStories",
                        "userJourneys",
                        0.40,
                        0.55,
                        "Map a user journey for every user story so no requirement lacks a designed flow.",
                    ),
                    check(
                        "requirement_screen_coverage",
                        "functionalRequirements",
                        "wireframes",
                        0.35,
                        0.50,
                        "Make sure each functional requirement is visible on at least one wireframe.",
                    ),
                    check(
                        "quality_attribute_alignment",
                        "nonFunctionalRequirements",
                        "accessibilityRequirements",
                        0.25,
                        0.40,
                        "Carry the non-functional requirements into the design's accessibility requirements.",
                    ),
                ],
            ),
            pair(
                Design,
                Architecture,
                vec![
                    check(
                        "screen_component_mapping",
                        "wireframes",
                        "componentDesign",
                        0.50,
                        0.45,
                        "Name the component that serves each wireframe in the component design.",
                    ),
                    check(
                        "journey_flow_support",
                        "userJourneys",
                        "systemOverview",
                        0.50,
                        0.45,
                        "Describe in the system overview how data flows for each designed user journey.",
                    ),
                ],
            ),
            pair(
                Architecture,
                ImplementationPlan,
                vec![
                    check(
                        "component_task_coverage",
                        "componentDesign",
                        "taskBreakdown",
                        0.40,
                        0.50,
                        "Break every architectural component into implementation tasks.",
                    ),
                    check(
                        "stack_resourcing",
                        "technologyStack",
                        "resourcePlan",
                        0.30,
                        0.40,
                        "Staff the resource plan with the skills the chosen technology stack needs.",
                    ),
                    check(
                        "security_risk_coverage",
                        "securityArchitecture",
                        "riskMitigation",
                        0.30,
                        0.45,
                        "Add the threats from the security architecture to the risk mitigation plan.",
                    ),
                ],
            ),
            pair(
                Idea,
                Design,
                vec![
                    check(
                        "audience_persona_alignment",
                        "targetAudience",
                        "userPersonas",
                        0.60,
                        0.60,
                        "Build the user personas from the target audience described in the idea.",
                    ),
                    check(
                        "value_journey_alignment",
                        "valueProposition",
                        "userJourneys",
                        0.40,
                        0.45,
                        "Show in the user journeys where users experience the idea's value proposition.",
                    ),
                ],
            ),
            pair(
                Idea,
                Architecture,
                vec![
                    check(
                        "problem_system_alignment",
                        "problemStatement",
                        "systemOverview",
                        0.50,
                        0.45,
                        "Tie the system overview back to the problem the idea sets out to solve.",
                    ),
                    check(
                        "feature_component_coverage",
                        "keyFeatures",
                        "componentDesign",
                        0.50,
                        0.45,
                        "Make sure every key feature from the idea has an owning component.",
                    ),
                ],
            ),
            pair(
                Requirements,
                Architecture,
                vec![
                    check(
                        "requirement_component_coverage",
                        "functionalRequirements",
                        "componentDesign",
                        0.50,
                        0.50,
                        "Assign each functional requirement to a component in the architecture.",
                    ),
                    check(
                        "quality_attribute_security",
                        "nonFunctionalRequirements",
                        "securityArchitecture",
                        0.50,
                        0.45,
                        "Address the security and reliability requirements explicitly in the security architecture.",
                    ),
                ],
            ),
            pair(
                Requirements,
                ImplementationPlan,
                vec![
                    check(
                        "acceptance_test_coverage",
                        "acceptanceCriteria",
                        "testingStrategy",
                        0.50,
                        0.50,
                        "Trace every acceptance criterion to a test in the testing strategy.",
                    ),
                    check(
                        "requirement_task_coverage",
                        "functionalRequirements",
                        "taskBreakdown",
                        0.50,
                        0.50,
                        "Make sure the task breakdown delivers every functional requirement.",
                    ),
                ],
            ),
            pair(
                Design,
                ImplementationPlan,
                vec![
                    check(
                        "screen_task_coverage",
                        "wireframes",
                        "taskBreakdown",
                        0.50,
                        0.45,
                        "Add tasks for building each screen shown in the wireframes.",
                    ),
                    check(
                        "accessibility_test_coverage",
                        "accessibilityRequirements",
                        "testingStrategy",
                        0.50,
                        0.40,
                        "Include accessibility checks in the testing strategy.",
                    ),
                ],
            ),
        ];

        Self { pairs }
    }
}

impl Default for ConsistencyRules {
    fn default() -> Self {
        Self::standard()
    }
}

fn pair(source: StageId, target: StageId, checks: Vec<ConsistencyCheck>) -> PairRule {
    PairRule {
        source,
        target,
        checks,
    }
}

fn check(
    name: &str,
    source_field: &str,
    target_field: &str,
    weight: f64,
    similarity_threshold: f64,
    recommendation: &str,
) -> ConsistencyCheck {
    ConsistencyCheck {
        name: name.to_string(),
        source_field: source_field.to_string(),
        target_field: target_field.to_string(),
        weight,
        similarity_threshold,
        recommendation: recommendation.to_string(),
    }
}
