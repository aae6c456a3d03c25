//! Per-stage dimension tables: name, weight, rubric prompt and criteria

use crate::errors::{EngineError, EngineResult};
use crate::models::StageId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Allowed deviation of a weight table's sum from 1.0
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// One scored dimension of a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionSpec {
    pub name: String,
    pub weight: f64,
    /// Rubric prompt handed to the evaluator
    pub prompt: String,
    pub criteria: Vec<String>,
}

/// Dimension tables for all five stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionTables {
    pub stages: BTreeMap<StageId, Vec<DimensionSpec>>,
}

impl DimensionTables {
    /// Dimensions of a stage (empty when the table has none)
    pub fn for_stage(&self, stage: StageId) -> &[DimensionSpec] {
        self.stages.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weight map of a stage, keyed by dimension name
    pub fn weights(&self, stage: StageId) -> BTreeMap<String, f64> {
        self.for_stage(stage)
            .iter()
            .map(|d| (d.name.clone(), d.weight))
            .collect()
    }

    /// Every stage must have a table of uniquely named, non-negative
    /// dimensions whose weights sum to 1.0 (±0.01)
    pub fn validate(&self) -> EngineResult<()> {
        for &stage in StageId::all() {
            let table = format!("dimensions.{}", stage);
            let invalid = |reason: String| EngineError::InvalidTable {
                table: table.clone(),
                reason,
            };

            let mut seen = BTreeSet::new();
            for spec in self.for_stage(stage) {
                if !seen.insert(spec.name.as_str()) {
                    return Err(invalid(format!("duplicate dimension '{}'", spec.name)));
                }
                if !spec.weight.is_finite() || spec.weight < 0.0 {
                    return Err(invalid(format!(
                        "dimension '{}' has weight {}",
                        spec.name, spec.weight
                    )));
                }
            }

            let sum: f64 = self.for_stage(stage).iter().map(|d| d.weight).sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(EngineError::WeightTableInconsistency { table, sum });
            }
        }
        Ok(())
    }

    /// The standard dimension tables
    pub fn standard() -> Self {
        let mut stages = BTreeMap::new();

        stages.insert(
            StageId::Idea,
            vec![
                dim(
                    "problem_clarity",
                    0.25,
                    "Rate how clearly the idea states the problem being solved and why it matters.",
                    &[
                        "Problem is specific rather than generic",
                        "Pain points are described from the user's perspective",
                        "Impact of leaving the problem unsolved is stated",
                    ],
                ),
                dim(
                    "target_audience_definition",
                    0.15,
                    "Rate how precisely the idea identifies who it is for.",
                    &[
                        "Primary audience segment is named",
                        "Audience needs and context are described",
                        "Secondary audiences are distinguished from the primary one",
                    ],
                ),
                dim(
                    "value_proposition",
                    0.20,
                    "Rate the strength and differentiation of the value proposition.",
                    &[
                        "Benefit to the user is explicit",
                        "Differentiation from alternatives is explained",
                        "Value is connected to the stated problem",
                    ],
                ),
                dim(
                    "solution_feasibility",
                    0.20,
                    "Rate whether the proposed solution is realistic to build.",
                    &[
                        "Key features are scoped to a buildable first version",
                        "Known constraints are acknowledged",
                        "No feature depends on unproven technology without a fallback",
                    ],
                ),
                dim(
                    "market_validation",
                    0.20,
                    "Rate the evidence that the problem and solution matter to real users.",
                    &[
                        "Success metrics are measurable",
                        "Evidence or assumptions about demand are stated",
                        "Competing approaches are considered",
                    ],
                ),
            ],
        );

        stages.insert(
            StageId::Requirements,
            vec![
                dim(
                    "completeness",
                    0.25,
                    "Rate how completely the requirements cover the idea's scope.",
                    &[
                        "Every key feature maps to at least one functional requirement",
                        "Non-functional requirements are present",
                        "Out-of-scope items are listed",
                    ],
                ),
                dim(
                    "clarity",
                    0.20,
                    "Rate how unambiguous the requirements are.",
                    &[
                        "Requirements use must/shall/should language consistently",
                        "No requirement has two plausible interpretations",
                        "Domain terms are used consistently",
                    ],
                ),
                dim(
                    "testability",
                    0.20,
                    "Rate whether each requirement can be verified.",
                    &[
                        "Acceptance criteria exist for user stories",
                        "Criteria are observable and measurable",
                        "Edge cases are called out",
                    ],
                ),
                dim(
                    "traceability",
                    0.15,
                    "Rate how well requirements trace back to business objectives.",
                    &[
                        "Each objective is served by at least one requirement",
                        "User stories reference the audience from the idea",
                    ],
                ),
                dim(
                    "feasibility",
                    0.20,
                    "Rate whether the requirements are achievable together.",
                    &[
                        "Requirements do not contradict each other",
                        "Performance targets are realistic",
                        "Dependencies between requirements are identified",
                    ],
                ),
            ],
        );

        stages.insert(
            StageId::Design,
            vec![
                dim(
                    "usability",
                    0.25,
                    "Rate how usable the described experience is for the target personas.",
                    &[
                        "Primary journeys need few steps",
                        "Error and empty states are designed",
                        "Navigation is predictable",
                    ],
                ),
                dim(
                    "requirements_alignment",
                    0.20,
                    "Rate how faithfully the design implements the requirements.",
                    &[
                        "Every user story has a journey or screen",
                        "No screen exists without a requirement behind it",
                    ],
                ),
                dim(
                    "visual_consistency",
                    0.20,
                    "Rate the consistency of the design system and screens.",
                    &[
                        "Components are reused rather than reinvented",
                        "Typography, spacing and color follow the design system",
                    ],
                ),
                dim(
                    "accessibility",
                    0.20,
                    "Rate how well the design addresses accessibility.",
                    &[
                        "Contrast and text size targets are stated",
                        "Keyboard and screen reader use is considered",
                        "Accessibility requirements reference a standard",
                    ],
                ),
                dim(
                    "information_hierarchy",
                    0.15,
                    "Rate how clearly the design prioritizes information.",
                    &[
                        "Most important content is most prominent",
                        "Wireframes show clear grouping",
                    ],
                ),
            ],
        );

        stages.insert(
            StageId::Architecture,
            vec![
                dim(
                    "scalability",
                    0.20,
                    "Rate how the architecture handles growth in load and data.",
                    &[
                        "Scaling strategy is stated for each tier",
                        "Bottlenecks are identified",
                    ],
                ),
                dim(
                    "security",
                    0.20,
                    "Rate the security posture of the architecture.",
                    &[
                        "Authentication and authorization are designed",
                        "Sensitive data is classified and protected",
                        "Threats are enumerated with mitigations",
                    ],
                ),
                dim(
                    "maintainability",
                    0.20,
                    "Rate how easy the system will be to change.",
                    &[
                        "Components have single clear responsibilities",
                        "Interfaces between components are defined",
                    ],
                ),
                dim(
                    "performance",
                    0.15,
                    "Rate whether the architecture meets the performance requirements.",
                    &[
                        "Latency and throughput targets are addressed",
                        "Caching and data access patterns are described",
                    ],
                ),
                dim(
                    "technology_fit",
                    0.15,
                    "Rate how well the chosen technologies fit the problem and team.",
                    &[
                        "Technology choices are justified",
                        "Team familiarity and ecosystem maturity are considered",
                    ],
                ),
                dim(
                    "requirements_coverage",
                    0.10,
                    "Rate how completely the architecture covers the requirements.",
                    &[
                        "Every functional requirement has an owning component",
                        "Non-functional requirements map to architectural decisions",
                    ],
                ),
            ],
        );

        stages.insert(
            StageId::ImplementationPlan,
            vec![
                dim(
                    "task_breakdown",
                    0.25,
                    "Rate how well the plan breaks the work into actionable tasks.",
                    &[
                        "Tasks are small enough to finish in a few days",
                        "Each task has a clear definition of done",
                        "Tasks cover every architectural component",
                    ],
                ),
                dim(
                    "dependency_clarity",
                    0.20,
                    "Rate how clearly task ordering and dependencies are expressed.",
                    &[
                        "Blocking dependencies are explicit",
                        "Parallelizable work is identified",
                    ],
                ),
                dim(
                    "estimation_realism",
                    0.20,
                    "Rate how realistic the timeline and estimates are.",
                    &[
                        "Milestones have dates or durations",
                        "Estimates include buffer for unknowns",
                        "Resourcing matches the scope",
                    ],
                ),
                dim(
                    "risk_coverage",
                    0.15,
                    "Rate how well the plan anticipates and mitigates risks.",
                    &[
                        "Top risks are listed with owners",
                        "Mitigations are concrete",
                    ],
                ),
                dim(
                    "testing_strategy",
                    0.20,
                    "Rate the plan's approach to verifying the work.",
                    &[
                        "Unit, integration and end-to-end levels are covered",
                        "Acceptance criteria are traced to tests",
                    ],
                ),
            ],
        );

        Self { stages }
    }
}

impl Default for DimensionTables {
    fn default() -> Self {
        Self::standard()
    }
}

fn dim(name: &str, weight: f64, prompt: &str, criteria: &[&str]) -> DimensionSpec {
    DimensionSpec {
        name: name.to_string(),
        weight,
        prompt: prompt.to_string(),
        criteria: criteria.iter().map(|c| c.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_weights_sum_to_one() {
        let tables = DimensionTables::standard();
        for &stage in StageId::all() {
            let sum: f64 = tables.weights(stage).values().sum();
            assert!((sum - 1.0).abs() <= WEIGHT_TOLERANCE, "{} sums to {}", stage, sum);
        }
        assert!(tables.validate().is_ok());
    }

    #[test]
    fn test_every_dimension_has_criteria() {
        let tables = DimensionTables::standard();
        for specs in tables.stages.values() {
            for spec in specs {
                assert!(!spec.criteria.is_empty(), "{} has no criteria", spec.name);
                assert!(!spec.prompt.is_empty());
            }
        }
    }

    #[test]
    fn test_missing_stage_table_is_inconsistent() {
        let mut tables = DimensionTables::standard();
        tables.stages.remove(&StageId::Design);

        match tables.validate() {
            Err(EngineError::WeightTableInconsistency { table, sum }) => {
                assert_eq!(table, "dimensions.design");
                assert_eq!(sum, 0.0);
            }
            other => panic!("expected weight table error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_duplicate_dimension_names() {
        let mut tables = DimensionTables::standard();
        if let Some(specs) = tables.stages.get_mut(&StageId::Idea) {
            for spec in specs.iter_mut() {
                spec.name = "clarity".to_string();
                spec.weight = 0.2;
            }
        }

        match tables.validate() {
            Err(EngineError::InvalidTable { table, reason }) => {
                assert_eq!(table, "dimensions.idea");
                assert_eq!(reason, "duplicate dimension 'clarity'");
            }
            other => panic!("expected invalid table error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut tables = DimensionTables::standard();
        if let Some(specs) = tables.stages.get_mut(&StageId::Design) {
            // still sums to 1.0
            specs[0].weight += 0.5;
            specs[1].weight -= 0.5;
        }
        assert!(matches!(
            tables.validate(),
            Err(EngineError::InvalidTable { ref table, .. }) if table == "dimensions.design"
        ));
    }

    #[test]
    fn test_detects_unbalanced_weights() {
        let mut tables = DimensionTables::standard();
        if let Some(specs) = tables.stages.get_mut(&StageId::Architecture) {
            specs[0].weight = 0.5;
        }
        assert!(matches!(
            tables.validate(),
            Err(EngineError::WeightTableInconsistency { .. })
        ));
    }
}
