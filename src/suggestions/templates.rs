//! Improvement templates keyed by dimension name

use crate::models::Effort;

/// Static improvement guidance for one quality dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub actions: &'static [&'static str],
    pub estimated_impact: &'static str,
    pub effort: Effort,
}

pub const GENERIC_DIMENSION_TEMPLATE: DimensionTemplate = DimensionTemplate {
    title: "Strengthen this quality dimension",
    description: "The stage scores below its threshold on this dimension.",
    actions: &[
        "Re-read the rubric criteria for this dimension",
        "Revise the weakest section against each criterion",
        "Re-run the assessment to confirm the improvement",
    ],
    estimated_impact: "+5-10 points",
    effort: Effort::Medium,
};

const TEMPLATES: &[(&str, DimensionTemplate)] = &[
    // Idea
    (
        "problem_clarity",
        DimensionTemplate {
            title: "Sharpen the problem statement",
            description: "The problem is not specific enough to drive requirements.",
            actions: &[
                "Name who experiences the problem and when",
                "Quantify what the problem costs today",
                "Remove solution language from the problem statement",
            ],
            estimated_impact: "+8-15 points",
            effort: Effort::Low,
        },
    ),
    (
        "target_audience_definition",
        DimensionTemplate {
            title: "Narrow the target audience",
            description: "The audience is too broad to design for.",
            actions: &[
                "Pick one primary segment",
                "Describe the segment's context and constraints",
                "List secondary segments separately",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Low,
        },
    ),
    (
        "value_proposition",
        DimensionTemplate {
            title: "Clarify the value proposition",
            description: "The benefit to users or the difference from alternatives is unclear.",
            actions: &[
                "State the single most important benefit",
                "Compare against the alternative users rely on today",
                "Link the benefit to the problem statement",
            ],
            estimated_impact: "+5-12 points",
            effort: Effort::Low,
        },
    ),
    (
        "solution_feasibility",
        DimensionTemplate {
            title: "Scope the solution to something buildable",
            description: "The key features may not be realistic for a first version.",
            actions: &[
                "Cut the feature list to what the first version needs",
                "Call out constraints and unknowns",
                "Name a fallback for any risky feature",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Medium,
        },
    ),
    (
        "market_validation",
        DimensionTemplate {
            title: "Back the idea with evidence",
            description: "There is little evidence that users want this solution.",
            actions: &[
                "Make every success metric measurable with a target",
                "Summarize interviews, data or comparable products",
                "List the assumptions still to validate",
            ],
            estimated_impact: "+5-15 points",
            effort: Effort::High,
        },
    ),
    // Requirements
    (
        "completeness",
        DimensionTemplate {
            title: "Fill in missing requirements",
            description: "Parts of the idea's scope have no requirement behind them.",
            actions: &[
                "Map every key feature to functional requirements",
                "Add non-functional requirements with targets",
                "List what is explicitly out of scope",
            ],
            estimated_impact: "+8-15 points",
            effort: Effort::Medium,
        },
    ),
    (
        "clarity",
        DimensionTemplate {
            title: "Remove ambiguity from requirements",
            description: "Some requirements can be read more than one way.",
            actions: &[
                "Rewrite each requirement with must/shall/should",
                "Split requirements that describe more than one behavior",
                "Define domain terms once and reuse them",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Low,
        },
    ),
    (
        "testability",
        DimensionTemplate {
            title: "Make requirements verifiable",
            description: "Some requirements have no observable acceptance criteria.",
            actions: &[
                "Add Given/When/Then criteria to every user story",
                "Replace vague adjectives with measurable targets",
                "Call out edge cases explicitly",
            ],
            estimated_impact: "+5-12 points",
            effort: Effort::Low,
        },
    ),
    (
        "traceability",
        DimensionTemplate {
            title: "Trace requirements to objectives",
            description: "It is hard to tell which objective each requirement serves.",
            actions: &[
                "Tag each requirement with the objective it serves",
                "Reference the idea's audience in user stories",
            ],
            estimated_impact: "+3-8 points",
            effort: Effort::Low,
        },
    ),
    (
        "feasibility",
        DimensionTemplate {
            title: "Resolve conflicting or unrealistic requirements",
            description: "Requirements may contradict each other or overreach.",
            actions: &[
                "Find and resolve contradictory requirements",
                "Check performance targets against the expected scale",
                "Record dependencies between requirements",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Medium,
        },
    ),
    // Design
    (
        "usability",
        DimensionTemplate {
            title: "Simplify the primary user flows",
            description: "The main journeys take too many steps or miss states.",
            actions: &[
                "Cut steps from the most common journey",
                "Design empty, loading and error states",
                "Keep navigation consistent between screens",
            ],
            estimated_impact: "+8-15 points",
            effort: Effort::Medium,
        },
    ),
    (
        "requirements_alignment",
        DimensionTemplate {
            title: "Align the design with the requirements",
            description: "Some requirements have no screen or journey.",
            actions: &[
                "Check every user story against the journeys",
                "Remove screens no requirement asks for",
            ],
            estimated_impact: "+5-12 points",
            effort: Effort::Medium,
        },
    ),
    (
        "visual_consistency",
        DimensionTemplate {
            title: "Apply the design system consistently",
            description: "Screens reinvent components or diverge in style.",
            actions: &[
                "Replace one-off components with design system ones",
                "Align typography, spacing and color tokens",
            ],
            estimated_impact: "+3-8 points",
            effort: Effort::Low,
        },
    ),
    (
        "accessibility",
        DimensionTemplate {
            title: "Close accessibility gaps",
            description: "The design does not yet meet an accessibility standard.",
            actions: &[
                "Adopt WCAG 2.1 AA as the target",
                "Check contrast and text sizes on every screen",
                "Describe keyboard and screen reader behavior",
            ],
            estimated_impact: "+5-12 points",
            effort: Effort::Medium,
        },
    ),
    (
        "information_hierarchy",
        DimensionTemplate {
            title: "Clarify the information hierarchy",
            description: "Important content does not stand out.",
            actions: &[
                "Rank the content of each screen by importance",
                "Group related elements in the wireframes",
            ],
            estimated_impact: "+3-8 points",
            effort: Effort::Low,
        },
    ),
    // Architecture
    (
        "scalability",
        DimensionTemplate {
            title: "Plan for growth",
            description: "The architecture does not say how it scales.",
            actions: &[
                "State the scaling strategy for each tier",
                "Identify the first bottleneck under load",
                "Size the data stores for expected growth",
            ],
            estimated_impact: "+5-12 points",
            effort: Effort::High,
        },
    ),
    (
        "security",
        DimensionTemplate {
            title: "Harden the security architecture",
            description: "Authentication, authorization or data protection is underspecified.",
            actions: &[
                "Design authentication and authorization flows",
                "Classify sensitive data and how it is protected",
                "Enumerate the main threats with mitigations",
            ],
            estimated_impact: "+8-15 points",
            effort: Effort::High,
        },
    ),
    (
        "maintainability",
        DimensionTemplate {
            title: "Tighten component boundaries",
            description: "Components share responsibilities or lack clear interfaces.",
            actions: &[
                "Give each component a single responsibility",
                "Define the interface between each pair of components",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Medium,
        },
    ),
    (
        "performance",
        DimensionTemplate {
            title: "Address performance targets",
            description: "Latency and throughput requirements are not reflected in the design.",
            actions: &[
                "Map each performance requirement to a design decision",
                "Describe caching and data access patterns",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Medium,
        },
    ),
    (
        "technology_fit",
        DimensionTemplate {
            title: "Justify technology choices",
            description: "The stack choices are not tied to requirements or team skills.",
            actions: &[
                "Give a reason for each technology choice",
                "Note team familiarity and ecosystem maturity",
            ],
            estimated_impact: "+3-8 points",
            effort: Effort::Low,
        },
    ),
    (
        "requirements_coverage",
        DimensionTemplate {
            title: "Cover every requirement in the architecture",
            description: "Some requirements have no owning component.",
            actions: &[
                "Assign each functional requirement to a component",
                "Map non-functional requirements to architectural decisions",
            ],
            estimated_impact: "+3-8 points",
            effort: Effort::Medium,
        },
    ),
    // Implementation plan
    (
        "task_breakdown",
        DimensionTemplate {
            title: "Break the work into smaller tasks",
            description: "Tasks are too large or do not cover every component.",
            actions: &[
                "Split tasks longer than three days",
                "Add a definition of done to each task",
                "Check every component has tasks",
            ],
            estimated_impact: "+8-15 points",
            effort: Effort::Medium,
        },
    ),
    (
        "dependency_clarity",
        DimensionTemplate {
            title: "Make task dependencies explicit",
            description: "Task ordering and blockers are unclear.",
            actions: &[
                "List blocking dependencies for each task",
                "Mark work that can run in parallel",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Low,
        },
    ),
    (
        "estimation_realism",
        DimensionTemplate {
            title: "Make estimates realistic",
            description: "The timeline leaves no room for unknowns.",
            actions: &[
                "Add dates or durations to each milestone",
                "Add buffer for integration and review",
                "Check resourcing against scope",
            ],
            estimated_impact: "+5-10 points",
            effort: Effort::Medium,
        },
    ),
    (
        "risk_coverage",
        DimensionTemplate {
            title: "Expand risk coverage",
            description: "Top risks are missing owners or concrete mitigations.",
            actions: &[
                "List the top five risks with likelihood and impact",
                "Assign an owner and a mitigation to each",
            ],
            estimated_impact: "+3-8 points",
            effort: Effort::Low,
        },
    ),
    (
        "testing_strategy",
        DimensionTemplate {
            title: "Strengthen the testing strategy",
            description: "The plan does not say how the work will be verified.",
            actions: &[
                "Cover unit, integration and end-to-end levels",
                "Trace acceptance criteria to tests",
                "Schedule testing inside the milestones",
            ],
            estimated_impact: "+5-12 points",
            effort: Effort::Medium,
        },
    ),
];

/// Look up the improvement template for a dimension, falling back to the
/// generic one
pub fn dimension_template(dimension: &str) -> &'static DimensionTemplate {
    TEMPLATES
        .iter()
        .find(|(name, _)| *name == dimension)
        .map(|(_, template)| template)
        .unwrap_or(&GENERIC_DIMENSION_TEMPLATE)
}

/// Fixed recovery steps for a stage that scores well below its predecessor
pub const REGRESSION_ACTIONS: &[&str] = &[
    "Compare this stage against the previous stage's output section by section",
    "Identify the context from the previous stage that was lost or contradicted",
    "Regenerate the weakest sections with the previous stage as explicit input",
    "Review the regenerated content against the quality criteria",
    "Re-run the assessment and confirm the score is back in range",
];

/// Indicators that the suggested improvements landed
pub const SUCCESS_INDICATORS: &[&str] = &[
    "Overall quality score meets or exceeds the recommended threshold",
    "No dimension scores below its threshold",
    "All stage pairs touching this stage pass consistency validation",
    "No required field is missing from any reached stage",
    "Score is at or above the previous stage's score",
    "Later stages can be generated without re-asking for foundational context",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::DimensionTables;

    #[test]
    fn test_every_standard_dimension_has_a_template() {
        for specs in DimensionTables::standard().stages.values() {
            for spec in specs {
                assert_ne!(
                    dimension_template(&spec.name),
                    &GENERIC_DIMENSION_TEMPLATE,
                    "{} has no improvement template",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_unknown_dimension_uses_generic() {
        let template = dimension_template("delight");
        assert_eq!(template, &GENERIC_DIMENSION_TEMPLATE);
        assert!(!template.actions.is_empty());
    }

    #[test]
    fn test_fixed_lists() {
        assert_eq!(REGRESSION_ACTIONS.len(), 5);
        assert_eq!(SUCCESS_INDICATORS.len(), 6);
    }
}
