//! Remediation templates and the cross-stage input table

use crate::models::StageId;

/// How to fill a missing field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemediationTemplate {
    pub action: &'static str,
    pub guidance: &'static str,
    pub example: &'static str,
}

/// Used for any field without a dedicated template
pub const GENERIC_TEMPLATE: RemediationTemplate = RemediationTemplate {
    action: "Complete the missing section",
    guidance: "Fill in this section before moving on so later stages have the context they depend on.",
    example: "Write two or three concrete sentences, or a short bulleted list, covering this topic.",
};

const TEMPLATES: &[(&str, RemediationTemplate)] = &[
    // Idea
    (
        "problemStatement",
        RemediationTemplate {
            action: "Define the core problem",
            guidance: "Describe who experiences the problem, when it happens, and what it costs them today.",
            example: "Remote teams of 5-20 people lose track of task ownership, causing missed deadlines every sprint.",
        },
    ),
    (
        "targetAudience",
        RemediationTemplate {
            action: "Identify the target audience",
            guidance: "Name the primary user segment and what distinguishes it; list secondary segments separately.",
            example: "Primary: engineering leads at remote-first startups. Secondary: freelance project managers.",
        },
    ),
    (
        "valueProposition",
        RemediationTemplate {
            action: "State the value proposition",
            guidance: "Explain the benefit users get and why it beats the alternatives they use today.",
            example: "One place to see who owns what, updated automatically from the tools teams already use.",
        },
    ),
    (
        "keyFeatures",
        RemediationTemplate {
            action: "List the key features",
            guidance: "List the three to five capabilities the first version must have to deliver the value proposition.",
            example: "Task ownership board; Slack sync; overdue task alerts; weekly ownership digest.",
        },
    ),
    (
        "successMetrics",
        RemediationTemplate {
            action: "Define success metrics",
            guidance: "Pick measurable outcomes with a target and a time frame.",
            example: "40% of pilot teams active weekly after 8 weeks; missed deadlines down 25%.",
        },
    ),
    // Requirements
    (
        "businessObjectives",
        RemediationTemplate {
            action: "Write business objectives",
            guidance: "Translate the problem statement into objectives the product must achieve.",
            example: "Reduce missed sprint deadlines for pilot teams by 25% within two quarters.",
        },
    ),
    (
        "userStories",
        RemediationTemplate {
            action: "Write user stories",
            guidance: "Use 'As a [user], I want [capability] so that [benefit]' for each audience segment.",
            example: "As an engineering lead, I want to see unowned tasks so that nothing slips through a sprint.",
        },
    ),
    (
        "functionalRequirements",
        RemediationTemplate {
            action: "Specify functional requirements",
            guidance: "List what the system must do using must/shall/should language, one behavior per line.",
            example: "The system must flag any task without an owner within 5 minutes of creation.",
        },
    ),
    (
        "nonFunctionalRequirements",
        RemediationTemplate {
            action: "Specify non-functional requirements",
            guidance: "Cover performance, security, availability and accessibility with measurable targets.",
            example: "Board loads in under 1 second at p95 for teams with up to 2,000 tasks.",
        },
    ),
    (
        "acceptanceCriteria",
        RemediationTemplate {
            action: "Add acceptance criteria",
            guidance: "For each user story, state the observable conditions that prove it is done.",
            example: "Given a task without an owner, when 5 minutes pass, then the lead receives an alert.",
        },
    ),
    // Design
    (
        "userPersonas",
        RemediationTemplate {
            action: "Create user personas",
            guidance: "Turn the target audience into one or two personas with goals, frustrations and context.",
            example: "Priya, engineering lead, 8 reports across 3 time zones, checks status between meetings.",
        },
    ),
    (
        "userJourneys",
        RemediationTemplate {
            action: "Map user journeys",
            guidance: "Walk through the main user stories step by step, from trigger to outcome.",
            example: "Priya opens the board, filters unowned tasks, assigns two, and the owners get notified.",
        },
    ),
    (
        "wireframes",
        RemediationTemplate {
            action: "Sketch wireframes",
            guidance: "Describe or link the key screens and what each one shows and allows.",
            example: "Board screen: columns per owner, an 'Unowned' column pinned left, filter bar on top.",
        },
    ),
    (
        "designSystem",
        RemediationTemplate {
            action: "Define the design system",
            guidance: "Choose the component library, typography, spacing and color tokens the screens reuse.",
            example: "Use the existing Tailwind tokens; cards, badges and avatars from the shared UI kit.",
        },
    ),
    (
        "accessibilityRequirements",
        RemediationTemplate {
            action: "Set accessibility requirements",
            guidance: "Reference a standard and list the checks every screen must pass.",
            example: "WCAG 2.1 AA: 4.5:1 contrast, full keyboard navigation, labelled form controls.",
        },
    ),
    // Architecture
    (
        "systemOverview",
        RemediationTemplate {
            action: "Write the system overview",
            guidance: "Summarize the major parts of the system and how data flows between them.",
            example: "Web client talks to an API service; a sync worker pulls Slack events into Postgres.",
        },
    ),
    (
        "technologyStack",
        RemediationTemplate {
            action: "Choose the technology stack",
            guidance: "Name each technology with the reason it fits the requirements and the team.",
            example: "Rust + Axum API for low latency; React front end the team already knows; Postgres.",
        },
    ),
    (
        "componentDesign",
        RemediationTemplate {
            action: "Design the components",
            guidance: "Give each component one responsibility and describe its interface.",
            example: "OwnershipService: assign/unassign/list-unowned; AlertWorker: schedules overdue alerts.",
        },
    ),
    (
        "dataArchitecture",
        RemediationTemplate {
            action: "Describe the data architecture",
            guidance: "List the core entities, their relationships, and where each is stored.",
            example: "Task(id, title, owner_id, due_at) belongs to Team; events appended to an audit log.",
        },
    ),
    (
        "securityArchitecture",
        RemediationTemplate {
            action: "Document the security architecture",
            guidance: "Cover authentication, authorization, data protection and the main threats.",
            example: "OAuth via Slack; row-level team isolation; tokens encrypted at rest with KMS.",
        },
    ),
    // Implementation plan
    (
        "taskBreakdown",
        RemediationTemplate {
            action: "Break down the work",
            guidance: "Split each component into tasks of a few days with a clear definition of done.",
            example: "T1: ownership schema + migrations (2d); T2: assign endpoint with tests (2d).",
        },
    ),
    (
        "milestones",
        RemediationTemplate {
            action: "Set milestones",
            guidance: "Group tasks into milestones with target dates and a demoable outcome each.",
            example: "M1 (week 2): board shows live ownership; M2 (week 4): overdue alerts in Slack.",
        },
    ),
    (
        "resourcePlan",
        RemediationTemplate {
            action: "Plan resources",
            guidance: "State who works on what and where skills or capacity are missing.",
            example: "2 backend engineers on API and sync; 1 front-end engineer; design review weekly.",
        },
    ),
    (
        "riskMitigation",
        RemediationTemplate {
            action: "Plan risk mitigation",
            guidance: "List the top risks with likelihood, impact, owner and a concrete mitigation.",
            example: "Slack API rate limits (likely, high): batch sync every 30s, owner: backend lead.",
        },
    ),
    (
        "testingStrategy",
        RemediationTemplate {
            action: "Define the testing strategy",
            guidance: "Describe unit, integration and end-to-end coverage and how acceptance criteria are verified.",
            example: "Unit tests per service; integration tests against Postgres; Playwright for the board.",
        },
    ),
];

/// Look up the remediation template for a field, falling back to the generic one
pub fn remediation_template(field: &str) -> &'static RemediationTemplate {
    TEMPLATES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, template)| template)
        .unwrap_or(&GENERIC_TEMPLATE)
}

/// Fields of earlier stages that each stage's generation consumes
const STAGE_INPUTS: &[(StageId, &[(StageId, &str)])] = &[
    (
        StageId::Requirements,
        &[
            (StageId::Idea, "problemStatement"),
            (StageId::Idea, "targetAudience"),
            (StageId::Idea, "keyFeatures"),
            (StageId::Idea, "successMetrics"),
        ],
    ),
    (
        StageId::Design,
        &[
            (StageId::Idea, "problemStatement"),
            (StageId::Idea, "targetAudience"),
            (StageId::Idea, "valueProposition"),
            (StageId::Requirements, "userStories"),
            (StageId::Requirements, "functionalRequirements"),
            (StageId::Requirements, "nonFunctionalRequirements"),
        ],
    ),
    (
        StageId::Architecture,
        &[
            (StageId::Idea, "keyFeatures"),
            (StageId::Requirements, "functionalRequirements"),
            (StageId::Requirements, "nonFunctionalRequirements"),
            (StageId::Design, "userJourneys"),
            (StageId::Design, "wireframes"),
        ],
    ),
    (
        StageId::ImplementationPlan,
        &[
            (StageId::Idea, "successMetrics"),
            (StageId::Requirements, "functionalRequirements"),
            (StageId::Requirements, "acceptanceCriteria"),
            (StageId::Design, "wireframes"),
            (StageId::Architecture, "componentDesign"),
            (StageId::Architecture, "technologyStack"),
            (StageId::Architecture, "securityArchitecture"),
        ],
    ),
];

/// Later stages whose inputs reference any of `fields` of `stage`, in pipeline order
pub fn impacted_stages(stage: StageId, fields: &[String]) -> Vec<StageId> {
    STAGE_INPUTS
        .iter()
        .filter(|(consumer, _)| *consumer > stage)
        .filter(|(_, inputs)| {
            inputs
                .iter()
                .any(|(from, field)| *from == stage && fields.iter().any(|f| f == field))
        })
        .map(|(consumer, _)| *consumer)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_required_field_has_a_template() {
        for &stage in StageId::all() {
            for field in stage.schema().required {
                assert_ne!(
                    remediation_template(field),
                    &GENERIC_TEMPLATE,
                    "{} has no remediation template",
                    field
                );
            }
        }
    }

    #[test]
    fn test_unknown_field_falls_back_to_generic() {
        assert_eq!(remediation_template("budgetForecast"), &GENERIC_TEMPLATE);
    }

    #[test]
    fn test_problem_statement_impacts_requirements_and_design() {
        let impacted = impacted_stages(StageId::Idea, &["problemStatement".to_string()]);
        assert_eq!(impacted, vec![StageId::Requirements, StageId::Design]);
    }

    #[test]
    fn test_input_table_references_schema_fields() {
        for (consumer, inputs) in STAGE_INPUTS {
            for (from, field) in inputs.iter() {
                assert!(from < consumer);
                assert!(from.schema().required.contains(field), "{}.{}", from, field);
            }
        }
    }

    #[test]
    fn test_last_stage_impacts_nothing() {
        let impacted = impacted_stages(StageId::ImplementationPlan, &["taskBreakdown".to_string()]);
        assert!(impacted.is_empty());
    }
}
