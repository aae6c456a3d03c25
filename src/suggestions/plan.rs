//! Phased action plan and success indicators

use super::templates::SUCCESS_INDICATORS;
use crate::models::{ActionPlan, Effort, ImprovementSuggestion, PlanPhase, PlanPhaseKind};

/// Phase layout: effort level routed to the phase, how many items it takes,
/// duration and expected impact
const PHASES: &[(PlanPhaseKind, Effort, usize, &str, &str)] = &[
    (
        PlanPhaseKind::Immediate,
        Effort::Low,
        3,
        "1–2 hours",
        "Quick wins that lift the most visible weaknesses",
    ),
    (
        PlanPhaseKind::ShortTerm,
        Effort::Medium,
        3,
        "1–3 days",
        "Steady improvement of the stage's weaker dimensions and links",
    ),
    (
        PlanPhaseKind::Strategic,
        Effort::High,
        2,
        "1–2 weeks",
        "Structural changes that raise the quality ceiling",
    ),
];

/// Group suggestions into the immediate, short term and strategic phases.
///
/// Each phase only takes suggestions of its effort level, most urgent first;
/// equal priorities keep their input order.
pub fn build_action_plan(suggestions: &[ImprovementSuggestion]) -> ActionPlan {
    let mut ranked: Vec<&ImprovementSuggestion> = suggestions.iter().collect();
    // sort_by_key is stable
    ranked.sort_by_key(|s| s.priority);

    let phases = PHASES
        .iter()
        .map(|&(phase, effort, take, duration, impact)| PlanPhase {
            phase,
            duration_estimate: duration.to_string(),
            items: ranked
                .iter()
                .filter(|s| s.implementation_effort == effort)
                .take(take)
                .map(|s| s.title.clone())
                .collect(),
            expected_impact: impact.to_string(),
        })
        .collect();

    ActionPlan { phases }
}

/// The standard success indicators, or nothing when there is nothing to improve
pub fn success_indicators(suggestions: &[ImprovementSuggestion]) -> Vec<String> {
    if suggestions.is_empty() {
        return Vec::new();
    }
    SUCCESS_INDICATORS.iter().map(|s| s.to_string()).collect()
}
