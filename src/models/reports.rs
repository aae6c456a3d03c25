//! Report types produced by the consistency, gap and suggestion components

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage::StageId;

/// Consistency verdict for one ordered stage pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyResult {
    pub source: StageId,
    pub target: StageId,
    pub is_consistent: bool,
    /// Weighted similarity (0-1)
    pub consistency_score: f64,
    pub validation_errors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ConsistencyResult {
    /// Result for a pair whose target has nothing to compare yet
    pub fn trivially_consistent(source: StageId, target: StageId) -> Self {
        Self {
            source,
            target,
            is_consistent: true,
            consistency_score: 1.0,
            validation_errors: vec![],
            recommendations: vec![],
        }
    }

    pub fn touches(&self, stage: StageId) -> bool {
        self.source == stage || self.target == stage
    }
}

/// Severity of a stage gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    Low,
    Medium,
    High,
}

/// Missing required fields of one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageGap {
    pub stage: StageId,
    pub missing_fields: Vec<String>,
    pub severity: GapSeverity,
    /// Later stages whose inputs reference the missing fields
    pub impacted_stages: Vec<StageId>,
}

/// Guidance for filling one missing field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationSuggestion {
    pub stage: StageId,
    pub field: String,
    pub action: String,
    pub guidance: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub detected_gaps: Vec<StageGap>,
    /// Provided / required fields across reached stages (0-100)
    pub completeness_score: f64,
    pub remediation_suggestions: Vec<RemediationSuggestion>,
}

impl GapReport {
    pub fn has_gaps(&self) -> bool {
        !self.detected_gaps.is_empty()
    }

    pub fn gap_for(&self, stage: StageId) -> Option<&StageGap> {
        self.detected_gaps.iter().find(|g| g.stage == stage)
    }
}

/// Kind of improvement suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    DimensionImprovement,
    ConsistencyImprovement,
    RegressionRecovery,
}

/// Suggestion priority. Ordered most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub stage: StageId,
    pub dimension: Option<String>,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
    pub estimated_impact: String,
    pub implementation_effort: Effort,
    /// Heuristic chance the suggestion lands (0.60-0.95)
    pub success_probability: f64,
}

/// Phase of an action plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPhaseKind {
    Immediate,
    ShortTerm,
    Strategic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPhase {
    pub phase: PlanPhaseKind,
    pub duration_estimate: String,
    /// Suggestion titles scheduled in this phase
    pub items: Vec<String>,
    pub expected_impact: String,
}

/// Three phases in fixed order: immediate, short term, strategic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub phases: Vec<PlanPhase>,
}

impl ActionPlan {
    pub fn phase(&self, kind: PlanPhaseKind) -> Option<&PlanPhase> {
        self.phases.iter().find(|p| p.phase == kind)
    }
}
