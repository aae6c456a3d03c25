// Value types shared by every engine component

pub mod quality;
pub mod reports;
pub mod stage;
pub mod stage_status;

pub use quality::{DimensionScore, GateDecision, GateVerdict, QualityScore, Threshold};
pub use reports::{
    ActionPlan, ConsistencyResult, Effort, GapReport, GapSeverity, ImprovementSuggestion,
    PlanPhase, PlanPhaseKind, Priority, RemediationSuggestion, StageGap, SuggestionType,
};
pub use stage::{
    is_populated, value_text, ProjectDocument, StageId, StageRecord, StageSchema, StageStatus,
};
pub use stage_status::{can_transition, transition_stage, StageTransitionError};
