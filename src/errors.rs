// Engine error taxonomy

use crate::models::StageId;
use thiserror::Error;

/// Result alias used across the engine's public operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Hard failures surfaced to callers.
///
/// Low scores, inconsistencies and gaps are data, not errors. Only these
/// conditions abort an operation; the two table variants only arise when
/// tables are loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The scoring collaborator failed for a dimension. `score_dimension`
    /// recovers from this locally; it only escapes when a caller asks for
    /// the raw error.
    #[error("Evaluator unavailable for {stage} / {dimension}: {reason}")]
    EvaluatorUnavailable {
        stage: StageId,
        dimension: String,
        reason: String,
    },

    #[error("Malformed project document: {0}")]
    MalformedProjectDocument(String),

    /// Pair outside the validated rule set, or `from` later than `to`
    #[error("Invalid stage pair: {from} -> {to}")]
    InvalidStagePair { from: StageId, to: StageId },

    #[error("Weight table '{table}' sums to {sum:.3}, expected 1.0 (±0.01)")]
    WeightTableInconsistency { table: String, sum: f64 },

    /// A table entry that can never score correctly: duplicate or unknown
    /// names, negative weights, thresholds outside 0-1
    #[error("Invalid table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },
}

/// Failure reported by an [`Evaluator`](crate::scoring::Evaluator) call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    #[error("evaluator timed out")]
    Timeout,

    /// The caller cancelled the in-flight evaluation
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("malformed evaluator response: {0}")]
    Malformed(String),

    #[error("evaluator unavailable: {0}")]
    Unavailable(String),
}
