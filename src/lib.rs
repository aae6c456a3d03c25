//! Ralph Quality - stage quality gates for the guided PRD pipeline
//!
//! Scores each stage of the five-stage authoring pipeline
//! (idea → requirements → design → architecture → implementation plan),
//! decides whether a stage may be considered complete, checks that later
//! stages stay consistent with earlier ones, reports missing foundational
//! context, and turns all of that into prioritized improvement suggestions.
//!
//! Every operation is a synchronous function over an immutable
//! [`ProjectDocument`] snapshot. The two collaborators the engine relies on,
//! the LLM-backed [`Evaluator`] and the text [`Similarity`] primitive, are
//! passed explicitly on each call so callers can bind a stub in tests.

#![allow(clippy::new_without_default)] // Default not always appropriate for table-backed types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer

pub mod assessment;
pub mod config;
pub mod consistency;
pub mod engine;
pub mod errors;
pub mod gaps;
pub mod models;
pub mod scoring;
pub mod suggestions;
pub mod thresholds;

pub use assessment::{evaluate_gate, AssessmentHistory, DimensionTables, QualityAssessor};
pub use config::{ConfigLoader, EngineConfig, FailedDimensionPolicy, HeuristicsConfig};
pub use consistency::{ConsistencyRules, ConsistencyValidator};
pub use engine::{QualityEngine, StageReview};
pub use errors::{EngineError, EngineResult, EvaluatorError};
pub use gaps::GapDetector;
pub use models::*;
pub use scoring::{aggregate, score_dimension, Evaluator, Similarity, TokenCosineSimilarity};
pub use suggestions::{build_action_plan, success_indicators, SuggestionEngine};
pub use thresholds::{
    compute_threshold, ProjectComplexity, ProjectContext, ProjectType, UserExperience,
};
