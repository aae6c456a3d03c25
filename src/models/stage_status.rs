// Stage status state machine with validation

use super::{StageId, StageRecord, StageStatus};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageTransitionError {
    #[error("Invalid stage transition from {from:?} to {to:?}")]
    InvalidTransition { from: StageStatus, to: StageStatus },

    #[error("Stage '{0}' is not optional and cannot be skipped")]
    NotSkippable(StageId),

    #[error("Skipping stage '{0}' requires a compensation note")]
    MissingCompensation(StageId),
}

/// Validates if a stage can move from one status to another
pub fn can_transition(from: StageStatus, to: StageStatus) -> bool {
    match (from, to) {
        (StageStatus::NotStarted, StageStatus::InProgress) => true,
        (StageStatus::NotStarted, StageStatus::Skipped) => true,

        (StageStatus::InProgress, StageStatus::Completed) => true,
        (StageStatus::InProgress, StageStatus::NotStarted) => true, // Reset
        (StageStatus::InProgress, StageStatus::Skipped) => true,

        (StageStatus::Completed, StageStatus::InProgress) => true, // Reopen

        (StageStatus::Skipped, StageStatus::InProgress) => true, // Resume a skipped stage

        (a, b) if a == b => true,

        _ => false,
    }
}

/// Validates and performs a status transition, returning the updated record.
///
/// Skipping requires an optional stage and a non-blank compensation note.
pub fn transition_stage(
    stage: StageId,
    record: &StageRecord,
    to: StageStatus,
    compensation: Option<&str>,
) -> Result<StageRecord, StageTransitionError> {
    let from = record.status;
    if !can_transition(from, to) {
        return Err(StageTransitionError::InvalidTransition { from, to });
    }

    let mut updated = record.clone();
    if to == StageStatus::Skipped && from != StageStatus::Skipped {
        if !stage.is_optional() {
            return Err(StageTransitionError::NotSkippable(stage));
        }
        let note = compensation
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(StageTransitionError::MissingCompensation(stage))?;
        updated.skip_compensation = Some(note.to_string());
    } else if to != StageStatus::Skipped {
        updated.skip_compensation = None;
    }

    updated.status = to;
    Ok(updated)
}
