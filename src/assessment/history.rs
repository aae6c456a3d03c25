//! Assessment history for a stage
//!
//! Tracks successive quality scores so callers can show progress between
//! revisions and spot when further revisions stop paying off.

use crate::models::{GateVerdict, QualityScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single assessment iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentIteration {
    /// Iteration number (1-indexed)
    pub iteration: u32,
    /// When this assessment was recorded
    pub timestamp: DateTime<Utc>,
    pub score: QualityScore,
    /// Gate verdict at the time, if the assessment was available
    pub verdict: Option<GateVerdict>,
    /// Change in overall score since the previous available iteration
    pub delta: Option<f64>,
}

/// History of all assessments of one stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentHistory {
    pub iterations: Vec<AssessmentIteration>,
    pub current_iteration: u32,
}

impl AssessmentHistory {
    /// Create a new empty history
    pub fn new() -> Self {
        Self {
            iterations: Vec::new(),
            current_iteration: 0,
        }
    }

    /// Record an assessment. Unavailable scores are kept but never used as
    /// the baseline for a delta.
    pub fn record(
        &mut self,
        score: QualityScore,
        verdict: Option<GateVerdict>,
    ) -> &AssessmentIteration {
        let delta = if score.is_unavailable() {
            None
        } else {
            self.latest_available().map(|prev| score.overall - prev.score.overall)
        };

        self.current_iteration += 1;
        self.iterations.push(AssessmentIteration {
            iteration: self.current_iteration,
            timestamp: Utc::now(),
            score,
            verdict,
            delta,
        });

        &self.iterations[self.iterations.len() - 1]
    }

    /// Get the latest iteration
    pub fn latest(&self) -> Option<&AssessmentIteration> {
        self.iterations.last()
    }

    fn latest_available(&self) -> Option<&AssessmentIteration> {
        self.iterations
            .iter()
            .rev()
            .find(|i| !i.score.is_unavailable())
    }

    /// Overall points gained from the first to the latest available assessment
    pub fn improvement(&self) -> Option<f64> {
        let mut available = self.iterations.iter().filter(|i| !i.score.is_unavailable());
        let first = available.next()?;
        let latest = available.last()?;
        Some(latest.score.overall - first.score.overall)
    }

    /// True when each of the last `window` deltas moved the score by less
    /// than `epsilon` points
    pub fn is_plateaued(&self, window: usize, epsilon: f64) -> bool {
        if window == 0 {
            return false;
        }
        let deltas: Vec<f64> = self.iterations.iter().filter_map(|i| i.delta).collect();
        if deltas.len() < window {
            return false;
        }
        deltas[deltas.len() - window..]
            .iter()
            .all(|d| d.abs() < epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionScore;
    use std::collections::BTreeMap;

    fn score(overall: f64) -> QualityScore {
        let mut dimensions = BTreeMap::new();
        dimensions.insert(
            "clarity".to_string(),
            DimensionScore {
                score: overall,
                weight: 1.0,
                threshold: 70.0,
            },
        );
        QualityScore {
            overall,
            dimensions,
            unavailable_dimensions: vec![],
        }
    }

    #[test]
    fn test_records_deltas() {
        let mut history = AssessmentHistory::new();
        assert!(history.record(score(60.0), Some(GateVerdict::Blocked)).delta.is_none());
        let second = history.record(score(72.5), Some(GateVerdict::ProceedWithCaution));
        assert_eq!(second.iteration, 2);
        assert_eq!(second.delta, Some(12.5));
        assert_eq!(history.improvement(), Some(12.5));
    }

    #[test]
    fn test_unavailable_assessment_skipped_as_baseline() {
        let mut history = AssessmentHistory::new();
        history.record(score(60.0), Some(GateVerdict::Blocked));
        let outage = history.record(QualityScore::unavailable(vec!["clarity".into()]), None);
        assert!(outage.delta.is_none());

        let next = history.record(score(65.0), Some(GateVerdict::Blocked));
        assert_eq!(next.delta, Some(5.0));
        assert_eq!(history.improvement(), Some(5.0));
        assert_eq!(history.current_iteration, 3);
    }

    #[test]
    fn test_improvement_needs_two_assessments() {
        let mut history = AssessmentHistory::new();
        assert_eq!(history.improvement(), None);
        history.record(score(60.0), None);
        assert_eq!(history.improvement(), None);
    }

    #[test]
    fn test_plateau_detection() {
        let mut history = AssessmentHistory::new();
        for overall in [60.0, 75.0, 76.0, 76.5, 76.8] {
            history.record(score(overall), None);
        }
        assert!(history.is_plateaued(3, 2.0));
        assert!(!history.is_plateaued(4, 2.0));
        assert!(!history.is_plateaued(10, 2.0));
        assert!(!history.is_plateaued(0, 2.0));
    }
}
