//! Scoring primitives
//!
//! Dimension scoring through the external evaluator and weighted
//! aggregation of the results. An evaluator failure never aborts a stage:
//! the dimension comes back as `None` and is left out of the aggregate.

pub mod similarity;

pub use similarity::{Similarity, TokenCosineSimilarity};

use crate::errors::EvaluatorError;
use serde_json::Value;
use std::collections::BTreeMap;

/// The LLM-backed scoring collaborator.
///
/// Implementations return a score in 0-100 for `content` judged against
/// `prompt` and `criteria`. Retries and backoff belong to the implementation.
pub trait Evaluator: Send + Sync {
    fn evaluate(
        &self,
        prompt: &str,
        content: &Value,
        criteria: &[String],
    ) -> Result<f64, EvaluatorError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &Value, &[String]) -> Result<f64, EvaluatorError> + Send + Sync,
{
    fn evaluate(
        &self,
        prompt: &str,
        content: &Value,
        criteria: &[String],
    ) -> Result<f64, EvaluatorError> {
        self(prompt, content, criteria)
    }
}

/// Score one dimension of `content`.
///
/// Returns `None` when the evaluator fails, is cancelled, or answers with a
/// non-finite number. Finite answers are clamped into 0-100.
pub fn score_dimension(
    evaluator: &dyn Evaluator,
    content: &Value,
    prompt: &str,
    criteria: &[String],
) -> Option<f64> {
    match evaluator.evaluate(prompt, content, criteria) {
        Ok(score) if score.is_finite() => Some(score.clamp(0.0, 100.0)),
        Ok(score) => {
            log::warn!("Evaluator returned non-finite score {}", score);
            None
        }
        Err(e) => {
            log::warn!("Dimension evaluation failed: {}", e);
            None
        }
    }
}

/// Weighted sum of dimension scores, rounded to one decimal place.
///
/// Dimensions listed in `weights` but absent from `scores` are excluded and
/// the remaining weights are renormalized, so the result reflects only the
/// evaluated dimensions. Returns 0 when nothing was evaluated.
pub fn aggregate(scores: &BTreeMap<String, f64>, weights: &BTreeMap<String, f64>) -> f64 {
    let mut weighted = 0.0;
    let mut present_weight = 0.0;

    for (name, weight) in weights {
        if let Some(score) = scores.get(name) {
            weighted += score * weight;
            present_weight += weight;
        }
    }

    if present_weight <= 0.0 {
        return 0.0;
    }

    round1(weighted / present_weight)
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Diminishing-returns heuristic for how likely an improvement is to land:
/// `0.95 - score / 200`, kept within 0.60-0.95. Not a statistical model.
pub fn success_probability(current_score: f64) -> f64 {
    (0.95 - current_score / 200.0).clamp(0.60, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn fixed(result: Result<f64, EvaluatorError>) -> impl Evaluator {
        move |_: &str, _: &Value, _: &[String]| result.clone()
    }

    #[test]
    fn test_score_dimension_clamps() {
        let content = json!("text");

        assert_eq!(score_dimension(&fixed(Ok(140.0)), &content, "p", &[]), Some(100.0));
        assert_eq!(score_dimension(&fixed(Ok(-3.0)), &content, "p", &[]), Some(0.0));
        assert_eq!(score_dimension(&fixed(Ok(72.5)), &content, "p", &[]), Some(72.5));
    }

    #[test]
    fn test_score_dimension_recovers_failures() {
        let content = json!("text");

        for failure in [
            Err(EvaluatorError::Timeout),
            Err(EvaluatorError::Cancelled),
            Err(EvaluatorError::Malformed("not a number".into())),
            Ok(f64::NAN),
        ] {
            assert_eq!(score_dimension(&fixed(failure), &content, "p", &[]), None);
        }
    }

    #[test]
    fn test_score_dimension_passes_prompt_and_criteria() {
        let echo = |prompt: &str, _: &Value, criteria: &[String]| -> Result<f64, EvaluatorError> {
            assert_eq!(prompt, "Rate clarity");
            Ok(criteria.len() as f64 * 10.0)
        };
        let criteria = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            score_dimension(&echo, &json!({}), "Rate clarity", &criteria),
            Some(20.0)
        );
    }

    #[test]
    fn test_aggregate_weighted_sum() {
        let w = weights(&[("a", 0.5), ("b", 0.3), ("c", 0.2)]);
        let s = weights(&[("a", 80.0), ("b", 70.0), ("c", 90.0)]);
        // 40 + 21 + 18
        assert_eq!(aggregate(&s, &w), 79.0);
    }

    #[test]
    fn test_aggregate_renormalizes_absent_dimension() {
        let w = weights(&[("a", 0.333), ("b", 0.333), ("c", 0.333)]);
        let s = weights(&[("a", 80.0), ("c", 91.0)]);
        assert_eq!(aggregate(&s, &w), 85.5);
    }

    #[test]
    fn test_aggregate_nothing_evaluated() {
        let w = weights(&[("a", 1.0)]);
        assert_eq!(aggregate(&BTreeMap::new(), &w), 0.0);
    }

    #[test]
    fn test_success_probability_range() {
        assert_eq!(success_probability(0.0), 0.95);
        assert!((success_probability(50.0) - 0.70).abs() < 1e-9);
        assert_eq!(success_probability(100.0), 0.60);
        assert!(success_probability(30.0) > success_probability(40.0));
    }
}
