//! Adaptive threshold manager
//!
//! Computes a stage's pass bar from a progressive base table plus three
//! additive adjustments (complexity, user experience, project type).

use crate::config::HeuristicsConfig;
use crate::models::{StageId, Threshold};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectComplexity {
    Simple,
    Medium,
    Complex,
    Enterprise,
}

impl ProjectComplexity {
    pub fn delta(&self) -> f64 {
        match self {
            ProjectComplexity::Simple => -10.0,
            ProjectComplexity::Medium => 0.0,
            ProjectComplexity::Complex => 5.0,
            ProjectComplexity::Enterprise => 15.0,
        }
    }
}

impl Default for ProjectComplexity {
    fn default() -> Self {
        ProjectComplexity::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserExperience {
    Novice,
    Intermediate,
    Expert,
}

impl UserExperience {
    pub fn delta(&self) -> f64 {
        match self {
            UserExperience::Novice => -5.0,
            UserExperience::Intermediate => 0.0,
            UserExperience::Expert => 5.0,
        }
    }
}

impl Default for UserExperience {
    fn default() -> Self {
        UserExperience::Intermediate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Prototype,
    Mvp,
    Production,
}

impl ProjectType {
    pub fn delta(&self) -> f64 {
        match self {
            ProjectType::Prototype => -15.0,
            ProjectType::Mvp => -5.0,
            ProjectType::Production => 10.0,
        }
    }
}

impl Default for ProjectType {
    fn default() -> Self {
        ProjectType::Mvp
    }
}

/// Project context the thresholds adapt to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub complexity: ProjectComplexity,
    pub experience: UserExperience,
    pub project_type: ProjectType,
}

impl ProjectContext {
    pub fn new(
        complexity: ProjectComplexity,
        experience: UserExperience,
        project_type: ProjectType,
    ) -> Self {
        Self {
            complexity,
            experience,
            project_type,
        }
    }
}

/// Base `(minimum, recommended)` per stage before adjustments
pub fn base_threshold(stage: StageId) -> Threshold {
    match stage {
        StageId::Idea => Threshold::new(75.0, 85.0),
        StageId::Requirements => Threshold::new(80.0, 90.0),
        StageId::Design => Threshold::new(82.0, 90.0),
        StageId::Architecture => Threshold::new(85.0, 92.0),
        StageId::ImplementationPlan => Threshold::new(70.0, 85.0),
    }
}

/// Compute the adaptive threshold of a stage.
///
/// `minimum` is clamped into the configured floor/ceiling after each
/// adjustment. `recommended` takes the same deltas, is floored at
/// `minimum + recommended_floor_margin` and capped at the ceiling.
pub fn compute_threshold(
    stage: StageId,
    complexity: ProjectComplexity,
    experience: UserExperience,
    project_type: ProjectType,
    heuristics: &HeuristicsConfig,
) -> Threshold {
    let base = base_threshold(stage);
    let floor = heuristics.minimum_floor;
    let ceiling = heuristics.minimum_ceiling;

    let mut minimum = base.minimum;
    let mut recommended = base.recommended;
    for delta in [complexity.delta(), experience.delta(), project_type.delta()] {
        minimum = (minimum + delta).clamp(floor, ceiling);
        recommended += delta;
    }

    let recommended = recommended
        .max(minimum + heuristics.recommended_floor_margin)
        .min(ceiling)
        .max(minimum);

    log::debug!(
        "Threshold for {}: {:.1}/{:.1} ({:?}, {:?}, {:?})",
        stage,
        minimum,
        recommended,
        complexity,
        experience,
        project_type
    );

    Threshold {
        minimum,
        recommended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(
        stage: StageId,
        c: ProjectComplexity,
        e: UserExperience,
        t: ProjectType,
    ) -> Threshold {
        compute_threshold(stage, c, e, t, &HeuristicsConfig::default())
    }

    #[test]
    fn test_neutral_context_keeps_base_minimum() {
        let t = threshold(
            StageId::Requirements,
            ProjectComplexity::Medium,
            UserExperience::Intermediate,
            ProjectType::Production,
        );
        assert_eq!(t.minimum, 90.0);
        assert_eq!(t.recommended, 100.0);
    }

    #[test]
    fn test_mvp_idea_stage() {
        let t = threshold(
            StageId::Idea,
            ProjectComplexity::Medium,
            UserExperience::Intermediate,
            ProjectType::Mvp,
        );
        assert_eq!(t.minimum, 70.0);
        assert_eq!(t.recommended, 80.0);
    }

    #[test]
    fn test_minimum_clamps_to_ceiling() {
        // +15 -5 +10 on a base minimum of 85
        let t = threshold(
            StageId::Architecture,
            ProjectComplexity::Enterprise,
            UserExperience::Novice,
            ProjectType::Production,
        );
        assert_eq!(t.minimum, 100.0);
        assert_eq!(t.recommended, 100.0);
        assert!(t.minimum <= t.recommended);
    }

    #[test]
    fn test_minimum_clamps_to_floor() {
        // -10 -5 -15 on a base minimum of 70
        let t = threshold(
            StageId::ImplementationPlan,
            ProjectComplexity::Simple,
            UserExperience::Novice,
            ProjectType::Prototype,
        );
        assert_eq!(t.minimum, 50.0);
        assert_eq!(t.recommended, 55.0);
    }

    #[test]
    fn test_clamp_applies_per_step() {
        // 75 -10 -> 65, -5 -> 60, -15 -> 45 clamped to 50
        let t = threshold(
            StageId::Idea,
            ProjectComplexity::Simple,
            UserExperience::Novice,
            ProjectType::Prototype,
        );
        assert_eq!(t.minimum, 50.0);
        // 85 - 30 = 55, already at minimum + 5
        assert_eq!(t.recommended, 55.0);
    }

    #[test]
    fn test_invariant_holds_for_every_context() {
        let complexities = [
            ProjectComplexity::Simple,
            ProjectComplexity::Medium,
            ProjectComplexity::Complex,
            ProjectComplexity::Enterprise,
        ];
        let experiences = [
            UserExperience::Novice,
            UserExperience::Intermediate,
            UserExperience::Expert,
        ];
        let types = [ProjectType::Prototype, ProjectType::Mvp, ProjectType::Production];

        for &stage in StageId::all() {
            for &c in &complexities {
                for &e in &experiences {
                    for &t in &types {
                        let th = threshold(stage, c, e, t);
                        assert!((50.0..=100.0).contains(&th.minimum));
                        assert!(th.minimum <= th.recommended);
                        assert!(th.recommended <= 100.0);
                    }
                }
            }
        }
    }
}
