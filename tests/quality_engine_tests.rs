// Integration tests for the quality engine
// These drive the public API the way the PRD workflow does

#[cfg(test)]
mod quality_engine_integration_tests {
    use ralph_quality_lib::{
        ConfigLoader, Effort, EngineConfig, EngineError, EvaluatorError, GapSeverity,
        GateVerdict, ImprovementSuggestion, PlanPhaseKind, Priority, ProjectComplexity,
        ProjectContext, ProjectDocument, ProjectType, QualityEngine, QualityScore, StageId,
        StageRecord, StageStatus, SuggestionType, Threshold, TokenCosineSimilarity,
        UserExperience,
    };
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn engine() -> QualityEngine {
        init_logging();
        QualityEngine::new(EngineConfig::default()).unwrap()
    }

    fn mvp() -> ProjectContext {
        ProjectContext::new(
            ProjectComplexity::Medium,
            UserExperience::Intermediate,
            ProjectType::Mvp,
        )
    }

    fn scored(overall: f64) -> QualityScore {
        QualityScore {
            overall,
            dimensions: BTreeMap::new(),
            unavailable_dimensions: vec![],
        }
    }

    fn idea() -> StageRecord {
        StageRecord::new()
            .with_status(StageStatus::Completed)
            .with_field(
                "problemStatement",
                "Remote engineering teams lose track of task ownership and miss deadlines",
            )
            .with_field("targetAudience", "Engineering leads at remote-first startups")
            .with_field("valueProposition", "See who owns every task at a glance")
            .with_field(
                "keyFeatures",
                json!(["Task ownership board", "Overdue task alerts", "Slack sync"]),
            )
            .with_field("successMetrics", "40% of pilot teams active weekly")
    }

    fn requirements() -> StageRecord {
        StageRecord::new()
            .with_status(StageStatus::Completed)
            .with_field(
                "businessObjectives",
                "Help remote engineering teams stop missing deadlines caused by unclear task ownership",
            )
            .with_field(
                "userStories",
                json!(["As an engineering lead at a remote-first startup, I want to see unowned tasks"]),
            )
            .with_field(
                "functionalRequirements",
                json!([
                    "The task ownership board must list every task with its owner",
                    "The system must send overdue task alerts",
                    "The system must sync tasks from Slack"
                ]),
            )
            .with_field("nonFunctionalRequirements", "Board loads in under one second")
            .with_field("acceptanceCriteria", "Unowned tasks trigger an alert within five minutes")
    }

    #[test]
    fn test_idea_stage_caution_scenario() {
        let engine = engine();
        let threshold = engine.compute_threshold(StageId::Idea, &mvp());
        assert_eq!(threshold, Threshold::new(70.0, 80.0));

        let decision = engine.evaluate_gate(&scored(78.0), &threshold);
        assert_eq!(decision.verdict, GateVerdict::ProceedWithCaution);
        assert!(decision.verdict.allows_progress());
    }

    #[test]
    fn test_trivial_target_stage() {
        let engine = engine();
        let doc = ProjectDocument::new()
            .with_stage(StageId::Idea, idea())
            .with_stage(StageId::Requirements, requirements());

        let result = engine
            .validate_consistency(
                StageId::Requirements,
                StageId::Design,
                &doc,
                &TokenCosineSimilarity,
            )
            .unwrap();

        assert!(result.is_consistent);
        assert_eq!(result.consistency_score, 1.0);
        assert!(result.validation_errors.is_empty());
    }

    #[test]
    fn test_gap_severity_scenario() {
        let engine = engine();
        let doc = ProjectDocument::new().with_stage(
            StageId::Requirements,
            StageRecord::new()
                .with_status(StageStatus::InProgress)
                .with_field("nonFunctionalRequirements", "Board loads in under one second")
                .with_field("acceptanceCriteria", "Alerts fire within five minutes"),
        );

        let report = engine.detect_gaps(&doc).unwrap();
        let gap = report.gap_for(StageId::Requirements).unwrap();
        assert_eq!(gap.severity, GapSeverity::High);
        assert_eq!(gap.missing_fields.len(), 3);
        assert_eq!(report.remediation_suggestions.len(), 3);
        assert_eq!(report.completeness_score, 40.0);
    }

    #[test]
    fn test_action_plan_scenario() {
        let engine = engine();
        let suggestion = |title: &str, effort: Effort| ImprovementSuggestion {
            suggestion_type: SuggestionType::DimensionImprovement,
            stage: StageId::Design,
            dimension: Some("usability".to_string()),
            priority: Priority::Medium,
            title: title.to_string(),
            description: String::new(),
            actions: vec![],
            estimated_impact: "+5-10 points".to_string(),
            implementation_effort: effort,
            success_probability: 0.7,
        };
        let suggestions = vec![
            suggestion("low-a", Effort::Low),
            suggestion("low-b", Effort::Low),
            suggestion("low-c", Effort::Low),
            suggestion("low-d", Effort::Low),
            suggestion("high-a", Effort::High),
        ];

        let plan = engine.build_action_plan(&suggestions);

        let immediate = plan.phase(PlanPhaseKind::Immediate).unwrap();
        assert_eq!(immediate.items, vec!["low-a", "low-b", "low-c"]);
        let short_term = plan.phase(PlanPhaseKind::ShortTerm).unwrap();
        assert!(!short_term.items.iter().any(|i| i == "low-d"));
        assert!(short_term.items.is_empty());
        let strategic = plan.phase(PlanPhaseKind::Strategic).unwrap();
        assert_eq!(strategic.items, vec!["high-a"]);

        assert_eq!(engine.success_indicators(&suggestions).len(), 6);
    }

    #[test]
    fn test_pair_coverage_regardless_of_population() {
        let engine = engine();
        let sim = TokenCosineSimilarity;

        let docs = [
            ProjectDocument::new(),
            ProjectDocument::new().with_stage(StageId::Idea, idea()),
            ProjectDocument::new()
                .with_stage(StageId::Idea, idea())
                .with_stage(StageId::Requirements, requirements())
                .with_stage(
                    StageId::Design,
                    StageRecord::new().with_status(StageStatus::Skipped),
                ),
        ];

        for doc in &docs {
            assert_eq!(engine.validate_all(doc, &sim).unwrap().len(), 9);
        }
    }

    #[test]
    fn test_related_stages_are_reasonably_consistent() {
        let engine = engine();
        let doc = ProjectDocument::new()
            .with_stage(StageId::Idea, idea())
            .with_stage(StageId::Requirements, requirements());

        let related = engine
            .validate_consistency(
                StageId::Idea,
                StageId::Requirements,
                &doc,
                &TokenCosineSimilarity,
            )
            .unwrap();

        let unrelated_doc = doc.clone().with_stage(
            StageId::Requirements,
            StageRecord::new()
                .with_status(StageStatus::Completed)
                .with_field("businessObjectives", "Maximize quarterly advertising revenue")
                .with_field("userStories", "As a marketer I want campaign dashboards")
                .with_field("functionalRequirements", "Export invoices as PDF"),
        );
        let unrelated = engine
            .validate_consistency(
                StageId::Idea,
                StageId::Requirements,
                &unrelated_doc,
                &TokenCosineSimilarity,
            )
            .unwrap();

        assert!(related.consistency_score > unrelated.consistency_score);
        assert!(!unrelated.is_consistent);
        assert_eq!(unrelated.recommendations.len(), 3);
    }

    #[test]
    fn test_assess_is_idempotent() {
        let engine = engine();
        let doc = ProjectDocument::new().with_stage(StageId::Idea, idea());
        let evaluator =
            |prompt: &str, content: &Value, _: &[String]| -> Result<f64, EvaluatorError> {
                Ok(50.0 + (prompt.len() + content.to_string().len()) as f64 % 50.0)
            };
        let threshold = engine.compute_threshold(StageId::Idea, &mvp());

        let first = engine
            .assess(StageId::Idea, &doc, &threshold, &evaluator)
            .unwrap();
        let second = engine
            .assess(StageId::Idea, &doc, &threshold, &evaluator)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.overall.to_bits(), second.overall.to_bits());
    }

    #[test]
    fn test_review_then_suggest_regression() {
        let engine = engine();
        let doc = ProjectDocument::new()
            .with_stage(StageId::Idea, idea().with_quality_score(QualityScore {
                overall: 92.0,
                dimensions: BTreeMap::from([(
                    "problem_clarity".to_string(),
                    ralph_quality_lib::DimensionScore {
                        score: 92.0,
                        weight: 1.0,
                        threshold: 70.0,
                    },
                )]),
                unavailable_dimensions: vec![],
            }))
            .with_stage(StageId::Requirements, requirements());

        let constant = |_: &str, _: &Value, _: &[String]| -> Result<f64, EvaluatorError> {
            Ok(76.0)
        };
        let review = engine
            .review_stage(
                &doc,
                StageId::Requirements,
                &mvp(),
                &constant,
                &TokenCosineSimilarity,
            )
            .unwrap();

        // requirements mvp threshold: 75/85
        assert_eq!(review.threshold, Threshold::new(75.0, 85.0));
        assert_eq!(
            review.decision.as_ref().map(|d| d.verdict),
            Some(GateVerdict::ProceedWithCaution)
        );
        let first = &review.suggestions[0];
        assert_eq!(first.suggestion_type, SuggestionType::RegressionRecovery);
        assert_eq!(first.priority, Priority::Critical);
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let engine = engine();
        let doc = ProjectDocument::new().with_stage(
            StageId::Idea,
            StageRecord::new()
                .with_status(StageStatus::InProgress)
                .with_field("budget", "10k"),
        );

        assert!(matches!(
            engine.detect_gaps(&doc),
            Err(EngineError::MalformedProjectDocument(_))
        ));
        assert!(matches!(
            engine.generate_suggestions(&doc, StageId::Idea, &TokenCosineSimilarity),
            Err(EngineError::MalformedProjectDocument(_))
        ));
    }

    #[test]
    fn test_engine_from_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".ralph-ui");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("quality.toml"),
            r#"
[heuristics]
regressionPoints = 30.0
"#,
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_project_path(temp_dir.path())
            .load_or_default()
            .unwrap();
        let engine = QualityEngine::new(config).unwrap();
        assert_eq!(engine.config().heuristics.regression_points, 30.0);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let doc = ProjectDocument::new()
            .with_stage(StageId::Idea, idea())
            .with_stage(StageId::Requirements, requirements());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["stages"]["idea"]["status"], "completed");
        assert_eq!(json["stages"]["implementation_plan"]["status"], "not_started");

        let back: ProjectDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }
}
