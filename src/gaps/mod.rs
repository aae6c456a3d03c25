//! Context gap detection
//!
//! Scans every reached stage for required fields that are still empty,
//! classifies each stage's gap by how many fields are missing, and pairs
//! every missing field with remediation guidance.

pub mod templates;

pub use templates::{impacted_stages, remediation_template, RemediationTemplate};

use crate::config::HeuristicsConfig;
use crate::errors::EngineResult;
use crate::models::{
    GapReport, GapSeverity, ProjectDocument, RemediationSuggestion, StageGap, StageId,
};
use crate::scoring::round1;

/// Detects missing required fields across a project document
#[derive(Debug, Clone)]
pub struct GapDetector {
    high_min_missing: usize,
    medium_min_missing: usize,
}

impl GapDetector {
    pub fn new(heuristics: &HeuristicsConfig) -> Self {
        Self {
            high_min_missing: heuristics.gap_high_min_missing,
            medium_min_missing: heuristics.gap_medium_min_missing,
        }
    }

    /// Severity for a number of missing fields (`None` when nothing is missing)
    pub fn severity(&self, missing: usize) -> Option<GapSeverity> {
        match missing {
            0 => None,
            n if n >= self.high_min_missing => Some(GapSeverity::High),
            n if n >= self.medium_min_missing => Some(GapSeverity::Medium),
            _ => Some(GapSeverity::Low),
        }
    }

    /// Scan all reached stages (in progress or completed) for missing fields
    pub fn detect_gaps(&self, document: &ProjectDocument) -> EngineResult<GapReport> {
        document.validate()?;

        let mut detected_gaps = Vec::new();
        let mut remediation_suggestions = Vec::new();
        let mut required_total = 0usize;
        let mut provided_total = 0usize;

        for &stage in StageId::all() {
            let record = document.stage(stage)?;
            if !record.is_reached() {
                continue;
            }

            let required = stage.schema().required;
            let missing: Vec<String> = required
                .iter()
                .filter(|field| !record.has_field(field))
                .map(|field| field.to_string())
                .collect();

            required_total += required.len();
            provided_total += required.len() - missing.len();

            let Some(severity) = self.severity(missing.len()) else {
                continue;
            };

            for field in &missing {
                let template = remediation_template(field);
                remediation_suggestions.push(RemediationSuggestion {
                    stage,
                    field: field.clone(),
                    action: template.action.to_string(),
                    guidance: template.guidance.to_string(),
                    example: template.example.to_string(),
                });
            }

            detected_gaps.push(StageGap {
                stage,
                impacted_stages: impacted_stages(stage, &missing),
                missing_fields: missing,
                severity,
            });
        }

        let completeness_score = if required_total == 0 {
            100.0
        } else {
            round1(100.0 * provided_total as f64 / required_total as f64)
        };

        log::info!(
            "Gap scan: {} stage gaps, completeness {:.1}%",
            detected_gaps.len(),
            completeness_score
        );

        Ok(GapReport {
            detected_gaps,
            completeness_score,
            remediation_suggestions,
        })
    }
}

impl Default for GapDetector {
    fn default() -> Self {
        Self::new(&HeuristicsConfig::default())
    }
}
