//! Pipeline stages and the project document they live in

use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::quality::QualityScore;

/// The five pipeline stages. Declaration order is pipeline order, so
/// `Ord` answers "earlier"/"later".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// Problem and value framing
    Idea,
    /// Structured requirements document
    Requirements,
    /// User-experience specification
    Design,
    /// Technical architecture evaluation
    Architecture,
    /// Execution playbook
    ImplementationPlan,
}

impl StageId {
    /// Get all stages in pipeline order
    pub fn all() -> &'static [StageId] {
        &[
            StageId::Idea,
            StageId::Requirements,
            StageId::Design,
            StageId::Architecture,
            StageId::ImplementationPlan,
        ]
    }

    /// Get the stage index (0-based)
    pub fn index(&self) -> usize {
        match self {
            StageId::Idea => 0,
            StageId::Requirements => 1,
            StageId::Design => 2,
            StageId::Architecture => 3,
            StageId::ImplementationPlan => 4,
        }
    }

    /// Get the next stage, if any
    pub fn next(&self) -> Option<StageId> {
        Self::all().get(self.index() + 1).copied()
    }

    /// Get the previous stage, if any
    pub fn previous(&self) -> Option<StageId> {
        self.index().checked_sub(1).map(|i| Self::all()[i])
    }

    /// Stages strictly before this one, nearest first
    pub fn earlier_stages(&self) -> impl Iterator<Item = StageId> {
        Self::all()[..self.index()].iter().rev().copied()
    }

    /// Stages strictly after this one, in pipeline order
    pub fn later_stages(&self) -> impl Iterator<Item = StageId> {
        Self::all()[self.index() + 1..].iter().copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Idea => "idea",
            StageId::Requirements => "requirements",
            StageId::Design => "design",
            StageId::Architecture => "architecture",
            StageId::ImplementationPlan => "implementation_plan",
        }
    }

    /// Get the display name for this stage
    pub fn display_name(&self) -> &'static str {
        match self {
            StageId::Idea => "Idea",
            StageId::Requirements => "Requirements",
            StageId::Design => "Design",
            StageId::Architecture => "Architecture",
            StageId::ImplementationPlan => "Implementation Plan",
        }
    }

    /// Whether the workflow may skip this stage with a recorded compensation
    pub fn is_optional(&self) -> bool {
        matches!(self, StageId::Design)
    }

    /// Content fields this stage accepts
    pub fn schema(&self) -> &'static StageSchema {
        match self {
            StageId::Idea => &IDEA_SCHEMA,
            StageId::Requirements => &REQUIREMENTS_SCHEMA,
            StageId::Design => &DESIGN_SCHEMA,
            StageId::Architecture => &ARCHITECTURE_SCHEMA,
            StageId::ImplementationPlan => &IMPLEMENTATION_PLAN_SCHEMA,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "idea" => Ok(StageId::Idea),
            "requirements" | "prd" => Ok(StageId::Requirements),
            "design" => Ok(StageId::Design),
            "architecture" => Ok(StageId::Architecture),
            "implementation_plan" | "implementation" | "playbook" => {
                Ok(StageId::ImplementationPlan)
            }
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Fixed field set of a stage
#[derive(Debug)]
pub struct StageSchema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl StageSchema {
    pub fn accepts(&self, field: &str) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }
}

static IDEA_SCHEMA: StageSchema = StageSchema {
    required: &[
        "problemStatement",
        "targetAudience",
        "valueProposition",
        "keyFeatures",
        "successMetrics",
    ],
    optional: &["constraints", "notes"],
};

static REQUIREMENTS_SCHEMA: StageSchema = StageSchema {
    required: &[
        "businessObjectives",
        "userStories",
        "functionalRequirements",
        "nonFunctionalRequirements",
        "acceptanceCriteria",
    ],
    optional: &["outOfScope", "notes"],
};

static DESIGN_SCHEMA: StageSchema = StageSchema {
    required: &[
        "userPersonas",
        "userJourneys",
        "wireframes",
        "designSystem",
        "accessibilityRequirements",
    ],
    optional: &["notes"],
};

static ARCHITECTURE_SCHEMA: StageSchema = StageSchema {
    required: &[
        "systemOverview",
        "technologyStack",
        "componentDesign",
        "dataArchitecture",
        "securityArchitecture",
    ],
    optional: &["deploymentStrategy", "notes"],
};

static IMPLEMENTATION_PLAN_SCHEMA: StageSchema = StageSchema {
    required: &[
        "taskBreakdown",
        "milestones",
        "resourcePlan",
        "riskMitigation",
        "testingStrategy",
    ],
    optional: &["notes"],
};

/// Status of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotStarted,
    InProgress,
    Completed,
    /// Explicitly skipped (optional stages only)
    Skipped,
}

impl Default for StageStatus {
    fn default() -> Self {
        StageStatus::NotStarted
    }
}

/// One stage of a project document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    pub status: StageStatus,
    /// Named content fields, populated by the generation step
    #[serde(default)]
    pub content: BTreeMap<String, Value>,
    /// Latest assessment attached by the engine
    #[serde(default)]
    pub quality_score: Option<QualityScore>,
    /// Why a skipped stage was skipped and how the gap is compensated
    #[serde(default)]
    pub skip_compensation: Option<String>,
}

impl StageRecord {
    /// Create an empty, not-started record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.content.insert(name.to_string(), value.into());
        self
    }

    pub fn with_quality_score(mut self, score: QualityScore) -> Self {
        self.quality_score = Some(score);
        self
    }

    /// Whether the stage has been reached (started, completed)
    pub fn is_reached(&self) -> bool {
        matches!(self.status, StageStatus::InProgress | StageStatus::Completed)
    }

    /// Whether `field` holds usable content
    pub fn has_field(&self, field: &str) -> bool {
        self.content.get(field).is_some_and(is_populated)
    }

    /// Content as a JSON object, the shape handed to the evaluator
    pub fn content_value(&self) -> Value {
        Value::Object(
            self.content
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Flattened text of a field, empty when absent
    pub fn field_text(&self, field: &str) -> String {
        self.content.get(field).map(value_text).unwrap_or_default()
    }

    /// Check every field against the stage schema
    pub fn validate_shape(&self, stage: StageId) -> EngineResult<()> {
        let schema = stage.schema();
        for (name, value) in &self.content {
            if !schema.accepts(name) {
                return Err(EngineError::MalformedProjectDocument(format!(
                    "stage '{}' has unrecognized field '{}'",
                    stage, name
                )));
            }
            if matches!(value, Value::Bool(_) | Value::Number(_)) {
                return Err(EngineError::MalformedProjectDocument(format!(
                    "field '{}' of stage '{}' must be text, a list or an object",
                    name, stage
                )));
            }
        }
        Ok(())
    }
}

/// A field is populated when it holds non-blank text, or a non-empty list/object
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => items.iter().any(is_populated),
        Value::Object(map) => map.values().any(is_populated),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Flatten a field value into plain text (leaves joined by newlines)
pub fn value_text(value: &Value) -> String {
    let mut parts = Vec::new();
    collect_text(value, &mut parts);
    parts.join("\n")
}

fn collect_text(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            if !s.trim().is_empty() {
                parts.push(s.trim().to_string());
            }
        }
        Value::Bool(b) => parts.push(b.to_string()),
        Value::Number(n) => parts.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, parts)),
        Value::Object(map) => map.values().for_each(|v| collect_text(v, parts)),
    }
}

/// The aggregate root: one record per stage.
///
/// Owned by the persistence layer. The engine only reads it and hands back
/// new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub stages: BTreeMap<StageId, StageRecord>,
}

impl ProjectDocument {
    /// A fresh project: every stage present and not started
    pub fn new() -> Self {
        Self {
            stages: StageId::all()
                .iter()
                .map(|&stage| (stage, StageRecord::new()))
                .collect(),
        }
    }

    pub fn with_stage(mut self, stage: StageId, record: StageRecord) -> Self {
        self.stages.insert(stage, record);
        self
    }

    /// Get a stage record, failing when the document lacks it
    pub fn stage(&self, stage: StageId) -> EngineResult<&StageRecord> {
        self.stages.get(&stage).ok_or_else(|| {
            EngineError::MalformedProjectDocument(format!("stage '{}' is missing", stage))
        })
    }

    /// Latest quality score of a stage, if one is attached and available
    pub fn quality_score(&self, stage: StageId) -> Option<&QualityScore> {
        self.stages
            .get(&stage)
            .and_then(|r| r.quality_score.as_ref())
            .filter(|s| !s.is_unavailable())
    }

    /// Check that all five stages exist and every record fits its schema
    pub fn validate(&self) -> EngineResult<()> {
        for &stage in StageId::all() {
            self.stage(stage)?.validate_shape(stage)?;
        }
        Ok(())
    }
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self::new()
    }
}
