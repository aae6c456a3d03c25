// Configuration file loading

use super::EngineConfig;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads [`EngineConfig`] from TOML
pub struct ConfigLoader {
    /// Project config path
    project_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { project_path: None }
    }

    /// Set the project path
    pub fn with_project_path(mut self, path: &Path) -> Self {
        self.project_path = Some(path.join(".ralph-ui").join("quality.toml"));
        self
    }

    /// Load project config
    pub fn load_project(&self) -> Result<Option<EngineConfig>> {
        if let Some(ref path) = self.project_path {
            self.load_from_path(path)
        } else {
            Ok(None)
        }
    }

    /// Load project config, falling back to defaults when no file exists
    pub fn load_or_default(&self) -> Result<EngineConfig> {
        Ok(self.load_project()?.unwrap_or_default())
    }

    /// Load config from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<Option<EngineConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config = Self::parse(&contents)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;

        log::info!("Loaded quality config from: {}", path.display());
        Ok(Some(config))
    }

    /// Parse and validate config from a TOML string
    pub fn parse(contents: &str) -> Result<EngineConfig> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Validate config values
    fn validate_config(config: &EngineConfig) -> Result<()> {
        let h = &config.heuristics;

        if h.regression_points < 0.0 {
            return Err(anyhow!("regressionPoints cannot be negative"));
        }

        if h.gap_medium_min_missing == 0 || h.gap_high_min_missing <= h.gap_medium_min_missing {
            return Err(anyhow!(
                "gap severity cut-offs must satisfy 0 < gapMediumMinMissing < gapHighMinMissing"
            ));
        }

        if h.consistency_high_priority_below > h.consistency_improvement_below {
            return Err(anyhow!(
                "consistencyHighPriorityBelow cannot exceed consistencyImprovementBelow"
            ));
        }

        if h.dimension_medium_gap > h.dimension_high_gap {
            return Err(anyhow!("dimensionMediumGap cannot exceed dimensionHighGap"));
        }

        if !(0.0..=100.0).contains(&h.minimum_floor)
            || !(0.0..=100.0).contains(&h.minimum_ceiling)
            || h.minimum_floor > h.minimum_ceiling
        {
            return Err(anyhow!("minimum threshold range must lie within 0-100"));
        }

        // A weight table that does not sum to 1.0 is an authoring mistake
        config.validate_tables()?;

        Ok(())
    }

    /// Get the project config path
    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
