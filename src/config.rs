//! Configuration management for the resume tailor

use crate::error::{Result, TailorError};
use crate::processing::matcher::{FactorWeights, ScoringPolicy, SCORING_POLICY};
use crate::processing::profile::MasterProfile;
use crate::processing::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub generation: GenerationConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

/// Reference data locations. Unset paths use the data compiled into the binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Primary skills that may be spliced into the summary
    pub summary_keyword_limit: usize,
    pub max_summary_chars: usize,
    pub min_achievements: usize,
    pub max_achievements: usize,
    /// Most recent positions whose bullets are re-ranked
    pub rewritten_positions: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            summary_keyword_limit: 4,
            max_summary_chars: 420,
            min_achievements: 3,
            max_achievements: 5,
            rewritten_positions: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub submission_threshold: u8,
    pub recommendation_floor: f32,
    pub weights: FactorWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            submission_threshold: SCORING_POLICY.submission_threshold,
            recommendation_floor: SCORING_POLICY.recommendation_floor,
            weights: SCORING_POLICY.weights,
        }
    }
}

impl ScoringConfig {
    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            weights: self.weights,
            thresholds: SCORING_POLICY.thresholds,
            submission_threshold: self.submission_threshold,
            recommendation_floor: self.recommendation_floor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub include_cover_letter: bool,
    pub color_output: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            include_cover_letter: true,
            color_output: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Console => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl Config {
    /// Load from the platform config directory, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TailorError::Configuration(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TailorError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            TailorError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.policy().validate()?;

        let generation = &self.generation;
        if generation.min_achievements > generation.max_achievements {
            return Err(TailorError::Configuration(format!(
                "generation.min_achievements ({}) exceeds generation.max_achievements ({})",
                generation.min_achievements, generation.max_achievements
            )));
        }
        if generation.max_summary_chars == 0 {
            return Err(TailorError::Configuration(
                "generation.max_summary_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured taxonomy, or the built-in one
    pub fn load_taxonomy(&self) -> Result<Taxonomy> {
        match &self.data.taxonomy_path {
            Some(path) => Taxonomy::load(path),
            None => Taxonomy::builtin(),
        }
    }

    /// The configured master profile, or the built-in one
    pub fn load_profile(&self) -> Result<MasterProfile> {
        match &self.data.profile_path {
            Some(path) => MasterProfile::load(path),
            None => MasterProfile::builtin(),
        }
    }
}
