//! Error handling for the resume tailor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid job description: field '{field}' {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Template rendering error: {0}")]
    Template(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, TailorError>;

impl TailorError {
    /// Shorthand for a missing or blank required field
    pub fn missing_field(field: &'static str) -> Self {
        TailorError::Validation {
            field,
            reason: "is required and must not be blank".to_string(),
        }
    }
}

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for TailorError {
    fn from(err: anyhow::Error) -> Self {
        TailorError::AnalysisFailed(err.to_string())
    }
}

impl From<toml::de::Error> for TailorError {
    fn from(err: toml::de::Error) -> Self {
        TailorError::Configuration(format!("Failed to parse TOML: {}", err))
    }
}

impl From<askama::Error> for TailorError {
    fn from(err: askama::Error) -> Self {
        TailorError::Template(err.to_string())
    }
}

impl From<regex::Error> for TailorError {
    fn from(err: regex::Error) -> Self {
        TailorError::TextProcessing(format!("Invalid pattern: {}", err))
    }
}
