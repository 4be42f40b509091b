//! Report structures wrapping a tailored application for output

use crate::processing::matcher::{MatchFactor, QualityLevel};
use crate::processing::pipeline::TailoredApplication;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Factor scores at or above this are reported as strengths
const STRENGTH_FLOOR: f32 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringReport {
    pub summary: ReportSummary,
    pub application: TailoredApplication,
    pub metadata: ReportMetadata,
}

/// Executive summary of one tailored application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// 0-100
    pub overall_score: u8,
    pub quality_level: QualityLevel,
    pub meets_threshold: bool,
    /// One-line verdict
    pub verdict: String,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub profile_version: String,
    /// Posting file the report was built from, when there was one
    pub job_file: Option<String>,
    pub processing_time_ms: u64,
}

impl TailoringReport {
    pub fn from_application(
        application: TailoredApplication,
        job_file: Option<String>,
        processing_time_ms: u64,
    ) -> Self {
        let summary = Self::create_summary(&application);
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            profile_version: application.resume.metadata.version.clone(),
            job_file,
            processing_time_ms,
        };

        Self {
            summary,
            application,
            metadata,
        }
    }

    fn create_summary(application: &TailoredApplication) -> ReportSummary {
        let result = &application.match_result;

        let strengths = result
            .breakdown
            .factors()
            .filter(|(_, score)| *score >= STRENGTH_FLOOR)
            .map(|(factor, score)| format!("{} is strong ({:.0}%)", factor, score * 100.0))
            .collect();

        let improvement_areas = result
            .recommendations
            .iter()
            .map(|r| format!("{} ({:.0}%)", r.factor, r.score * 100.0))
            .collect();

        let verdict = match result.quality_level {
            QualityLevel::Excellent => "Excellent match - submit with confidence",
            QualityLevel::Strong => "Strong match - ready to submit",
            QualityLevel::Moderate => "Moderate match - tighten the resume before submitting",
            QualityLevel::Weak => "Weak match - probably not worth applying",
        }
        .to_string();

        ReportSummary {
            overall_score: result.total_score,
            quality_level: result.quality_level,
            meets_threshold: result.meets_threshold,
            verdict,
            strengths,
            improvement_areas,
        }
    }

    /// Score for a single factor as a whole percentage
    pub fn factor_percent(&self, factor: MatchFactor) -> u8 {
        (self.application.match_result.breakdown.get(factor) * 100.0).round() as u8
    }
}
