//! Scoring many postings in parallel against one shared pipeline

use crate::error::Result;
use crate::processing::job_analyzer::JobDescription;
use crate::processing::matcher::QualityLevel;
use crate::processing::pipeline::{TailorOptions, TailoredApplication, TailoringPipeline};
use crate::processing::resume_generator::TemplateType;
use anyhow::anyhow;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

/// One posting queued for scoring
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Usually the posting's file name
    pub label: String,
    pub job: JobDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub label: String,
    pub title: String,
    pub company: String,
    pub total_score: u8,
    pub quality_level: QualityLevel,
    pub meets_threshold: bool,
    pub template_type: TemplateType,
}

impl BatchOutcome {
    fn from_application(label: String, application: &TailoredApplication) -> Self {
        Self {
            label,
            title: application.job.title.clone(),
            company: application.job.company.clone(),
            total_score: application.match_result.total_score,
            quality_level: application.match_result.quality_level,
            meets_threshold: application.match_result.meets_threshold,
            template_type: application.resume.metadata.template_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub label: String,
    pub error: String,
}

/// Ranked results of a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Highest score first; ties by label
    pub outcomes: Vec<BatchOutcome>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn submittable(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| o.meets_threshold)
    }

    pub fn render_table(&self, use_colors: bool) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{:<4} {:>5}  {:<10} {:<14} {}\n",
            "#", "Score", "Quality", "Template", "Posting"
        ));

        for (rank, outcome) in self.outcomes.iter().enumerate() {
            let quality = format!("{:<10}", outcome.quality_level.as_str());
            let quality = if !use_colors {
                quality
            } else if outcome.meets_threshold {
                quality.green().to_string()
            } else {
                quality.red().to_string()
            };
            output.push_str(&format!(
                "{:<4} {:>5}  {} {:<14} {} at {} ({})\n",
                rank + 1,
                outcome.total_score,
                quality,
                outcome.template_type.as_str(),
                outcome.title,
                outcome.company,
                outcome.label
            ));
        }

        for failure in &self.failures {
            output.push_str(&format!("FAILED {}: {}\n", failure.label, failure.error));
        }

        output
    }
}

/// Run every posting through the pipeline on the blocking pool and rank the results.
///
/// A posting that fails analysis is reported as a failure; it does not stop the batch.
pub async fn run_batch(
    pipeline: Arc<TailoringPipeline>,
    items: Vec<BatchItem>,
    options: TailorOptions,
    show_progress: bool,
) -> Result<BatchReport> {
    let progress = if show_progress {
        let bar = ProgressBar::new(items.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} postings {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut join_set = JoinSet::new();
    for item in items {
        let pipeline = pipeline.clone();
        join_set.spawn_blocking(move || {
            let result = pipeline.run(&item.job, options);
            (item.label, result)
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = join_set.join_next().await {
        let (label, result) = joined.map_err(|e| anyhow!("Batch task failed: {}", e))?;
        progress.inc(1);

        match result {
            Ok(application) => {
                debug!("{} scored {}", label, application.match_result.total_score);
                report
                    .outcomes
                    .push(BatchOutcome::from_application(label, &application));
            }
            Err(e) => {
                warn!("Failed to tailor {}: {}", label, e);
                report.failures.push(BatchFailure {
                    label,
                    error: e.to_string(),
                });
            }
        }
    }

    report.outcomes.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.label.cmp(&b.label))
    });
    report.failures.sort_by(|a, b| a.label.cmp(&b.label));

    progress.finish_with_message(format!("{} scored", report.outcomes.len()));
    Ok(report)
}
