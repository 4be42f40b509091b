//! Output formatters for tailoring reports and rendered resumes

use crate::config::OutputFormat;
use crate::error::{Result, TailorError};
use crate::output::report::TailoringReport;
use crate::processing::matcher::{MatchFactor, QualityLevel};
use crate::processing::resume_generator::ResumeContent;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting tailoring reports
pub trait OutputFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_quality_badge(&self, quality: QualityLevel) -> String {
        let color = match quality {
            QualityLevel::Excellent => Color::Green,
            QualityLevel::Strong => Color::BrightGreen,
            QualityLevel::Moderate => Color::Yellow,
            QualityLevel::Weak => Color::Red,
        };
        let badge = quality.as_str().to_uppercase();

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_bar(&self, score: f32) -> String {
        let filled = (score.clamp(0.0, 1.0) * 20.0).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled));
        let color = if score >= 0.8 {
            Color::Green
        } else if score >= 0.5 {
            Color::Yellow
        } else {
            Color::Red
        };
        self.colorize(&bar, color)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let application = &report.application;
        let analysis = &application.analysis;
        let resume = &application.resume;
        let result = &application.match_result;
        let mut output = String::new();

        output.push_str(&self.format_header(
            &format!("{} at {}", application.job.title, application.job.company),
            1,
        ));
        output.push_str(&format!(
            "Generated: {} | Profile v{} | {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.profile_version,
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Match", 2));
        output.push_str(&format!(
            "Score: {}/100 {}\n",
            result.total_score,
            self.format_quality_badge(result.quality_level)
        ));
        output.push_str(&format!(
            "Verdict: {}\n",
            self.colorize(&report.summary.verdict, Color::Cyan)
        ));
        let gate = if result.meets_threshold {
            self.colorize("meets the submission threshold", Color::Green)
        } else {
            self.colorize("below the submission threshold", Color::Red)
        };
        output.push_str(&format!("Submission: {}\n", gate));

        output.push_str(&self.format_header("Score Breakdown", 3));
        for (factor, score) in result.breakdown.factors() {
            output.push_str(&format!(
                "{:<24} {} {:>3.0}%\n",
                factor.label(),
                self.format_bar(score),
                score * 100.0
            ));
        }

        output.push_str(&self.format_header("Posting Analysis", 2));
        output.push_str(&format!(
            "Industry: {} (confidence {:.0}%)\n",
            analysis
                .industry_context
                .primary
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| "none detected".to_string()),
            analysis.industry_context.confidence * 100.0
        ));
        output.push_str(&format!("Experience level: {}", analysis.experience_level));
        if let Some(years) = analysis.required_years {
            output.push_str(&format!(" ({}+ years)", years));
        }
        output.push('\n');
        for (category, skills) in &analysis.extracted_skills {
            if !skills.is_empty() {
                output.push_str(&format!(
                    "  {:<11} {}\n",
                    format!("{}:", category.label()),
                    skills.iter().cloned().collect::<Vec<_>>().join(", ")
                ));
            }
        }
        if self.detailed && !analysis.key_requirements.is_empty() {
            output.push_str("Key requirements:\n");
            for requirement in &analysis.key_requirements {
                output.push_str(&format!("  - {}\n", requirement));
            }
        }

        output.push_str(&self.format_header("Tailored Resume", 2));
        output.push_str(&format!("Template: {}\n", resume.metadata.template_type));
        output.push_str(&format!(
            "Primary skills: {}\n",
            if resume.skills.primary.is_empty() {
                "(none matched)".to_string()
            } else {
                resume.skills.primary.join(", ")
            }
        ));
        if self.detailed {
            output.push_str(&format!("Summary: {}\n", resume.summary));
            output.push_str("Achievements:\n");
            for achievement in &resume.achievements {
                output.push_str(&format!("  - {}\n", achievement));
            }
        }
        output.push_str("Customizations:\n");
        for change in &resume.metadata.customizations {
            output.push_str(&format!("  {} {}\n", self.colorize("✓", Color::Green), change));
        }

        if !result.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 2));
            for (i, rec) in result.recommendations.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} ({:.0}%): {}\n",
                    i + 1,
                    self.colorize(rec.factor.label(), Color::Yellow),
                    rec.score * 100.0,
                    rec.message
                ));
            }
        }

        if let Some(letter) = &application.cover_letter {
            output.push_str(&self.format_header("Cover Letter", 2));
            output.push_str(&format!("Subject: {}\n\n", letter.subject));
            output.push_str(&letter.body);
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &TailoringReport) -> Result<String> {
        let application = &report.application;
        let result = &application.match_result;
        let mut md = String::new();

        md.push_str(&format!(
            "# {} at {}\n\n",
            application.job.title, application.job.company
        ));
        md.push_str(&format!(
            "**Score:** {}/100 ({}) | **Template:** {}\n\n",
            result.total_score, result.quality_level, application.resume.metadata.template_type
        ));
        md.push_str(&format!("> {}\n\n", report.summary.verdict));

        md.push_str("## Score Breakdown\n\n| Factor | Score |\n|---|---|\n");
        for factor in MatchFactor::ALL {
            md.push_str(&format!(
                "| {} | {}% |\n",
                factor.label(),
                report.factor_percent(factor)
            ));
        }
        md.push('\n');

        if !report.summary.strengths.is_empty() {
            md.push_str("## Strengths\n\n");
            for strength in &report.summary.strengths {
                md.push_str(&format!("- {}\n", strength));
            }
            md.push('\n');
        }

        if !result.recommendations.is_empty() {
            md.push_str("## Recommendations\n\n");
            for (i, rec) in result.recommendations.iter().enumerate() {
                md.push_str(&format!("{}. **{}**: {}\n", i + 1, rec.factor.label(), rec.message));
            }
            md.push('\n');
        }

        md.push_str("## Customizations\n\n");
        for change in &application.resume.metadata.customizations {
            md.push_str(&format!("- {}\n", change));
        }
        md.push('\n');

        md.push_str("## Tailored Resume\n\n");
        md.push_str(&render_resume_markdown(&application.resume));

        if let Some(letter) = &application.cover_letter {
            md.push_str("\n## Cover Letter\n\n");
            md.push_str(&format!("**Subject:** {}\n\n", letter.subject));
            md.push_str(&letter.body);
            md.push('\n');
        }

        if self.include_metadata {
            md.push_str("\n---\n\n");
            md.push_str(&format!(
                "*Generated {} by resume-tailor v{}*\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC"),
                report.metadata.tool_version
            ));
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Render a tailored resume as a standalone Markdown document
pub fn render_resume_markdown(resume: &ResumeContent) -> String {
    let mut md = String::new();
    let candidate = &resume.candidate;

    md.push_str(&format!("### {}\n\n", candidate.name));
    md.push_str(&format!(
        "{} | {} | {}\n\n",
        candidate.headline, candidate.location, candidate.email
    ));
    md.push_str(&format!("{}\n\n", resume.summary));

    md.push_str("#### Skills\n\n");
    if !resume.skills.primary.is_empty() {
        md.push_str(&format!("**Core:** {}\n\n", resume.skills.primary.join(", ")));
    }
    if !resume.skills.secondary.is_empty() {
        md.push_str(&format!("**Additional:** {}\n\n", resume.skills.secondary.join(", ")));
    }

    md.push_str("#### Selected Achievements\n\n");
    for achievement in &resume.achievements {
        md.push_str(&format!("- {}\n", achievement));
    }
    md.push('\n');

    md.push_str("#### Experience\n\n");
    for position in &resume.work_experience {
        md.push_str(&format!(
            "**{}**, {} ({})",
            position.title, position.company, position.period
        ));
        if let Some(location) = &position.location {
            md.push_str(&format!(", {}", location));
        }
        md.push_str("\n\n");
        for bullet in &position.description {
            md.push_str(&format!("- {}\n", bullet));
        }
        md.push('\n');
    }

    md
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &TailoringReport, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), *format);
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content).map_err(|e| {
        TailorError::OutputFormatting(format!("Failed to write '{}': {}", file_path.display(), e))
    })
}

pub fn suggest_filename(format: &OutputFormat, job_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(job_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!("{}_tailored{}.{}", base_name, timestamp_suffix, format.extension())
}
