//! CLI interface for the resume tailor

use crate::config::OutputFormat;
use crate::processing::resume_generator::TemplateType;
use crate::processing::taxonomy::SkillCategory;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Posting file extensions the input layer can read
pub const POSTING_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "json", "toml"];

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Tailor a master resume to a job posting and score the match")]
#[command(long_about = "Analyze a job posting against a skills taxonomy, assemble a tailored resume from the master profile, score how well it fits and draft a matching cover letter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tailor the resume for one job posting
    Tailor {
        /// Path to the posting (TXT, MD, JSON, TOML)
        #[arg(short, long)]
        job: PathBuf,

        /// Job title, when the posting file does not carry one
        #[arg(long)]
        title: Option<String>,

        /// Company name, when the posting file does not carry one
        #[arg(long)]
        company: Option<String>,

        /// Force a template: technical, seo-marketing, leadership, hybrid
        #[arg(short, long)]
        template: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or into a directory under a suggested name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Also write the tailored resume as Markdown
        #[arg(long)]
        resume_out: Option<PathBuf>,

        /// Show the full tailored resume and analysis
        #[arg(short, long)]
        detailed: bool,

        /// Skip the cover letter
        #[arg(long)]
        no_cover_letter: bool,
    },

    /// Score many postings and rank them
    Batch {
        /// Posting files or directories of postings
        #[arg(required = true)]
        jobs: Vec<PathBuf>,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// List taxonomy skills
    Taxonomy {
        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the master profile summary
    Profile,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_template(template: &str) -> Result<TemplateType, String> {
    template.parse::<TemplateType>().map_err(|e| e.to_string())
}

pub fn parse_category(category: &str) -> Result<SkillCategory, String> {
    SkillCategory::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(category.trim()))
        .ok_or_else(|| {
            format!(
                "Unknown category: {}. Supported: technical, seo, marketing, leadership, analytics",
                category
            )
        })
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
