//! Resume tailor: job-posting analysis, resume tailoring and match scoring

use clap::Parser;
use log::{error, info, warn};
use resume_tailor::batch::{run_batch, BatchFailure, BatchItem};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction, POSTING_EXTENSIONS};
use resume_tailor::config::OutputFormat;
use resume_tailor::input::{InputManager, PostingOverrides};
use resume_tailor::output::formatter::{save_report_to_file, suggest_filename};
use resume_tailor::output::{render_resume_markdown, ReportGenerator, TailoringReport};
use resume_tailor::{Config, Result, TailorError, TailorOptions, TailoringPipeline};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Tailor {
            job,
            title,
            company,
            template,
            output,
            save,
            resume_out,
            detailed,
            no_cover_letter,
        } => {
            cli::validate_file_extension(&job, POSTING_EXTENSIONS)
                .map_err(|e| TailorError::InvalidInput(format!("Job posting file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(TailorError::InvalidInput)?,
                None => config.output.format,
            };
            let template = template
                .as_deref()
                .map(cli::parse_template)
                .transpose()
                .map_err(TailorError::InvalidInput)?;

            let started = Instant::now();
            let pipeline = TailoringPipeline::from_config(&config)?;

            let mut input_manager = InputManager::new();
            let posting = input_manager
                .load_posting(&job, &PostingOverrides { title, company })
                .await?;
            info!("Tailoring resume for {} at {}", posting.title, posting.company);

            let options = TailorOptions {
                template,
                cover_letter: config.output.include_cover_letter && !no_cover_letter,
            };
            let application = pipeline.run(&posting, options)?;

            if let Some(path) = &resume_out {
                save_report_to_file(&render_resume_markdown(&application.resume), path)?;
                println!("📄 Tailored resume written to {}", path.display());
            }

            let job_file = job.to_string_lossy().to_string();
            let report = TailoringReport::from_application(
                application,
                Some(job_file.clone()),
                started.elapsed().as_millis() as u64,
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let content = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    let target = if path.is_dir() {
                        path.join(suggest_filename(&output_format, &job_file, true))
                    } else {
                        path
                    };
                    save_report_to_file(&content, &target)?;
                    println!("💾 Report saved to {}", target.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Batch { jobs, output } => {
            let output_format = cli::parse_output_format(&output).map_err(TailorError::InvalidInput)?;
            if output_format == OutputFormat::Markdown {
                return Err(TailorError::InvalidInput(
                    "Batch output supports console and json".to_string(),
                ));
            }

            let files = collect_posting_files(&jobs)?;
            if files.is_empty() {
                return Err(TailorError::InvalidInput(
                    "No posting files found".to_string(),
                ));
            }
            info!("Scoring {} postings", files.len());

            let pipeline = Arc::new(TailoringPipeline::from_config(&config)?);
            // Each file is read once per batch
            let mut input_manager = InputManager::new().with_cache(false);
            let mut items = Vec::new();
            let mut load_failures = Vec::new();

            for path in files {
                let label = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                match input_manager
                    .load_posting(&path, &PostingOverrides::default())
                    .await
                {
                    Ok(job) => items.push(BatchItem { label, job }),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        load_failures.push(BatchFailure {
                            label,
                            error: e.to_string(),
                        });
                    }
                }
            }

            let show_progress = output_format == OutputFormat::Console;
            let options = TailorOptions::default();
            let mut report = run_batch(pipeline, items, options, show_progress).await?;
            report.failures.extend(load_failures);
            report.failures.sort_by(|a, b| a.label.cmp(&b.label));

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => {
                    println!("\n📊 Ranked postings\n");
                    print!("{}", report.render_table(config.output.color_output));
                    println!(
                        "\n✅ {} of {} postings meet the submission threshold",
                        report.submittable().count(),
                        report.outcomes.len()
                    );
                }
            }
        }

        Commands::Taxonomy { category } => {
            let filter = category
                .as_deref()
                .map(cli::parse_category)
                .transpose()
                .map_err(TailorError::InvalidInput)?;
            let taxonomy = config.load_taxonomy()?;

            println!("📚 Skill taxonomy ({} entries)\n", taxonomy.len());
            for (category, count) in taxonomy.category_sizes() {
                if filter.map_or(true, |f| f == category) {
                    println!("{} ({})", category.label(), count);
                    for entry in taxonomy.entries().iter().filter(|e| e.category == category) {
                        if entry.synonyms.is_empty() {
                            println!("  • {}", entry.name);
                        } else {
                            println!("  • {} (also: {})", entry.name, entry.synonyms.join(", "));
                        }
                    }
                    println!();
                }
            }
        }

        Commands::Profile => {
            let profile = config.load_profile()?;

            println!("👤 {}", profile.candidate.name);
            println!("{}", profile.candidate.headline);
            println!("{} | {}", profile.candidate.location, profile.candidate.email);
            println!(
                "\nProfile v{} | {:.1} years of experience",
                profile.version, profile.total_years_experience
            );
            println!(
                "Skills: {} | Positions: {} | Achievements: {}",
                profile.skills.len(),
                profile.positions.len(),
                profile.achievements.len()
            );

            println!("\nPositions:");
            for position in &profile.positions {
                println!(
                    "  • {} at {} ({}) - {} bullets, {} shown",
                    position.title,
                    position.company,
                    position.period,
                    position.bullets.len(),
                    position.max_bullets
                );
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| TailorError::Configuration(format!("Failed to render config: {}", e)))?;
                println!("{}", rendered);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

/// Expand directories into the posting files they contain, sorted by path
fn collect_posting_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let candidate = entry?.path();
                if candidate.is_file() && is_posting_file(&candidate) {
                    files.push(candidate);
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_posting_file(path: &Path) -> bool {
    cli::validate_file_extension(path, POSTING_EXTENSIONS).is_ok()
}
