//! The analyze, generate, match pipeline behind the external call contracts

use crate::config::Config;
use crate::error::Result;
use crate::processing::cover_letter::{CoverLetter, CoverLetterResolver};
use crate::processing::job_analyzer::{JobAnalysis, JobAnalyzer, JobDescription};
use crate::processing::matcher::{MatchResult, ResumeMatcher};
use crate::processing::profile::MasterProfile;
use crate::processing::resume_generator::{ResumeContent, ResumeGenerator, TemplateType};
use crate::processing::taxonomy::Taxonomy;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-run options a host may pass
#[derive(Debug, Clone, Copy, Default)]
pub struct TailorOptions {
    /// Force a template instead of deriving one from the posting
    pub template: Option<TemplateType>,
    pub cover_letter: bool,
}

/// Everything produced for one posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredApplication {
    pub job: JobDescription,
    pub analysis: JobAnalysis,
    pub resume: ResumeContent,
    pub match_result: MatchResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<CoverLetter>,
}

/// One instance of each component over shared read-only reference data.
///
/// The pipeline holds no mutable state, so a single instance can serve many
/// postings concurrently behind an `Arc`.
pub struct TailoringPipeline {
    taxonomy: Arc<Taxonomy>,
    profile: Arc<MasterProfile>,
    analyzer: JobAnalyzer,
    generator: ResumeGenerator,
    matcher: ResumeMatcher,
    cover_letters: CoverLetterResolver,
}

impl TailoringPipeline {
    pub fn new(taxonomy: Arc<Taxonomy>, profile: Arc<MasterProfile>, config: &Config) -> Result<Self> {
        config.validate()?;

        for skill in &profile.skills {
            if !taxonomy.knows_skill(&skill.name) {
                warn!(
                    "Profile skill '{}' is not in the taxonomy and can never match a posting",
                    skill.name
                );
            }
        }

        Ok(Self {
            analyzer: JobAnalyzer::new(taxonomy.clone())?,
            generator: ResumeGenerator::new(profile.clone(), config.generation.clone()),
            matcher: ResumeMatcher::new(profile.clone(), config.scoring.policy())?,
            cover_letters: CoverLetterResolver::new(profile.clone()),
            taxonomy,
            profile,
        })
    }

    /// Load reference data named by the config (or the built-in data) and build the pipeline.
    /// Missing or corrupt reference data fails here.
    pub fn from_config(config: &Config) -> Result<Self> {
        let taxonomy = Arc::new(config.load_taxonomy()?);
        let profile = Arc::new(config.load_profile()?);
        info!(
            "Loaded taxonomy ({} entries) and profile '{}' v{}",
            taxonomy.len(),
            profile.candidate.name,
            profile.version
        );
        Self::new(taxonomy, profile, config)
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn profile(&self) -> &MasterProfile {
        &self.profile
    }

    pub fn analyze_job_description(
        &self,
        description: &str,
        title: &str,
        company: &str,
    ) -> Result<JobAnalysis> {
        self.analyzer.analyze(description, title, company)
    }

    pub fn generate_customized_resume(&self, analysis: &JobAnalysis) -> ResumeContent {
        self.generator.generate(analysis)
    }

    pub fn calculate_match_score(&self, resume: &ResumeContent, analysis: &JobAnalysis) -> MatchResult {
        self.matcher.calculate(resume, analysis)
    }

    pub fn resolve_cover_letter(
        &self,
        job: &JobDescription,
        analysis: &JobAnalysis,
        resume: &ResumeContent,
    ) -> Result<CoverLetter> {
        self.cover_letters.resolve(job, analysis, resume)
    }

    /// Run every stage for one posting
    pub fn run(&self, job: &JobDescription, options: TailorOptions) -> Result<TailoredApplication> {
        let analysis = self.analyzer.analyze_job(job)?;
        let resume = self.generator.generate_with_template(&analysis, options.template);
        let match_result = self.matcher.calculate(&resume, &analysis);
        let cover_letter = if options.cover_letter {
            Some(self.cover_letters.resolve(job, &analysis, &resume)?)
        } else {
            None
        };

        Ok(TailoredApplication {
            job: job.clone(),
            analysis,
            resume,
            match_result,
            cover_letter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_pipeline_is_send_and_sync() {
        assert_send_sync::<TailoringPipeline>();
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let mut config = Config::default();
        config.scoring.weights.skills_match = 10;
        assert!(TailoringPipeline::from_config(&config).is_err());
    }

    #[test]
    fn test_run_chains_all_stages() {
        let pipeline = TailoringPipeline::from_config(&Config::default()).unwrap();
        let job = JobDescription::new(
            "Technical SEO Manager",
            "Acme",
            "- 5+ years of technical SEO\n- Google Search Console and schema markup",
        )
        .unwrap();

        let application = pipeline
            .run(
                &job,
                TailorOptions {
                    template: None,
                    cover_letter: true,
                },
            )
            .unwrap();

        assert_eq!(application.resume.metadata.template_type, TemplateType::SeoMarketing);
        assert_eq!(
            application.match_result,
            pipeline.calculate_match_score(&application.resume, &application.analysis)
        );
        assert!(application.cover_letter.is_some());
    }

    #[test]
    fn test_cover_letter_is_optional() {
        let pipeline = TailoringPipeline::from_config(&Config::default()).unwrap();
        let job = JobDescription::new("Analyst", "Acme", "SQL").unwrap();
        let application = pipeline.run(&job, TailorOptions::default()).unwrap();
        assert!(application.cover_letter.is_none());
    }
}
