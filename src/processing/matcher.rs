//! Weighted multi-factor scoring of a tailored resume against a posting

use crate::error::{Result, TailorError};
use crate::processing::job_analyzer::JobAnalysis;
use crate::processing::profile::MasterProfile;
use crate::processing::resume_generator::{ResumeContent, TemplateType};
use crate::processing::taxonomy::skills_equivalent;
use crate::processing::text_processor::{contains_term, TextProcessor};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Factor weights in whole percent. Must sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub skills_match: u8,
    pub experience_relevance: u8,
    pub industry_alignment: u8,
    pub keyword_density: u8,
    pub achievements_relevance: u8,
}

impl FactorWeights {
    pub fn sum(&self) -> u32 {
        MatchFactor::ALL.iter().map(|f| self.weight(*f) as u32).sum()
    }

    pub fn weight(&self, factor: MatchFactor) -> u8 {
        match factor {
            MatchFactor::SkillsMatch => self.skills_match,
            MatchFactor::ExperienceRelevance => self.experience_relevance,
            MatchFactor::IndustryAlignment => self.industry_alignment,
            MatchFactor::KeywordDensity => self.keyword_density,
            MatchFactor::AchievementsRelevance => self.achievements_relevance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.sum() {
            100 => Ok(()),
            other => Err(TailorError::Configuration(format!(
                "Scoring weights must sum to 100, got {}",
                other
            ))),
        }
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        SCORING_POLICY.weights
    }
}

/// Lower bounds of the quality bands; anything below `moderate` is weak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub excellent: u8,
    pub strong: u8,
    pub moderate: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub weights: FactorWeights,
    pub thresholds: QualityThresholds,
    /// Scores at or above this are good enough to submit
    pub submission_threshold: u8,
    /// Factors below this earn a recommendation
    pub recommendation_floor: f32,
}

pub const SCORING_POLICY: ScoringPolicy = ScoringPolicy {
    weights: FactorWeights {
        skills_match: 35,
        experience_relevance: 25,
        industry_alignment: 20,
        keyword_density: 10,
        achievements_relevance: 10,
    },
    thresholds: QualityThresholds {
        excellent: 90,
        strong: 80,
        moderate: 65,
    },
    submission_threshold: 80,
    recommendation_floor: 0.7,
};

impl ScoringPolicy {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        let t = &self.thresholds;
        if !(t.excellent >= t.strong && t.strong >= t.moderate && t.excellent <= 100) {
            return Err(TailorError::Configuration(
                "Quality thresholds must satisfy moderate <= strong <= excellent <= 100".to_string(),
            ));
        }
        if self.submission_threshold > 100 {
            return Err(TailorError::Configuration(
                "Submission threshold must be within 0-100".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.recommendation_floor) {
            return Err(TailorError::Configuration(
                "Recommendation floor must be within 0-1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        SCORING_POLICY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    SkillsMatch,
    ExperienceRelevance,
    IndustryAlignment,
    KeywordDensity,
    AchievementsRelevance,
}

impl MatchFactor {
    pub const ALL: [MatchFactor; 5] = [
        MatchFactor::SkillsMatch,
        MatchFactor::ExperienceRelevance,
        MatchFactor::IndustryAlignment,
        MatchFactor::KeywordDensity,
        MatchFactor::AchievementsRelevance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchFactor::SkillsMatch => "Skills match",
            MatchFactor::ExperienceRelevance => "Experience relevance",
            MatchFactor::IndustryAlignment => "Industry alignment",
            MatchFactor::KeywordDensity => "Keyword density",
            MatchFactor::AchievementsRelevance => "Achievements relevance",
        }
    }
}

impl fmt::Display for MatchFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-factor scores, each in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills_match: f32,
    pub experience_relevance: f32,
    pub industry_alignment: f32,
    pub keyword_density: f32,
    pub achievements_relevance: f32,
}

impl ScoreBreakdown {
    pub fn get(&self, factor: MatchFactor) -> f32 {
        match factor {
            MatchFactor::SkillsMatch => self.skills_match,
            MatchFactor::ExperienceRelevance => self.experience_relevance,
            MatchFactor::IndustryAlignment => self.industry_alignment,
            MatchFactor::KeywordDensity => self.keyword_density,
            MatchFactor::AchievementsRelevance => self.achievements_relevance,
        }
    }

    pub fn factors(&self) -> impl Iterator<Item = (MatchFactor, f32)> + '_ {
        MatchFactor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Weak,
    Moderate,
    Strong,
    Excellent,
}

impl QualityLevel {
    pub fn from_score(score: u8, thresholds: &QualityThresholds) -> Self {
        if score >= thresholds.excellent {
            QualityLevel::Excellent
        } else if score >= thresholds.strong {
            QualityLevel::Strong
        } else if score >= thresholds.moderate {
            QualityLevel::Moderate
        } else {
            QualityLevel::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Weak => "weak",
            QualityLevel::Moderate => "moderate",
            QualityLevel::Strong => "strong",
            QualityLevel::Excellent => "excellent",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub factor: MatchFactor,
    pub score: f32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub total_score: u8,
    pub breakdown: ScoreBreakdown,
    pub quality_level: QualityLevel,
    pub meets_threshold: bool,
    pub recommendations: Vec<Recommendation>,
}

/// Scores resumes produced from one master profile
pub struct ResumeMatcher {
    profile: Arc<MasterProfile>,
    policy: ScoringPolicy,
    text_processor: TextProcessor,
}

impl ResumeMatcher {
    pub fn new(profile: Arc<MasterProfile>, policy: ScoringPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            profile,
            policy,
            text_processor: TextProcessor::new()?,
        })
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn calculate(&self, resume: &ResumeContent, analysis: &JobAnalysis) -> MatchResult {
        let breakdown = ScoreBreakdown {
            skills_match: Self::skills_match(resume, analysis),
            experience_relevance: self.experience_relevance(analysis),
            industry_alignment: Self::industry_alignment(resume.metadata.template_type, analysis),
            keyword_density: Self::keyword_density(resume, analysis),
            achievements_relevance: self.achievements_relevance(resume, analysis),
        };

        let weighted: f32 = breakdown
            .factors()
            .map(|(factor, score)| self.policy.weights.weight(factor) as f32 * score)
            .sum();
        let total_score = weighted.round().clamp(0.0, 100.0) as u8;

        let quality_level = QualityLevel::from_score(total_score, &self.policy.thresholds);
        let recommendations = self.recommendations(&breakdown, resume, analysis);

        debug!(
            "Match score {} ({}): {:?}",
            total_score, quality_level, breakdown
        );

        MatchResult {
            total_score,
            breakdown,
            quality_level,
            meets_threshold: total_score >= self.policy.submission_threshold,
            recommendations,
        }
    }

    fn skills_match(resume: &ResumeContent, analysis: &JobAnalysis) -> f32 {
        let extracted = analysis.all_skills();
        if extracted.is_empty() {
            return 0.0;
        }
        let covered = extracted
            .iter()
            .filter(|skill| resume.all_skills().any(|s| skills_equivalent(s, skill)))
            .count();
        covered as f32 / extracted.len() as f32
    }

    fn required_years(analysis: &JobAnalysis) -> u32 {
        analysis
            .required_years
            .unwrap_or_else(|| analysis.experience_level.typical_years())
    }

    fn experience_relevance(&self, analysis: &JobAnalysis) -> f32 {
        let required = Self::required_years(analysis);
        if required == 0 {
            return 1.0;
        }
        (self.profile.total_years_experience / required as f32).clamp(0.0, 1.0)
    }

    /// Full credit when the template serves the primary category. A mismatch still
    /// earns the posting's classification confidence.
    fn industry_alignment(template: TemplateType, analysis: &JobAnalysis) -> f32 {
        match analysis.industry_context.primary {
            None => 0.0,
            Some(primary) if template.serves(primary) => 1.0,
            Some(_) => analysis.industry_context.confidence.clamp(0.0, 1.0),
        }
    }

    fn keyword_density(resume: &ResumeContent, analysis: &JobAnalysis) -> f32 {
        if analysis.keywords.is_empty() {
            return 0.0;
        }
        let text = resume.searchable_text();
        let found = analysis
            .keywords
            .iter()
            .filter(|k| contains_term(&text, k))
            .count();
        found as f32 / analysis.keywords.len() as f32
    }

    fn requirement_terms(&self, analysis: &JobAnalysis) -> HashSet<String> {
        self.text_processor
            .significant_terms(&analysis.key_requirements.join("\n"))
            .into_iter()
            .collect()
    }

    fn achievements_relevance(&self, resume: &ResumeContent, analysis: &JobAnalysis) -> f32 {
        if resume.achievements.is_empty() {
            return 0.0;
        }
        let terms = self.requirement_terms(analysis);
        if terms.is_empty() {
            return 0.0;
        }
        let relevant = resume
            .achievements
            .iter()
            .filter(|a| {
                self.text_processor
                    .significant_terms(a)
                    .iter()
                    .any(|t| terms.contains(t))
            })
            .count();
        relevant as f32 / resume.achievements.len() as f32
    }

    fn recommendations(
        &self,
        breakdown: &ScoreBreakdown,
        resume: &ResumeContent,
        analysis: &JobAnalysis,
    ) -> Vec<Recommendation> {
        breakdown
            .factors()
            .filter(|(_, score)| *score < self.policy.recommendation_floor)
            .map(|(factor, score)| Recommendation {
                factor,
                score,
                message: self.remediation(factor, resume, analysis),
            })
            .collect()
    }

    fn remediation(
        &self,
        factor: MatchFactor,
        resume: &ResumeContent,
        analysis: &JobAnalysis,
    ) -> String {
        match factor {
            MatchFactor::SkillsMatch => {
                let missing: Vec<&str> = analysis
                    .all_skills()
                    .into_iter()
                    .filter(|skill| !resume.all_skills().any(|s| skills_equivalent(s, skill)))
                    .collect();
                if missing.is_empty() {
                    "The posting names no recognizable skills; lead with the skills it implies"
                        .to_string()
                } else {
                    format!(
                        "The profile does not cover: {}. Add them only if you genuinely have them",
                        missing.join(", ")
                    )
                }
            }
            MatchFactor::ExperienceRelevance => format!(
                "The posting asks for about {} years at {} level; foreground the most relevant roles",
                Self::required_years(analysis),
                analysis.experience_level
            ),
            MatchFactor::IndustryAlignment => match analysis.industry_context.primary {
                Some(primary) => format!(
                    "Add more {} keywords or use the {} template",
                    primary,
                    TemplateType::for_category(Some(primary))
                ),
                None => {
                    "The posting has no clear industry focus; emphasise transferable skills"
                        .to_string()
                }
            },
            MatchFactor::KeywordDensity => {
                let text = resume.searchable_text();
                let missing: Vec<&str> = analysis
                    .keywords
                    .iter()
                    .filter(|k| !contains_term(&text, k))
                    .take(5)
                    .map(|k| k.as_str())
                    .collect();
                if missing.is_empty() {
                    "Work more of the posting's language into the summary and bullets".to_string()
                } else {
                    format!(
                        "Work these posting keywords into the summary and bullets: {}",
                        missing.join(", ")
                    )
                }
            }
            MatchFactor::AchievementsRelevance => {
                "Pick achievements that speak directly to the key requirements".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::processing::job_analyzer::{ExperienceLevel, IndustryContext, JobAnalyzer};
    use crate::processing::profile::CandidateInfo;
    use crate::processing::resume_generator::{ResumeGenerator, ResumeMetadata, SkillLists};
    use crate::processing::taxonomy::Taxonomy;
    use std::collections::BTreeMap;

    struct Fixture {
        analyzer: JobAnalyzer,
        generator: ResumeGenerator,
        matcher: ResumeMatcher,
    }

    fn fixture() -> Fixture {
        let taxonomy = Arc::new(Taxonomy::builtin().unwrap());
        let profile = Arc::new(MasterProfile::builtin().unwrap());
        Fixture {
            analyzer: JobAnalyzer::new(taxonomy).unwrap(),
            generator: ResumeGenerator::new(profile.clone(), GenerationConfig::default()),
            matcher: ResumeMatcher::new(profile, SCORING_POLICY).unwrap(),
        }
    }

    fn score(f: &Fixture, description: &str, title: &str) -> (JobAnalysis, MatchResult) {
        let analysis = f.analyzer.analyze(description, title, "Acme").unwrap();
        let resume = f.generator.generate(&analysis);
        let result = f.matcher.calculate(&resume, &analysis);
        (analysis, result)
    }

    fn bare_analysis(keywords: &[&str], requirements: &[&str]) -> JobAnalysis {
        JobAnalysis {
            extracted_skills: BTreeMap::new(),
            industry_context: IndustryContext {
                primary: None,
                confidence: 0.0,
            },
            experience_level: ExperienceLevel::Mid,
            required_years: None,
            key_requirements: requirements.iter().map(|r| r.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn bare_resume(summary: &str, achievements: &[&str]) -> ResumeContent {
        ResumeContent {
            candidate: CandidateInfo {
                name: "Sam Doe".to_string(),
                headline: "Analyst".to_string(),
                location: "Leeds".to_string(),
                email: "sam@example.com".to_string(),
            },
            summary: summary.to_string(),
            skills: SkillLists {
                primary: Vec::new(),
                secondary: Vec::new(),
            },
            achievements: achievements.iter().map(|a| a.to_string()).collect(),
            work_experience: Vec::new(),
            metadata: ResumeMetadata {
                template_type: TemplateType::Hybrid,
                version: "test".to_string(),
                customizations: Vec::new(),
            },
        }
    }

    #[test]
    fn test_keyword_density_counts_word_bounded_hits() {
        let resume = bare_resume("Built schema markup tooling in Python and JavaScript.", &[]);
        let analysis = bare_analysis(&["schema markup", "python", "java", "terraform"], &[]);

        // "java" only occurs inside "javascript"
        assert_eq!(ResumeMatcher::keyword_density(&resume, &analysis), 0.5);
    }

    #[test]
    fn test_keyword_density_without_keywords_is_zero() {
        let resume = bare_resume("Python everywhere.", &[]);
        let analysis = bare_analysis(&[], &["Python required"]);
        assert_eq!(ResumeMatcher::keyword_density(&resume, &analysis), 0.0);
    }

    #[test]
    fn test_achievements_relevance_is_overlap_fraction() {
        let f = fixture();
        let resume = bare_resume(
            "",
            &[
                "Grew organic traffic 140% in a year",
                "Doubled ecommerce revenue for a retail client",
                "Shipped a design system",
                "Mentored four analysts",
            ],
        );
        let analysis = bare_analysis(&[], &["Grow organic traffic for ecommerce brands"]);

        assert_eq!(f.matcher.achievements_relevance(&resume, &analysis), 0.5);
    }

    #[test]
    fn test_achievements_relevance_zero_paths() {
        let f = fixture();
        let with_achievements = bare_resume("", &["Grew organic traffic 140% in a year"]);
        let no_requirements = bare_analysis(&["organic"], &[]);
        assert_eq!(
            f.matcher.achievements_relevance(&with_achievements, &no_requirements),
            0.0
        );

        let no_achievements = bare_resume("", &[]);
        let requirements = bare_analysis(&[], &["Grow organic traffic"]);
        assert_eq!(
            f.matcher.achievements_relevance(&no_achievements, &requirements),
            0.0
        );
    }

    #[test]
    fn test_policy_weights_sum_to_100() {
        assert_eq!(SCORING_POLICY.weights.sum(), 100);
        assert!(SCORING_POLICY.validate().is_ok());
    }

    #[test]
    fn test_bad_weights_are_rejected() {
        let mut policy = SCORING_POLICY;
        policy.weights.keyword_density = 20;
        let profile = Arc::new(MasterProfile::builtin().unwrap());
        assert!(matches!(
            ResumeMatcher::new(profile, policy),
            Err(TailorError::Configuration(_))
        ));
    }

    #[test]
    fn test_quality_bands() {
        let t = SCORING_POLICY.thresholds;
        assert_eq!(QualityLevel::from_score(100, &t), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(90, &t), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(89, &t), QualityLevel::Strong);
        assert_eq!(QualityLevel::from_score(80, &t), QualityLevel::Strong);
        assert_eq!(QualityLevel::from_score(65, &t), QualityLevel::Moderate);
        assert_eq!(QualityLevel::from_score(64, &t), QualityLevel::Weak);
        assert_eq!(QualityLevel::from_score(0, &t), QualityLevel::Weak);
    }

    #[test]
    fn test_irrelevant_posting_scores_weak() {
        let f = fixture();
        let (_, result) = score(
            &f,
            "Greet customers and restock shelves. Weekend shifts required.",
            "Store Associate",
        );

        assert_eq!(result.breakdown.skills_match, 0.0);
        assert_eq!(result.breakdown.industry_alignment, 0.0);
        assert!(result.total_score < 50);
        assert_eq!(result.quality_level, QualityLevel::Weak);
        assert!(!result.meets_threshold);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.factor == MatchFactor::SkillsMatch));
    }

    #[test]
    fn test_experience_relevance_caps_at_one() {
        let f = fixture();
        let (_, result) = score(&f, "3+ years of SEO", "SEO Specialist");
        assert_eq!(result.breakdown.experience_relevance, 1.0);

        let (_, result) = score(&f, "18+ years of SEO", "SEO Specialist");
        assert!((result.breakdown.experience_relevance - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_industry_partial_credit_on_template_mismatch() {
        let f = fixture();
        let analysis = f
            .analyzer
            .analyze("SEO, keyword research and HubSpot", "Marketer", "Acme")
            .unwrap();
        let resume = f
            .generator
            .generate_with_template(&analysis, Some(TemplateType::Technical));
        let result = f.matcher.calculate(&resume, &analysis);

        assert_eq!(
            result.breakdown.industry_alignment,
            analysis.industry_context.confidence
        );
        assert!(result.breakdown.industry_alignment < 1.0);

        let matching = f.generator.generate(&analysis);
        let result = f.matcher.calculate(&matching, &analysis);
        assert_eq!(result.breakdown.industry_alignment, 1.0);
    }

    #[test]
    fn test_strong_seo_posting_meets_threshold() {
        let f = fixture();
        let (_, result) = score(
            &f,
            "We are hiring a senior SEO lead.\n\
             - 5+ years of technical SEO and keyword research\n\
             - Must be fluent in Google Analytics and Google Search Console\n\
             - Experience with schema markup and site audits",
            "Senior SEO Lead",
        );

        assert_eq!(result.breakdown.skills_match, 1.0);
        assert_eq!(result.breakdown.industry_alignment, 1.0);
        assert!(result.total_score >= 80, "score was {}", result.total_score);
        assert!(result.meets_threshold);
    }

    #[test]
    fn test_recommendations_follow_factor_order() {
        let f = fixture();
        let (_, result) = score(&f, "Kubernetes, Docker and AWS. 15+ years.", "Platform Engineer");

        let factors: Vec<MatchFactor> = result.recommendations.iter().map(|r| r.factor).collect();
        let mut sorted = factors.clone();
        sorted.sort();
        assert_eq!(factors, sorted);
        assert!(result
            .recommendations
            .iter()
            .all(|r| r.score < SCORING_POLICY.recommendation_floor));

        let skills = &result.recommendations[0];
        assert_eq!(skills.factor, MatchFactor::SkillsMatch);
        assert!(skills.message.contains("Kubernetes"));
    }

    #[test]
    fn test_total_is_rounded_weighted_sum() {
        let f = fixture();
        let (_, result) = score(&f, "Python and SQL preferred", "Analyst");
        let expected: f32 = result
            .breakdown
            .factors()
            .map(|(factor, s)| SCORING_POLICY.weights.weight(factor) as f32 * s)
            .sum();
        assert_eq!(result.total_score, expected.round() as u8);
    }
}
