//! Job posting analysis: skill extraction, industry detection, seniority and requirements

use crate::error::{Result, TailorError};
use crate::processing::taxonomy::{SkillCategory, Taxonomy};
use crate::processing::text_processor::{CandidateLine, TextProcessor};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

/// Upper bound on the flattened keyword list
pub const MAX_KEYWORDS: usize = 30;

/// A job posting as handed to the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl JobDescription {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        Self::from_parts(
            Some(title.into()),
            Some(company.into()),
            Some(description.into()),
        )
    }

    /// Build from possibly-missing fields.
    ///
    /// Title and company must be present and non-blank. The description must be
    /// present but may be empty.
    pub fn from_parts(
        title: Option<String>,
        company: Option<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let title = require_non_blank("title", title)?;
        let company = require_non_blank("company", company)?;
        let description = description.ok_or_else(|| TailorError::Validation {
            field: "description",
            reason: "is required".to_string(),
        })?;

        Ok(Self {
            title,
            company,
            description,
            salary: None,
            location: None,
        })
    }

    pub fn with_salary(mut self, salary: Option<String>) -> Self {
        self.salary = salary.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|s| !s.trim().is_empty());
        self
    }
}

fn require_non_blank(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(TailorError::missing_field(field)),
    }
}

/// Seniority scale, ordered from least to most senior
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=1 => ExperienceLevel::Junior,
            2..=4 => ExperienceLevel::Mid,
            5..=9 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Executive,
        }
    }

    /// Years of experience a posting at this level usually expects
    pub fn typical_years(&self) -> u32 {
        match self {
            ExperienceLevel::Junior => 1,
            ExperienceLevel::Mid => 3,
            ExperienceLevel::Senior => 5,
            ExperienceLevel::Executive => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Executive => "executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryContext {
    /// `None` when no taxonomy skill matched
    pub primary: Option<SkillCategory>,
    /// Share of all matches that fall in `primary`, in `[0, 1]`
    pub confidence: f32,
}

/// Structured reading of one posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    /// Every category is present, possibly with an empty set
    pub extracted_skills: BTreeMap<SkillCategory, BTreeSet<String>>,
    pub industry_context: IndustryContext,
    pub experience_level: ExperienceLevel,
    /// Largest explicit "N years" figure in the posting
    pub required_years: Option<u32>,
    /// Requirement lines in source order
    pub key_requirements: Vec<String>,
    pub keywords: Vec<String>,
}

impl JobAnalysis {
    pub fn skills_in(&self, category: SkillCategory) -> usize {
        self.extracted_skills.get(&category).map_or(0, |s| s.len())
    }

    pub fn total_matches(&self) -> usize {
        self.extracted_skills.values().map(|s| s.len()).sum()
    }

    /// Distinct extracted skill names across all categories
    pub fn all_skills(&self) -> BTreeSet<&str> {
        self.extracted_skills
            .values()
            .flat_map(|set| set.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Category with the most matched skills; ties go to the higher-priority category
    pub fn dominant_category(&self) -> Option<SkillCategory> {
        let mut best: Option<(SkillCategory, usize)> = None;
        for category in SkillCategory::ALL {
            let count = self.skills_in(category);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((category, count)),
            }
        }
        best.map(|(category, _)| category)
    }

    /// Categories with at least one match, in priority order
    pub fn matched_categories(&self) -> Vec<SkillCategory> {
        SkillCategory::ALL
            .into_iter()
            .filter(|c| self.skills_in(*c) > 0)
            .collect()
    }
}

/// Reads postings against the skill taxonomy
pub struct JobAnalyzer {
    taxonomy: Arc<Taxonomy>,
    text_processor: TextProcessor,
    years_regex: Regex,
    requirement_regex: Regex,
    seniority_rules: Vec<(ExperienceLevel, Regex)>,
    /// Phrases whose seniority words say nothing about the role's level
    seniority_noise: Regex,
}

impl JobAnalyzer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Result<Self> {
        let years_regex = Regex::new(
            r"\b(\d{1,2})\s*(?:\+|(?:-|to)\s*\d{1,2}\s*\+?)?\s*(?:years?|yrs?)\b",
        )?;
        let requirement_regex = Regex::new(
            r"(?i)\b(?:required|requirements?|must|should|needs?|experience (?:with|in)|proficien\w*|knowledge of|ability to|familiar\w*|expertise|years?|preferred|you will|responsible for)\b",
        )?;

        let seniority_noise = Regex::new(
            r"\b(?:lead generation|lead gen|sales leads?|hiring managers?|reports? to (?:a|the|our) \w+ managers?)\b",
        )?;

        let seniority_rules = vec![
            (
                ExperienceLevel::Junior,
                Regex::new(r"\b(?:intern|internship|junior|entry-level|entry level|graduate)\b")?,
            ),
            (
                ExperienceLevel::Mid,
                Regex::new(r"\b(?:mid-level|mid level|intermediate)\b")?,
            ),
            (
                ExperienceLevel::Senior,
                Regex::new(r"\b(?:senior|sr\.?|lead|principal|staff|manager)\b")?,
            ),
            (
                ExperienceLevel::Executive,
                Regex::new(r"\b(?:director|head of|vp|vice president|chief|executive)\b")?,
            ),
        ];

        Ok(Self {
            taxonomy,
            text_processor: TextProcessor::new()?,
            years_regex,
            requirement_regex,
            seniority_rules,
            seniority_noise,
        })
    }

    pub fn analyze_job(&self, job: &JobDescription) -> Result<JobAnalysis> {
        self.analyze(&job.description, &job.title, &job.company)
    }

    /// Analyze a posting. Blank title or company is a validation error;
    /// an empty or irrelevant description is not.
    pub fn analyze(&self, description: &str, title: &str, company: &str) -> Result<JobAnalysis> {
        if title.trim().is_empty() {
            return Err(TailorError::missing_field("title"));
        }
        if company.trim().is_empty() {
            return Err(TailorError::missing_field("company"));
        }

        let normalized = self.text_processor.normalize(description);

        let extracted_skills = self.extract_skills(&normalized);
        let industry_context = Self::detect_industry(&extracted_skills);

        let normalized_title = self.text_processor.normalize(title);
        let signal_text = format!("{} {}", normalized_title, normalized);
        let required_years = self.required_years(&signal_text);
        let experience_level = self.experience_level(&signal_text, required_years);

        let key_requirements = self.key_requirements(description);
        let keywords = self.keywords(&extracted_skills, &key_requirements);

        let analysis = JobAnalysis {
            extracted_skills,
            industry_context,
            experience_level,
            required_years,
            key_requirements,
            keywords,
        };

        debug!(
            "Analyzed '{}' at {}: {} skill matches, primary {:?} ({:.2}), level {}, {} requirements",
            title.trim(),
            company.trim(),
            analysis.total_matches(),
            analysis.industry_context.primary,
            analysis.industry_context.confidence,
            analysis.experience_level,
            analysis.key_requirements.len()
        );

        Ok(analysis)
    }

    fn extract_skills(&self, normalized: &str) -> BTreeMap<SkillCategory, BTreeSet<String>> {
        let mut skills: BTreeMap<SkillCategory, BTreeSet<String>> = SkillCategory::ALL
            .iter()
            .map(|c| (*c, BTreeSet::new()))
            .collect();

        for entry in self.taxonomy.find_matches(normalized) {
            skills
                .entry(entry.category)
                .or_default()
                .insert(entry.name.clone());
        }

        skills
    }

    fn detect_industry(skills: &BTreeMap<SkillCategory, BTreeSet<String>>) -> IndustryContext {
        let total: usize = skills.values().map(|s| s.len()).sum();
        if total == 0 {
            return IndustryContext {
                primary: None,
                confidence: 0.0,
            };
        }

        let mut primary = None;
        let mut primary_count = 0;
        for category in SkillCategory::ALL {
            let count = skills.get(&category).map_or(0, |s| s.len());
            if count > primary_count {
                primary = Some(category);
                primary_count = count;
            }
        }

        IndustryContext {
            primary,
            confidence: (primary_count as f32 / total as f32).clamp(0.0, 1.0),
        }
    }

    fn required_years(&self, normalized: &str) -> Option<u32> {
        self.years_regex
            .captures_iter(normalized)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max()
    }

    fn experience_level(&self, normalized: &str, years: Option<u32>) -> ExperienceLevel {
        let signal_text = self.seniority_noise.replace_all(normalized, " ");
        let from_words = self
            .seniority_rules
            .iter()
            .filter(|(_, regex)| regex.is_match(&signal_text))
            .map(|(level, _)| *level)
            .max();
        let from_years = years.map(ExperienceLevel::from_years);

        from_words
            .into_iter()
            .chain(from_years)
            .max()
            .unwrap_or(ExperienceLevel::Mid)
    }

    fn key_requirements(&self, description: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.text_processor
            .split_requirement_candidates(description)
            .into_iter()
            .filter(|line| self.is_requirement(line))
            .map(|line| line.text)
            .filter(|text| seen.insert(text.to_lowercase()))
            .collect()
    }

    fn is_requirement(&self, line: &CandidateLine) -> bool {
        line.is_bullet || self.requirement_regex.is_match(&line.text)
    }

    fn keywords(
        &self,
        skills: &BTreeMap<SkillCategory, BTreeSet<String>>,
        requirements: &[String],
    ) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        let mut seen = HashSet::new();

        for name in skills.values().flatten() {
            let keyword = name.to_lowercase();
            if seen.insert(keyword.clone()) {
                keywords.push(keyword);
            }
        }

        // Words already carried by a multi-word skill keyword
        let skill_words: HashSet<String> = keywords
            .iter()
            .flat_map(|k| self.text_processor.tokenize(k))
            .collect();

        let requirement_text = requirements.join("\n");
        for term in self.text_processor.significant_terms(&requirement_text) {
            if skill_words.contains(&term) {
                continue;
            }
            if seen.insert(term.clone()) {
                keywords.push(term);
            }
        }

        keywords.truncate(MAX_KEYWORDS);
        keywords
    }
}
