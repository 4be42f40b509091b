//! Tailored resume generation from the master profile
//!
//! The generator never invents content. Every skill, achievement and bullet in a
//! [`ResumeContent`] is copied from the [`MasterProfile`]; tailoring only picks a
//! template, reorders and selects, and splices profile skills into the summary.

use crate::config::GenerationConfig;
use crate::error::TailorError;
use crate::processing::job_analyzer::JobAnalysis;
use crate::processing::profile::{CandidateInfo, MasterProfile, Position};
use crate::processing::taxonomy::{skills_equivalent, SkillCategory};
use crate::processing::text_processor::contains_term;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Coarse resume variant chosen per posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Technical,
    SeoMarketing,
    Leadership,
    Hybrid,
}

impl TemplateType {
    pub const ALL: [TemplateType; 4] = [
        TemplateType::Technical,
        TemplateType::SeoMarketing,
        TemplateType::Leadership,
        TemplateType::Hybrid,
    ];

    /// Template for a dominant skill category; no signal falls back to hybrid
    pub fn for_category(category: Option<SkillCategory>) -> Self {
        match category {
            Some(SkillCategory::Technical) => TemplateType::Technical,
            Some(SkillCategory::Seo) | Some(SkillCategory::Marketing) => TemplateType::SeoMarketing,
            Some(SkillCategory::Leadership) => TemplateType::Leadership,
            Some(SkillCategory::Analytics) | None => TemplateType::Hybrid,
        }
    }

    /// Whether this template is the one chosen for `category`
    pub fn serves(&self, category: SkillCategory) -> bool {
        Self::for_category(Some(category)) == *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Technical => "technical",
            TemplateType::SeoMarketing => "seo_marketing",
            TemplateType::Leadership => "leadership",
            TemplateType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = TailorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "technical" | "tech" => Ok(TemplateType::Technical),
            "seo_marketing" | "seo" | "marketing" => Ok(TemplateType::SeoMarketing),
            "leadership" => Ok(TemplateType::Leadership),
            "hybrid" => Ok(TemplateType::Hybrid),
            other => Err(TailorError::InvalidInput(format!(
                "Unknown template type '{}'. Expected technical, seo_marketing, leadership or hybrid",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillLists {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub title: String,
    pub company: String,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub description: Vec<String>,
    /// Bullets were re-ranked for this posting
    pub tailored: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub template_type: TemplateType,
    pub version: String,
    pub customizations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub candidate: CandidateInfo,
    pub summary: String,
    pub skills: SkillLists,
    pub achievements: Vec<String>,
    pub work_experience: Vec<PositionRecord>,
    pub metadata: ResumeMetadata,
}

impl ResumeContent {
    /// Lower-cased plain text of everything a reader sees on the resume
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.candidate.headline.as_str(), self.summary.as_str()];
        parts.extend(self.skills.primary.iter().map(|s| s.as_str()));
        parts.extend(self.skills.secondary.iter().map(|s| s.as_str()));
        parts.extend(self.achievements.iter().map(|s| s.as_str()));
        for position in &self.work_experience {
            parts.push(position.title.as_str());
            parts.push(position.company.as_str());
            parts.extend(position.description.iter().map(|s| s.as_str()));
        }
        parts.join("\n").to_lowercase()
    }

    pub fn all_skills(&self) -> impl Iterator<Item = &String> {
        self.skills.primary.iter().chain(self.skills.secondary.iter())
    }
}

/// Lower-cased terms a piece of profile content is scored against
struct PostingTerms {
    terms: Vec<String>,
}

impl PostingTerms {
    fn from_analysis(analysis: &JobAnalysis) -> Self {
        let mut seen = HashSet::new();
        let terms = analysis
            .keywords
            .iter()
            .cloned()
            .chain(analysis.all_skills().into_iter().map(|s| s.to_lowercase()))
            .chain(
                analysis
                    .matched_categories()
                    .into_iter()
                    .map(|c| c.as_str().to_string()),
            )
            .filter(|term| seen.insert(term.clone()))
            .collect();
        Self { terms }
    }

    /// Number of terms found in the text or named by a tag
    fn score(&self, text: &str, tags: &[String]) -> usize {
        let text = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| {
                contains_term(&text, term) || tags.iter().any(|tag| tag.to_lowercase() == **term)
            })
            .count()
    }
}

/// Builds a [`ResumeContent`] per analysis from a shared master profile
pub struct ResumeGenerator {
    profile: Arc<MasterProfile>,
    settings: GenerationConfig,
}

impl ResumeGenerator {
    pub fn new(profile: Arc<MasterProfile>, settings: GenerationConfig) -> Self {
        Self { profile, settings }
    }

    pub fn profile(&self) -> &MasterProfile {
        &self.profile
    }

    pub fn select_template(analysis: &JobAnalysis) -> TemplateType {
        TemplateType::for_category(analysis.dominant_category())
    }

    pub fn generate(&self, analysis: &JobAnalysis) -> ResumeContent {
        self.generate_with_template(analysis, None)
    }

    /// Generate a resume, optionally forcing the template instead of deriving it
    pub fn generate_with_template(
        &self,
        analysis: &JobAnalysis,
        forced: Option<TemplateType>,
    ) -> ResumeContent {
        let mut customizations = Vec::new();
        let terms = PostingTerms::from_analysis(analysis);

        let template = match forced {
            Some(template) => {
                customizations.push(format!("Used the {} template as requested", template));
                template
            }
            None => {
                let template = Self::select_template(analysis);
                customizations.push(match analysis.dominant_category() {
                    Some(category) => format!(
                        "Selected the {} template for a {}-focused posting ({} matching skills)",
                        template,
                        category,
                        analysis.skills_in(category)
                    ),
                    None => format!(
                        "Selected the {} template because no skill category dominated",
                        template
                    ),
                });
                template
            }
        };

        let skills = self.prioritize_skills(analysis);
        if !skills.primary.is_empty() {
            customizations.push(format!(
                "Promoted {} matching skills to primary: {}",
                skills.primary.len(),
                skills.primary.join(", ")
            ));
        }

        let (summary, spliced) = self.tailor_summary(template, &skills.primary);
        if !spliced.is_empty() {
            customizations.push(format!(
                "Tailored summary to emphasize {}",
                spliced.join(", ")
            ));
        }

        let achievements = self.select_achievements(&terms, &mut customizations);
        let work_experience = self.rewrite_experience(&terms, &mut customizations);

        debug!(
            "Generated {} resume: {} primary skills, {} achievements, {} customizations",
            template,
            skills.primary.len(),
            achievements.len(),
            customizations.len()
        );

        ResumeContent {
            candidate: self.profile.candidate.clone(),
            summary,
            skills,
            achievements,
            work_experience,
            metadata: ResumeMetadata {
                template_type: template,
                version: self.profile.version.clone(),
                customizations,
            },
        }
    }

    /// Split profile skills into those the posting asks for and the rest
    fn prioritize_skills(&self, analysis: &JobAnalysis) -> SkillLists {
        let mut primary = Vec::new();
        let mut secondary = Vec::new();

        for (index, skill) in self.profile.skills.iter().enumerate() {
            // Heaviest extracted category containing this skill
            let matched = SkillCategory::ALL
                .into_iter()
                .filter(|category| {
                    analysis
                        .extracted_skills
                        .get(category)
                        .map_or(false, |set| set.iter().any(|s| skills_equivalent(s, &skill.name)))
                })
                .map(|category| (analysis.skills_in(category), category))
                .max_by_key(|(weight, category)| (*weight, Reverse(*category)));

            match matched {
                Some((weight, category)) => primary.push((weight, category, skill, index)),
                None => secondary.push(skill),
            }
        }

        primary.sort_by_key(|(weight, category, skill, index)| {
            (Reverse(*weight), *category, Reverse(skill.proficiency), *index)
        });
        secondary.sort_by_key(|skill| Reverse(skill.proficiency));

        SkillLists {
            primary: primary.into_iter().map(|(_, _, s, _)| s.name.clone()).collect(),
            secondary: secondary.into_iter().map(|s| s.name.clone()).collect(),
        }
    }

    /// Base summary plus a focus sentence naming top primary skills, within the length cap
    fn tailor_summary(&self, template: TemplateType, primary: &[String]) -> (String, Vec<String>) {
        let base = self.profile.summaries.for_template(template).trim();
        let mut chosen: Vec<String> = Vec::new();

        for skill in primary.iter().take(self.settings.summary_keyword_limit) {
            let mut trial = chosen.clone();
            trial.push(skill.clone());
            if focus_summary(base, &trial).chars().count() > self.settings.max_summary_chars {
                break;
            }
            chosen = trial;
        }

        if chosen.is_empty() {
            (base.to_string(), chosen)
        } else {
            (focus_summary(base, &chosen), chosen)
        }
    }

    fn select_achievements(
        &self,
        terms: &PostingTerms,
        customizations: &mut Vec<String>,
    ) -> Vec<String> {
        let pool = &self.profile.achievements;
        let mut scored: Vec<(usize, usize)> = pool
            .iter()
            .enumerate()
            .map(|(index, a)| (terms.score(&a.text, &a.tags), index))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by_key(|(score, index)| {
            (Reverse(*score), Reverse(pool[*index].relevance), *index)
        });

        let mut selected: Vec<usize> = scored
            .into_iter()
            .take(self.settings.max_achievements)
            .map(|(_, index)| index)
            .collect();
        let matched = selected.len();

        if selected.len() < self.settings.min_achievements {
            let mut rest: Vec<usize> = (0..pool.len()).filter(|i| !selected.contains(i)).collect();
            rest.sort_by_key(|index| (Reverse(pool[*index].relevance), *index));
            let needed = self.settings.min_achievements - selected.len();
            selected.extend(rest.into_iter().take(needed));
        }

        if matched > 0 {
            customizations.push(format!(
                "Selected {} achievements matching the posting",
                matched
            ));
        }
        if selected.len() > matched {
            customizations.push(format!(
                "Added {} achievements by general relevance",
                selected.len() - matched
            ));
        }

        selected.into_iter().map(|i| pool[i].text.clone()).collect()
    }

    fn rewrite_experience(
        &self,
        terms: &PostingTerms,
        customizations: &mut Vec<String>,
    ) -> Vec<PositionRecord> {
        self.profile
            .positions
            .iter()
            .enumerate()
            .map(|(index, position)| {
                if index < self.settings.rewritten_positions {
                    let record = Self::rerank_bullets(position, terms);
                    if record.tailored {
                        customizations.push(format!(
                            "Re-prioritised bullets for {} at {}",
                            position.title, position.company
                        ));
                    }
                    record
                } else {
                    Self::authored_record(position)
                }
            })
            .collect()
    }

    fn rerank_bullets(position: &Position, terms: &PostingTerms) -> PositionRecord {
        let mut ranked: Vec<(usize, usize)> = position
            .bullets
            .iter()
            .enumerate()
            .map(|(index, b)| (terms.score(&b.text, &b.tags), index))
            .collect();
        ranked.sort_by_key(|(score, _)| Reverse(*score));

        let chosen: Vec<usize> = ranked
            .into_iter()
            .take(position.max_bullets)
            .map(|(_, index)| index)
            .collect();
        let authored: Vec<usize> = (0..position.bullets.len().min(position.max_bullets)).collect();

        PositionRecord {
            tailored: chosen != authored,
            description: chosen
                .into_iter()
                .map(|i| position.bullets[i].text.clone())
                .collect(),
            ..Self::authored_record(position)
        }
    }

    fn authored_record(position: &Position) -> PositionRecord {
        PositionRecord {
            title: position.title.clone(),
            company: position.company.clone(),
            period: position.period.clone(),
            location: position.location.clone(),
            description: position
                .bullets
                .iter()
                .take(position.max_bullets)
                .map(|b| b.text.clone())
                .collect(),
            tailored: false,
        }
    }
}

fn focus_summary(base: &str, skills: &[String]) -> String {
    format!("{} Core strengths for this role: {}.", base, join_list(skills))
}

/// "a", "a and b", "a, b and c"
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
