//! Cover letter selection and placeholder filling

use crate::error::Result;
use crate::processing::job_analyzer::{JobAnalysis, JobDescription};
use crate::processing::profile::MasterProfile;
use crate::processing::resume_generator::{join_list, ResumeContent, TemplateType};
use askama::Template;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Primary skills named in a letter
const HIGHLIGHTED_SKILLS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub template_type: TemplateType,
    pub subject: String,
    pub body: String,
}

/// Placeholder values shared by every letter template
struct LetterFields {
    candidate_name: String,
    candidate_email: String,
    headline: String,
    company: String,
    title: String,
    years: String,
    skills: String,
    has_skills: bool,
    achievement: String,
    has_achievement: bool,
    focus: String,
}

#[derive(Template)]
#[template(
    source = r#"Dear {{ f.company }} hiring team,

I am applying for the {{ f.title }} role. I am a {{ f.headline }} with {{ f.years }} years of hands-on engineering and site performance work.
{% if f.has_skills %}
The work you describe lines up with what I do every day: {{ f.skills }}.
{% endif %}{% if f.has_achievement %}
One result I am proud of: {{ f.achievement }}
{% endif %}
I would welcome the chance to talk through how I would approach the technical side of this role at {{ f.company }}.

Best regards,
{{ f.candidate_name }}
{{ f.candidate_email }}"#,
    ext = "txt"
)]
struct TechnicalLetter<'a> {
    f: &'a LetterFields,
}

#[derive(Template)]
#[template(
    source = r#"Dear {{ f.company }} hiring team,

I would love to help {{ f.company }} grow as your next {{ f.title }}. Over {{ f.years }} years I have built organic and marketing programs that are measured from first click to revenue.
{% if f.has_skills %}
Your posting centres on {{ f.focus }}, and my strongest tools for that are {{ f.skills }}.
{% endif %}{% if f.has_achievement %}
A recent example: {{ f.achievement }}
{% endif %}
I would be glad to share how I would plan the first ninety days of search and content work.

Best regards,
{{ f.candidate_name }}
{{ f.candidate_email }}"#,
    ext = "txt"
)]
struct SeoMarketingLetter<'a> {
    f: &'a LetterFields,
}

#[derive(Template)]
#[template(
    source = r#"Dear {{ f.company }} hiring team,

I am writing about the {{ f.title }} position. As a {{ f.headline }} I have spent {{ f.years }} years building teams, setting roadmaps with partners and seeing the work through to results.
{% if f.has_skills %}
I lead with {{ f.skills }}.
{% endif %}{% if f.has_achievement %}
For example: {{ f.achievement }}
{% endif %}
I would value a conversation about where your team is headed and how I can help it get there.

Best regards,
{{ f.candidate_name }}
{{ f.candidate_email }}"#,
    ext = "txt"
)]
struct LeadershipLetter<'a> {
    f: &'a LetterFields,
}

#[derive(Template)]
#[template(
    source = r#"Dear {{ f.company }} hiring team,

I am interested in the {{ f.title }} role. My {{ f.years }} years span development, search and analytics, which lets me connect site changes to measurable outcomes.
{% if f.has_skills %}
Relevant strengths for this role include {{ f.skills }}.
{% endif %}{% if f.has_achievement %}
Most recently: {{ f.achievement }}
{% endif %}
Thank you for considering my application. I look forward to hearing from you.

Best regards,
{{ f.candidate_name }}
{{ f.candidate_email }}"#,
    ext = "txt"
)]
struct HybridLetter<'a> {
    f: &'a LetterFields,
}

/// Picks a letter template from the resume template and fills it in
pub struct CoverLetterResolver {
    profile: Arc<MasterProfile>,
}

impl CoverLetterResolver {
    pub fn new(profile: Arc<MasterProfile>) -> Self {
        Self { profile }
    }

    pub fn resolve(
        &self,
        job: &JobDescription,
        analysis: &JobAnalysis,
        resume: &ResumeContent,
    ) -> Result<CoverLetter> {
        let template_type = resume.metadata.template_type;
        let fields = self.fields(job, analysis, resume);

        let body = match template_type {
            TemplateType::Technical => TechnicalLetter { f: &fields }.render()?,
            TemplateType::SeoMarketing => SeoMarketingLetter { f: &fields }.render()?,
            TemplateType::Leadership => LeadershipLetter { f: &fields }.render()?,
            TemplateType::Hybrid => HybridLetter { f: &fields }.render()?,
        };

        debug!(
            "Resolved {} cover letter for {} at {}",
            template_type, job.title, job.company
        );

        Ok(CoverLetter {
            template_type,
            subject: format!("Application for {} - {}", job.title, fields.candidate_name),
            body: body.trim().to_string(),
        })
    }

    fn fields(
        &self,
        job: &JobDescription,
        analysis: &JobAnalysis,
        resume: &ResumeContent,
    ) -> LetterFields {
        let skills: Vec<String> = resume
            .skills
            .primary
            .iter()
            .take(HIGHLIGHTED_SKILLS)
            .cloned()
            .collect();
        let achievement = resume.achievements.first().cloned().unwrap_or_default();
        let focus = analysis
            .industry_context
            .primary
            .map(|c| format!("{} work", c))
            .unwrap_or_else(|| "this kind of work".to_string());

        LetterFields {
            candidate_name: resume.candidate.name.clone(),
            candidate_email: resume.candidate.email.clone(),
            headline: lowercase_first(&resume.candidate.headline),
            company: job.company.clone(),
            title: job.title.clone(),
            years: format!("{:.0}", self.profile.total_years_experience),
            has_skills: !skills.is_empty(),
            skills: join_list(&skills),
            has_achievement: !achievement.is_empty(),
            achievement,
            focus,
        }
    }
}

/// "Technical SEO Lead" reads as "technical SEO Lead" mid-sentence
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::processing::job_analyzer::JobAnalyzer;
    use crate::processing::resume_generator::ResumeGenerator;
    use crate::processing::taxonomy::Taxonomy;

    fn letter_for(description: &str, forced: Option<TemplateType>) -> (ResumeContent, CoverLetter) {
        let taxonomy = Arc::new(Taxonomy::builtin().unwrap());
        let profile = Arc::new(MasterProfile::builtin().unwrap());
        let analyzer = JobAnalyzer::new(taxonomy).unwrap();
        let generator = ResumeGenerator::new(profile.clone(), GenerationConfig::default());
        let resolver = CoverLetterResolver::new(profile);

        let job = JobDescription::new("Growth Lead", "Northstar", description).unwrap();
        let analysis = analyzer.analyze_job(&job).unwrap();
        let resume = generator.generate_with_template(&analysis, forced);
        let letter = resolver.resolve(&job, &analysis, &resume).unwrap();
        (resume, letter)
    }

    #[test]
    fn test_letter_follows_resume_template() {
        for template in TemplateType::ALL {
            let (_, letter) = letter_for("SEO and keyword research", Some(template));
            assert_eq!(letter.template_type, template);
            assert!(letter.body.starts_with("Dear Northstar hiring team,"));
            assert!(letter.body.contains("Growth Lead"));
            assert!(letter.body.ends_with("jordan.avery@example.com"));
        }
    }

    #[test]
    fn test_letter_names_primary_skills_and_first_achievement() {
        let (resume, letter) = letter_for("Technical SEO, Google Analytics and schema markup", None);

        assert_eq!(letter.template_type, TemplateType::SeoMarketing);
        for skill in resume.skills.primary.iter().take(HIGHLIGHTED_SKILLS) {
            assert!(letter.body.contains(skill.as_str()), "missing {}", skill);
        }
        assert!(letter.body.contains(&resume.achievements[0]));
        assert!(letter.body.contains("SEO work"));
        assert_eq!(letter.subject, "Application for Growth Lead - Jordan Avery");
    }

    #[test]
    fn test_letter_without_matching_skills_omits_skill_line() {
        let (_, letter) = letter_for("Friendly team, great snacks.", None);
        assert_eq!(letter.template_type, TemplateType::Hybrid);
        assert!(!letter.body.contains("Relevant strengths"));
    }

    #[test]
    fn test_lowercase_first() {
        assert_eq!(lowercase_first("Technical SEO Lead"), "technical SEO Lead");
        assert_eq!(lowercase_first(""), "");
    }
}
