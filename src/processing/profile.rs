//! The master profile: every skill, position and achievement a tailored resume may draw on

use crate::error::{Result, TailorError};
use crate::processing::resume_generator::TemplateType;
use crate::processing::taxonomy::{skills_equivalent, SkillCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_PROFILE: &str = include_str!("../../data/master_profile.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub email: String,
}

/// Base summary per template type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummaries {
    pub technical: String,
    pub seo_marketing: String,
    pub leadership: String,
    pub hybrid: String,
}

impl TemplateSummaries {
    pub fn for_template(&self, template: TemplateType) -> &str {
        match template {
            TemplateType::Technical => &self.technical,
            TemplateType::SeoMarketing => &self.seo_marketing,
            TemplateType::Leadership => &self.leadership,
            TemplateType::Hybrid => &self.hybrid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSkill {
    pub name: String,
    pub category: SkillCategory,
    /// 0 to 100
    pub proficiency: u8,
}

/// A pre-authored bullet. Tags name the skills the bullet demonstrates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBullet {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub title: String,
    pub company: String,
    pub period: String,
    #[serde(default)]
    pub location: Option<String>,
    /// How many bullets a resume shows for this position
    pub max_bullets: usize,
    /// Bullet pool in authored order
    pub bullets: Vec<PositionBullet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// General relevance, 0 to 100, used when padding a selection
    pub relevance: u8,
}

/// Immutable candidate record loaded once at start-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterProfile {
    pub version: String,
    pub total_years_experience: f32,
    pub candidate: CandidateInfo,
    pub summaries: TemplateSummaries,
    pub skills: Vec<ProfileSkill>,
    /// Most recent first
    pub positions: Vec<Position>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl MasterProfile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let profile: MasterProfile = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile file. Any problem is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TailorError::Configuration(format!(
                "Failed to read master profile '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// The profile compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_PROFILE)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(invalid("version must not be blank"));
        }
        if !self.total_years_experience.is_finite() || self.total_years_experience < 0.0 {
            return Err(invalid("total_years_experience must be a non-negative number"));
        }
        if self.candidate.name.trim().is_empty() {
            return Err(invalid("candidate.name must not be blank"));
        }

        for template in TemplateType::ALL {
            if self.summaries.for_template(template).trim().is_empty() {
                return Err(invalid(&format!(
                    "summary for template '{}' must not be blank",
                    template
                )));
            }
        }

        if self.skills.is_empty() {
            return Err(invalid("at least one skill is required"));
        }
        let mut seen = HashSet::new();
        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(invalid("skill names must not be blank"));
            }
            if skill.proficiency > 100 {
                return Err(invalid(&format!(
                    "proficiency of '{}' is {} (expected 0-100)",
                    skill.name, skill.proficiency
                )));
            }
            if !seen.insert(skill.name.to_lowercase()) {
                return Err(invalid(&format!("skill '{}' is listed twice", skill.name)));
            }
        }

        for position in &self.positions {
            if position.max_bullets == 0 {
                return Err(invalid(&format!(
                    "position '{}' must show at least one bullet",
                    position.title
                )));
            }
            if position.bullets.iter().any(|b| b.text.trim().is_empty()) {
                return Err(invalid(&format!(
                    "position '{}' has a blank bullet",
                    position.title
                )));
            }
        }

        for achievement in &self.achievements {
            if achievement.text.trim().is_empty() {
                return Err(invalid("achievement text must not be blank"));
            }
            if achievement.relevance > 100 {
                return Err(invalid(&format!(
                    "achievement relevance {} is out of range (expected 0-100)",
                    achievement.relevance
                )));
            }
        }

        Ok(())
    }

    /// Profile skill equivalent to `name`, if any
    pub fn find_skill(&self, name: &str) -> Option<&ProfileSkill> {
        self.skills
            .iter()
            .find(|skill| skills_equivalent(&skill.name, name))
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|skill| skill.name == name)
    }

    pub fn has_achievement(&self, text: &str) -> bool {
        self.achievements.iter().any(|a| a.text == text)
    }

    pub fn has_bullet(&self, text: &str) -> bool {
        self.positions
            .iter()
            .flat_map(|p| p.bullets.iter())
            .any(|b| b.text == text)
    }
}

fn invalid(reason: &str) -> TailorError {
    TailorError::Configuration(format!("Invalid master profile: {}", reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profile_is_valid() {
        let profile = MasterProfile::builtin().unwrap();
        assert_eq!(profile.candidate.name, "Jordan Avery");
        assert!(profile.total_years_experience > 0.0);
        assert!(!profile.positions.is_empty());
        assert!(profile.achievements.len() >= 5);
    }

    #[test]
    fn test_find_skill_is_case_insensitive() {
        let profile = MasterProfile::builtin().unwrap();
        let skill = profile.find_skill("google ANALYTICS").unwrap();
        assert_eq!(skill.name, "Google Analytics");
        assert!(profile.find_skill("Kubernetes").is_none());
    }

    #[test]
    fn test_out_of_range_proficiency_is_rejected() {
        let mut profile = MasterProfile::builtin().unwrap();
        profile.skills[0].proficiency = 120;

        let err = profile.validate().unwrap_err();
        assert!(matches!(err, TailorError::Configuration(_)));
        assert!(err.to_string().contains("proficiency"));
    }

    #[test]
    fn test_duplicate_skill_is_rejected() {
        let mut profile = MasterProfile::builtin().unwrap();
        let mut duplicate = profile.skills[0].clone();
        duplicate.name = duplicate.name.to_uppercase();
        profile.skills.push(duplicate);

        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_missing_section_is_configuration_error() {
        let result = MasterProfile::from_toml_str("version = \"1\"\ntotal_years_experience = 3.0\n");
        assert!(matches!(result, Err(TailorError::Configuration(_))));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = MasterProfile::load(Path::new("/definitely/not/here/profile.toml"));
        assert!(matches!(result, Err(TailorError::Configuration(_))));
    }
}
