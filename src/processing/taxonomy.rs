//! Categorized skill vocabulary and the keyword automaton built over it

use crate::error::{Result, TailorError};
use crate::processing::text_processor::is_word_bounded;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use strsim::jaro_winkler;

const BUILTIN_TAXONOMY: &str = include_str!("../../data/taxonomy.toml");

/// Jaro-Winkler similarity above which two skill names are treated as the same skill
const SKILL_NAME_SIMILARITY: f64 = 0.97;

/// Skill category. Declaration order is the tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Seo,
    Marketing,
    Leadership,
    Analytics,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Technical,
        SkillCategory::Seo,
        SkillCategory::Marketing,
        SkillCategory::Leadership,
        SkillCategory::Analytics,
    ];

    /// Identifier used in data files and keyword matching
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "technical",
            SkillCategory::Seo => "seo",
            SkillCategory::Marketing => "marketing",
            SkillCategory::Leadership => "leadership",
            SkillCategory::Analytics => "analytics",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "technical",
            SkillCategory::Seo => "SEO",
            SkillCategory::Marketing => "marketing",
            SkillCategory::Leadership => "leadership",
            SkillCategory::Analytics => "analytics",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single vocabulary entry. A skill belonging to two categories is listed twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    skills: Vec<SkillEntry>,
}

/// Read-only skill taxonomy with a case-insensitive matcher over every surface form
pub struct Taxonomy {
    entries: Vec<SkillEntry>,
    matcher: AhoCorasick,
    /// Entry indices reachable from each automaton pattern
    pattern_entries: Vec<Vec<usize>>,
}

impl Taxonomy {
    /// Build a taxonomy from entries, rejecting empty or duplicated vocabularies
    pub fn new(entries: Vec<SkillEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(TailorError::Configuration(
                "Skill taxonomy contains no entries".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(TailorError::Configuration(
                    "Skill taxonomy contains an entry with a blank name".to_string(),
                ));
            }
            if !seen.insert((entry.name.to_lowercase(), entry.category)) {
                return Err(TailorError::Configuration(format!(
                    "Skill '{}' is listed twice under category '{}'",
                    entry.name,
                    entry.category.as_str()
                )));
            }
        }

        // One pattern per distinct lower-cased surface form
        let mut surface_index: HashMap<String, usize> = HashMap::new();
        let mut surface_forms: Vec<String> = Vec::new();
        let mut pattern_entries: Vec<Vec<usize>> = Vec::new();

        for (entry_idx, entry) in entries.iter().enumerate() {
            let forms = std::iter::once(&entry.name).chain(entry.synonyms.iter());
            for form in forms {
                let form = form.trim().to_lowercase();
                if form.is_empty() {
                    continue;
                }
                let pattern_idx = *surface_index.entry(form.clone()).or_insert_with(|| {
                    surface_forms.push(form);
                    pattern_entries.push(Vec::new());
                    surface_forms.len() - 1
                });
                if !pattern_entries[pattern_idx].contains(&entry_idx) {
                    pattern_entries[pattern_idx].push(entry_idx);
                }
            }
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&surface_forms)
            .map_err(|e| {
                TailorError::Configuration(format!("Failed to build skill matcher: {}", e))
            })?;

        Ok(Self {
            entries,
            matcher,
            pattern_entries,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TaxonomyFile = toml::from_str(content)?;
        Self::new(file.skills)
    }

    /// Load a taxonomy file. Missing or corrupt files are fatal configuration errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TailorError::Configuration(format!(
                "Failed to read skill taxonomy '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// The taxonomy compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TAXONOMY)
    }

    /// Distinct entries whose name or synonym occurs word-bounded in `normalized_text`.
    ///
    /// `normalized_text` must already be lower-cased. Entries are returned in
    /// taxonomy order.
    pub fn find_matches(&self, normalized_text: &str) -> Vec<&SkillEntry> {
        let mut matched = vec![false; self.entries.len()];

        for mat in self.matcher.find_overlapping_iter(normalized_text) {
            if !is_word_bounded(normalized_text, mat.start(), mat.end()) {
                continue;
            }
            for &entry_idx in &self.pattern_entries[mat.pattern().as_usize()] {
                matched[entry_idx] = true;
            }
        }

        self.entries
            .iter()
            .zip(matched)
            .filter_map(|(entry, hit)| hit.then_some(entry))
            .collect()
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry (in any category) names this skill
    pub fn knows_skill(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| skills_equivalent(&entry.name, name))
    }

    /// Number of entries per category
    pub fn category_sizes(&self) -> BTreeMap<SkillCategory, usize> {
        let mut sizes: BTreeMap<SkillCategory, usize> =
            SkillCategory::ALL.iter().map(|c| (*c, 0)).collect();
        for entry in &self.entries {
            *sizes.entry(entry.category).or_insert(0) += 1;
        }
        sizes
    }
}

/// Whether two skill names refer to the same skill
pub fn skills_equivalent(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    a == b || jaro_winkler(&a, &b) >= SKILL_NAME_SIMILARITY
}
