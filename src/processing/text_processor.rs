//! Text normalization, requirement-line splitting and token extraction

use crate::error::Result;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Minimum length for a token to count as a significant term
const MIN_TERM_LENGTH: usize = 4;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    whitespace_regex: Regex,
    bullet_regex: Regex,
    url_regex: Regex,
}

impl TextProcessor {
    pub fn new() -> Result<Self> {
        let whitespace_regex = Regex::new(r"\s+")?;
        let bullet_regex = Regex::new(r"^\s*(?:[-*\u{2022}\u{25AA}\u{25CF}\u{2023}+]|\d{1,2}[.)])\s+")?;
        let url_regex = Regex::new(r"https?://[^\s]+")?;

        Ok(Self {
            stop_words: Self::create_stop_words(),
            whitespace_regex,
            bullet_regex,
            url_regex,
        })
    }

    /// Lower-case, unicode-normalize and collapse whitespace.
    ///
    /// Two inputs differing only in case or whitespace normalize to the same string.
    pub fn normalize(&self, text: &str) -> String {
        let text = self.url_regex.replace_all(text, " ");
        let text = Self::normalize_unicode(&text).to_lowercase();
        self.whitespace_regex.replace_all(&text, " ").trim().to_string()
    }

    /// Collapse whitespace without changing case
    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }

    /// Split a posting into candidate requirement lines, preserving source order.
    ///
    /// Bullet lines are returned whole with the marker stripped and flagged;
    /// prose lines are broken into sentences.
    pub fn split_requirement_candidates(&self, text: &str) -> Vec<CandidateLine> {
        let mut candidates = Vec::new();

        for line in text.lines() {
            let line = Self::normalize_unicode(line);
            if line.trim().is_empty() {
                continue;
            }

            if self.bullet_regex.is_match(&line) {
                let stripped = self.bullet_regex.replace(&line, "");
                let stripped = self.collapse_whitespace(&stripped);
                if !stripped.is_empty() {
                    candidates.push(CandidateLine {
                        text: stripped,
                        is_bullet: true,
                    });
                }
                continue;
            }

            for sentence in line.unicode_sentences() {
                let sentence = self.collapse_whitespace(sentence);
                if !sentence.is_empty() {
                    candidates.push(CandidateLine {
                        text: sentence,
                        is_bullet: false,
                    });
                }
            }
        }

        candidates
    }

    /// Tokenize text into lower-case words using Unicode segmentation
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.len() > 1 && !self.stop_words.contains(word.as_str()))
            .filter(|word| word.chars().any(|c| c.is_alphabetic()))
            .collect()
    }

    /// Significant terms of a text: non stop-word tokens of a useful length,
    /// de-duplicated in first-seen order
    pub fn significant_terms(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tokenize(text)
            .into_iter()
            .filter(|token| token.chars().count() >= MIN_TERM_LENGTH)
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }

    /// Normalize Unicode punctuation to ASCII equivalents
    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{00A0}' => ' ',
                '\u{2026}' => '.',
                _ => c,
            })
            .collect()
    }

    fn create_stop_words() -> HashSet<&'static str> {
        [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
            "is", "it", "its", "of", "on", "or", "that", "the", "to", "was", "will", "with",
            "this", "but", "they", "have", "had", "what", "each", "which", "she", "do", "how",
            "their", "if", "up", "out", "many", "then", "them", "these", "so", "some", "her",
            "would", "make", "like", "into", "him", "more", "no", "way", "could", "my", "than",
            "been", "who", "now", "did", "get", "may", "over", "new", "only", "our", "just",
            "very", "after", "most", "also", "any", "same", "such", "both", "few", "those",
            "while", "within", "across", "about", "other", "others", "you", "your", "we",
            "us", "all", "can", "who", "where", "when", "why", "not", "are", "were", "being",
            "own", "via", "per", "etc", "including", "include", "includes", "well", "plus",
            "there", "here", "able", "should", "must", "need", "needs", "required",
            "requirements", "requirement", "preferred", "ideal", "ideally", "strong",
            "excellent", "ability", "experience", "experienced", "years", "year",
            "knowledge", "familiarity", "familiar", "proficiency", "proficient", "skills",
            "skill", "expertise", "candidate", "candidates", "role", "position", "team",
            "work", "working", "looking", "join", "responsible", "responsibilities",
            "minimum", "least", "using", "use", "understanding", "demonstrated", "proven",
            "track", "record", "good", "great", "high", "highly", "level", "related",
            "relevant", "similar", "equivalent", "degree", "bonus", "nice", "have",
            "having", "help", "ensure", "across", "every", "based",
        ]
        .into_iter()
        .collect()
    }
}

/// A line or sentence lifted from a posting
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLine {
    pub text: String,
    pub is_bullet: bool,
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric characters.
///
/// Both inputs are expected to be lower-cased already.
pub fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack
        .match_indices(needle)
        .any(|(start, matched)| is_word_bounded(haystack, start, start + matched.len()))
}

/// Whether the byte range `[start, end)` of `text` has no alphanumeric neighbours
pub fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_case_and_whitespace() {
        let processor = TextProcessor::new().unwrap();
        let a = processor.normalize("Keyword   Research\n\tand  SEO");
        let b = processor.normalize("keyword research AND seo");
        assert_eq!(a, b);
        assert_eq!(a, "keyword research and seo");
    }

    #[test]
    fn test_normalize_handles_smart_punctuation() {
        let processor = TextProcessor::new().unwrap();
        assert_eq!(processor.normalize("5\u{2013}7 years"), "5-7 years");
    }

    #[test]
    fn test_split_requirement_candidates_keeps_order_and_strips_bullets() {
        let processor = TextProcessor::new().unwrap();
        let text = "About us. We grow fast.\n- 5+ years of SEO\n\u{2022} Google Analytics required\n2. Own the roadmap";

        let lines = processor.split_requirement_candidates(text);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "About us.",
                "We grow fast.",
                "5+ years of SEO",
                "Google Analytics required",
                "Own the roadmap"
            ]
        );
        assert!(!lines[0].is_bullet);
        assert!(lines[2].is_bullet);
        assert!(lines[4].is_bullet);
    }

    #[test]
    fn test_tokenization_filters_stop_words() {
        let processor = TextProcessor::new().unwrap();
        let tokens = processor.tokenize("The candidate must own technical audits");

        assert!(tokens.contains(&"technical".to_string()));
        assert!(tokens.contains(&"audits".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"must".to_string()));
    }

    #[test]
    fn test_significant_terms_dedupes_and_drops_short_words() {
        let processor = TextProcessor::new().unwrap();
        let terms = processor.significant_terms("Audit audits, audit the CMS and run SEO audits");

        assert_eq!(terms, vec!["audit", "audits"]);
    }

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("strong seo background", "seo"));
        assert!(contains_term("c++ and node.js", "node.js"));
        assert!(!contains_term("based in seoul", "seo"));
        assert!(!contains_term("javascript", "java"));
        assert!(!contains_term("anything", ""));
    }
}
