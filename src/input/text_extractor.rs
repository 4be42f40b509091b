//! Text extraction from posting files

use crate::error::{Result, TailorError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(TailorError::Io)?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await.map_err(TailorError::Io)?;
        Self::markdown_to_text(&markdown_content)
    }
}

impl MarkdownExtractor {
    /// Render markdown and strip tags, keeping list items as "- " bullet lines
    pub fn markdown_to_text(markdown: &str) -> Result<String> {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        let text = html_output
            .replace("<li>", "\n- ")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");

        let tag_regex = Regex::new(r"<[^>]*>")?;
        let clean_text = tag_regex.replace_all(&text, "");

        let lines: Vec<&str> = clean_text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

/// A posting file with named fields. Every field may be missing;
/// validation happens when it becomes a `JobDescription`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
}

pub struct StructuredExtractor;

impl StructuredExtractor {
    pub async fn extract_json(&self, path: &Path) -> Result<RawPosting> {
        let content = fs::read_to_string(path).await.map_err(TailorError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            TailorError::InvalidInput(format!("Malformed JSON posting '{}': {}", path.display(), e))
        })
    }

    pub async fn extract_toml(&self, path: &Path) -> Result<RawPosting> {
        let content = fs::read_to_string(path).await.map_err(TailorError::Io)?;
        toml::from_str(&content).map_err(|e| {
            TailorError::InvalidInput(format!("Malformed TOML posting '{}': {}", path.display(), e))
        })
    }
}

/// Split leading `Title:`/`Company:`/`Location:`/`Salary:` lines off a plain posting
pub fn split_header_fields(text: &str) -> RawPosting {
    let mut posting = RawPosting::default();
    let mut body_start = 0;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() && index == body_start {
            body_start += 1;
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            break;
        };
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match key.trim().to_lowercase().as_str() {
            "title" | "job title" | "position" => posting.title = value,
            "company" => posting.company = value,
            "location" => posting.location = value,
            "salary" => posting.salary = value,
            _ => break,
        }
        body_start = index + 1;
    }

    let body: Vec<&str> = text.lines().skip(body_start).collect();
    posting.description = Some(body.join("\n").trim().to_string());
    posting
}
