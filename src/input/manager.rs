//! Input manager for loading job postings from disk

use crate::error::{Result, TailorError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    split_header_fields, MarkdownExtractor, PlainTextExtractor, RawPosting, StructuredExtractor,
    TextExtractor,
};
use crate::processing::job_analyzer::JobDescription;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over fields found in the file
#[derive(Debug, Clone, Default)]
pub struct PostingOverrides {
    pub title: Option<String>,
    pub company: Option<String>,
}

pub struct InputManager {
    cache: HashMap<PathBuf, RawPosting>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a posting file and validate it into a `JobDescription`
    pub async fn load_posting(
        &mut self,
        path: &Path,
        overrides: &PostingOverrides,
    ) -> Result<JobDescription> {
        let raw = self.read_posting(path).await?;

        let title = overrides.title.clone().or(raw.title);
        let company = overrides.company.clone().or(raw.company);

        Ok(JobDescription::from_parts(title, company, raw.description)?
            .with_salary(raw.salary)
            .with_location(raw.location))
    }

    async fn read_posting(&mut self, path: &Path) -> Result<RawPosting> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached posting for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(TailorError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let raw = match self.detect_file_type(path)? {
            FileType::Text => {
                info!("Reading plain text posting: {}", path.display());
                split_header_fields(&PlainTextExtractor.extract(path).await?)
            }
            FileType::Markdown => {
                info!("Processing markdown posting: {}", path.display());
                split_header_fields(&MarkdownExtractor.extract(path).await?)
            }
            FileType::Json => {
                info!("Parsing JSON posting: {}", path.display());
                StructuredExtractor.extract_json(path).await?
            }
            FileType::Toml => {
                info!("Parsing TOML posting: {}", path.display());
                StructuredExtractor.extract_toml(path).await?
            }
            FileType::Unknown => {
                return Err(TailorError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), raw.clone());
        }

        Ok(raw)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                TailorError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
