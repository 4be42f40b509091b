//! Posting file type detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Text,
    Markdown,
    Json,
    Toml,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            "json" => FileType::Json,
            "toml" => FileType::Toml,
            _ => FileType::Unknown,
        }
    }
}
