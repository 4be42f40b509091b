//! Posting analysis, resume tailoring and match scoring

pub mod text_processor;
pub mod taxonomy;
pub mod profile;
pub mod job_analyzer;
pub mod resume_generator;
pub mod matcher;
pub mod cover_letter;
pub mod pipeline;

pub use pipeline::{TailorOptions, TailoredApplication, TailoringPipeline};
