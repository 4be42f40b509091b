//! Input processing module
//! Handles posting file detection, text extraction and loading

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::{InputManager, PostingOverrides};
