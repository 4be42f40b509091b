//! Report structures and output formatters

pub mod formatter;
pub mod report;

pub use formatter::{render_resume_markdown, ReportGenerator};
pub use report::TailoringReport;
