pub mod extraction;
pub mod profile;
pub mod reduce;
pub mod prompt;
pub mod model_select;
pub mod ollama;
pub mod formatter;
pub mod processor; // Document analysis orchestrator

pub use processor::{AnalysisReport, DocumentAnalyzer, PipelineError};
