//! Document analysis orchestrator.
//!
//! Drives one request through the whole pipeline:
//! extract → profile → reduce → prompt → select model → generate → format.
//!
//! Synchronous and stateless across requests. The inference client is
//! injected so the orchestrator stays testable with `MockLlmClient`.

use std::time::Instant;

use serde::Serialize;

use crate::config::{AppConfig, ExtractionMode};
use crate::pipeline::extraction::{extract, Document, ExtractionError};
use crate::pipeline::formatter::{format_result, Timings};
use crate::pipeline::model_select::{resolve_model, ModelChoice};
use crate::pipeline::ollama::LlmClient;
use crate::pipeline::profile::{profile, TextStats};
use crate::pipeline::prompt::build_prompt;
use crate::pipeline::reduce::reduce;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures that stop a request before inference.
///
/// Inference failures are not in here: they become the answer text.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Please provide an analysis prompt")]
    EmptyInstruction,

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything produced by one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub prompt: String,
    pub model: ModelChoice,
    /// Formatted result shown to the user (timings, stats, answer).
    pub analysis: String,
    /// Raw model answer, or the inference error text.
    pub answer: String,
    pub stats: TextStats,
    pub timings: Timings,
    pub extraction_degraded: bool,
    pub inference_failed: bool,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct DocumentAnalyzer<'a> {
    config: &'a AppConfig,
    client: &'a dyn LlmClient,
}

impl<'a> DocumentAnalyzer<'a> {
    pub fn new(config: &'a AppConfig, client: &'a dyn LlmClient) -> Self {
        Self { config, client }
    }

    /// Run the full pipeline on one document.
    ///
    /// In absorbing mode only an empty instruction is an error; extraction
    /// failures become the analyzed text and inference failures become the
    /// answer. Strict mode also rejects degraded extraction.
    pub fn analyze(
        &self,
        document: &Document,
        instruction: &str,
    ) -> Result<AnalysisReport, PipelineError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(PipelineError::EmptyInstruction);
        }

        let started = Instant::now();

        let extraction = extract(document);
        let extraction_degraded = extraction.is_degraded();
        let text = match self.config.extraction_mode {
            ExtractionMode::Strict => extraction.into_result()?,
            ExtractionMode::Absorbing => extraction.into_text(),
        };
        let extraction_time = started.elapsed();

        let stats = profile(&text);
        let excerpt = reduce(&text, self.config.max_excerpt_chars);
        let request = build_prompt(&excerpt, &stats, instruction);

        let model = resolve_model(
            self.client,
            &self.config.model_preferences,
            &self.config.default_model,
        );

        let inference_started = Instant::now();
        let (answer, inference_failed) =
            match self
                .client
                .generate(&model.name, &request.prompt, &self.config.generation)
            {
                Ok(answer) => (answer, false),
                Err(e) => {
                    tracing::warn!(model = %model.name, error = %e, "Inference failed");
                    (e.to_string(), true)
                }
            };

        let timings = Timings {
            extraction: extraction_time,
            inference: inference_started.elapsed(),
            total: started.elapsed(),
        };

        tracing::info!(
            filename = %document.filename,
            format = document.format.as_str(),
            model = %model.name,
            excerpt_chars = excerpt.chars().count(),
            extraction_ms = timings.extraction.as_millis() as u64,
            inference_ms = timings.inference.as_millis() as u64,
            extraction_degraded,
            inference_failed,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            filename: document.filename.clone(),
            prompt: instruction.to_string(),
            analysis: format_result(&stats, &answer, &timings),
            model,
            answer,
            stats,
            timings,
            extraction_degraded,
            inference_failed,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
