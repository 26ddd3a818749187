//! Inference client for a local Ollama server.
//!
//! One synchronous request per analysis, bounded by a timeout, no retries.
//! Every failure maps to an `InferenceError` whose `Display` text is shown to
//! the end user verbatim, so messages are complete sentences with guidance.

pub mod client;
pub mod types;

pub use client::*;
pub use types::*;

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Error: Could not connect to Ollama at {0}. Make sure Ollama is running (start it with `ollama serve`).")]
    NotReachable(String),

    #[error("Error: The analysis timed out after {0} seconds. Try a smaller document or a simpler prompt.")]
    Timeout(u64),

    #[error("Error: Ollama API returned status {status}")]
    ServerError { status: u16, body: String },

    #[error("Error analyzing content: {0}")]
    Request(String),

    #[error("Error analyzing content: malformed Ollama response ({0})")]
    ResponseParsing(String),

    #[error("Error: could not create HTTP client: {0}")]
    ClientBuild(String),
}

impl InferenceError {
    /// Classify a transport error. Timeouts are checked first: a connect
    /// timeout reports both flags.
    pub(crate) fn from_transport(err: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_connect() {
            Self::NotReachable(base_url.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Inference server abstraction (allows mocking).
pub trait LlmClient {
    /// Single non-streamed generation.
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError>;

    /// Names of the installed models.
    fn list_models(&self) -> Result<Vec<String>, InferenceError>;

    /// Download a model. Blocks until the pull finishes or `timeout` elapses.
    fn pull_model(&self, name: &str, timeout: Duration) -> Result<(), InferenceError>;

    fn is_reachable(&self) -> bool {
        self.list_models().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_message_mentions_starting_server() {
        let msg = InferenceError::NotReachable("http://localhost:11434".into()).to_string();
        assert!(msg.contains("Could not connect to Ollama"));
        assert!(msg.contains("ollama serve"));
        assert!(msg.contains("http://localhost:11434"));
    }

    #[test]
    fn timeout_message_suggests_smaller_document() {
        let msg = InferenceError::Timeout(120).to_string();
        assert!(msg.contains("120 seconds"));
        assert!(msg.contains("smaller document"));
    }

    #[test]
    fn server_error_carries_status() {
        let msg = InferenceError::ServerError {
            status: 404,
            body: "model not found".into(),
        }
        .to_string();
        assert_eq!(msg, "Error: Ollama API returned status 404");
    }
}
