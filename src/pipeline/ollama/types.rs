//! Ollama HTTP API contract: request/response bodies and generation options.

use serde::{Deserialize, Serialize};

/// Substituted when the server answers OK but without a `response` field.
pub const NO_RESPONSE_SENTINEL: &str = "No response received";

/// Generation parameters for Ollama `/api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature. Lower = more deterministic.
    pub temperature: f32,
    /// Top-p (nucleus) sampling threshold.
    pub top_p: f32,
    /// Maximum tokens in the generated response.
    pub max_tokens: u32,
    /// Generation stops at the first of these sequences.
    #[serde(default)]
    pub stop: Vec<String>,
}

impl Default for GenerationOptions {
    /// Short, focused answers so small local models respond quickly.
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            max_tokens: 500,
            stop: vec!["\n\n\n".to_string()],
        }
    }
}

/// Request body for Ollama `/api/generate`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: &'a GenerationOptions,
}

/// Response body from Ollama `/api/generate`.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

/// Raw response from GET `/api/tags`.
#[derive(Debug, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagModel {
    pub name: String,
}

/// Request body for POST `/api/pull`.
#[derive(Debug, Serialize)]
pub(crate) struct PullRequest<'a> {
    pub name: &'a str,
    pub stream: bool,
}

/// Final status object of a non-streamed pull.
#[derive(Debug, Deserialize)]
pub(crate) struct PullResponse {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_wire_format() {
        let options = GenerationOptions::default();
        let body = GenerateRequest {
            model: "llama3.2:1b",
            prompt: "Summarize",
            stream: false,
            options: &options,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "llama3.2:1b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["max_tokens"], 500);
        assert_eq!(json["options"]["stop"][0], "\n\n\n");
        assert!(json["options"]["top_p"].as_f64().unwrap() > 0.89);
    }

    #[test]
    fn generate_response_tolerates_missing_field() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.response.is_none());

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"response": "Fine.", "done": true}"#).unwrap();
        assert_eq!(parsed.response.as_deref(), Some("Fine."));
    }

    #[test]
    fn tags_response_extracts_names() {
        let raw = r#"{"models":[{"name":"llama2:latest","size":1},{"name":"phi3:mini"}]}"#;
        let parsed: TagsResponse = serde_json::from_str(raw).unwrap();
        let names: Vec<_> = parsed.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["llama2:latest", "phi3:mini"]);
    }
}
