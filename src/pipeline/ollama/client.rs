use std::time::Duration;

use super::types::{
    GenerateRequest, GenerateResponse, GenerationOptions, PullRequest, PullResponse,
    TagsResponse, NO_RESPONSE_SENTINEL,
};
use super::{InferenceError, LlmClient};
use crate::config::AppConfig;

/// Ollama HTTP client for local LLM inference.
///
/// Blocking by design: the analysis pipeline is synchronous per request and
/// runs on a blocking worker when driven from the HTTP server.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    tags_timeout: Duration,
    generate_timeout: Duration,
}

impl OllamaClient {
    /// Create a client pointing at `base_url` with separate budgets for the
    /// model listing and for generation.
    pub fn new(
        base_url: &str,
        tags_timeout: Duration,
        generate_timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| InferenceError::ClientBuild(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tags_timeout,
            generate_timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, InferenceError> {
        Self::new(
            &config.ollama_url,
            config.tags_timeout(),
            config.generate_timeout(),
        )
    }

    /// Same server, different generation budget (used by the benchmark).
    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options,
        };
        let timeout_secs = self.generate_timeout.as_secs();

        tracing::debug!(model = %model, prompt_len = prompt.len(), "Sending generate request");

        let response = self
            .client
            .post(&url)
            .timeout(self.generate_timeout)
            .json(&body)
            .send()
            .map_err(|e| InferenceError::from_transport(e, &self.base_url, timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model = %model, "Ollama returned an error status");
            return Err(InferenceError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(timeout_secs)
            } else {
                InferenceError::ResponseParsing(e.to_string())
            }
        })?;

        Ok(parsed
            .response
            .unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string()))
    }

    /// POST `/api/pull` (non-streamed).
    fn pull_model(&self, name: &str, timeout: Duration) -> Result<(), InferenceError> {
        let url = format!("{}/api/pull", self.base_url);
        let body = PullRequest {
            name,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(|e| InferenceError::from_transport(e, &self.base_url, timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PullResponse = response
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

        tracing::info!(model = %name, status = %parsed.status, "Model pull finished");
        Ok(())
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.tags_timeout)
            .send()
            .map_err(|e| {
                InferenceError::from_transport(e, &self.base_url, self.tags_timeout.as_secs())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing. Returns a configurable response.
#[cfg(test)]
pub struct MockLlmClient {
    response: String,
    available_models: Option<Vec<String>>,
    failure: Option<fn() -> InferenceError>,
    failing_models: Vec<String>,
    prompts: std::cell::RefCell<Vec<(String, String)>>,
    pulls: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            available_models: Some(vec!["llama2:latest".to_string()]),
            failure: None,
            failing_models: Vec::new(),
            prompts: std::cell::RefCell::new(Vec::new()),
            pulls: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = Some(models);
        self
    }

    /// Model listing fails as if the server were down.
    pub fn without_tags(mut self) -> Self {
        self.available_models = None;
        self
    }

    pub fn failing_with(mut self, failure: fn() -> InferenceError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// `generate` fails with a server error for this model only.
    pub fn with_failing_model(mut self, model: &str) -> Self {
        self.failing_models.push(model.to_string());
        self
    }

    /// (model, prompt) pairs received by `generate`.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.borrow().clone()
    }

    /// Model names passed to `pull_model`, in order.
    pub fn pulls(&self) -> Vec<String> {
        self.pulls.borrow().clone()
    }
}

#[cfg(test)]
impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        self.prompts
            .borrow_mut()
            .push((model.to_string(), prompt.to_string()));
        if self.failing_models.iter().any(|m| m == model) {
            return Err(InferenceError::ServerError {
                status: 404,
                body: format!("model '{model}' not found"),
            });
        }
        match self.failure {
            Some(make_error) => Err(make_error()),
            None => Ok(self.response.clone()),
        }
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        self.available_models
            .clone()
            .ok_or_else(|| InferenceError::NotReachable("mock".to_string()))
    }

    fn pull_model(&self, name: &str, _timeout: Duration) -> Result<(), InferenceError> {
        self.pulls.borrow_mut().push(name.to_string());
        Ok(())
    }
}
