//! Application configuration.
//!
//! Everything the upload front end and the analysis pipeline need is carried in
//! an explicit `AppConfig` passed into the entry points. Values are layered:
//! built-in defaults, then the model preferences file written by the
//! benchmark, then `DOCSIFT_*` environment variables, then CLI flags.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::ollama::GenerationOptions;

/// Application-level constants
pub const APP_NAME: &str = "DocSift";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "docsift_lib=info,docsift=info,tower_http=info"
}

/// Fast models tried first, most preferred first.
pub const DEFAULT_MODEL_PREFERENCES: &[&str] =
    &["llama3.2:1b", "phi3:mini", "qwen2:0.5b", "llama2"];

/// Model used when none of the preferences is installed.
pub const DEFAULT_MODEL_FALLBACK: &str = "llama2";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx", "xlsx", "csv"];

const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024; // 16MB

const PREFERENCES_FILE: &str = "model_preferences.json";

/// Get the application data directory
/// ~/DocSift/ when a home directory exists, ./DocSift otherwise.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Location of the benchmark-maintained model preference list.
pub fn preferences_path() -> PathBuf {
    app_data_dir().join(PREFERENCES_FILE)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Only localhost Ollama endpoints are allowed, got '{0}'")]
    NonLocalEndpoint(String),

    #[error("Cannot read preferences file {path}: {source}")]
    PreferencesRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed preferences file {path}: {source}")]
    PreferencesParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// How extraction and profiling failures are surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Failures become descriptive text and the pipeline continues.
    #[default]
    Absorbing,
    /// Failures abort the request with a structured error.
    Strict,
}

/// Persisted model preference list (written by `docsift benchmark`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPreferencesFile {
    pub preferred: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Explicit configuration handed to the server and the pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub max_content_length: usize,
    pub ollama_url: String,
    pub tags_timeout_secs: u64,
    pub generate_timeout_secs: u64,
    pub max_excerpt_chars: usize,
    pub model_preferences: Vec<String>,
    pub default_model: String,
    pub generation: GenerationOptions,
    pub extraction_mode: ExtractionMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            upload_dir: PathBuf::from("uploads"),
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_content_length: MAX_CONTENT_LENGTH,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            tags_timeout_secs: 5,
            generate_timeout_secs: 120,
            max_excerpt_chars: 2000,
            model_preferences: DEFAULT_MODEL_PREFERENCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_model: DEFAULT_MODEL_FALLBACK.to_string(),
            generation: GenerationOptions::default(),
            extraction_mode: ExtractionMode::Absorbing,
        }
    }
}

impl AppConfig {
    /// Defaults, then the preferences file (if present), then environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_preferences_file(&preferences_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Prepend the benchmarked preference list, keeping built-in defaults
    /// as later fallbacks.
    pub fn apply_preferences_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PreferencesRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ModelPreferencesFile =
            serde_json::from_str(&raw).map_err(|source| ConfigError::PreferencesParse {
                path: path.to_path_buf(),
                source,
            })?;

        self.model_preferences = merge_preferences(&file.preferred, &self.model_preferences);
        tracing::debug!(
            path = %path.display(),
            count = self.model_preferences.len(),
            "Loaded model preferences"
        );
        Ok(())
    }

    /// Apply `DOCSIFT_*` overrides. `lookup` is injected so tests do not
    /// touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DOCSIFT_BIND") {
            self.bind_addr = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "DOCSIFT_BIND",
                value,
            })?;
        }
        if let Some(value) = lookup("DOCSIFT_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("DOCSIFT_OLLAMA_URL") {
            self.ollama_url = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("DOCSIFT_MAX_CHARS") {
            self.max_excerpt_chars = parse_positive("DOCSIFT_MAX_CHARS", value)?;
        }
        if let Some(value) = lookup("DOCSIFT_GENERATE_TIMEOUT") {
            self.generate_timeout_secs = parse_positive("DOCSIFT_GENERATE_TIMEOUT", value)? as u64;
        }
        if let Some(value) = lookup("DOCSIFT_DEFAULT_MODEL") {
            self.default_model = value;
        }
        if let Some(value) = lookup("DOCSIFT_STRICT") {
            self.extraction_mode = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => ExtractionMode::Strict,
                "0" | "false" | "no" => ExtractionMode::Absorbing,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "DOCSIFT_STRICT",
                        value,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_local_url(&self.ollama_url)
    }

    pub fn tags_timeout(&self) -> Duration {
        Duration::from_secs(self.tags_timeout_secs)
    }

    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs)
    }

    /// Case-insensitive check against the allowed extension list.
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }
}

/// `first` in order, followed by entries of `rest` not already present.
pub fn merge_preferences(first: &[String], rest: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(first.len() + rest.len());
    for name in first.iter().chain(rest) {
        if !merged.contains(name) {
            merged.push(name.clone());
        }
    }
    merged
}

fn parse_positive(key: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

/// Document text must never leave the machine: accept loopback hosts only.
pub fn validate_local_url(url: &str) -> Result<(), ConfigError> {
    let after_scheme = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "ollama_url",
            value: url.to_string(),
        })?;

    let host = if let Some(rest) = after_scheme.strip_prefix('[') {
        rest.split(']').next().unwrap_or("")
    } else {
        after_scheme
            .split(['/', ':'])
            .next()
            .unwrap_or("")
    };

    match host {
        "localhost" | "127.0.0.1" | "::1" => Ok(()),
        _ => Err(ConfigError::NonLocalEndpoint(url.to_string())),
    }
}
