//! Model benchmark.
//!
//! Installs the recommended small models if missing, times each installed
//! fast model on a fixed prompt, and writes the fastest one to the front of
//! the model preference file read by `AppConfig::load`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{merge_preferences, ModelPreferencesFile, DEFAULT_MODEL_PREFERENCES};
use crate::pipeline::ollama::{GenerationOptions, InferenceError, LlmClient};

/// Small models worth having for quick document analysis.
pub const RECOMMENDED_FAST_MODELS: &[&str] = &["llama3.2:1b", "phi3:mini", "qwen2:0.5b"];

/// Installed models whose name contains one of these are benchmarked.
const FAST_MODEL_MARKERS: &[&str] = &["1b", "mini", "0.5b", "llama3.2"];

pub const BENCHMARK_PROMPT: &str = "Summarize this text in one sentence: This is a sample \
     document about artificial intelligence and machine learning applications.";

const BENCHMARK_MAX_TOKENS: u32 = 100;

/// Per-model generation budget while benchmarking.
pub const BENCHMARK_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for a single `ollama pull`.
pub const PULL_TIMEOUT: Duration = Duration::from_secs(300);

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error("Please start Ollama first: ollama serve ({0})")]
    OllamaUnavailable(#[source] InferenceError),

    #[error("Cannot write preferences file {path}: {source}")]
    WritePreferences {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BenchmarkOptions {
    /// Do not pull missing recommended models.
    pub skip_install: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub model: String,
    pub duration: Duration,
}

/// What a benchmark run did, for display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchmarkReport {
    pub installed: Vec<String>,
    pub missing: Vec<String>,
    pub pulled: Vec<String>,
    /// (model, error text)
    pub failed_pulls: Vec<(String, String)>,
    /// Successful runs, fastest first.
    pub results: Vec<BenchmarkResult>,
    /// (model, error text)
    pub failures: Vec<(String, String)>,
    pub fastest: Option<String>,
    pub preferences_path: Option<PathBuf>,
}

// ═══════════════════════════════════════════════════════════
// Steps
// ═══════════════════════════════════════════════════════════

/// Recommended models not present in `installed`.
pub fn missing_models(installed: &[String]) -> Vec<String> {
    RECOMMENDED_FAST_MODELS
        .iter()
        .filter(|m| !installed.iter().any(|i| i == *m))
        .map(|m| m.to_string())
        .collect()
}

pub fn is_fast_model(name: &str) -> bool {
    FAST_MODEL_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Time one generation per fast model. Failed models are reported and
/// skipped. Results come back fastest first.
pub fn benchmark_models(
    client: &dyn LlmClient,
    models: &[String],
) -> (Vec<BenchmarkResult>, Vec<(String, String)>) {
    let options = GenerationOptions {
        max_tokens: BENCHMARK_MAX_TOKENS,
        ..GenerationOptions::default()
    };

    let mut results = Vec::new();
    let mut failures = Vec::new();

    for model in models.iter().filter(|m| is_fast_model(m)) {
        tracing::info!(model = %model, "Benchmarking model");
        let started = Instant::now();
        match client.generate(model, BENCHMARK_PROMPT, &options) {
            Ok(_) => {
                let duration = started.elapsed();
                tracing::info!(model = %model, elapsed_ms = duration.as_millis() as u64, "Benchmark run complete");
                results.push(BenchmarkResult {
                    model: model.clone(),
                    duration,
                });
            }
            Err(e) => {
                tracing::warn!(model = %model, error = %e, "Benchmark run failed");
                failures.push((model.clone(), e.to_string()));
            }
        }
    }

    rank(&mut results);
    (results, failures)
}

/// Sort ascending by duration; ties keep their original order.
pub fn rank(results: &mut [BenchmarkResult]) {
    results.sort_by_key(|r| r.duration);
}

/// Write `fastest` first, then the built-in defaults, deduplicated.
pub fn write_preferences(path: &Path, fastest: &str) -> Result<ModelPreferencesFile, BenchmarkError> {
    let defaults: Vec<String> = DEFAULT_MODEL_PREFERENCES
        .iter()
        .map(|s| s.to_string())
        .collect();
    let file = ModelPreferencesFile {
        preferred: merge_preferences(&[fastest.to_string()], &defaults),
        updated_at: Some(chrono::Utc::now().to_rfc3339()),
    };

    let write_err = |source| BenchmarkError::WritePreferences {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json).map_err(write_err)?;

    tracing::info!(path = %path.display(), model = %fastest, "Model preferences updated");
    Ok(file)
}

/// Full run: reachability check, install, benchmark, persist.
pub fn run_benchmark(
    client: &dyn LlmClient,
    options: BenchmarkOptions,
    preferences_path: &Path,
) -> Result<BenchmarkReport, BenchmarkError> {
    let mut report = BenchmarkReport {
        installed: client
            .list_models()
            .map_err(BenchmarkError::OllamaUnavailable)?,
        ..BenchmarkReport::default()
    };
    report.missing = missing_models(&report.installed);

    if !report.missing.is_empty() && !options.skip_install {
        for model in &report.missing {
            tracing::info!(model = %model, "Pulling model");
            match client.pull_model(model, PULL_TIMEOUT) {
                Ok(()) => report.pulled.push(model.clone()),
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Model pull failed");
                    report.failed_pulls.push((model.clone(), e.to_string()));
                }
            }
        }
        if !report.pulled.is_empty() {
            match client.list_models() {
                Ok(models) => report.installed = models,
                Err(e) => tracing::warn!(error = %e, "Could not refresh model list after pulls"),
            }
        }
    }

    let (results, failures) = benchmark_models(client, &report.installed);
    report.results = results;
    report.failures = failures;
    report.fastest = report.results.first().map(|r| r.model.clone());

    if let Some(fastest) = &report.fastest {
        write_preferences(preferences_path, fastest)?;
        report.preferences_path = Some(preferences_path.to_path_buf());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::pipeline::ollama::MockLlmClient;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_models_lists_absent_recommendations() {
        let installed = names(&["phi3:mini", "llama2:latest"]);
        assert_eq!(missing_models(&installed), names(&["llama3.2:1b", "qwen2:0.5b"]));
        assert!(missing_models(&names(RECOMMENDED_FAST_MODELS)).is_empty());
    }

    #[test]
    fn fast_model_markers() {
        assert!(is_fast_model("llama3.2:1b"));
        assert!(is_fast_model("llama3.2:3b"));
        assert!(is_fast_model("phi3:mini"));
        assert!(is_fast_model("qwen2:0.5b"));
        assert!(!is_fast_model("llama2:latest"));
        assert!(!is_fast_model("mistral:7b"));
    }

    #[test]
    fn rank_sorts_fastest_first() {
        let mut results = vec![
            BenchmarkResult { model: "a".into(), duration: Duration::from_millis(900) },
            BenchmarkResult { model: "b".into(), duration: Duration::from_millis(200) },
            BenchmarkResult { model: "c".into(), duration: Duration::from_millis(500) },
        ];
        rank(&mut results);
        let order: Vec<&str> = results.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn benchmark_skips_slow_families_and_failures() {
        let client = MockLlmClient::new("One sentence.").with_failing_model("phi3:mini");
        let models = names(&["llama3.2:1b", "phi3:mini", "mistral:7b", "qwen2:0.5b"]);

        let (results, failures) = benchmark_models(&client, &models);

        let benchmarked: Vec<&str> = results.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(benchmarked.len(), 2);
        assert!(benchmarked.contains(&"llama3.2:1b"));
        assert!(benchmarked.contains(&"qwen2:0.5b"));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "phi3:mini");

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|(_, p)| p == BENCHMARK_PROMPT));
    }

    #[test]
    fn write_preferences_puts_fastest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("model_preferences.json");

        let file = write_preferences(&path, "qwen2:0.5b").unwrap();
        assert_eq!(
            file.preferred,
            names(&["qwen2:0.5b", "llama3.2:1b", "phi3:mini", "llama2"])
        );
        assert!(file.updated_at.is_some());

        let mut config = AppConfig::default();
        config.apply_preferences_file(&path).unwrap();
        assert_eq!(config.model_preferences[0], "qwen2:0.5b");
    }

    #[test]
    fn run_pulls_missing_models_then_writes_preferences() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model_preferences.json");
        let client = MockLlmClient::new("ok").with_models(names(&["phi3:mini"]));

        let report = run_benchmark(&client, BenchmarkOptions::default(), &path).unwrap();

        assert_eq!(client.pulls(), names(&["llama3.2:1b", "qwen2:0.5b"]));
        assert_eq!(report.pulled.len(), 2);
        assert_eq!(report.fastest.as_deref(), Some("phi3:mini"));
        assert!(path.exists());
    }

    #[test]
    fn run_with_skip_install_does_not_pull() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model_preferences.json");
        let client = MockLlmClient::new("ok").with_models(names(&["llama2:latest"]));

        let report = run_benchmark(&client, BenchmarkOptions { skip_install: true }, &path).unwrap();

        assert!(client.pulls().is_empty());
        assert_eq!(report.missing.len(), 3);
        assert!(report.results.is_empty());
        assert!(report.fastest.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn run_requires_reachable_server() {
        let tmp = tempfile::tempdir().unwrap();
        let client = MockLlmClient::new("ok").without_tags();

        let err = run_benchmark(&client, BenchmarkOptions::default(), &tmp.path().join("p.json"))
            .unwrap_err();
        assert!(matches!(err, BenchmarkError::OllamaUnavailable(_)));
        assert!(err.to_string().starts_with("Please start Ollama first: ollama serve"));
    }
}
