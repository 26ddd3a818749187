pub mod api; // HTTP front end
pub mod benchmark; // Model benchmark / preference writer
pub mod cli;
pub mod config;
pub mod pipeline;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::benchmark::{BenchmarkError, BenchmarkOptions, BenchmarkReport};
use crate::cli::{Cli, Command};
use crate::config::{AppConfig, ConfigError};
use crate::pipeline::extraction::Document;
use crate::pipeline::ollama::{InferenceError, OllamaClient};
use crate::pipeline::{DocumentAnalyzer, PipelineError};

/// Top-level failure of a CLI invocation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),
}

pub fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    cli.apply_overrides(&mut config)?;

    match cli.into_command() {
        Command::Serve { .. } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(Arc::new(config)))?;
        }
        Command::Analyze { file, prompt } => {
            let bytes = std::fs::read(&file).map_err(|source| AppError::ReadInput {
                path: file.clone(),
                source,
            })?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            let client = OllamaClient::from_config(&config)?;
            let report = DocumentAnalyzer::new(&config, &client)
                .analyze(&Document::new(filename, bytes), &prompt)?;

            println!("File: {}", report.filename);
            println!("Prompt: {}", report.prompt);
            println!("Model: {}", report.model.name);
            println!();
            println!("{}", report.analysis);
        }
        Command::Benchmark { skip_install } => {
            let client = OllamaClient::from_config(&config)?
                .with_generate_timeout(benchmark::BENCHMARK_TIMEOUT);
            let report = benchmark::run_benchmark(
                &client,
                BenchmarkOptions { skip_install },
                &config::preferences_path(),
            )?;
            print_benchmark(&report);
        }
    }

    Ok(())
}

fn print_benchmark(report: &BenchmarkReport) {
    println!("Installed models: {}", report.installed.join(", "));
    if report.missing.is_empty() {
        println!("All recommended fast models are installed");
    } else {
        println!("Missing fast models: {}", report.missing.join(", "));
    }
    for model in &report.pulled {
        println!("Installed {model}");
    }
    for (model, error) in &report.failed_pulls {
        println!("Failed to install {model}: {error}");
    }
    for (model, error) in &report.failures {
        println!("{model}: {error}");
    }

    println!();
    println!("Results (fastest first):");
    for result in &report.results {
        println!("  {}: {:.2}s", result.model, result.duration.as_secs_f64());
    }

    match (&report.fastest, &report.preferences_path) {
        (Some(model), Some(path)) => {
            println!();
            println!("Fastest model: {model}");
            println!("Preferences written to {}", path.display());
        }
        _ => println!("No fast model responded; preferences unchanged."),
    }
}
