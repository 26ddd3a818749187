//! Command-line interface.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{validate_local_url, AppConfig, ConfigError, ExtractionMode};

#[derive(Parser, Debug)]
#[command(
    name = "docsift",
    version,
    about = "Analyze documents with a local Ollama model."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Ollama base URL (loopback only).
    #[arg(long, global = true)]
    pub ollama_url: Option<String>,

    /// Fail on unreadable documents instead of analyzing the error text.
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the upload web server (default).
    Serve {
        /// Address to listen on.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Analyze one file and print the result.
    Analyze {
        file: PathBuf,
        /// What the analysis should focus on.
        #[arg(short, long)]
        prompt: String,
    },
    /// Benchmark small models and store the fastest as preferred.
    Benchmark {
        /// Do not pull missing recommended models.
        #[arg(long)]
        skip_install: bool,
    },
}

impl Cli {
    /// CLI flags are the last configuration layer.
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(url) = &self.ollama_url {
            validate_local_url(url)?;
            config.ollama_url = url.trim_end_matches('/').to_string();
        }
        if self.strict {
            config.extraction_mode = ExtractionMode::Strict;
        }
        if let Some(Command::Serve { bind: Some(addr) }) = &self.command {
            config.bind_addr = *addr;
        }
        Ok(())
    }

    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve { bind: None })
    }
}
