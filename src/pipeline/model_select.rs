//! Model selection: first preferred model that is installed, else a fixed
//! default.

use serde::{Deserialize, Serialize};

use super::ollama::LlmClient;

/// Why a model was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// Found in the preference list and installed.
    Preferred,
    /// No preference matched, or the installed set was unknown.
    Fallback,
}

impl std::fmt::Display for SelectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preferred => write!(f, "preferred"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelChoice {
    pub name: String,
    pub source: SelectionSource,
}

/// Pick the first entry of `preferences` present in `installed`.
///
/// `installed = None` means the set could not be determined: no filtering,
/// straight to `default_model`.
pub fn select_model(
    preferences: &[String],
    installed: Option<&[String]>,
    default_model: &str,
) -> ModelChoice {
    if let Some(installed) = installed {
        for candidate in preferences {
            if installed.iter().any(|m| is_same_model(candidate, m)) {
                return ModelChoice {
                    name: candidate.clone(),
                    source: SelectionSource::Preferred,
                };
            }
        }
    }

    ModelChoice {
        name: default_model.to_string(),
        source: SelectionSource::Fallback,
    }
}

/// Query the server once for installed models, then select. Fails open.
pub fn resolve_model(
    client: &dyn LlmClient,
    preferences: &[String],
    default_model: &str,
) -> ModelChoice {
    let installed = match client.list_models() {
        Ok(models) => Some(models),
        Err(e) => {
            tracing::warn!(error = %e, "Could not list installed models, using default");
            None
        }
    };

    let choice = select_model(preferences, installed.as_deref(), default_model);
    tracing::info!(model = %choice.name, source = %choice.source, "Model selected");
    choice
}

/// Exact match, or `name` without a tag against `name:latest`.
fn is_same_model(candidate: &str, installed: &str) -> bool {
    if candidate == installed {
        return true;
    }
    !candidate.contains(':')
        && installed
            .strip_prefix(candidate)
            .is_some_and(|rest| rest == ":latest")
}
