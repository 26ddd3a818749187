//! Shared state for the HTTP front end.

use std::sync::Arc;

use crate::config::AppConfig;

/// Shared context for all routes. Read-only: requests share no mutable state.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
}

impl ApiContext {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Allowed extensions as shown to users, e.g. "txt, pdf, docx".
    pub fn allowed_types(&self) -> String {
        self.config.allowed_extensions.join(", ")
    }
}
