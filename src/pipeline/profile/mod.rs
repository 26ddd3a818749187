//! Text profiler: cheap statistics over extracted text.

pub mod language_detect;
pub mod readability;

use serde::{Deserialize, Serialize};

pub use language_detect::detect_language;
pub use readability::flesch_reading_ease;

/// Sentinel language when detection has nothing to go on.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Statistics derived deterministically from extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub word_count: usize,
    /// Length in Unicode scalar values.
    pub char_count: usize,
    /// Flesch reading ease; 0 when it cannot be computed.
    pub reading_level: f64,
    /// ISO 639-1 code or `"unknown"`.
    pub language: String,
}

impl Default for TextStats {
    fn default() -> Self {
        Self {
            word_count: 0,
            char_count: 0,
            reading_level: 0.0,
            language: UNKNOWN_LANGUAGE.to_string(),
        }
    }
}

/// Profile `text`. Infallible: components that cannot be computed fall back
/// to 0 / `"unknown"`.
pub fn profile(text: &str) -> TextStats {
    let stats = TextStats {
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        reading_level: flesch_reading_ease(text).unwrap_or(0.0),
        language: detect_language(text)
            .unwrap_or(UNKNOWN_LANGUAGE)
            .to_string(),
    };

    tracing::debug!(
        word_count = stats.word_count,
        char_count = stats.char_count,
        reading_level = stats.reading_level,
        language = %stats.language,
        "Text profiled"
    );
    stats
}
