use serde::Serialize;

use super::profile::TextStats;

/// One assembled inference request: excerpt, stats and instruction, plus the
/// rendered prompt sent to the model.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub instruction: String,
    pub excerpt: String,
    pub stats: TextStats,
    pub prompt: String,
}

/// Build the analysis prompt for one document.
///
/// Field order is fixed and every field is rendered, sentinel values included.
pub fn build_prompt(excerpt: &str, stats: &TextStats, instruction: &str) -> AnalysisRequest {
    let prompt = format!(
        r#"Document metadata:
- Word count: {words}
- Language: {language}
- Reading level: {reading:.1}

Request: {instruction}

<document>
{excerpt}
</document>

Provide a concise analysis focused on the request above."#,
        words = stats.word_count,
        language = stats.language,
        reading = stats.reading_level,
    );

    AnalysisRequest {
        instruction: instruction.to_string(),
        excerpt: excerpt.to_string(),
        stats: stats.clone(),
        prompt,
    }
}
