use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Declared document formats the extractor understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Text,
    Pdf,
    Word,
    Spreadsheet,
    Csv,
    Unsupported,
}

impl DocumentFormat {
    /// Map a filename's extension (case-insensitive) to a format.
    pub fn from_filename(filename: &str) -> Self {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Self::Unsupported,
        };
        match ext.as_str() {
            "txt" => Self::Text,
            "pdf" => Self::Pdf,
            "docx" => Self::Word,
            "xlsx" => Self::Spreadsheet,
            "csv" => Self::Csv,
            _ => Self::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Spreadsheet => "spreadsheet",
            Self::Csv => "csv",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// An uploaded document, consumed once by the extractor.
#[derive(Debug, Clone)]
pub struct Document {
    /// Original (sanitized) filename.
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl Document {
    /// Build a document whose format is inferred from the filename.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let format = DocumentFormat::from_filename(&filename);
        Self {
            filename,
            format,
            bytes,
        }
    }

    pub fn with_format(filename: impl Into<String>, format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            format,
            bytes,
        }
    }
}

/// Outcome of extraction: always carries usable text.
///
/// `Degraded` holds the explanatory text that flows downstream in place of
/// the document content, plus the typed cause for callers that want it.
#[derive(Debug)]
pub enum Extraction {
    Text(String),
    Degraded { text: String, cause: ExtractionError },
}

impl Extraction {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Degraded { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Strict view: degraded outcomes become errors.
    pub fn into_result(self) -> Result<String, ExtractionError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Degraded { cause, .. } => Err(cause),
        }
    }
}
