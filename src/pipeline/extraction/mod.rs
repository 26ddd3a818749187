pub mod types;
pub mod plain;
pub mod pdf;
pub mod word;
pub mod table;
pub mod orchestrator;

pub use types::*;
pub use orchestrator::*;

use thiserror::Error;

/// Per-format extraction limits.
pub const MAX_PDF_PAGES: usize = 10;
pub const MAX_WORD_PARAGRAPHS: usize = 50;
pub const MAX_TABLE_ROWS: usize = 1000;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Word document parsing failed: {0}")]
    WordParsing(String),

    #[error("Spreadsheet parsing failed: {0}")]
    SpreadsheetParsing(String),

    #[error("CSV parsing failed: {0}")]
    CsvParsing(String),

    #[error("{format} parser crashed: {message}")]
    ParserPanic { format: &'static str, message: String },

    #[error("Document contains no worksheet")]
    EmptyWorkbook,

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
