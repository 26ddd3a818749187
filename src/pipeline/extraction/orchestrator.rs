//! Extraction entry point: dispatch on the declared format.
//!
//! Failures never abort the pipeline. A failed parse becomes
//! `Extraction::Degraded` whose text ("Error reading file: ...") is analyzed
//! downstream like any other content; callers that need a hard failure use
//! `Extraction::into_result`.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use super::pdf::extract_pdf_text;
use super::plain::extract_plain_text;
use super::table::{read_csv, read_spreadsheet};
use super::types::{Document, DocumentFormat, Extraction};
use super::word::extract_word_text;
use super::ExtractionError;

pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type";

/// Extract text from a document. Always returns usable text.
pub fn extract(document: &Document) -> Extraction {
    let bytes = &document.bytes;
    let result = match document.format {
        DocumentFormat::Text => extract_plain_text(bytes),
        DocumentFormat::Pdf => guard_parser("PDF", || extract_pdf_text(bytes)),
        DocumentFormat::Word => guard_parser("Word", || extract_word_text(bytes)),
        DocumentFormat::Spreadsheet => {
            guard_parser("Spreadsheet", || read_spreadsheet(bytes).map(|t| t.summary()))
        }
        DocumentFormat::Csv => guard_parser("CSV", || read_csv(bytes).map(|t| t.summary())),
        DocumentFormat::Unsupported => {
            return Extraction::Degraded {
                text: UNSUPPORTED_FILE_TYPE.to_string(),
                cause: ExtractionError::UnsupportedFormat,
            };
        }
    };

    match result {
        Ok(text) => {
            tracing::info!(
                filename = %document.filename,
                format = document.format.as_str(),
                text_length = text.len(),
                "Extraction complete"
            );
            Extraction::Text(text)
        }
        Err(cause) => {
            tracing::warn!(
                filename = %document.filename,
                format = document.format.as_str(),
                error = %cause,
                "Extraction degraded"
            );
            Extraction::Degraded {
                text: format!("Error reading file: {cause}"),
                cause,
            }
        }
    }
}

/// Run a third-party parser, turning a panic on malformed input into an
/// ordinary extraction error.
fn guard_parser<F>(format: &'static str, parse: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError>,
{
    catch_unwind(AssertUnwindSafe(parse)).unwrap_or_else(|payload| {
        Err(ExtractionError::ParserPanic {
            format,
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::pdf::tests::make_test_pdf;
    use crate::pipeline::extraction::word::tests::make_test_docx;

    #[test]
    fn txt_hello_world_verbatim() {
        let doc = Document::new("greeting.txt", b"Hello world".to_vec());
        let extraction = extract(&doc);
        assert!(!extraction.is_degraded());
        assert_eq!(extraction.text(), "Hello world");
    }

    #[test]
    fn invalid_utf8_degrades_with_error_text() {
        let doc = Document::new("broken.txt", vec![0xC3, 0x28, 0xFF]);
        let extraction = extract(&doc);
        assert!(extraction.is_degraded());
        assert!(extraction.text().starts_with("Error reading file: "));
        assert!(matches!(
            extraction.into_result(),
            Err(ExtractionError::EncodingError(_))
        ));
    }

    #[test]
    fn unsupported_format_literal_text() {
        let doc = Document::new("slides.pptx", b"whatever".to_vec());
        let extraction = extract(&doc);
        assert_eq!(extraction.text(), "Unsupported file type");
        assert!(extraction.is_degraded());
    }

    #[test]
    fn pdf_dispatch() {
        let pdf = make_test_pdf(&["Invoice total due".to_string()]);
        let extraction = extract(&Document::new("invoice.pdf", pdf));
        assert!(!extraction.is_degraded());
        assert!(extraction.text().contains("Invoice"));
    }

    #[test]
    fn corrupt_pdf_degrades() {
        let extraction = extract(&Document::new("bad.pdf", b"%PDF-1.4 garbage".to_vec()));
        assert!(extraction.is_degraded());
        assert!(extraction.text().starts_with("Error reading file: PDF parsing failed"));
    }

    #[test]
    fn parser_panic_becomes_error() {
        let result = guard_parser("Word", || panic!("called `Result::unwrap()` on an `Err` value"));
        match result {
            Err(ExtractionError::ParserPanic { format, message }) => {
                assert_eq!(format, "Word");
                assert!(message.contains("unwrap"));
            }
            other => panic!("expected ParserPanic, got {other:?}"),
        }

        let formatted = guard_parser("PDF", || panic!("bad xref at {}", 42));
        assert!(matches!(
            formatted,
            Err(ExtractionError::ParserPanic { message, .. }) if message == "bad xref at 42"
        ));
    }

    #[test]
    fn parser_success_passes_through() {
        let result = guard_parser("CSV", || Ok("table".to_string()));
        assert_eq!(result.unwrap(), "table");
    }

    /// Flip bytes inside the `word/document.xml` zip entry so its CRC no
    /// longer matches.
    fn corrupt_docx_body(mut bytes: Vec<u8>) -> Vec<u8> {
        let name = b"word/document.xml";
        let header = (0..bytes.len() - 30)
            .find(|&at| {
                bytes[at..at + 4] == *b"PK\x03\x04"
                    && u16::from_le_bytes([bytes[at + 26], bytes[at + 27]]) as usize == name.len()
                    && bytes[at + 30..].starts_with(name)
            })
            .expect("document.xml local header");
        let extra_len = u16::from_le_bytes([bytes[header + 28], bytes[header + 29]]) as usize;
        let data_start = header + 30 + name.len() + extra_len;
        for b in &mut bytes[data_start + 8..data_start + 24] {
            *b ^= 0xA5;
        }
        bytes
    }

    #[test]
    fn corrupt_docx_entry_degrades() {
        let paragraphs: Vec<String> = (0..40)
            .map(|i| format!("Paragraph {i} of the quarterly review covers revenue and costs."))
            .collect();
        let docx = corrupt_docx_body(make_test_docx(&paragraphs));

        let extraction = extract(&Document::new("review.docx", docx));
        assert!(extraction.is_degraded());
        assert!(extraction.text().starts_with("Error reading file:"), "{}", extraction.text());
    }

    #[test]
    fn word_dispatch() {
        let docx = make_test_docx(&["Meeting notes".to_string()]);
        let extraction = extract(&Document::new("notes.docx", docx));
        assert!(extraction.text().contains("Meeting notes"));
    }

    #[test]
    fn csv_dispatch_produces_summary() {
        let doc = Document::new("scores.csv", b"name,score\nada,90\n".to_vec());
        let extraction = extract(&doc);
        assert!(extraction.text().starts_with("Data Summary:\n"));
        assert!(extraction.text().contains("Shape: (1, 2)"));
    }

    #[test]
    fn csv_with_1200_rows_reports_1000() {
        let mut csv = String::from("a,b,c\n");
        for i in 0..1200 {
            csv.push_str(&format!("{i},{},{}\n", i + 1, i * 3));
        }
        let extraction = extract(&Document::new("big.csv", csv.into_bytes()));
        assert!(extraction.text().contains("Shape: (1000, 3)"));
    }

    #[test]
    fn corrupt_spreadsheet_degrades() {
        let extraction = extract(&Document::new("q3.xlsx", b"nope".to_vec()));
        assert!(extraction.is_degraded());
        assert!(extraction.text().starts_with("Error reading file: "));
    }
}
