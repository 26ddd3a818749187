use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::{ExtractionError, MAX_WORD_PARAGRAPHS};

/// Extract paragraph text from a .docx file, in document order.
///
/// Paragraph → Run → Text is the path through the docx-rs tree. Tables,
/// images and section properties are skipped. Only the first
/// `MAX_WORD_PARAGRAPHS` paragraphs are read; empty paragraphs count toward
/// the limit and keep their line so layout survives.
pub fn extract_word_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::WordParsing(e.to_string()))?;

    let mut text = String::new();
    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(para),
            _ => None,
        })
        .take(MAX_WORD_PARAGRAPHS);

    for para in paragraphs {
        text.push_str(&paragraph_text(para));
        text.push('\n');
    }

    Ok(text)
}

/// Runs in a paragraph are parts of the same sentence: no separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut parts = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    parts.push_str(&t.text);
                }
            }
        }
    }
    parts
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rs::{Docx, Run};

    pub(crate) fn make_test_docx(paragraphs: &[String]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text.as_str())));
        }
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn paragraphs_joined_with_newlines() {
        let bytes = make_test_docx(&["First paragraph.".into(), "Second paragraph.".into()]);
        let text = extract_word_text(&bytes).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["First paragraph.", "Second paragraph."]);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn runs_within_paragraph_are_concatenated() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Quarterly "))
                .add_run(Run::new().add_text("report")),
        );
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();

        let text = extract_word_text(&cursor.into_inner()).unwrap();
        assert_eq!(text.trim_end(), "Quarterly report");
    }

    #[test]
    fn only_first_fifty_paragraphs_read() {
        let paragraphs: Vec<String> = (1..=60).map(|i| format!("Paragraph {i}")).collect();
        let bytes = make_test_docx(&paragraphs);
        let text = extract_word_text(&bytes).unwrap();

        assert_eq!(text.lines().count(), 50);
        assert!(text.contains("Paragraph 50\n"));
        assert!(!text.contains("Paragraph 51"));
    }

    #[test]
    fn invalid_docx_returns_error() {
        let result = extract_word_text(b"PK\x03\x04 definitely not a zip");
        assert!(matches!(result, Err(ExtractionError::WordParsing(_))));
    }
}
