use lopdf::Document as PdfDocument;

use super::{ExtractionError, MAX_PDF_PAGES};

/// Extract the text layer of a digital PDF, one line block per page.
///
/// Only the first `MAX_PDF_PAGES` pages are read. A page whose content
/// stream cannot be decoded contributes an empty block rather than failing
/// the whole document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        PdfDocument::load_mem(bytes).map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    let pages = document.get_pages();
    let total_pages = pages.len();

    let mut text = String::new();
    for page_number in pages.keys().take(MAX_PDF_PAGES) {
        let page_text = document.extract_text(&[*page_number]).unwrap_or_else(|e| {
            tracing::warn!(page = page_number, error = %e, "PDF page text unreadable");
            String::new()
        });
        text.push_str(page_text.trim_end());
        text.push('\n');
    }

    tracing::debug!(
        total_pages,
        pages_read = total_pages.min(MAX_PDF_PAGES),
        text_length = text.len(),
        "PDF text extraction complete"
    );

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Generate a valid PDF with one line of text per page using lopdf.
    pub(crate) fn make_test_pdf(page_texts: &[String]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.5");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for text in page_texts {
            let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn numbered_pages(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Section marker P{i}Z")).collect()
    }

    #[test]
    fn extract_text_from_digital_pdf() {
        let pdf = make_test_pdf(&["Hello World from DocSift".to_string()]);
        let text = extract_pdf_text(&pdf).unwrap();
        assert!(
            text.contains("Hello") || text.contains("World"),
            "Expected text to contain 'Hello' or 'World', got: {text}"
        );
    }

    #[test]
    fn pages_separated_by_newlines_in_order() {
        let pdf = make_test_pdf(&numbered_pages(3));
        let text = extract_pdf_text(&pdf).unwrap();

        let p1 = text.find("P1Z").expect("page 1 present");
        let p3 = text.find("P3Z").expect("page 3 present");
        assert!(p1 < p3);
        assert!(text.lines().count() >= 3);
    }

    #[test]
    fn only_first_ten_pages_read() {
        let pdf = make_test_pdf(&numbered_pages(12));
        let text = extract_pdf_text(&pdf).unwrap();

        assert!(text.contains("P10Z"), "page 10 should be read: {text}");
        assert!(!text.contains("P11Z"), "page 11 must be skipped");
        assert!(!text.contains("P12Z"), "page 12 must be skipped");
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let result = extract_pdf_text(b"not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }
}
