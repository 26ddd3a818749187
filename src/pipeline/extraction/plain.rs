use super::ExtractionError;

/// Decode a plain-text upload. Content is returned verbatim.
pub fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::EncodingError(e.to_string()))
}
