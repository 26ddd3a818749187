//! Document upload and analysis endpoint.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::{multipart_error, ApiError};
use crate::api::types::ApiContext;
use crate::config::AppConfig;
use crate::pipeline::extraction::Document;
use crate::pipeline::ollama::OllamaClient;
use crate::pipeline::{AnalysisReport, DocumentAnalyzer};

const MAX_FILENAME_LEN: usize = 100;

/// Make an uploaded filename safe to use on disk.
///
/// Drops any directory part, turns whitespace into `_`, keeps only ASCII
/// alphanumerics and `. _ -`, strips leading dots and underscores.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    // Keep the tail so the extension survives truncation.
    let cleaned = if cleaned.len() > MAX_FILENAME_LEN {
        &cleaned[cleaned.len() - MAX_FILENAME_LEN..]
    } else {
        cleaned.as_str()
    };

    let cleaned = cleaned.trim_start_matches(['.', '_']);
    if cleaned.is_empty() {
        "document".into()
    } else {
        cleaned.to_string()
    }
}

/// `POST /upload`: multipart `file` + `prompt`, returns the analysis report.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let limit = ctx.config.max_content_length;
    let mut prompt = String::new();
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "prompt" => {
                prompt = field.text().await.map_err(|e| multipart_error(e, limit))?;
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                file_data = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, bytes) = match file_data {
        Some((filename, bytes)) if !filename.is_empty() => (filename, bytes),
        _ => return Err(ApiError::NoFile),
    };

    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(ApiError::NoPrompt);
    }

    if !ctx.config.is_allowed_file(&filename) {
        return Err(ApiError::UnsupportedType(ctx.allowed_types()));
    }

    let safe_filename = secure_filename(&filename);
    let staged_path = stage_upload(&ctx.config.upload_dir, &safe_filename, &bytes).await?;

    tracing::info!(
        filename = %safe_filename,
        size = bytes.len(),
        "Document received"
    );
    drop(bytes);

    let config = ctx.config.clone();
    let report = tokio::task::spawn_blocking(move || {
        analyze_staged(&config, &staged_path, safe_filename, &prompt)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(report))
}

/// Write the upload as `<upload_dir>/<uuid>_<name>`.
async fn stage_upload(dir: &Path, safe_filename: &str, bytes: &[u8]) -> Result<PathBuf, ApiError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create upload dir: {e}")))?;

    let staged_path = dir.join(format!("{}_{}", Uuid::new_v4(), safe_filename));
    tokio::fs::write(&staged_path, bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to stage file: {e}")))?;

    Ok(staged_path)
}

/// Read the staged file back, delete it, then run the pipeline.
/// Runs on a blocking worker: the inference client is synchronous.
fn analyze_staged(
    config: &AppConfig,
    staged_path: &Path,
    filename: String,
    prompt: &str,
) -> Result<AnalysisReport, ApiError> {
    let read = std::fs::read(staged_path);
    if let Err(e) = std::fs::remove_file(staged_path) {
        tracing::warn!(path = %staged_path.display(), "Failed to remove staged file: {e}");
    }
    let bytes = read.map_err(|e| ApiError::Internal(format!("Failed to read staged file: {e}")))?;

    let client =
        OllamaClient::from_config(config).map_err(|e| ApiError::Internal(e.to_string()))?;
    let document = Document::new(filename, bytes);

    Ok(DocumentAnalyzer::new(config, &client).analyze(&document, prompt)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_filename_strips_directories() {
        assert_eq!(secure_filename("../../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\test\\report.pdf"), "report.pdf");
    }

    #[test]
    fn secure_filename_replaces_whitespace() {
        assert_eq!(secure_filename("my quarterly report.xlsx"), "my_quarterly_report.xlsx");
    }

    #[test]
    fn secure_filename_drops_special_characters() {
        assert_eq!(secure_filename("notes (final)!.txt"), "notes_final.txt");
        assert_eq!(secure_filename("résumé.docx"), "rsum.docx");
    }

    #[test]
    fn secure_filename_strips_leading_dots() {
        assert_eq!(secure_filename(".hidden.csv"), "hidden.csv");
        assert_eq!(secure_filename(".."), "document");
    }

    #[test]
    fn secure_filename_empty_falls_back() {
        assert_eq!(secure_filename(""), "document");
        assert_eq!(secure_filename("###"), "document");
    }

    #[test]
    fn secure_filename_long_name_keeps_extension() {
        let long = format!("{}.pdf", "a".repeat(300));
        let safe = secure_filename(&long);
        assert_eq!(safe.len(), MAX_FILENAME_LEN);
        assert!(safe.ends_with(".pdf"));
    }

    #[test]
    fn analyze_staged_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("abc_notes.txt");
        std::fs::write(&path, b"Hello world").unwrap();

        let mut config = AppConfig::default();
        config.ollama_url = "http://127.0.0.1:1".into();
        config.tags_timeout_secs = 1;
        config.generate_timeout_secs = 1;

        let report = analyze_staged(&config, &path, "notes.txt".into(), "Summarize").unwrap();
        assert!(!path.exists());
        assert!(report.inference_failed);
        assert_eq!(report.stats.word_count, 2);
    }
}
