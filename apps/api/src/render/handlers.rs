//! Axum route handlers for the Render API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::layout::{DocumentKind, DocumentSource};
use crate::models::{CoverLetterData, ResumeData};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub kind: DocumentKind,
    pub data: Value,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub path: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render/resume
///
/// Lays out and renders the resume, returning the PDF inline as an attachment.
pub async fn handle_render_resume(
    State(state): State<AppState>,
    Json(resume): Json<ResumeData>,
) -> Result<Response, AppError> {
    let bytes = generate_blocking(&state, resume).await?;
    Ok(pdf_response(bytes, DocumentKind::Resume.default_filename()))
}

/// POST /api/v1/render/cover-letter
pub async fn handle_render_cover_letter(
    State(state): State<AppState>,
    Json(letter): Json<CoverLetterData>,
) -> Result<Response, AppError> {
    let bytes = generate_blocking(&state, letter).await?;
    Ok(pdf_response(bytes, DocumentKind::CoverLetter.default_filename()))
}

/// POST /api/v1/export
///
/// Writes the document into the export directory. Failure is reported as
/// `success: false`; the export directory never holds a partial file.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<(StatusCode, Json<ExportResponse>), AppError> {
    let source: Box<dyn DocumentSource + Send> = match request.kind {
        DocumentKind::Resume => Box::new(parse_data::<ResumeData>(request.data)?),
        DocumentKind::CoverLetter => Box::new(parse_data::<CoverLetterData>(request.data)?),
    };
    let filename = sanitize_filename(request.filename.as_deref(), request.kind);
    let path = state.config.export_dir.join(&filename);

    let assembler = state.assembler.clone();
    let target = path.clone();
    // CPU-bound layout and render pass, plus the file write.
    let saved = tokio::task::spawn_blocking(move || assembler.save(source.as_ref(), &target))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))?;

    if saved {
        Ok((
            StatusCode::OK,
            Json(ExportResponse {
                success: true,
                path: Some(path.display().to_string()),
            }),
        ))
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ExportResponse {
                success: false,
                path: None,
            }),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn generate_blocking<S>(state: &AppState, source: S) -> Result<Vec<u8>, AppError>
where
    S: DocumentSource + Send + 'static,
{
    let assembler = state.assembler.clone();
    tokio::task::spawn_blocking(move || assembler.generate(&source))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?
        .map_err(AppError::from)
}

fn parse_data<T: serde::de::DeserializeOwned>(data: Value) -> Result<T, AppError> {
    serde_json::from_value(data).map_err(|e| AppError::Validation(format!("Invalid document data: {e}")))
}

fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Reduces a caller-supplied name to a bare `*.pdf` file name inside the export dir.
pub fn sanitize_filename(raw: Option<&str>, kind: DocumentKind) -> String {
    let name = raw
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();
    let stem = if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        &cleaned[..cleaned.len() - 4]
    } else {
        cleaned.as_str()
    };
    let stem = stem.trim_start_matches('.');
    if stem.trim_matches(['_', '.']).is_empty() {
        return kind.default_filename().to_string();
    }
    format!("{stem}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_defaults_per_kind() {
        assert_eq!(sanitize_filename(None, DocumentKind::Resume), "resume.pdf");
        assert_eq!(sanitize_filename(Some("  "), DocumentKind::CoverLetter), "cover-letter.pdf");
        assert_eq!(sanitize_filename(Some(".pdf"), DocumentKind::Resume), "resume.pdf");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename(Some("../../etc/passwd"), DocumentKind::Resume), "passwd.pdf");
        assert_eq!(sanitize_filename(Some("C:\\tmp\\cv.PDF"), DocumentKind::Resume), "cv.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(
            sanitize_filename(Some("Jo Doe (2025).pdf"), DocumentKind::Resume),
            "Jo_Doe__2025_.pdf"
        );
        assert_eq!(sanitize_filename(Some("résumé"), DocumentKind::Resume), "r_sum_.pdf");
    }
}
