//! HTTP surface: router, handlers, and error mapping
//!
//! `POST /parse-pdf` accepts a multipart upload, spools it to a temporary
//! file, and runs the extraction on the blocking pool. The OpenAPI document
//! served at `/openapi.json` describes the endpoint.

use crate::config::ServerConfig;
use crate::sections::{extract_toc_and_sections, TocOutline};
use crate::PdfError;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::io::Write;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No file provided")]
    MissingFile,

    #[error("{0}")]
    InvalidField(String),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingFile | Self::InvalidField(_) => StatusCode::BAD_REQUEST,
            Self::Pdf(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        // The wire format is a bare {"error": "..."} object
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router. Exposed so tests can drive it directly.
pub fn app(config: ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes;
    Router::new()
        .route("/parse-pdf", post(parse_pdf))
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(config)
}

/// Extract TOC and sections from an uploaded PDF.
///
/// Multipart fields: `pdf` (file, required), `expand_pages` (integer,
/// optional), `include_text` (boolean, optional).
async fn parse_pdf(
    State(config): State<ServerConfig>,
    mut multipart: Multipart,
) -> Result<Json<TocOutline>, ServiceError> {
    let mut pdf_bytes: Option<axum::body::Bytes> = None;
    let mut file_name = String::from("upload.pdf");
    let mut expand_pages: Option<u32> = None;
    let mut include_text = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidField(format!("malformed multipart body: {e}")))?
    {
        // Field accessors borrow from the field that bytes()/text() consume,
        // so copy the names out first.
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("pdf") => {
                if let Some(name) = field.file_name() {
                    file_name = name.to_string();
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServiceError::InvalidField(format!("failed to read file: {e}")))?;
                pdf_bytes = Some(bytes);
            }
            Some("expand_pages") => {
                let raw = field.text().await.map_err(|e| {
                    ServiceError::InvalidField(format!("failed to read expand_pages: {e}"))
                })?;
                let parsed = raw.trim().parse::<u32>().map_err(|_| {
                    ServiceError::InvalidField(format!(
                        "expand_pages must be a non-negative integer, got {raw:?}"
                    ))
                })?;
                expand_pages = Some(parsed);
            }
            Some("include_text") => {
                let raw = field.text().await.map_err(|e| {
                    ServiceError::InvalidField(format!("failed to read include_text: {e}"))
                })?;
                include_text = matches!(raw.trim(), "1" | "true" | "yes");
            }
            _ => {}
        }
    }

    let pdf_bytes = pdf_bytes.ok_or(ServiceError::MissingFile)?;
    let expand_pages = expand_pages.unwrap_or(config.default_expand_pages);

    tracing::info!(
        "parsing {file_name:?} ({} bytes, expand_pages={expand_pages})",
        pdf_bytes.len()
    );

    // lopdf is synchronous; run the whole save-extract cycle off the async
    // runtime. The NamedTempFile guard removes the upload on every exit path.
    let result = tokio::task::spawn_blocking(move || -> Result<TocOutline, ServiceError> {
        let mut tmp = tempfile::Builder::new()
            .prefix("parse-pdf-")
            .suffix(&sanitized_suffix(&file_name))
            .tempfile()?;
        tmp.write_all(&pdf_bytes)?;
        tmp.flush()?;
        Ok(extract_toc_and_sections(
            tmp.path(),
            expand_pages,
            include_text,
        )?)
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))??;

    Ok(Json(result))
}

/// Derive a safe tempfile suffix from the uploaded filename.
fn sanitized_suffix(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("-{safe}")
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Self-describing API documentation for the service.
async fn openapi_document() -> impl IntoResponse {
    Json(json!({
        "openapi": "3.0.3",
        "info": {
            "title": "PDF TOC Service",
            "description": "Extract a PDF's table of contents and per-section page text",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/parse-pdf": {
                "post": {
                    "tags": ["PDF Processing"],
                    "summary": "Extract TOC and sections from a PDF file",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": ["pdf"],
                                    "properties": {
                                        "pdf": {
                                            "type": "string",
                                            "format": "binary",
                                            "description": "The PDF file to be processed"
                                        },
                                        "expand_pages": {
                                            "type": "integer",
                                            "default": 7,
                                            "description": "Number of pages to expand for each TOC entry"
                                        },
                                        "include_text": {
                                            "type": "boolean",
                                            "default": false,
                                            "description": "Attach extracted text to each section record"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "TOC entries and extracted sections mapped by title",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "toc": {
                                                "type": "array",
                                                "items": {
                                                    "type": "object",
                                                    "properties": {
                                                        "level": { "type": "integer" },
                                                        "title": { "type": "string" },
                                                        "page": { "type": "integer" }
                                                    }
                                                }
                                            },
                                            "sections": {
                                                "type": "object",
                                                "additionalProperties": {
                                                    "type": "array",
                                                    "items": {
                                                        "type": "object",
                                                        "properties": {
                                                            "level": { "type": "integer" },
                                                            "page": { "type": "integer" },
                                                            "text": { "type": "string" }
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        "400": { "description": "Missing file or invalid form field" },
                        "500": { "description": "Extraction failure" }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Service liveness check",
                    "responses": { "200": { "description": "Service is up" } }
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_keeps_safe_characters() {
        assert_eq!(sanitized_suffix("manual.pdf"), "-manual.pdf");
    }

    #[test]
    fn suffix_replaces_path_separators() {
        assert_eq!(sanitized_suffix("../../etc/passwd"), "-.._.._etc_passwd");
    }

    #[test]
    fn missing_file_maps_to_exact_message() {
        assert_eq!(ServiceError::MissingFile.to_string(), "No file provided");
    }
}
