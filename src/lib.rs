//! PDF table-of-contents and section extraction, served over HTTP
//!
//! This crate provides:
//! - Outline (bookmark) extraction from a PDF's `/Outlines` tree
//! - Per-page text extraction with a block-structured fallback
//! - A section map that slices a window of page text after each TOC entry
//! - An axum service exposing the above at `POST /parse-pdf`

pub mod config;
pub mod extractor;
pub mod outline;
pub mod sections;
pub mod server;

pub use config::ServerConfig;
pub use outline::{read_outline, TocEntry};
pub use sections::{
    extract_toc_and_sections, extract_toc_and_sections_mem, SectionRecord, SectionText, TocOutline,
};
pub use server::app;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
}

impl From<lopdf::Error> for PdfError {
    fn from(e: lopdf::Error) -> Self {
        PdfError::Parse(e.to_string())
    }
}
