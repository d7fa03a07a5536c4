//! TOC-driven section slicing
//!
//! For every outline entry, a fixed window of following pages is read and the
//! extracted text is attached to the entry's title in a document-ordered map.
//! A failure on one entry downgrades that entry to a record without text and
//! never aborts the remaining entries.

use crate::extractor::{page_block_text, page_plain_text};
use crate::outline::{read_outline, TocEntry};
use crate::PdfError;
use indexmap::IndexMap;
use lopdf::Document;
use serde::Serialize;
use std::path::Path;

/// Substituted for a page that yields no text in either extraction mode.
pub const MISSING_TEXT_PLACEHOLDER: &str = "Text not available for this section\n";

/// Outcome of text extraction for one TOC entry.
///
/// Per-entry failures are carried as data rather than bubbled up, so a single
/// bad page range cannot suppress the other sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionText {
    Extracted(String),
    Unavailable(String),
}

/// One occurrence of a TOC title in the section map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRecord {
    pub level: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The full response payload: the TOC in document order plus the per-title
/// section map. Titles are not unique, so each key holds a list of records.
#[derive(Debug, Serialize)]
pub struct TocOutline {
    pub toc: Vec<TocEntry>,
    pub sections: IndexMap<String, Vec<SectionRecord>>,
}

/// Extract the TOC and section map from a PDF file on disk.
///
/// `expand_pages` is the number of pages read after each entry's starting
/// page (the window is inclusive and clamped to the document's last page).
/// Extracted text is attached to the records only when `include_text` is set.
pub fn extract_toc_and_sections<P: AsRef<Path>>(
    path: P,
    expand_pages: u32,
    include_text: bool,
) -> Result<TocOutline, PdfError> {
    let doc = Document::load(path)?;
    extract_from_doc(&doc, expand_pages, include_text)
}

/// Extract the TOC and section map from a PDF already in memory.
pub fn extract_toc_and_sections_mem(
    buffer: &[u8],
    expand_pages: u32,
    include_text: bool,
) -> Result<TocOutline, PdfError> {
    let doc = Document::load_mem(buffer)?;
    extract_from_doc(&doc, expand_pages, include_text)
}

fn extract_from_doc(
    doc: &Document,
    expand_pages: u32,
    include_text: bool,
) -> Result<TocOutline, PdfError> {
    let toc = read_outline(doc);
    let page_count = doc.get_pages().len() as u32;
    log::debug!(
        "document has {page_count} pages, {} outline entries",
        toc.len()
    );

    let mut sections: IndexMap<String, Vec<SectionRecord>> = IndexMap::new();
    for entry in &toc {
        let text = match section_text(doc, entry, expand_pages, page_count) {
            SectionText::Extracted(text) => include_text.then_some(text),
            SectionText::Unavailable(reason) => {
                log::warn!(
                    "no text for entry {:?} (page {}): {reason}",
                    entry.title,
                    entry.page
                );
                None
            }
        };

        sections
            .entry(entry.title.clone())
            .or_default()
            .push(SectionRecord {
                level: entry.level,
                page: entry.page,
                text,
            });
    }

    Ok(TocOutline { toc, sections })
}

/// Read the page window `[page, page + expand_pages]` for one entry,
/// clamped to the last page of the document.
fn section_text(
    doc: &Document,
    entry: &TocEntry,
    expand_pages: u32,
    page_count: u32,
) -> SectionText {
    if entry.page == 0 || entry.page > page_count {
        return SectionText::Unavailable(format!(
            "entry points outside the document (page {} of {page_count})",
            entry.page
        ));
    }

    let last = entry.page.saturating_add(expand_pages).min(page_count);
    let mut section = String::new();
    for page in entry.page..=last {
        let text = match page_plain_text(doc, page) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => match page_block_text(doc, page) {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => MISSING_TEXT_PLACEHOLDER.to_string(),
                Err(e) => return SectionText::Unavailable(e.to_string()),
            },
            Err(e) => return SectionText::Unavailable(e.to_string()),
        };
        section.push_str(&text);
    }

    SectionText::Extracted(section.trim().to_string())
}
