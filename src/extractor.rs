//! Per-page text extraction using lopdf
//!
//! Two extraction modes back the section slicing:
//! - plain: lopdf's built-in `extract_text` for one page
//! - blocks: a direct walk of the page content stream, used as a fallback
//!   when plain extraction comes back empty

use crate::PdfError;
use lopdf::{Document, Object, ObjectId};

/// Extract plain text from a single 1-indexed page.
pub fn page_plain_text(doc: &Document, page: u32) -> Result<String, PdfError> {
    doc.extract_text(&[page])
        .map_err(|e| PdfError::Parse(e.to_string()))
}

/// Extract block-structured text from a single 1-indexed page.
///
/// Decodes the content stream and collects text-showing operators grouped by
/// BT/ET text blocks. Catches text that `extract_text` misses on some
/// producers (notably streams with unusual font resources).
pub fn page_block_text(doc: &Document, page: u32) -> Result<String, PdfError> {
    let pages = doc.get_pages();
    let page_id = pages
        .get(&page)
        .copied()
        .ok_or_else(|| PdfError::Parse(format!("page {page} not present in document")))?;

    let blocks = extract_page_blocks(doc, page_id)?;
    Ok(blocks.join("\n"))
}

/// Collect one string per BT/ET text block on the page.
fn extract_page_blocks(doc: &Document, page_id: ObjectId) -> Result<Vec<String>, PdfError> {
    use lopdf::content::Content;

    // Fonts are needed to decode string operands
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::Parse(e.to_string()))?;
    let content = Content::decode(&content_data).map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut blocks = Vec::new();
    let mut block_runs: Vec<String> = Vec::new();
    let mut current_font = String::new();
    let mut in_text_block = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                block_runs.clear();
            }
            "ET" => {
                in_text_block = false;
                let text = block_runs.join(" ");
                if !text.trim().is_empty() {
                    blocks.push(text);
                }
                block_runs.clear();
            }
            "Tf" => {
                if let Some(Ok(name)) = op.operands.first().map(|o| o.as_name()) {
                    current_font = String::from_utf8_lossy(name).to_string();
                }
            }
            "Tj" | "'" | "\"" => {
                // The quoted forms carry the string as the last operand
                if in_text_block {
                    if let Some(operand) = op.operands.last() {
                        if let Some(text) = decode_string_operand(operand, doc, &fonts, &current_font)
                        {
                            push_run(&mut block_runs, text);
                        }
                    }
                }
            }
            "TJ" => {
                if in_text_block {
                    if let Some(Ok(array)) = op.operands.first().map(|o| o.as_array()) {
                        let mut combined = String::new();
                        for item in array {
                            if let Some(text) =
                                decode_string_operand(item, doc, &fonts, &current_font)
                            {
                                combined.push_str(&text);
                            }
                        }
                        push_run(&mut block_runs, combined);
                    }
                }
            }
            _ => {}
        }
    }

    // Tolerate a missing ET at end of stream
    if in_text_block {
        let text = block_runs.join(" ");
        if !text.trim().is_empty() {
            blocks.push(text);
        }
    }

    Ok(blocks)
}

fn push_run(runs: &mut Vec<String>, text: String) {
    if !text.trim().is_empty() {
        runs.push(text);
    }
}

/// Decode a text operand through the current font's encoding, falling back to
/// UTF-16BE (BOM-prefixed) and then Latin-1.
fn decode_string_operand(
    obj: &Object,
    doc: &Document,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    current_font: &str,
) -> Option<String> {
    if let Object::String(bytes, _) = obj {
        if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
            if let Ok(encoding) = font_dict.get_font_encoding(doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return Some(text);
                }
            }
        }
        Some(crate::outline::decode_pdf_string(bytes))
    } else {
        None
    }
}
