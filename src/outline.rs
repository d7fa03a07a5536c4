//! Outline (table of contents) extraction from the PDF catalog
//!
//! Walks the `/Outlines` tree via `/First` child and `/Next` sibling links,
//! resolving each entry's destination to a 1-indexed page number. Documents
//! without an outline yield an empty list, never an error.

use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// One entry of the document outline, in document order.
///
/// `page` is 1-indexed. Entries whose destination cannot be resolved keep
/// their place in the list with `page` set to 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Nesting depth, top-level entries are level 1.
    pub level: u32,
    pub title: String,
    pub page: u32,
}

// Outline trees in the wild contain broken links; keep hard caps.
const MAX_DEPTH: u32 = 64;
const MAX_SIBLINGS: usize = 10_000;

/// Read the full outline of a loaded document as a flat, document-ordered list.
pub fn read_outline(doc: &Document) -> Vec<TocEntry> {
    let catalog = match catalog_dict(doc) {
        Some(dict) => dict,
        None => return Vec::new(),
    };

    let outlines_dict = match catalog.get(b"Outlines").ok().map(|o| resolve(doc, o)) {
        Some(obj) => match obj.as_dict() {
            Ok(dict) => dict,
            Err(_) => return Vec::new(),
        },
        None => return Vec::new(),
    };

    let first_ref = match outlines_dict.get(b"First") {
        Ok(Object::Reference(id)) => *id,
        _ => return Vec::new(),
    };

    let pages_map = doc.get_pages();
    let mut entries = Vec::new();
    walk_outline(doc, catalog, first_ref, 1, &pages_map, &mut entries);
    entries
}

fn catalog_dict(doc: &Document) -> Option<&lopdf::Dictionary> {
    let root = doc.trailer.get(b"Root").ok()?;
    resolve(doc, root).as_dict().ok()
}

/// Follow a reference to its target; non-references pass through unchanged.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

fn walk_outline(
    doc: &Document,
    catalog: &lopdf::Dictionary,
    item_id: ObjectId,
    level: u32,
    pages_map: &BTreeMap<u32, ObjectId>,
    entries: &mut Vec<TocEntry>,
) {
    if level > MAX_DEPTH {
        return;
    }

    let mut current_id = Some(item_id);
    let mut visited = HashSet::new();

    while let Some(node_id) = current_id {
        if !visited.insert(node_id) || visited.len() > MAX_SIBLINGS {
            log::warn!("outline sibling chain at level {level} is cyclic or oversized, truncating");
            break;
        }

        let node_dict = match doc.get_object(node_id).and_then(|o| o.as_dict()) {
            Ok(dict) => dict,
            Err(_) => break,
        };

        let title = node_dict
            .get(b"Title")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| match o {
                Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
                _ => None,
            })
            .unwrap_or_default();

        let page = resolve_entry_page(doc, catalog, node_dict, pages_map).unwrap_or(0);
        entries.push(TocEntry { level, title, page });

        if let Ok(Object::Reference(child_id)) = node_dict.get(b"First") {
            walk_outline(doc, catalog, *child_id, level + 1, pages_map, entries);
        }

        current_id = match node_dict.get(b"Next") {
            Ok(Object::Reference(next_id)) => Some(*next_id),
            _ => None,
        };
    }
}

/// Resolve an outline node's destination to a 1-indexed page number.
///
/// Checks `/Dest` first, then `/A` restricted to GoTo actions.
fn resolve_entry_page(
    doc: &Document,
    catalog: &lopdf::Dictionary,
    node_dict: &lopdf::Dictionary,
    pages_map: &BTreeMap<u32, ObjectId>,
) -> Option<u32> {
    if let Ok(dest_obj) = node_dict.get(b"Dest") {
        if let Some(page) = dest_to_page(doc, catalog, dest_obj, pages_map) {
            return Some(page);
        }
    }

    if let Ok(action_obj) = node_dict.get(b"A") {
        let action_dict = resolve(doc, action_obj).as_dict().ok()?;
        if let Ok(Object::Name(kind)) = action_dict.get(b"S") {
            if kind == b"GoTo" {
                if let Ok(dest_obj) = action_dict.get(b"D") {
                    return dest_to_page(doc, catalog, dest_obj, pages_map);
                }
            }
        }
    }

    None
}

/// Resolve a destination object (explicit array, name, or named-destination
/// string) to a page number.
fn dest_to_page(
    doc: &Document,
    catalog: &lopdf::Dictionary,
    dest_obj: &Object,
    pages_map: &BTreeMap<u32, ObjectId>,
) -> Option<u32> {
    match resolve(doc, dest_obj) {
        // Explicit destination: [page_ref /Fit ...]
        Object::Array(arr) => {
            if let Some(Object::Reference(page_ref)) = arr.first() {
                page_number_of(pages_map, *page_ref)
            } else {
                None
            }
        }
        Object::String(bytes, _) => {
            let name = decode_pdf_string(bytes);
            named_dest_to_page(doc, catalog, name.as_bytes(), pages_map)
        }
        Object::Name(name) => named_dest_to_page(doc, catalog, name, pages_map),
        _ => None,
    }
}

fn page_number_of(pages_map: &BTreeMap<u32, ObjectId>, page_ref: ObjectId) -> Option<u32> {
    pages_map
        .iter()
        .find_map(|(&num, &id)| (id == page_ref).then_some(num))
}

/// Look up a named destination, trying the `/Names` name tree first and the
/// legacy `/Dests` dictionary second.
fn named_dest_to_page(
    doc: &Document,
    catalog: &lopdf::Dictionary,
    name: &[u8],
    pages_map: &BTreeMap<u32, ObjectId>,
) -> Option<u32> {
    let dest = lookup_name_tree(doc, catalog, name).or_else(|| {
        let dests = resolve(doc, catalog.get(b"Dests").ok()?).as_dict().ok()?;
        dests.get(name).ok().cloned()
    })?;

    // The value may be the destination array itself or a wrapper with /D.
    let dest = match resolve(doc, &dest) {
        Object::Dictionary(dict) => dict.get(b"D").ok()?.clone(),
        other => other.clone(),
    };

    if let Object::Array(arr) = resolve(doc, &dest) {
        if let Some(Object::Reference(page_ref)) = arr.first() {
            return page_number_of(pages_map, *page_ref);
        }
    }
    None
}

/// Walk `/Names -> /Dests` name-tree nodes (leaf `/Names` arrays and
/// intermediate `/Kids`) looking for `name`.
fn lookup_name_tree(doc: &Document, catalog: &lopdf::Dictionary, name: &[u8]) -> Option<Object> {
    let names = resolve(doc, catalog.get(b"Names").ok()?).as_dict().ok()?;
    let dests_root = resolve(doc, names.get(b"Dests").ok()?).as_dict().ok()?;
    search_name_tree_node(doc, dests_root, name, 0)
}

fn search_name_tree_node(
    doc: &Document,
    node: &lopdf::Dictionary,
    name: &[u8],
    depth: u32,
) -> Option<Object> {
    if depth > MAX_DEPTH {
        return None;
    }

    if let Ok(Object::Array(pairs)) = node.get(b"Names").map(|o| resolve(doc, o)) {
        for pair in pairs.chunks(2) {
            if let [Object::String(key, _), value] = pair {
                if key.as_slice() == name {
                    return Some(value.clone());
                }
            }
        }
    }

    if let Ok(Object::Array(kids)) = node.get(b"Kids").map(|o| resolve(doc, o)) {
        for kid in kids {
            if let Ok(kid_dict) = resolve(doc, kid).as_dict() {
                if let Some(found) = search_name_tree_node(doc, kid_dict, name, depth + 1) {
                    return Some(found);
                }
            }
        }
    }

    None
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, UTF-8 when valid,
/// Latin-1 otherwise.
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_ascii_string() {
        assert_eq!(decode_pdf_string(b"Chapter 1"), "Chapter 1");
    }

    #[test]
    fn decodes_utf16be_string_with_bom() {
        // "Ab" encoded as UTF-16BE with BOM
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x62];
        assert_eq!(decode_pdf_string(&bytes), "Ab");
    }

    #[test]
    fn decodes_latin1_fallback() {
        // 0xE9 is 'é' in Latin-1 and invalid standalone UTF-8
        let bytes = [b'R', b'\xE9', b's', b'u', b'm', b'\xE9'];
        assert_eq!(decode_pdf_string(&bytes), "Résumé");
    }

    #[test]
    fn empty_document_has_no_outline() {
        let doc = Document::with_version("1.5");
        assert!(read_outline(&doc).is_empty());
    }
}
