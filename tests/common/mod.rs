//! Shared helpers: synthetic PDFs built with lopdf
#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF with one page per entry of `pages` (each string becomes the
/// page's text) and a flat or nested outline. Outline entries are
/// `(level, title, page_index)` with 1-based levels and 0-based page indices;
/// an entry at level N+1 directly following one at level N becomes its child.
pub fn build_pdf(pages: &[&str], outline: &[(u32, &str, usize)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let page_ids = add_pages(&mut doc, pages);
    let pages_id = add_page_tree(&mut doc, &page_ids);

    let outlines_ref = if outline.is_empty() {
        None
    } else {
        let item_ids: Vec<(u32, lopdf::ObjectId)> = outline
            .iter()
            .map(|(level, title, page_idx)| {
                let id = doc.add_object(dictionary! {
                    "Title" => Object::string_literal(*title),
                    "Dest" => vec![
                        Object::Reference(page_ids[*page_idx]),
                        Object::Name(b"Fit".to_vec()),
                    ],
                });
                (*level, id)
            })
            .collect();
        link_outline_items(&mut doc, &item_ids);

        let outlines_id = doc.add_object(dictionary! {
            "Type" => "Outlines",
            "First" => Object::Reference(item_ids[0].1),
            "Last" => Object::Reference(item_ids[item_ids.len() - 1].1),
        });
        Some(outlines_id)
    };

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    };
    if let Some(outlines_id) = outlines_ref {
        catalog.set("Outlines", Object::Reference(outlines_id));
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    save(doc)
}

/// Build a PDF whose single outline entry uses a named destination resolved
/// through the `/Names` tree. `resolvable` controls whether the name exists.
pub fn build_pdf_with_named_dest(pages: &[&str], title: &str, resolvable: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let page_ids = add_pages(&mut doc, pages);
    let pages_id = add_page_tree(&mut doc, &page_ids);

    let item_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Dest" => Object::string_literal("target-section"),
    });
    let outlines_id = doc.add_object(dictionary! {
        "Type" => "Outlines",
        "First" => Object::Reference(item_id),
        "Last" => Object::Reference(item_id),
    });

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
        "Outlines" => Object::Reference(outlines_id),
    };
    if resolvable {
        let dests_node = doc.add_object(dictionary! {
            "Names" => vec![
                Object::string_literal("target-section"),
                Object::Array(vec![
                    Object::Reference(page_ids[0]),
                    Object::Name(b"Fit".to_vec()),
                ]),
            ],
        });
        catalog.set(
            "Names",
            dictionary! { "Dests" => Object::Reference(dests_node) },
        );
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    save(doc)
}

fn add_pages(doc: &mut Document, pages: &[&str]) -> Vec<lopdf::ObjectId> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    pages
        .iter()
        .map(|text| {
            let content = if text.is_empty() {
                Vec::new()
            } else {
                format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET").into_bytes()
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                },
            })
        })
        .collect()
}

fn add_page_tree(doc: &mut Document, page_ids: &[lopdf::ObjectId]) -> lopdf::ObjectId {
    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_ids.len() as i64,
    });
    for &pid in page_ids {
        if let Ok(dict) = doc.get_object_mut(pid).and_then(|o| o.as_dict_mut()) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
    pages_id
}

/// Wire `/First` and `/Next` links from the flat `(level, id)` list.
fn link_outline_items(doc: &mut Document, item_ids: &[(u32, lopdf::ObjectId)]) {
    for (i, &(level, id)) in item_ids.iter().enumerate() {
        let mut first = None;
        let mut next = None;

        if let Some(&(child_level, child_id)) = item_ids.get(i + 1) {
            if child_level > level {
                first = Some(child_id);
            }
        }
        for &(sibling_level, sibling_id) in &item_ids[i + 1..] {
            if sibling_level < level {
                break;
            }
            if sibling_level == level {
                next = Some(sibling_id);
                break;
            }
        }

        if let Ok(dict) = doc.get_object_mut(id).and_then(|o| o.as_dict_mut()) {
            if let Some(first_id) = first {
                dict.set("First", Object::Reference(first_id));
            }
            if let Some(next_id) = next {
                dict.set("Next", Object::Reference(next_id));
            }
        }
    }
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
