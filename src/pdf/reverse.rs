use std::path::Path;

use log::debug;
use lopdf::{Document, Object, ObjectId};

use super::write_document;
use crate::errors::ScraperErrors;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Writes `source` to `destination` with its pages in reverse order. Returns the page count.
///
/// The page tree is flattened into the root `Pages` node, so inherited attributes
/// are copied down onto each page first.
pub fn reverse_pdf(source: &Path, destination: &Path) -> Result<usize, ScraperErrors> {
    let read_err = |err: lopdf::Error| ScraperErrors::PdfRead {
        path: source.to_path_buf(),
        source: err,
    };

    let mut doc = Document::load(source).map_err(read_err)?;

    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|catalog_id| doc.get_dictionary(catalog_id))
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| ScraperErrors::MalformedPdf {
            path: source.to_path_buf(),
            reason: "no page tree root",
        })?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    debug!("reversing {} pages of {}", pages.len(), source.display());

    for &page_id in &pages {
        let inherited = inherited_attributes(&doc, page_id);
        let page = doc.get_dictionary_mut(page_id).map_err(read_err)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", root_id);
    }

    let kids: Vec<Object> = pages.iter().rev().map(|&id| Object::Reference(id)).collect();
    let root = doc.get_dictionary_mut(root_id).map_err(read_err)?;
    root.set("Kids", kids);
    root.set("Count", pages.len() as i64);
    doc.prune_objects();

    write_document(&mut doc, destination)?;
    Ok(pages.len())
}

fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let mut found = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut wanted: Vec<&'static [u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut visited = vec![page_id];

    while let Some(node_id) = parent {
        if wanted.is_empty() || visited.contains(&node_id) {
            break;
        }
        visited.push(node_id);

        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        wanted.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}
