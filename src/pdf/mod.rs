//! Page images to PDF, and PDF page reversal.

mod assemble;
pub mod jpeg;
mod reverse;

use std::{fs, path::Path};

use lopdf::Document;

pub use assemble::{images_to_pdf, page_index, sorted_pages};
pub use reverse::reverse_pdf;

use crate::errors::ScraperErrors;

/// Serializes `doc` to `path`, creating the parent directory as needed.
fn write_document(doc: &mut Document, path: &Path) -> Result<(), ScraperErrors> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| ScraperErrors::io(parent, err))?;
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|err| ScraperErrors::PdfWrite {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    fs::write(path, buffer).map_err(|err| ScraperErrors::io(path, err))
}

/// MediaBox width of every page, in page order.
#[cfg(test)]
pub(crate) fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}
