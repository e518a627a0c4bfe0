use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use super::{jpeg, write_document};
use crate::errors::ScraperErrors;

/// Page index encoded after the last `-` of the file stem: `slug-page-12.jpg` -> 12.
pub fn page_index(path: &Path) -> Result<u32, ScraperErrors> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit('-').next())
        .and_then(|index| index.parse().ok())
        .ok_or_else(|| ScraperErrors::BadPageFileName(path.to_path_buf()))
}

/// Every file in `directory`, ordered by numeric page index.
pub fn sorted_pages(directory: &Path) -> Result<Vec<PathBuf>, ScraperErrors> {
    let entries = fs::read_dir(directory).map_err(|err| ScraperErrors::io(directory, err))?;

    let mut pages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ScraperErrors::io(directory, err))?;
        let path = entry.path();
        if path.is_file() {
            pages.push((page_index(&path)?, path));
        }
    }
    pages.sort_by_key(|(index, _)| *index);

    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Builds a PDF with one page per image of `directory`, each page sized to its image.
pub fn images_to_pdf(directory: &Path, output: &Path) -> Result<usize, ScraperErrors> {
    let pages = sorted_pages(directory)?;
    if pages.is_empty() {
        return Err(ScraperErrors::EmptyChapter(directory.to_path_buf()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for path in &pages {
        let data = fs::read(path).map_err(|err| ScraperErrors::io(path, err))?;
        let info = jpeg::read_info(&data).ok_or_else(|| ScraperErrors::BadImage(path.clone()))?;
        debug!("{} is {}x{}", path.display(), info.width, info.height);

        let width = i64::from(info.width);
        let height = i64::from(info.height);

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => info.color_space(),
                "BitsPerComponent" => i64::from(info.bits_per_component),
                "Filter" => "DCTDecode",
            },
            data,
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0i64.into(),
                        0i64.into(),
                        height.into(),
                        0i64.into(),
                        0i64.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|err| ScraperErrors::PdfWrite {
            path: output.to_path_buf(),
            reason: err.to_string(),
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let media_box: Vec<Object> = vec![0i64.into(), 0i64.into(), width.into(), height.into()];
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    write_document(&mut doc, output)?;
    Ok(count)
}
