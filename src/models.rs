use std::{
    collections::BTreeMap,
    fmt::Display,
    path::{Path, PathBuf},
};

use crate::errors::ErrorKind;

/// Unresolved image url -> slug of the chapter it was found in.
pub type MissingPages = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub url: String,
    pub slug: String,
}

impl Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug)
    }
}

/// Where one chapter's artifacts live under the working root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPaths {
    pub images: PathBuf,
    pub pdf: PathBuf,
    pub reversed_pdf: PathBuf,
}

impl ChapterPaths {
    pub fn new(root: &Path, slug: &str) -> Self {
        Self {
            images: root.join("IMAGES").join(slug),
            pdf: root.join("PDFS").join(format!("{slug}.pdf")),
            reversed_pdf: root.join("REV_PDFS").join(format!("{slug}-reversed.pdf")),
        }
    }
}

/// Outcome of scraping one chapter page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Page-image elements found, including skipped ones.
    pub total: usize,
    pub downloaded: usize,
    /// Pages recorded as missing for this chapter.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedChapter {
    /// Slug when one could be derived, otherwise the chapter url.
    pub chapter: String,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedChapter {
    pub slug: String,
    pub paths: ChapterPaths,
    pub pages: usize,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub completed: Vec<CompletedChapter>,
    pub failed: Vec<FailedChapter>,
    pub missing: MissingPages,
}
