use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Coarse classification used when reporting failed chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    Format,
    Filesystem,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::Format => "format",
            ErrorKind::Filesystem => "filesystem",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScraperErrors {
    #[error("request to {url} failed")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    BadStatus { url: String, status: u16 },

    #[error("no `{selector}` found on {url}")]
    MissingElement { url: String, selector: &'static str },

    #[error("no slug after `{distinguisher}` in {url}")]
    MissingSlug { url: String, distinguisher: String },

    #[error("page file name {0} has no trailing `-<index>`")]
    BadPageFileName(PathBuf),

    #[error("{0} is not a readable jpeg")]
    BadImage(PathBuf),

    #[error("no page images in {0}")]
    EmptyChapter(PathBuf),

    #[error("failed to read pdf {path}")]
    PdfRead {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("malformed pdf {path}: {reason}")]
    MalformedPdf { path: PathBuf, reason: &'static str },

    #[error("failed to build pdf {path}: {reason}")]
    PdfWrite { path: PathBuf, reason: String },

    #[error("writing {path} was interrupted")]
    Interrupted {
        path: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("i/o failure on {path}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperErrors {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScraperErrors::RequestFailed { .. } | ScraperErrors::BadStatus { .. } => {
                ErrorKind::Network
            }
            ScraperErrors::MissingElement { .. } | ScraperErrors::MissingSlug { .. } => {
                ErrorKind::Parse
            }
            ScraperErrors::BadPageFileName(_)
            | ScraperErrors::BadImage(_)
            | ScraperErrors::EmptyChapter(_)
            | ScraperErrors::PdfRead { .. }
            | ScraperErrors::MalformedPdf { .. }
            | ScraperErrors::PdfWrite { .. } => ErrorKind::Format,
            ScraperErrors::Interrupted { .. } | ScraperErrors::Filesystem { .. } => {
                ErrorKind::Filesystem
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScraperErrors::Filesystem {
            path: path.into(),
            source,
        }
    }
}
