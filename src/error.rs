use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed user input (dates, region, profile mode).
    Format,
    /// Unreachable host, non-2xx response or unusable response body.
    Network,
    /// Unknown dataset, missing output directory, unreadable rc file.
    Config,
    /// Missing dataset versions or a tarball that could not be unpacked.
    Archive,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date {input:?}: expected {expected} format")]
    InvalidDate {
        input: String,
        expected: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown region {0:?} (valid regions: {})", crate::filenames::region_names())]
    UnknownRegion(String),

    #[error("unknown profile mode {0:?} (valid modes: monthly, daily)")]
    UnknownProfileMode(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed: HTTP {status} for url ({url})\n{body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("failed to parse API JSON (url={url})")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("file list page {url} was already fetched; pagination loops")]
    PageCycle { url: String },

    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "dataset must be a DOI string beginning with \"doi\" or one of the following strings: {valid} (got {given:?})"
    )]
    UnknownDataset { given: String, valid: String },

    #[error("output directory {} must be an existing directory", .0.display())]
    BadOutputDir(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no versions found for dataset {doi}")]
    NoVersions { doi: String },

    #[error("failed to extract {}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDate { .. } | Error::UnknownRegion(_) | Error::UnknownProfileMode(_) => {
                ErrorKind::Format
            }
            Error::Http(_)
            | Error::Status { .. }
            | Error::Decode { .. }
            | Error::PageCycle { .. }
            | Error::Io { .. } => ErrorKind::Network,
            Error::UnknownDataset { .. } | Error::BadOutputDir(_) | Error::Config(_) => {
                ErrorKind::Config
            }
            Error::NoVersions { .. } | Error::Extract { .. } => ErrorKind::Archive,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Keeps error messages readable when a server answers with an HTML page.
pub(crate) fn truncate_body(text: &str) -> String {
    const LIMIT: usize = 512;
    let text = text.trim();
    if text.len() <= LIMIT {
        return text.to_string();
    }
    let mut end = LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
