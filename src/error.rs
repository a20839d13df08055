//! Error types for booksmith conversions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting or packaging a book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("malformed resource {}: {reason}", path.display())]
    MalformedResource { path: PathBuf, reason: String },

    #[error("packaging tool unavailable: {0}")]
    PackagingUnavailable(String),

    #[error("{tool} exited with {status}")]
    PackagingFailed { tool: String, status: String },

    #[error("packaging timed out after {0:?}")]
    PackagingTimeout(std::time::Duration),

    #[error("every packaging strategy failed: {}", .0.join("; "))]
    AllPackagersFailed(Vec<String>),

    #[error("book has no chapters")]
    EmptyBook,

    #[error("cover image error: {0}")]
    Cover(String),
}

impl Error {
    /// Build a [`Error::MalformedResource`] for `path`.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::MalformedResource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
