//! Error types for the fontaudit library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fontaudit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while auditing a presentation package.
///
/// Only the package-level conditions are fatal. A missing part is never an
/// error: every consumer treats absence as an empty input and degrades the
/// corresponding report section instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not resolve to an existing file.
    #[error("package not found: {0}")]
    PackageNotFound(PathBuf),

    /// The archive container could not be opened.
    #[error("cannot open package: {0}")]
    PackageCorrupt(String),

    /// A present part's XML could not be parsed.
    #[error("malformed part {part}: {message}")]
    PartMalformed {
        /// Name of the part inside the package.
        part: String,
        /// Underlying parser message.
        message: String,
    },
}

impl Error {
    /// Build a [`Error::PartMalformed`] for the given part.
    pub(crate) fn malformed(part: &str, err: impl std::fmt::Display) -> Self {
        Error::PartMalformed {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::PackageCorrupt(err.to_string())
    }
}
