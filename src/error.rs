//! Application-wide error type
//!
//! Every failure the catalog, session and viewer can report ends up here.
//! The type is `Clone` so it can travel inside iced messages and be shown
//! to the user as a dismissible notice.

use std::path::PathBuf;

use crate::preview::PreviewId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The catalog database could not be opened, read or written
    #[error("catalog store unavailable: {0}")]
    Store(String),

    /// A picked file could not be read from disk
    #[error("could not read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    /// A preview handle from a superseded catalog load was used
    #[error("preview {0} is no longer valid")]
    StalePreview(PreviewId),

    /// The panorama widget refused to start (opaque backend failure)
    #[error("panorama viewer failed to start: {0}")]
    Viewer(String),

    /// The configuration file exists but could not be used
    #[error("configuration error: {0}")]
    Config(String),

    /// The system browser could not be asked to open an external link
    #[error("could not open {url}: {message}")]
    Navigation { url: String, message: String },

    /// Local filesystem failure outside of reading a picked file
    #[error("I/O error: {0}")]
    Io(String),

    /// A background task died before reporting back
    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Viewer(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}
