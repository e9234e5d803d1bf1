use std::path::PathBuf;

use coaster_kernel::TrackError;

/// Errors while reading spline files or track configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("spline file holds no control points")]
    Empty,

    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is not supported (current version {supported_version})")]
    UnsupportedVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("track configuration rejected: {0}")]
    InvalidConfig(#[from] TrackError),
}

/// Errors while writing track configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize track configuration: {0}")]
    Serialize(String),
}
