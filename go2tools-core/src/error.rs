use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("Malformed input in {}: {}", .path.display(), .reason)]
    MalformedInput { path: PathBuf, reason: String },
    #[error("Malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        source: serde_json::Error,
    },
    #[error("Failed to back up {} to {}: {}", .path.display(), .backup.display(), .reason)]
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        reason: String,
    },
    #[error(
        "Failed to write {}, recover it manually from {}: {}",
        .path.display(),
        .backup.display(),
        .source
    )]
    WriteFailed {
        path: PathBuf,
        backup: PathBuf,
        source: std::io::Error,
    },
    #[error("Fetch failed: {0}")]
    FetchFailed(reqwest::Error),
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("std::io error: {0}")]
    IoError(std::io::Error),
}

impl Error {
    pub(crate) fn malformed_input<P, E>(path: P, err: E) -> Self
    where
        P: Into<PathBuf>,
        E: std::fmt::Display,
    {
        Self::MalformedInput {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::FetchFailed(err)
    }
}
