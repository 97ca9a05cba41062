use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use async_sqlite::rusqlite;

pub type Result<T, E = PulseError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// The engine rejected the query.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    AsyncSqlite(#[from] async_sqlite::Error),

    /// Rows could not be rendered in the requested output format.
    #[error("failed to encode result: {0}")]
    Encoding(String),

    #[error("failed to load keyword dictionary '{}': {reason}", path.display())]
    Dictionary { path: PathBuf, reason: String },

    #[error("request is not valid utf-8: {0}")]
    InvalidRequest(#[from] Utf8Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for PulseError {
    fn from(e: serde_json::Error) -> Self {
        PulseError::Encoding(e.to_string())
    }
}
