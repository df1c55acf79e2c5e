//! Error handling for msgstore.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Main error type for msgstore operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The handle has no open connection.
    #[error("Database not open")]
    NotOpen,

    #[error("Database {0:?} already opened")]
    AlreadyOpen(PathBuf),

    #[error("Cannot open database {path:?}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// SQLite was built without full internal serialization.
    #[error("SQLite compiled thread-unsafe; this is not supported")]
    ThreadingUnsupported,

    /// A competing writer held the database past the busy timeout.
    #[error("Database busy")]
    Busy,

    #[error("Cannot prepare statement \"{sql}\": {source}")]
    PrepareFailed {
        sql: String,
        source: rusqlite::Error,
    },

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Non-fatal; the migration engine logs these and moves on to the
    /// next step.
    #[error("Migration to version {version} failed: {source}")]
    MigrationStepFailed {
        version: u32,
        source: Box<StoreError>,
    },

    /// Fresh-store creation did not produce the required baseline tables.
    #[error("Cannot create schema: {0}")]
    SchemaCreateFailed(String),

    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy) => Self::Busy,
            _ => Self::Sqlite(err),
        }
    }
}
