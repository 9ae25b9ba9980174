//! Error types for the catalog, archive and load layers

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persistence adapter
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to create catalog directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog database error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Failures reading a ted2zim build directory
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive directory does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("no data.js or data.json found under {0}")]
    DataFileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fatal errors of the one-time dataset load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("catalog load task failed: {0}")]
    Join(String),
}

impl From<rusqlite::Error> for LoadError {
    fn from(err: rusqlite::Error) -> Self {
        LoadError::Catalog(CatalogError::Sql(err))
    }
}
