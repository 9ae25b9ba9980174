//! Background catalog loader
//!
//! Reads the archive, populates the catalog once per data file version and
//! hands the full dataset back. Runs on a blocking task because SQLite and
//! JSON parsing are synchronous.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

use super::read_archive;
use crate::error::{ArchiveError, LoadError};
use crate::state::data::{LanguageSummary, Record};
use crate::state::library::{CatalogSource, Library, PopulateOutcome};

/// What to load, tagged with the generation that asked for it
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub generation: u64,
    pub archive_dir: PathBuf,
    /// None loads into a throwaway in-memory catalog
    pub catalog_path: Option<PathBuf>,
}

/// A completed load
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub generation: u64,
    pub archive_dir: PathBuf,
    pub records: Arc<[Record]>,
    pub languages: Vec<LanguageSummary>,
    /// Language filter remembered from an earlier session
    pub selected_language: Option<String>,
    pub outcome: PopulateOutcome,
}

/// Load the catalog without blocking the UI thread.
/// Errors are flattened to strings so they can travel inside UI messages.
pub async fn load_catalog(request: LoadRequest) -> Result<LoadedCatalog, String> {
    task::spawn_blocking(move || load_catalog_blocking(&request))
        .await
        .map_err(|e| LoadError::Join(e.to_string()).to_string())?
        .map_err(|e| e.to_string())
}

/// Blocking implementation of the catalog load
pub fn load_catalog_blocking(request: &LoadRequest) -> Result<LoadedCatalog, LoadError> {
    let mut library = match &request.catalog_path {
        Some(path) => Library::open(path)?,
        None => Library::open_in_memory()?,
    };

    let root = archive_root(&request.archive_dir);
    let outcome = match read_archive(&request.archive_dir) {
        Ok(archive) => library.populate(&archive.records, &root, &archive.fingerprint)?,
        Err(ArchiveError::DataFileNotFound(missing))
            if library.source()?.as_deref() == Some(root.as_path()) && library.record_count()? > 0 =>
        {
            warn!(
                root = %missing.display(),
                catalog = %library.path().display(),
                "No data file in archive, using the existing catalog"
            );
            PopulateOutcome::AlreadyCurrent
        }
        Err(err) => return Err(err.into()),
    };

    let records: Arc<[Record]> = library.load_all()?.into();
    let languages = library.language_counts()?;
    let selected_language = library.selected_language()?;

    info!(
        generation = request.generation,
        talks = records.len(),
        languages = languages.len(),
        ?outcome,
        "🎬 Catalog loaded"
    );

    Ok(LoadedCatalog {
        generation: request.generation,
        archive_dir: request.archive_dir.clone(),
        records,
        languages,
        selected_language,
        outcome,
    })
}

/// Canonical form of the archive root, so the catalog can tell archives apart
fn archive_root(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}
