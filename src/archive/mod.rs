//! ted2zim archive access
//!
//! This module handles:
//! - Finding and parsing the archive's `data.js` (this file)
//! - The one-time background load into the catalog (loader.rs)

pub mod loader;

pub use loader::{load_catalog, load_catalog_blocking, LoadRequest, LoadedCatalog};

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ArchiveError;
use crate::state::data::Record;

/// Candidate data files, relative to the archive root, in lookup order
const DATA_FILE_CANDIDATES: [&str; 4] = ["assets/data.js", "assets/data.json", "data.js", "data.json"];

/// Deepest level searched when the data file is not in a standard place
const MAX_SEARCH_DEPTH: usize = 3;

/// Parsed contents of an archive's data file
#[derive(Debug, Clone)]
pub struct ArchiveData {
    pub data_path: PathBuf,
    pub records: Vec<Record>,
    /// Identifies this version of the data file (size and modification time)
    pub fingerprint: String,
}

/// Find the data file inside a ted2zim build directory
pub fn locate_data_file(root: &Path) -> Result<PathBuf, ArchiveError> {
    if !root.is_dir() {
        return Err(ArchiveError::MissingRoot(root.to_path_buf()));
    }

    if let Some(found) = DATA_FILE_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.is_file())
    {
        return Ok(found);
    }

    debug!(root = %root.display(), "Searching archive for a data file");
    WalkDir::new(root)
        .max_depth(MAX_SEARCH_DEPTH)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| {
            matches!(
                path.file_name().and_then(|name| name.to_str()),
                Some("data.js") | Some("data.json")
            )
        })
        .ok_or_else(|| ArchiveError::DataFileNotFound(root.to_path_buf()))
}

/// Parse `json_data = [...];` (or a bare JSON array) into records
pub fn parse_data_file(contents: &str) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_str(strip_assignment(contents))
}

/// Drop the JavaScript assignment wrapper around the JSON payload
fn strip_assignment(contents: &str) -> &str {
    let mut body = contents.trim().trim_start_matches('\u{feff}');
    for prefix in ["var ", "let ", "const "] {
        if let Some(rest) = body.strip_prefix(prefix) {
            body = rest;
        }
    }
    if let Some(rest) = body.strip_prefix("json_data") {
        body = rest.trim_start().strip_prefix('=').unwrap_or(rest);
    }
    body.trim().trim_end_matches(';').trim_end()
}

/// Read and parse the archive rooted at `root`
pub fn read_archive(root: &Path) -> Result<ArchiveData, ArchiveError> {
    let data_path = locate_data_file(root)?;
    let read_err = |source| ArchiveError::Read {
        path: data_path.clone(),
        source,
    };

    let contents = fs::read_to_string(&data_path).map_err(read_err)?;
    let metadata = fs::metadata(&data_path).map_err(read_err)?;
    let records = parse_data_file(&contents).map_err(|source| ArchiveError::Parse {
        path: data_path.clone(),
        source,
    })?;

    let modified = metadata
        .modified()
        .map(|time| DateTime::<Utc>::from(time).timestamp())
        .unwrap_or_default();
    let fingerprint = format!("{}:{}", metadata.len(), modified);

    info!(
        path = %data_path.display(),
        talks = records.len(),
        %fingerprint,
        "Read archive data file"
    );

    Ok(ArchiveData {
        data_path,
        records,
        fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_JS: &str = r#"json_data = [
    {
        "languages": ["en", "fr"],
        "id": 1,
        "description": [{"lang": "default", "text": "First"}],
        "title": [{"lang": "default", "text": "One"}, {"lang": "fr", "text": "Un"}],
        "speaker": "Ada",
        "slug": "one"
    },
    {
        "languages": ["en"],
        "id": "2",
        "description": [],
        "title": [{"lang": "default", "text": "Two"}],
        "speaker": "Grace",
        "slug": "two"
    }
];
"#;

    #[test]
    fn test_parse_data_js_assignment() {
        let records = parse_data_file(DATA_JS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].title_for(Some("fr")).text, "Un");
        assert_eq!(records[1].speaker, "Grace");
    }

    #[test]
    fn test_parse_plain_json_and_var_prefix() {
        assert!(parse_data_file("[]").unwrap().is_empty());
        assert_eq!(parse_data_file("var json_data=[{\"id\": 5}]").unwrap()[0].id, "5");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_data_file("json_data = {").is_err());
    }

    #[test]
    fn test_locate_prefers_assets_data_js() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/data.js"), DATA_JS).unwrap();
        fs::write(dir.path().join("data.json"), "[]").unwrap();

        let found = locate_data_file(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("assets/data.js"));
    }

    #[test]
    fn test_locate_searches_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("build").join("assets");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("data.js"), DATA_JS).unwrap();

        assert_eq!(locate_data_file(dir.path()).unwrap(), nested.join("data.js"));
    }

    #[test]
    fn test_locate_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            locate_data_file(dir.path()),
            Err(ArchiveError::DataFileNotFound(_))
        ));
        assert!(matches!(
            locate_data_file(&dir.path().join("nope")),
            Err(ArchiveError::MissingRoot(_))
        ));
    }

    #[test]
    fn test_read_archive_fingerprint_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.js"), DATA_JS).unwrap();
        let first = read_archive(dir.path()).unwrap();
        assert_eq!(first.records.len(), 2);
        assert!(first.fingerprint.starts_with(&format!("{}:", DATA_JS.len())));

        fs::write(dir.path().join("data.js"), "json_data = [];").unwrap();
        let second = read_archive(dir.path()).unwrap();
        assert!(second.records.is_empty());
        assert_ne!(first.fingerprint, second.fingerprint);
    }
}
