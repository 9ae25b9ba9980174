use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqlResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::data::{LanguageSummary, LocalizedText, Record};
use crate::error::CatalogError;

/// Bumped whenever the table layout changes; older catalogs are rebuilt
pub const SCHEMA_VERSION: i64 = 1;

/// Preference key for the remembered language filter
pub const SELECTED_LANGUAGE_KEY: &str = "ted2zim.selectedLanguage";

const FINGERPRINT_KEY: &str = "fingerprint";
const SOURCE_KEY: &str = "archive_root";

/// Read side of the persistence adapter consumed by the gallery core
pub trait CatalogSource {
    /// Every record, in original archive order
    fn load_all(&self) -> Result<Vec<Record>, CatalogError>;

    /// Records carrying `tag`, in original archive order
    fn load_by_language(&self, tag: &str) -> Result<Vec<Record>, CatalogError>;
}

/// Result of a bulk population request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateOutcome {
    /// Store already holds this dataset; nothing was written
    AlreadyCurrent,
    /// Store was replaced with this many records
    Populated(usize),
}

/// The Library manages the SQLite talk catalog.
/// It stores the archive's records, a language index and user preferences.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the catalog at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CatalogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(db_path)?;
        info!(path = %db_path.display(), "📁 Catalog opened");

        let mut library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Catalog that lives only as long as this value (tests, one-shot runs)
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let mut library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Get the path where the catalog should be stored by default:
    /// - Linux: ~/.local/share/talk-gallery/catalog.db
    /// - macOS: ~/Library/Application Support/talk-gallery/catalog.db
    /// - Windows: %APPDATA%\talk-gallery\catalog.db
    pub fn default_db_path() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("talk-gallery");
        path.push("catalog.db");
        Some(path)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&mut self) -> SqlResult<()> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version != 0 && version != SCHEMA_VERSION {
            warn!(found = version, expected = SCHEMA_VERSION, "Catalog schema changed, rebuilding");
            self.conn.execute_batch(
                "DROP TABLE IF EXISTS video_languages;
                 DROP TABLE IF EXISTS video_titles;
                 DROP TABLE IF EXISTS video_descriptions;
                 DROP TABLE IF EXISTS videos;
                 DROP TABLE IF EXISTS catalog_meta;",
            )?;
        }

        // Position keeps the archive order stable across loads
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS videos (
                position        INTEGER PRIMARY KEY,
                id              TEXT NOT NULL UNIQUE,
                slug            TEXT NOT NULL,
                speaker         TEXT NOT NULL,
                imported_at     INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS video_titles (
                video_id        TEXT NOT NULL,
                ordinal         INTEGER NOT NULL,
                lang            TEXT NOT NULL,
                text            TEXT NOT NULL,
                PRIMARY KEY (video_id, ordinal)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS video_descriptions (
                video_id        TEXT NOT NULL,
                ordinal         INTEGER NOT NULL,
                lang            TEXT NOT NULL,
                text            TEXT NOT NULL,
                PRIMARY KEY (video_id, ordinal)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS video_languages (
                video_id        TEXT NOT NULL,
                ordinal         INTEGER NOT NULL,
                lang            TEXT NOT NULL,
                PRIMARY KEY (video_id, lang)
            )",
            [],
        )?;

        // The language filter index (IndexedDB's "languages" index)
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_video_languages_lang
             ON video_languages(lang)",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS catalog_meta (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;

        self.conn
            .execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;

        debug!("Catalog schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Get a count of talks in the catalog
    pub fn record_count(&self) -> SqlResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Fingerprint of the dataset currently stored, if any
    pub fn fingerprint(&self) -> SqlResult<Option<String>> {
        self.meta(FINGERPRINT_KEY)
    }

    /// Archive root the stored dataset was read from, if any
    pub fn source(&self) -> SqlResult<Option<PathBuf>> {
        Ok(self.meta(SOURCE_KEY)?.map(PathBuf::from))
    }

    fn meta(&self, key: &str) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM catalog_meta WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Bulk-load the dataset of the archive at `source` once per fingerprint.
    /// A matching, non-empty store is left untouched.
    pub fn populate(
        &mut self,
        records: &[Record],
        source: &Path,
        fingerprint: &str,
    ) -> SqlResult<PopulateOutcome> {
        let current = self.fingerprint()?.as_deref() == Some(fingerprint)
            && self.source()?.as_deref() == Some(source);
        if current && self.record_count()? > 0 {
            debug!(fingerprint, source = %source.display(), "Catalog already current");
            return Ok(PopulateOutcome::AlreadyCurrent);
        }

        let now = Utc::now().timestamp();
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM video_languages;
             DELETE FROM video_titles;
             DELETE FROM video_descriptions;
             DELETE FROM videos;",
        )?;

        let mut inserted = 0usize;
        {
            let mut insert_video = tx.prepare(
                "INSERT OR IGNORE INTO videos (position, id, slug, speaker, imported_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_title = tx.prepare(
                "INSERT INTO video_titles (video_id, ordinal, lang, text) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut insert_description = tx.prepare(
                "INSERT INTO video_descriptions (video_id, ordinal, lang, text) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut insert_language = tx.prepare(
                "INSERT OR IGNORE INTO video_languages (video_id, ordinal, lang) VALUES (?1, ?2, ?3)",
            )?;

            for (position, record) in records.iter().enumerate() {
                let changed = insert_video.execute(params![
                    position as i64,
                    record.id,
                    record.slug,
                    record.speaker,
                    now
                ])?;
                if changed == 0 {
                    warn!(id = %record.id, "Duplicate talk id in archive, skipping");
                    continue;
                }
                inserted += 1;

                for (ordinal, title) in record.titles.iter().enumerate() {
                    insert_title.execute(params![record.id, ordinal as i64, title.lang, title.text])?;
                }
                for (ordinal, description) in record.descriptions.iter().enumerate() {
                    insert_description.execute(params![
                        record.id,
                        ordinal as i64,
                        description.lang,
                        description.text
                    ])?;
                }
                for (ordinal, lang) in record.languages.iter().enumerate() {
                    insert_language.execute(params![record.id, ordinal as i64, lang])?;
                }
            }
        }

        {
            let mut upsert_meta = tx.prepare(
                "INSERT INTO catalog_meta (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            upsert_meta.execute(params![FINGERPRINT_KEY, fingerprint])?;
            upsert_meta.execute(params![SOURCE_KEY, source.to_string_lossy().into_owned()])?;
        }
        tx.commit()?;

        info!(
            records = inserted,
            fingerprint,
            source = %source.display(),
            "✅ Catalog populated"
        );
        Ok(PopulateOutcome::Populated(inserted))
    }

    /// Get all talks, in archive order
    pub fn all_records(&self) -> SqlResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, slug, speaker FROM videos ORDER BY position")?;
        let rows = stmt
            .query_map([], read_video_row)?
            .collect::<SqlResult<Vec<_>>>()?;
        self.assemble(rows, None)
    }

    /// Get the talks available in `tag` through the language index
    pub fn records_with_language(&self, tag: &str) -> SqlResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.id, v.slug, v.speaker
             FROM video_languages l
             JOIN videos v ON v.id = l.video_id
             WHERE l.lang = ?1
             ORDER BY v.position",
        )?;
        let rows = stmt
            .query_map([tag], read_video_row)?
            .collect::<SqlResult<Vec<_>>>()?;
        self.assemble(rows, Some(tag))
    }

    /// Distinct language tags with the number of talks in each, sorted by tag
    pub fn language_counts(&self) -> SqlResult<Vec<LanguageSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT lang, COUNT(*) FROM video_languages GROUP BY lang ORDER BY lang",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(LanguageSummary {
                    tag: row.get(0)?,
                    count: count as usize,
                })
            })?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(summaries)
    }

    /// The language filter the user picked last time, if any
    pub fn selected_language(&self) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [SELECTED_LANGUAGE_KEY],
                |row| row.get(0),
            )
            .optional()
    }

    /// Remember (or forget, with None) the language filter
    pub fn set_selected_language(&self, tag: Option<&str>) -> SqlResult<()> {
        match tag {
            Some(tag) => {
                self.conn.execute(
                    "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![SELECTED_LANGUAGE_KEY, tag],
                )?;
            }
            None => {
                self.conn.execute(
                    "DELETE FROM preferences WHERE key = ?1",
                    [SELECTED_LANGUAGE_KEY],
                )?;
            }
        }
        Ok(())
    }

    /// Attach titles, descriptions and languages to the selected video rows.
    /// With a language, only the detail rows of talks in that language are read.
    fn assemble(&self, rows: Vec<VideoRow>, language: Option<&str>) -> SqlResult<Vec<Record>> {
        let mut titles = self.localized_by_video("video_titles", language)?;
        let mut descriptions = self.localized_by_video("video_descriptions", language)?;
        let mut languages = self.languages_by_video(language)?;

        Ok(rows
            .into_iter()
            .map(|row| Record {
                titles: titles.remove(&row.id).unwrap_or_default(),
                descriptions: descriptions.remove(&row.id).unwrap_or_default(),
                languages: languages.remove(&row.id).unwrap_or_default(),
                id: row.id,
                slug: row.slug,
                speaker: row.speaker,
            })
            .collect())
    }

    fn localized_by_video(
        &self,
        table: &str,
        language: Option<&str>,
    ) -> SqlResult<HashMap<String, Vec<LocalizedText>>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT video_id, lang, text FROM {table} {} ORDER BY video_id, ordinal",
            language_scope(language)
        ))?;
        let mut grouped: HashMap<String, Vec<LocalizedText>> = HashMap::new();
        let entries = stmt.query_map(params_from_iter(language), |row| {
            Ok((row.get::<_, String>(0)?, LocalizedText::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?)))
        })?;
        for entry in entries {
            let (video_id, text) = entry?;
            grouped.entry(video_id).or_default().push(text);
        }
        Ok(grouped)
    }

    fn languages_by_video(&self, language: Option<&str>) -> SqlResult<HashMap<String, Vec<String>>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT video_id, lang FROM video_languages {} ORDER BY video_id, ordinal",
            language_scope(language)
        ))?;
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        let entries = stmt.query_map(params_from_iter(language), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for entry in entries {
            let (video_id, lang) = entry?;
            grouped.entry(video_id).or_default().push(lang);
        }
        Ok(grouped)
    }
}

impl CatalogSource for Library {
    fn load_all(&self) -> Result<Vec<Record>, CatalogError> {
        Ok(self.all_records()?)
    }

    fn load_by_language(&self, tag: &str) -> Result<Vec<Record>, CatalogError> {
        Ok(self.records_with_language(tag)?)
    }
}

/// Restricts a detail query to talks carrying the language bound as ?1
fn language_scope(language: Option<&str>) -> &'static str {
    match language {
        Some(_) => "WHERE video_id IN (SELECT video_id FROM video_languages WHERE lang = ?1)",
        None => "",
    }
}

struct VideoRow {
    id: String,
    slug: String,
    speaker: String,
}

fn read_video_row(row: &rusqlite::Row<'_>) -> SqlResult<VideoRow> {
    Ok(VideoRow {
        id: row.get(0)?,
        slug: row.get(1)?,
        speaker: row.get(2)?,
    })
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
