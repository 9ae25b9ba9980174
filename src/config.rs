//! Configuration loading for the talk gallery.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! defaults so the gallery can still launch.

use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::gallery::DEFAULT_PAGE_SIZE;

/// Where the config is looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// ted2zim build directory to open on startup
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,
    /// Catalog database; defaults to the user data directory
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    /// Persist the language filter between sessions
    #[serde(default = "default_remember_language")]
    pub remember_language: bool,
    #[serde(default = "default_pagination_label")]
    pub pagination_label: String,
    #[serde(default = "default_language_filter_label")]
    pub language_filter_label: String,
    #[serde(default = "default_all_languages_label")]
    pub all_languages_label: String,
    #[serde(default = "default_card_width")]
    pub card_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            page_size: default_page_size(),
            archive_dir: None,
            catalog_path: None,
            theme: ThemeMode::default(),
            log_level: default_log_level(),
            remember_language: default_remember_language(),
            pagination_label: default_pagination_label(),
            language_filter_label: default_language_filter_label(),
            all_languages_label: default_all_languages_label(),
            card_width: default_card_width(),
        }
    }
}

impl AppConfig {
    /// Page size as the pager needs it; zero falls back to the default
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_size).unwrap_or_else(|| {
            warn!(page_size = self.page_size, "Page size must be positive, using default");
            DEFAULT_PAGE_SIZE
        })
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str::<AppConfig>(contents)
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE.get()
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_remember_language() -> bool {
    true
}

fn default_pagination_label() -> String {
    "Page".to_string()
}

fn default_language_filter_label() -> String {
    "Filter by language".to_string()
}

fn default_all_languages_label() -> String {
    "All languages".to_string()
}

fn default_card_width() -> f32 {
    240.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.page_size().get(), 40);
        assert!(cfg.remember_language);
    }

    #[test]
    fn test_partial_config_overrides() {
        let cfg = parse_config(
            r#"
            page_size = 12
            theme = "light"
            log_level = "debug"
            pagination_label = "Seite"
            archive_dir = "/srv/ted"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.page_size().get(), 12);
        assert_eq!(cfg.theme, ThemeMode::Light);
        assert_eq!(cfg.theme.to_string(), "Light");
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.pagination_label, "Seite");
        assert_eq!(cfg.archive_dir, Some(PathBuf::from("/srv/ted")));
        assert_eq!(cfg.all_languages_label, "All languages");
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let cfg = parse_config("page_size = 0").unwrap();
        assert_eq!(cfg.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = \"many\"").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
        assert_eq!(load_config(&dir.path().join("missing.toml")), AppConfig::default());
    }
}
