//! Shared data structures for the gallery state
//!
//! These structs represent the data model that flows between
//! the catalog layer and the UI layer. Records are read-only once loaded.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// A piece of text in one language (title or description)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Language tag, or "default" for the archive's main language
    pub lang: String,
    pub text: String,
}

impl LocalizedText {
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            text: text.into(),
        }
    }
}

/// Represents a single talk in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier (numeric ids are normalized to strings)
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Page name of the talk inside the archive
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub speaker: String,
    /// Titles in order; entry 0 is the default title
    #[serde(rename = "title", default)]
    pub titles: Vec<LocalizedText>,
    #[serde(rename = "description", default)]
    pub descriptions: Vec<LocalizedText>,
    /// Languages with subtitles or audio available
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Title picked for a given language selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleChoice<'a> {
    pub text: &'a str,
    /// The language that matched, None when the default title was used
    pub language: Option<&'a str>,
}

impl Record {
    /// Exact, case-sensitive language tag membership
    pub fn has_language(&self, tag: &str) -> bool {
        self.languages.iter().any(|lang| lang == tag)
    }

    /// Pick the title for the selected language, falling back to the default
    pub fn title_for<'a>(&'a self, language: Option<&'a str>) -> TitleChoice<'a> {
        match pick_localized(&self.titles, language) {
            Some((entry, matched)) => TitleChoice {
                text: &entry.text,
                language: matched,
            },
            None => TitleChoice {
                text: &self.slug,
                language: None,
            },
        }
    }

    /// Pick the description for the selected language, falling back to the default
    pub fn description_for<'a>(&'a self, language: Option<&'a str>) -> Option<&'a str> {
        pick_localized(&self.descriptions, language).map(|(entry, _)| entry.text.as_str())
    }

    /// Link to the talk page, carrying the language when a localized title exists
    pub fn href(&self, language: Option<&str>) -> String {
        match self.title_for(language).language {
            Some(lang) => format!("{}?lang={}", self.slug, lang),
            None => self.slug.clone(),
        }
    }

    /// Where the archive keeps this talk's thumbnail
    pub fn thumbnail_path(&self, archive_root: &Path) -> PathBuf {
        archive_root
            .join("videos")
            .join(&self.id)
            .join("thumbnail.webp")
    }
}

/// Returns the matching entry (last match wins) or entry 0
fn pick_localized<'a>(
    entries: &'a [LocalizedText],
    language: Option<&'a str>,
) -> Option<(&'a LocalizedText, Option<&'a str>)> {
    if let Some(lang) = language {
        if let Some(entry) = entries.iter().rev().find(|entry| entry.lang == lang) {
            return Some((entry, Some(lang)));
        }
    }
    entries.first().map(|entry| (entry, None))
}

/// One entry of the language picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSummary {
    pub tag: String,
    /// Number of talks available in this language
    pub count: usize,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
