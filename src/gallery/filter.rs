//! Language filtering over the loaded dataset
//!
//! The active set is a view (shared dataset + ordered index list), so it is
//! always a subset of the dataset and keeps the archive's relative order.

use std::sync::Arc;

use crate::state::data::Record;

/// Picker value meaning "no language filter"
pub const ALL_LANGUAGES: &str = "lang-all";

/// Map the "all languages" sentinel to no filter
pub fn normalize_language(language: Option<&str>) -> Option<&str> {
    language.filter(|tag| *tag != ALL_LANGUAGES)
}

/// Ordered subset of the dataset matching the current filter
#[derive(Debug, Clone)]
pub struct ActiveSet {
    dataset: Arc<[Record]>,
    indices: Arc<[usize]>,
    language: Option<String>,
}

impl ActiveSet {
    fn everything(dataset: Arc<[Record]>) -> Self {
        let indices: Arc<[usize]> = (0..dataset.len()).collect();
        Self {
            dataset,
            indices,
            language: None,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The language this set was filtered by
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.indices.get(position).map(|&index| &self.dataset[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.indices.iter().map(move |&index| &self.dataset[index])
    }

    /// Records at `range`, clipped to the available length
    pub fn slice(&self, range: std::ops::Range<usize>) -> Vec<&Record> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.indices[start..end]
            .iter()
            .map(|&index| &self.dataset[index])
            .collect()
    }
}

impl PartialEq for ActiveSet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset)
            && self.indices == other.indices
            && self.language == other.language
    }
}

impl Eq for ActiveSet {}

/// Derives the active set from the full dataset
#[derive(Debug, Clone)]
pub struct DatasetFilter {
    dataset: Arc<[Record]>,
}

impl DatasetFilter {
    pub fn new(dataset: Arc<[Record]>) -> Self {
        Self { dataset }
    }

    /// Records carrying `language` in archive order, or everything when absent.
    /// An unknown tag yields an empty set. Callers reset the pager afterwards.
    pub fn apply(&self, language: Option<&str>) -> ActiveSet {
        let Some(tag) = normalize_language(language) else {
            return ActiveSet::everything(Arc::clone(&self.dataset));
        };

        let indices: Arc<[usize]> = self
            .dataset
            .iter()
            .enumerate()
            .filter(|(_, record)| record.has_language(tag))
            .map(|(index, _)| index)
            .collect();

        ActiveSet {
            dataset: Arc::clone(&self.dataset),
            indices,
            language: Some(tag.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::LocalizedText;

    fn record(id: usize, languages: &[&str]) -> Record {
        Record {
            id: id.to_string(),
            slug: format!("talk-{id}"),
            speaker: format!("Speaker {id}"),
            titles: vec![LocalizedText::new("default", format!("Title {id}"))],
            descriptions: Vec::new(),
            languages: languages.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn dataset() -> Arc<[Record]> {
        vec![
            record(0, &["en", "fr"]),
            record(1, &["en"]),
            record(2, &["fr"]),
            record(3, &["de", "en"]),
            record(4, &["fr", "de"]),
        ]
        .into()
    }

    fn ids(set: &ActiveSet) -> Vec<String> {
        set.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_no_language_returns_everything_in_order() {
        let filter = DatasetFilter::new(dataset());
        let set = filter.apply(None);
        assert_eq!(set.len(), 5);
        assert_eq!(ids(&set), vec!["0", "1", "2", "3", "4"]);
        assert_eq!(set.language(), None);
    }

    #[test]
    fn test_sentinel_means_all_languages() {
        let filter = DatasetFilter::new(dataset());
        assert_eq!(filter.apply(Some(ALL_LANGUAGES)), filter.apply(None));
    }

    #[test]
    fn test_filter_keeps_only_matching_records_in_order() {
        let filter = DatasetFilter::new(dataset());
        let set = filter.apply(Some("fr"));
        assert_eq!(ids(&set), vec!["0", "2", "4"]);
        assert!(set.iter().all(|r| r.has_language("fr")));
        assert_eq!(set.language(), Some("fr"));
    }

    #[test]
    fn test_apply_is_idempotent_for_every_tag() {
        let filter = DatasetFilter::new(dataset());
        for tag in ["en", "fr", "de"] {
            assert_eq!(filter.apply(Some(tag)), filter.apply(Some(tag)));
        }
    }

    #[test]
    fn test_unknown_or_differently_cased_tag_is_empty() {
        let filter = DatasetFilter::new(dataset());
        assert!(filter.apply(Some("ja")).is_empty());
        assert!(filter.apply(Some("FR")).is_empty());
    }

    #[test]
    fn test_active_set_shares_the_dataset() {
        let data = dataset();
        let filter = DatasetFilter::new(Arc::clone(&data));
        let set = filter.apply(Some("de"));
        let first = set.get(0).unwrap();
        assert!(std::ptr::eq(first, &data[3]));
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_slice_clips_to_length() {
        let filter = DatasetFilter::new(dataset());
        let set = filter.apply(Some("en"));
        assert_eq!(set.slice(1..10).len(), 2);
        assert!(set.slice(7..9).is_empty());
    }
}
