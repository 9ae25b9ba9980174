//! Terminal mode: print a page of the gallery or the language summary
use std::io::{self, Write};
use thiserror::Error;
use tracing::info;

use crate::archive::{load_catalog_blocking, LoadRequest};
use crate::config::AppConfig;
use crate::controller::GalleryController;
use crate::error::LoadError;
use crate::render::TextRenderer;

#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("page {page} is out of range (the selection has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Load the catalog and print page `page` of the selection to `out`
pub fn print_page<W: Write>(
    request: &LoadRequest,
    config: &AppConfig,
    language: Option<&str>,
    page: usize,
    out: W,
) -> Result<W, HeadlessError> {
    let loaded = load_catalog_blocking(request)?;
    let mut controller = GalleryController::new(loaded.records, config.page_size());

    let remembered = loaded.selected_language.filter(|_| config.remember_language);
    controller.select_language(language.or(remembered.as_deref()));

    if !controller.seek(page) {
        return Err(HeadlessError::PageOutOfRange {
            page,
            count: controller.pager().page_count(),
        });
    }

    info!(
        page,
        pages = controller.pager().page_count(),
        language = controller.selected_language().unwrap_or("all"),
        "Printing gallery page"
    );

    let mut renderer = TextRenderer::new(out, config.pagination_label.clone());
    controller.render(&mut renderer);
    Ok(renderer.finish()?)
}

/// Load the catalog and print `tag<TAB>count` per language
pub fn print_languages<W: Write>(request: &LoadRequest, mut out: W) -> Result<W, HeadlessError> {
    let loaded = load_catalog_blocking(request)?;
    for summary in &loaded.languages {
        writeln!(out, "{}\t{}", summary.tag, summary.count)?;
    }
    out.flush()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_archive(root: &Path, talks: usize) {
        let records: Vec<String> = (0..talks)
            .map(|i| {
                let languages = if i % 2 == 0 { r#"["en", "fr"]"# } else { r#"["en"]"# };
                format!(
                    r#"{{"id": {i}, "slug": "talk-{i}", "speaker": "Speaker {i}", "languages": {languages},
                        "title": [{{"lang": "default", "text": "Title {i}"}}, {{"lang": "fr", "text": "Titre {i}"}}]}}"#
                )
            })
            .collect();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(
            root.join("assets/data.js"),
            format!("json_data = [{}];", records.join(",")),
        )
        .unwrap();
    }

    fn request(root: &Path) -> LoadRequest {
        LoadRequest {
            generation: 1,
            archive_dir: root.to_path_buf(),
            catalog_path: None,
        }
    }

    #[test]
    fn test_print_second_french_page() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), 10);
        let config = AppConfig {
            page_size: 3,
            ..AppConfig::default()
        };

        let out = print_page(&request(dir.path()), &config, Some("fr"), 2, Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Speaker 6 | Titre 6 | talk-6?lang=fr\n\
             Speaker 8 | Titre 8 | talk-8?lang=fr\n\
             < Page 2/2  \n"
        );
    }

    #[test]
    fn test_page_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), 4);
        let err = print_page(&request(dir.path()), &AppConfig::default(), None, 3, Vec::new()).unwrap_err();
        assert!(matches!(err, HeadlessError::PageOutOfRange { page: 3, count: 1 }));
    }

    #[test]
    fn test_print_languages() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), 5);
        let out = print_languages(&request(dir.path()), Vec::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "en\t5\nfr\t3\n");
    }
}
