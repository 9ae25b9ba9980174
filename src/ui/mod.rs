//! iced rendering of the gallery
//!
//! `GalleryView` is the window's View Renderer: the controller pushes pages
//! and pagination state into it, and `view()` turns the stored state into
//! widgets.

pub mod card;
pub mod pagination;

use iced::alignment::Vertical;
use iced::widget::{column, container, pick_list, row, scrollable, text};
use iced::{Element, Length};
use iced_aw::Wrap;
use std::path::PathBuf;

use crate::app::Message;
use crate::config::AppConfig;
use crate::gallery::PaginationControls;
use crate::render::ViewRenderer;
use crate::state::data::{LanguageSummary, Record};
use card::Card;

const GRID_SPACING: f32 = 16.0;

/// Scrollable holding the card grid; page moves snap it back to the top
pub fn grid_scroll_id() -> scrollable::Id {
    scrollable::Id::new("gallery-grid")
}

/// One entry of the language picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChoice {
    /// None is "all languages"
    pub tag: Option<String>,
    pub label: String,
}

impl std::fmt::Display for LanguageChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

pub struct GalleryView {
    archive_dir: PathBuf,
    cards: Vec<Card>,
    controls: PaginationControls,
    options: Vec<LanguageChoice>,
    selected: LanguageChoice,
    pagination_label: String,
    filter_label: String,
    card_width: f32,
}

impl GalleryView {
    pub fn new(config: &AppConfig, archive_dir: PathBuf, languages: &[LanguageSummary]) -> Self {
        let all = LanguageChoice {
            tag: None,
            label: config.all_languages_label.clone(),
        };
        let options = std::iter::once(all.clone())
            .chain(languages.iter().map(|summary| LanguageChoice {
                tag: Some(summary.tag.clone()),
                label: format!("{} ({})", summary.tag, summary.count),
            }))
            .collect();

        Self {
            archive_dir,
            cards: Vec::new(),
            controls: PaginationControls::default(),
            options,
            selected: all,
            pagination_label: config.pagination_label.clone(),
            filter_label: config.language_filter_label.clone(),
            card_width: config.card_width,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn controls(&self) -> PaginationControls {
        self.controls
    }

    pub fn selected(&self) -> &LanguageChoice {
        &self.selected
    }

    fn choice_for(&self, language: Option<&str>) -> LanguageChoice {
        self.options
            .iter()
            .find(|choice| choice.tag.as_deref() == language)
            .cloned()
            .unwrap_or_else(|| LanguageChoice {
                tag: language.map(str::to_string),
                label: language.unwrap_or_default().to_string(),
            })
    }

    pub fn view(&self) -> Element<'_, Message> {
        let picker = row![
            text(&self.filter_label),
            pick_list(
                self.options.as_slice(),
                Some(&self.selected),
                Message::LanguageSelected
            ),
        ]
        .spacing(12)
        .align_y(Vertical::Center);

        let grid: Element<'_, Message> = if self.cards.is_empty() {
            container(text("No talks in this language.")).padding(40).into()
        } else {
            Wrap::with_elements(
                self.cards
                    .iter()
                    .map(|card| card::view(card, self.card_width))
                    .collect(),
            )
            .spacing(GRID_SPACING)
            .line_spacing(GRID_SPACING)
            .into()
        };

        let body = scrollable(
            column![grid, pagination::view(&self.controls, &self.pagination_label)]
                .spacing(24)
                .padding(16)
                .width(Length::Fill),
        )
        .id(grid_scroll_id())
        .height(Length::Fill);

        column![picker, body].spacing(12).into()
    }
}

impl ViewRenderer for GalleryView {
    fn render(&mut self, slice: &[&Record], selected_language: Option<&str>) {
        self.cards = slice
            .iter()
            .map(|record| Card::from_record(record, selected_language, &self.archive_dir))
            .collect();
        self.selected = self.choice_for(selected_language);
    }

    fn render_pagination_controls(&mut self, controls: &PaginationControls) {
        self.controls = *controls;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::GalleryController;
    use crate::gallery::DEFAULT_PAGE_SIZE;
    use crate::state::data::LocalizedText;
    use std::sync::Arc;

    fn dataset() -> Arc<[Record]> {
        (0..45)
            .map(|i| Record {
                id: i.to_string(),
                slug: format!("talk-{i}"),
                speaker: format!("Speaker {i}"),
                titles: vec![LocalizedText::new("default", format!("Title {i}"))],
                descriptions: Vec::new(),
                languages: if i < 3 { vec!["en".into(), "pt-br".into()] } else { vec!["en".into()] },
            })
            .collect()
    }

    fn languages() -> Vec<LanguageSummary> {
        vec![
            LanguageSummary { tag: "en".into(), count: 45 },
            LanguageSummary { tag: "pt-br".into(), count: 3 },
        ]
    }

    #[test]
    fn test_options_start_with_all_languages() {
        let view = GalleryView::new(&AppConfig::default(), PathBuf::from("/a"), &languages());
        let labels: Vec<String> = view.options.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["All languages", "en (45)", "pt-br (3)"]);
        assert_eq!(view.selected().tag, None);
    }

    #[test]
    fn test_controller_drives_the_view() {
        let mut view = GalleryView::new(&AppConfig::default(), PathBuf::from("/a"), &languages());
        let mut controller = GalleryController::new(dataset(), DEFAULT_PAGE_SIZE);

        controller.render(&mut view);
        assert_eq!(view.cards().len(), 40);
        assert_eq!(view.controls(), PaginationControls::new(1, 2));

        controller.on_forward(&mut view);
        assert_eq!(view.cards().len(), 5);
        assert_eq!(view.cards()[0].id, "40");

        controller.on_filter_changed(Some("pt-br"), &mut view);
        assert_eq!(view.cards().len(), 3);
        assert_eq!(view.selected().label, "pt-br (3)");
        assert!(!view.controls().visible());
    }

    #[test]
    fn test_unknown_language_gets_an_ad_hoc_choice() {
        let mut view = GalleryView::new(&AppConfig::default(), PathBuf::from("/a"), &languages());
        view.render(&[], Some("ja"));
        assert_eq!(view.selected().tag.as_deref(), Some("ja"));
        assert!(view.cards().is_empty());
    }
}
