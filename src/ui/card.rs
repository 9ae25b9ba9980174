//! Talk card: thumbnail, speaker and title
use iced::widget::{button, column, image, text};
use iced::{ContentFit, Element, Length};
use std::path::{Path, PathBuf};

use crate::app::Message;
use crate::state::data::Record;

/// Thumbnails are 16:9
const THUMBNAIL_RATIO: f32 = 9.0 / 16.0;

/// Everything a card needs, resolved for the selected language
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub speaker: String,
    pub title: String,
    pub href: String,
    pub thumbnail: PathBuf,
}

impl Card {
    pub fn from_record(record: &Record, language: Option<&str>, archive_root: &Path) -> Self {
        Self {
            id: record.id.clone(),
            speaker: record.speaker.clone(),
            title: record.title_for(language).text.to_string(),
            href: record.href(language),
            thumbnail: record.thumbnail_path(archive_root),
        }
    }
}

pub fn view(card: &Card, width: f32) -> Element<'_, Message> {
    let thumbnail = image(image::Handle::from_path(&card.thumbnail))
        .width(Length::Fixed(width))
        .height(Length::Fixed(width * THUMBNAIL_RATIO))
        .content_fit(ContentFit::Cover);

    let content = column![
        thumbnail,
        text(&card.speaker).size(13),
        text(&card.title).size(16),
    ]
    .spacing(6)
    .width(Length::Fixed(width));

    button(content)
        .style(button::text)
        .padding(4)
        .on_press(Message::TalkPressed(card.href.clone()))
        .into()
}
