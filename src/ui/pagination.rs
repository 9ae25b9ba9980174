//! Pagination bar: back arrow, "Page X/Y", forward arrow
use iced::alignment::Vertical;
use iced::widget::{button, row, text, Space};
use iced::{Element, Length};

use crate::app::Message;
use crate::gallery::PaginationControls;

const ARROW_WIDTH: f32 = 44.0;

pub fn label(controls: &PaginationControls, pagination_label: &str) -> String {
    format!(
        "{} {}/{}",
        pagination_label, controls.page_number, controls.page_count
    )
}

pub fn view<'a>(controls: &PaginationControls, pagination_label: &str) -> Element<'a, Message> {
    // Single page: no bar at all
    if !controls.visible() {
        return Space::new(Length::Shrink, Length::Shrink).into();
    }

    let left = arrow("<", controls.show_left, Message::PreviousPage);
    let right = arrow(">", controls.show_right, Message::NextPage);

    row![left, text(label(controls, pagination_label)).size(16), right]
        .spacing(16)
        .align_y(Vertical::Center)
        .into()
}

/// A hidden arrow keeps its slot so the label does not jump around
fn arrow<'a>(glyph: &'a str, visible: bool, message: Message) -> Element<'a, Message> {
    if visible {
        button(text(glyph).size(20))
            .width(Length::Fixed(ARROW_WIDTH))
            .on_press(message)
            .into()
    } else {
        Space::with_width(Length::Fixed(ARROW_WIDTH)).into()
    }
}
