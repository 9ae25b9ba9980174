//! Rendering sinks for the gallery
//!
//! The controller emits exactly two logical calls per state change; a
//! renderer decides what they look like (iced widgets, or plain text).

use std::io::{self, Write};

use crate::gallery::PaginationControls;
use crate::state::data::Record;

/// Receives the visible page and the pagination state
pub trait ViewRenderer {
    /// Rebuild the visible list from one page of records
    fn render(&mut self, slice: &[&Record], selected_language: Option<&str>);

    /// Update the page label and arrow visibility
    fn render_pagination_controls(&mut self, controls: &PaginationControls);
}

/// Headless renderer writing one line per talk
pub struct TextRenderer<W: Write> {
    out: W,
    pagination_label: String,
    error: Option<io::Error>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, pagination_label: impl Into<String>) -> Self {
        Self {
            out,
            pagination_label: pagination_label.into(),
            error: None,
        }
    }

    /// Hand back the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_fmt(line).and_then(|_| self.out.write_all(b"\n")) {
            self.error = Some(err);
        }
    }
}

impl<W: Write> ViewRenderer for TextRenderer<W> {
    fn render(&mut self, slice: &[&Record], selected_language: Option<&str>) {
        if slice.is_empty() {
            self.emit(format_args!("(no talks)"));
            return;
        }
        for record in slice {
            let title = record.title_for(selected_language);
            self.emit(format_args!(
                "{} | {} | {}",
                record.speaker,
                title.text,
                record.href(selected_language)
            ));
        }
    }

    fn render_pagination_controls(&mut self, controls: &PaginationControls) {
        if !controls.visible() {
            return;
        }
        let left = if controls.show_left { "<" } else { " " };
        let right = if controls.show_right { ">" } else { " " };
        let label = self.pagination_label.clone();
        self.emit(format_args!(
            "{left} {label} {}/{} {right}",
            controls.page_number, controls.page_count
        ));
    }
}
