//! The gallery window
//!
//! Owns the controller once the catalog is loaded. Loads are tagged with a
//! generation number; a completion from a superseded load is dropped.

use iced::widget::scrollable::{self, RelativeOffset};
use iced::widget::{button, column, container, row, text};
use iced::alignment::Vertical;
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::archive::{load_catalog, LoadRequest, LoadedCatalog};
use crate::config::{AppConfig, ThemeMode};
use crate::controller::GalleryController;
use crate::state::library::Library;
use crate::ui::{self, GalleryView, LanguageChoice};

/// Startup parameters resolved from the CLI and config
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub config: AppConfig,
    pub archive_dir: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    /// Language to start with, taking precedence over the remembered one
    pub language: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Open Archive"
    OpenArchive,
    /// Load the current archive again
    Reload,
    /// Background load finished for the given generation
    CatalogLoaded(u64, Result<LoadedCatalog, String>),
    LanguageSelected(LanguageChoice),
    PreviousPage,
    NextPage,
    /// A card was clicked (carries the talk link)
    TalkPressed(String),
}

enum Screen {
    /// No archive chosen yet
    Welcome,
    Loading,
    Failed(String),
    Ready {
        controller: GalleryController,
        view: GalleryView,
    },
}

/// Main application state
pub struct GalleryApp {
    config: AppConfig,
    archive_dir: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    pending_language: Option<String>,
    /// Connection used for preference writes on the UI thread
    preferences: Option<Library>,
    screen: Screen,
    generation: u64,
    status: String,
}

impl GalleryApp {
    fn new(options: LaunchOptions) -> (Self, Task<Message>) {
        let preferences = options
            .catalog_path
            .as_deref()
            .and_then(|path| match Library::open(path) {
                Ok(library) => Some(library),
                Err(err) => {
                    warn!("Preferences unavailable: {err}");
                    None
                }
            });

        let mut app = GalleryApp {
            config: options.config,
            archive_dir: options.archive_dir,
            catalog_path: options.catalog_path,
            pending_language: options.language,
            preferences,
            screen: Screen::Welcome,
            generation: 0,
            status: String::from("Open a ted2zim build directory to browse its talks."),
        };

        let task = app.start_load();
        (app, task)
    }

    /// Kick off a load for the current archive, superseding any in flight
    fn start_load(&mut self) -> Task<Message> {
        let Some(archive_dir) = self.archive_dir.clone() else {
            return Task::none();
        };

        self.generation += 1;
        let generation = self.generation;
        self.screen = Screen::Loading;
        self.status = format!("Loading {}...", archive_dir.display());
        info!(generation, archive = %archive_dir.display(), "Loading catalog");

        let request = LoadRequest {
            generation,
            archive_dir,
            catalog_path: self.catalog_path.clone(),
        };
        Task::perform(load_catalog(request), move |result| {
            Message::CatalogLoaded(generation, result)
        })
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenArchive => {
                let folder = FileDialog::new()
                    .set_title("Select a ted2zim build directory")
                    .pick_folder();

                if let Some(folder) = folder {
                    self.archive_dir = Some(folder);
                    return self.start_load();
                }
                Task::none()
            }
            Message::Reload => self.start_load(),
            Message::CatalogLoaded(generation, result) => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "Ignoring stale catalog load");
                    return Task::none();
                }
                match result {
                    Ok(loaded) => self.show_catalog(loaded),
                    Err(err) => {
                        error!("Catalog load failed: {err}");
                        self.status = String::from("Could not load the archive.");
                        self.screen = Screen::Failed(err);
                    }
                }
                Task::none()
            }
            Message::LanguageSelected(choice) => {
                if let Screen::Ready { controller, view } = &mut self.screen {
                    controller.on_filter_changed(choice.tag.as_deref(), view);
                    self.status = format!("{} talks", controller.active().len());
                    if self.config.remember_language {
                        if let Some(library) = &self.preferences {
                            if let Err(err) = library.set_selected_language(controller.selected_language()) {
                                warn!("Failed to remember language: {err}");
                            }
                        }
                    }
                }
                Task::none()
            }
            Message::PreviousPage => self.turn_page(false),
            Message::NextPage => self.turn_page(true),
            Message::TalkPressed(href) => {
                info!(%href, "Talk selected");
                self.status = href;
                Task::none()
            }
        }
    }

    fn show_catalog(&mut self, loaded: LoadedCatalog) {
        let mut controller = GalleryController::new(loaded.records, self.config.page_size());
        let mut view = GalleryView::new(&self.config, loaded.archive_dir, &loaded.languages);

        let remembered = loaded.selected_language.filter(|_| self.config.remember_language);
        let language = self.pending_language.take().or(remembered);
        controller.on_filter_changed(language.as_deref(), &mut view);

        self.status = format!("{} talks", controller.active().len());
        self.screen = Screen::Ready { controller, view };
    }

    /// Only a real move scrolls back to the top
    fn turn_page(&mut self, forward: bool) -> Task<Message> {
        if self.move_page(forward) {
            scrollable::snap_to(ui::grid_scroll_id(), RelativeOffset::START)
        } else {
            Task::none()
        }
    }

    /// Move one page; false (and no redraw) at either end
    fn move_page(&mut self, forward: bool) -> bool {
        let Screen::Ready { controller, view } = &mut self.screen else {
            return false;
        };
        if forward {
            controller.on_forward(view)
        } else {
            controller.on_back(view)
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let open_button = button("Open Archive").on_press(Message::OpenArchive).padding(10);

        match &self.screen {
            Screen::Welcome => centered(
                column![text("TED Talks").size(40), text(&self.status).size(16), open_button]
                    .spacing(20)
                    .align_x(Alignment::Center),
            ),
            Screen::Loading => centered(text(&self.status).size(18)),
            Screen::Failed(err) => centered(
                column![
                    text("Could not load the archive").size(24),
                    text(err).size(14),
                    row![
                        open_button,
                        button("Retry").on_press(Message::Reload).padding(10),
                    ]
                    .spacing(12),
                ]
                .spacing(16)
                .align_x(Alignment::Center),
            ),
            Screen::Ready { view, .. } => {
                let header = row![
                    text("TED Talks").size(28).width(Length::Fill),
                    text(&self.status).size(14),
                    open_button,
                ]
                .spacing(16)
                .align_y(Vertical::Center);

                column![header, view.view()]
                    .spacing(12)
                    .padding(16)
                    .into()
            }
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.config.theme {
            ThemeMode::Dark => Theme::Dark,
            ThemeMode::Light => Theme::Light,
        }
    }
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Open the gallery window
pub fn run(options: LaunchOptions) -> iced::Result {
    iced::application("TED Talks", GalleryApp::update, GalleryApp::view)
        .theme(GalleryApp::theme)
        .centered()
        .run_with(move || GalleryApp::new(options))
}
