use iced::{Element, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

mod error;
mod preview;
mod state;
mod ui;
mod viewer;

use error::Error;
use state::catalog::{self, CatalogManager};
use state::config::AppConfig;
use state::data::Tour;
use state::session::{BrowserNavigator, Navigator, Selection, SessionController};
use viewer::{StillBackend, ViewerAdapter};

/// Extensions offered by the import dialog
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// Frame interval while a panorama is open
const TICK: Duration = Duration::from_millis(33);

/// Main application state
struct TourViewer<N: Navigator = BrowserNavigator> {
    config: AppConfig,
    /// The catalog database, None if no location could be determined
    db_path: Option<PathBuf>,
    /// The tours shown in the grid
    catalog: CatalogManager,
    /// Grid or viewer
    session: SessionController<StillBackend, N>,
    /// Status message to display to the user
    status: String,
    /// Error waiting to be dismissed
    notice: Option<String>,
    last_tick: Option<Instant>,
    /// Number of the most recently started catalog load
    load_seq: u64,
    /// Number of the load whose result is on screen
    applied_seq: u64,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Import" or the "Create New Tour" card
    ImportTour,
    /// Background import finished (None = nothing was imported)
    TourImported(Result<Option<Tour>, Error>),
    /// Background catalog load number `.0` finished
    CatalogLoaded(u64, Result<Vec<Tour>, Error>),
    /// User clicked the card at this position
    Select(usize),
    /// User clicked the viewer's close button
    CloseViewer,
    Tick(Instant),
    DismissNotice,
}

impl TourViewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();

        let mut notice = None;
        let db_path = match config.database_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("❌ {}", e);
                notice = Some(e.to_string());
                None
            }
        };

        let mut app = TourViewer::with_navigator(config, db_path, BrowserNavigator);
        app.notice = notice;

        let task = app.reload();
        tracing::info!("🎨 Tour viewer initialized");
        (app, task)
    }
}

impl<N: Navigator> TourViewer<N> {
    fn with_navigator(config: AppConfig, db_path: Option<PathBuf>, navigator: N) -> Self {
        TourViewer {
            catalog: CatalogManager::new(config.virtual_tours.clone()),
            session: SessionController::new(ViewerAdapter::new(StillBackend), navigator),
            config,
            db_path,
            status: "Loading tours...".into(),
            notice: None,
            last_tick: None,
            load_seq: 0,
            applied_seq: 0,
        }
    }

    /// Re-read the whole catalog in the background
    fn reload(&mut self) -> Task<Message> {
        let Some(db_path) = self.db_path.clone() else {
            return Task::none();
        };

        self.load_seq += 1;
        let seq = self.load_seq;
        Task::perform(catalog::load_tours(db_path), move |result| Message::CatalogLoaded(seq, result))
    }

    fn report(&mut self, error: Error) {
        tracing::warn!("⚠️  {}", error);
        self.notice = Some(error.to_string());
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImportTour => {
                let Some(db_path) = self.db_path.clone() else {
                    self.report(Error::Store("no catalog location available".into()));
                    return Task::none();
                };

                // Show the native file picker dialog
                let picked = FileDialog::new()
                    .set_title("Select a 360° Image")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_file();

                // Cancelling the dialog is not an error
                if picked.is_none() {
                    return Task::none();
                }

                self.status = "Importing...".into();
                Task::perform(catalog::import_tour(db_path, picked), Message::TourImported)
            }
            Message::TourImported(Ok(Some(tour))) => {
                self.status = format!("✅ Imported {}", tour.name);
                self.reload()
            }
            Message::TourImported(Ok(None)) => {
                self.status = self.catalog_status();
                Task::none()
            }
            Message::TourImported(Err(e)) => {
                self.status = self.catalog_status();
                self.report(e);
                Task::none()
            }
            Message::CatalogLoaded(seq, result) => {
                // Loads can settle out of order; never go back to an older list
                if seq < self.applied_seq {
                    tracing::debug!("Dropping catalog load #{} (#{} already applied)", seq, self.applied_seq);
                    return Task::none();
                }
                self.applied_seq = seq;

                match result {
                    Ok(tours) => {
                        self.catalog.apply_load(tours);
                    }
                    Err(e) => self.report(e),
                }
                self.status = self.catalog_status();
                Task::none()
            }
            Message::Select(index) => {
                let Some(entry) = self.catalog.entries().get(index).cloned() else {
                    return Task::none();
                };
                tracing::debug!("Selected {}", entry.name());

                match self.session.select(&entry, self.catalog.previews()) {
                    Ok(Selection::Navigated(_)) if self.config.exit_after_navigation => iced::exit(),
                    Ok(_) => {
                        self.last_tick = None;
                        Task::none()
                    }
                    Err(e) => {
                        self.report(e);
                        Task::none()
                    }
                }
            }
            Message::CloseViewer => {
                self.session.close();
                Task::none()
            }
            Message::Tick(now) => {
                let elapsed = self
                    .last_tick
                    .map(|last| now.saturating_duration_since(last))
                    .unwrap_or_default();
                self.last_tick = Some(now);
                self.session.tick(elapsed);
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    fn catalog_status(&self) -> String {
        format!("{} tours in library", self.catalog.stored_count())
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.session.active() {
            Some(viewing) => ui::panorama::view(viewing),
            None => ui::grid::view(&self.catalog, &self.status, self.notice.as_deref()),
        }
    }

    /// Drive auto-rotation only while a panorama is open
    fn subscription(&self) -> Subscription<Message> {
        if self.session.is_viewing() {
            iced::time::every(TICK).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    type App = TourViewer<BrowserNavigator>;

    iced::application("3DCristi", App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .centered()
        .run_with(App::new)
}
