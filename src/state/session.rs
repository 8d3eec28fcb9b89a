use std::time::Duration;

use super::data::{CatalogEntry, DisplayTour};
use crate::error::{Error, Result};
use crate::preview::PreviewRegistry;
use crate::viewer::{MountedViewer, PanoramaBackend, PanoramaWidget, ViewerAdapter};

/// Sends the user somewhere outside the app
pub trait Navigator {
    fn navigate(&mut self, url: &str) -> Result<()>;
}

/// Opens links in the system browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        webbrowser::open(url).map_err(|e| Error::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// What the app is showing
#[derive(Debug)]
pub enum Session<W: PanoramaWidget> {
    /// The catalog grid, nothing open
    Grid,
    /// One stored tour open in the panorama viewer
    Viewing(Viewing<W>),
}

/// An open tour and the widget showing it.
///
/// Only stored tours can be viewed; virtual tours link out instead.
#[derive(Debug)]
pub struct Viewing<W: PanoramaWidget> {
    pub tour: DisplayTour,
    pub viewer: MountedViewer<W>,
}

/// Outcome of selecting a catalog card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The tour with this id is now open in the viewer
    Opened(i64),
    /// The external link was handed to the navigator; nothing changed here
    Navigated(String),
}

/// Owns the Grid/Viewing state and the only live viewer.
pub struct SessionController<B: PanoramaBackend, N: Navigator> {
    adapter: ViewerAdapter<B>,
    navigator: N,
    state: Session<B::Widget>,
}

impl<B: PanoramaBackend, N: Navigator> SessionController<B, N> {
    pub fn new(adapter: ViewerAdapter<B>, navigator: N) -> Self {
        Self {
            adapter,
            navigator,
            state: Session::Grid,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &Session<B::Widget> {
        &self.state
    }

    pub fn active(&self) -> Option<&Viewing<B::Widget>> {
        match &self.state {
            Session::Viewing(viewing) => Some(viewing),
            Session::Grid => None,
        }
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self.state, Session::Viewing(_))
    }

    /// React to a click on a catalog card.
    ///
    /// Virtual tours go to the navigator and leave the state alone.
    /// Stored tours replace whatever is open: the old widget is destroyed
    /// before the new one is created. If mounting fails the session ends
    /// up on the grid.
    pub fn select(&mut self, entry: &CatalogEntry, previews: &PreviewRegistry) -> Result<Selection> {
        match entry {
            CatalogEntry::Virtual(tour) => {
                tracing::info!("🔗 Leaving for {}", tour.external_link);
                self.navigator.navigate(&tour.external_link)?;
                Ok(Selection::Navigated(tour.external_link.clone()))
            }
            CatalogEntry::Stored(tour) => {
                self.state = Session::Grid;

                let viewer = self.adapter.mount(tour, previews)?;
                self.state = Session::Viewing(Viewing {
                    tour: tour.clone(),
                    viewer,
                });
                Ok(Selection::Opened(tour.id))
            }
        }
    }

    /// Back to the grid. Returns false if nothing was open.
    pub fn close(&mut self) -> bool {
        match std::mem::replace(&mut self.state, Session::Grid) {
            Session::Viewing(viewing) => {
                tracing::info!("Closed tour #{}", viewing.tour.id);
                viewing.viewer.unmount();
                true
            }
            Session::Grid => false,
        }
    }

    pub fn tick(&mut self, elapsed: Duration) {
        if let Session::Viewing(viewing) = &mut self.state {
            viewing.viewer.advance(elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::catalog::CatalogManager;
    use crate::state::data::{PickedFile, VirtualTour};
    use crate::state::library::Library;
    use crate::viewer::adapter::testing::RecordingBackend;

    #[derive(Debug, Default)]
    struct RecordingNavigator {
        visited: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, url: &str) -> Result<()> {
            self.visited.push(url.to_string());
            Ok(())
        }
    }

    struct BrokenNavigator;

    impl Navigator for BrokenNavigator {
        fn navigate(&mut self, url: &str) -> Result<()> {
            Err(Error::Navigation {
                url: url.to_string(),
                message: "no browser".into(),
            })
        }
    }

    fn demo() -> VirtualTour {
        VirtualTour {
            id: "demo-external".into(),
            name: "Demo".into(),
            preview_url: "https://example.com/demo.png".into(),
            external_link: "https://example.com/tour/".into(),
        }
    }

    /// A catalog with the demo entry followed by `names`, newest first
    fn catalog_with(names: &[&str]) -> (Library, CatalogManager) {
        let library = Library::open_in_memory().unwrap();
        for (i, name) in names.iter().enumerate() {
            let picked = PickedFile {
                name: name.to_string(),
                data: vec![i as u8 + 1; 64],
            };
            CatalogManager::import_file(&library, Some(picked)).unwrap();
        }
        let mut catalog = CatalogManager::new(vec![demo()]);
        catalog.load_catalog(&library).unwrap();
        (library, catalog)
    }

    fn controller(backend: &RecordingBackend) -> SessionController<RecordingBackend, RecordingNavigator> {
        SessionController::new(ViewerAdapter::new(backend.clone()), RecordingNavigator::default())
    }

    #[test]
    fn test_starts_in_grid() {
        let session = controller(&RecordingBackend::default());
        assert!(matches!(session.state(), Session::Grid));
        assert!(session.active().is_none());
    }

    #[test]
    fn test_virtual_select_navigates_once_without_state_change() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg"]);

        let selection = session.select(&catalog.entries()[0], catalog.previews()).unwrap();

        assert_eq!(selection, Selection::Navigated("https://example.com/tour/".into()));
        assert_eq!(session.navigator.visited, vec!["https://example.com/tour/".to_string()]);
        assert!(!session.is_viewing());
        assert!(backend.record.borrow().mounts.is_empty());
    }

    #[test]
    fn test_virtual_select_while_viewing_keeps_viewer() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg"]);

        session.select(&catalog.entries()[1], catalog.previews()).unwrap();
        session.select(&catalog.entries()[0], catalog.previews()).unwrap();

        assert!(session.is_viewing());
        assert_eq!(backend.record.borrow().destroys, 0);
    }

    #[test]
    fn test_failed_navigation_is_reported() {
        let mut session = SessionController::new(ViewerAdapter::new(RecordingBackend::default()), BrokenNavigator);
        let (_library, catalog) = catalog_with(&[]);

        let result = session.select(&catalog.entries()[0], catalog.previews());

        assert!(matches!(result, Err(Error::Navigation { .. })));
        assert!(!session.is_viewing());
    }

    #[test]
    fn test_stored_select_mounts_once_with_its_bytes() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg", "b.jpg"]);
        let CatalogEntry::Stored(b) = &catalog.entries()[1] else {
            panic!("expected a stored tour");
        };

        let selection = session.select(&catalog.entries()[1], catalog.previews()).unwrap();

        assert_eq!(selection, Selection::Opened(b.id));
        assert_eq!(session.active().map(|v| v.tour.id), Some(b.id));
        let record = backend.record.borrow();
        assert_eq!(record.mounts.len(), 1);
        assert_eq!(record.mounts[0].0.panorama, b.preview);
        assert_eq!(record.mounts[0].1, vec![2; 64]);
    }

    #[test]
    fn test_close_unmounts_once_and_is_noop_from_grid() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg"]);
        session.select(&catalog.entries()[1], catalog.previews()).unwrap();

        assert!(session.close());
        assert!(!session.close());

        assert!(!session.is_viewing());
        assert_eq!(backend.record.borrow().destroys, 1);
    }

    #[test]
    fn test_reselect_destroys_previous_viewer_first() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg", "b.jpg"]);

        session.select(&catalog.entries()[1], catalog.previews()).unwrap();
        session.select(&catalog.entries()[2], catalog.previews()).unwrap();

        {
            let record = backend.record.borrow();
            assert_eq!(record.mounts.len(), 2);
            assert_eq!(record.destroys, 1);
        }

        drop(session);
        assert_eq!(backend.record.borrow().destroys, 2);
    }

    #[test]
    fn test_failed_mount_leaves_grid() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg", "b.jpg"]);
        session.select(&catalog.entries()[1], catalog.previews()).unwrap();

        let failing = RecordingBackend {
            record: backend.record.clone(),
            fail: true,
        };
        session.adapter = ViewerAdapter::new(failing);
        let result = session.select(&catalog.entries()[2], catalog.previews());

        assert!(matches!(result, Err(Error::Viewer(_))));
        assert!(!session.is_viewing());
        assert_eq!(backend.record.borrow().destroys, 1);
    }

    #[test]
    fn test_stale_preview_after_reload_is_rejected() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (library, mut catalog) = catalog_with(&["a.jpg"]);
        let stale = catalog.entries()[1].clone();

        catalog.load_catalog(&library).unwrap();
        let result = session.select(&stale, catalog.previews());

        assert!(matches!(result, Err(Error::StalePreview(_))));
        assert!(!session.is_viewing());
    }

    #[test]
    fn test_tick_reaches_mounted_widget() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let (_library, catalog) = catalog_with(&["a.jpg"]);

        session.tick(Duration::from_millis(16));
        session.select(&catalog.entries()[1], catalog.previews()).unwrap();
        session.tick(Duration::from_millis(16));

        assert_eq!(backend.record.borrow().elapsed, Duration::from_millis(16));
    }

    #[test]
    fn test_room_scenario() {
        let backend = RecordingBackend::default();
        let mut session = controller(&backend);
        let library = Library::open_in_memory().unwrap();
        let mut catalog = CatalogManager::new(vec![demo()]);
        let room: Vec<u8> = (0..200 * 1024).map(|i| (i % 256) as u8).collect();

        CatalogManager::import_file(
            &library,
            Some(PickedFile {
                name: "room.jpg".into(),
                data: room.clone(),
            }),
        )
        .unwrap();
        let entries = catalog.load_catalog(&library).unwrap().to_vec();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_external());
        assert_eq!(entries[1].name(), "room.jpg");

        session.select(&entries[1], catalog.previews()).unwrap();
        assert!(session.is_viewing());
        {
            let record = backend.record.borrow();
            let (config, image) = &record.mounts[0];
            assert_eq!(
                (config.pitch, config.yaw, config.hfov, config.auto_rotate),
                (10.0, 180.0, 110.0, -2.0)
            );
            assert_eq!(image, &room);
        }

        session.close();
        assert!(matches!(session.state(), Session::Grid));
        assert_eq!(backend.record.borrow().destroys, 1);
    }
}
