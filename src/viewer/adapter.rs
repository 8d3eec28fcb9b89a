use std::time::Duration;

use super::config::PanoramaConfig;
use crate::error::{Error, Result};
use crate::preview::PreviewRegistry;
use crate::state::data::DisplayTour;

/// Something that can build panorama widgets
pub trait PanoramaBackend {
    type Widget: PanoramaWidget;

    /// Start a widget showing `image`. Failures are the backend's own
    /// business; they come back as `Error::Viewer`.
    fn create(&self, config: &PanoramaConfig, image: &[u8]) -> Result<Self::Widget>;
}

/// A live panorama widget
pub trait PanoramaWidget {
    /// Release everything the widget holds. Called exactly once.
    fn destroy(&mut self);

    /// Frame time for animations (auto-rotate)
    fn advance(&mut self, _elapsed: Duration) {}
}

/// Mounts tours into panorama widgets with the fixed viewer settings
#[derive(Debug, Clone, Default)]
pub struct ViewerAdapter<B> {
    backend: B,
}

impl<B: PanoramaBackend> ViewerAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Create a widget for `tour`.
    ///
    /// The returned guard is the only owner of the widget; dropping it
    /// destroys the widget.
    pub fn mount(&self, tour: &DisplayTour, previews: &PreviewRegistry) -> Result<MountedViewer<B::Widget>> {
        let image = previews
            .bytes(tour.preview)
            .ok_or(Error::StalePreview(tour.preview))?;

        let config = PanoramaConfig::equirectangular(tour.preview);
        let widget = self.backend.create(&config, image)?;

        tracing::info!("🌐 Mounted viewer for tour #{} ({})", tour.id, tour.name);

        Ok(MountedViewer {
            tour_id: tour.id,
            widget,
        })
    }
}

/// A mounted widget. Destroys it on drop.
#[derive(Debug)]
pub struct MountedViewer<W: PanoramaWidget> {
    tour_id: i64,
    widget: W,
}

impl<W: PanoramaWidget> MountedViewer<W> {
    #[cfg(test)]
    pub fn tour_id(&self) -> i64 {
        self.tour_id
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.widget.advance(elapsed);
    }

    /// Tear the widget down now instead of at end of scope
    pub fn unmount(self) {
        drop(self);
    }
}

impl<W: PanoramaWidget> Drop for MountedViewer<W> {
    fn drop(&mut self) {
        self.widget.destroy();
        tracing::debug!("Unmounted viewer for tour #{}", self.tour_id);
    }
}
