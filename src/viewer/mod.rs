//! Panorama viewer module
//!
//! Wraps the panorama widget so the rest of the app never touches it
//! directly:
//!
//! - `config.rs` - the fixed presentation settings every tour opens with
//! - `adapter.rs` - backend/widget traits, mounting and the guard that
//!   destroys the widget
//! - `still.rs` - the desktop backend (decodes the image, auto-rotates)
//!
//! Rendering itself is up to the backend. A tour whose image the backend
//! can't load fails to mount and the session stays on the grid.

pub mod adapter;
pub mod config;
pub mod still;

pub use adapter::{MountedViewer, PanoramaBackend, PanoramaWidget, ViewerAdapter};
pub use still::{StillBackend, StillPanorama};
