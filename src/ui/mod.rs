//! Screens
//!
//! - `grid.rs` - the catalog: header, "Create New Tour" card, tour cards
//! - `panorama.rs` - the open tour with its close button

pub mod grid;
pub mod panorama;

use iced::Color;

/// Accent used for the wordmark
pub const ACCENT: Color = Color::from_rgb(0.286, 0.631, 0.863);
