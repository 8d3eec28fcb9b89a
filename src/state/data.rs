//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the database layer, the catalog manager and the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::preview::PreviewId;

/// A tour as stored in the catalog database
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Unique database ID, assigned on insert and never reused
    pub id: i64,
    /// Original filename (e.g., "room.jpg")
    pub name: String,
    /// When the tour was imported
    pub date: DateTime<Utc>,
    /// The image file exactly as it was picked
    pub file_data: Vec<u8>,
}

/// A file the user picked for import
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// A configured entry that links out instead of opening the viewer
///
/// Virtual tours are never written to the database. They come from the
/// app configuration and are shown ahead of every stored tour.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VirtualTour {
    pub id: String,
    pub name: String,
    /// Externally hosted preview image
    pub preview_url: String,
    /// Where selecting the card takes the user
    pub external_link: String,
}

/// A stored tour plus the preview handle derived for the current load
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTour {
    pub id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
    pub preview: PreviewId,
}

/// One card in the catalog grid
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Virtual(VirtualTour),
    Stored(DisplayTour),
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Virtual(tour) => &tour.name,
            CatalogEntry::Stored(tour) => &tour.name,
        }
    }

    #[cfg(test)]
    pub fn is_external(&self) -> bool {
        matches!(self, CatalogEntry::Virtual(_))
    }
}
