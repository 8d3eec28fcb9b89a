use chrono::Utc;
use std::path::PathBuf;

use super::data::{CatalogEntry, DisplayTour, PickedFile, Tour, VirtualTour};
use super::library::{Library, TourStore};
use crate::error::{Error, Result};
use crate::preview::PreviewRegistry;

/// The catalog as the grid sees it.
///
/// Holds the configured virtual tours, the entries of the latest load and
/// the preview handles that load issued. A new load revokes the previous
/// handles before issuing fresh ones.
///
/// Every mutation is followed by a full reload. That is fine for a
/// personal catalog but means every load re-reads every image.
#[derive(Debug)]
pub struct CatalogManager {
    virtual_tours: Vec<VirtualTour>,
    previews: PreviewRegistry,
    entries: Vec<CatalogEntry>,
}

impl CatalogManager {
    pub fn new(virtual_tours: Vec<VirtualTour>) -> Self {
        let entries = virtual_tours
            .iter()
            .cloned()
            .map(CatalogEntry::Virtual)
            .collect();

        Self {
            virtual_tours,
            previews: PreviewRegistry::new(),
            entries,
        }
    }

    /// Read every tour from `store` and rebuild the catalog
    pub fn load_catalog(&mut self, store: &impl TourStore) -> Result<&[CatalogEntry]> {
        let tours = store.list_tours()?;
        Ok(self.apply_load(tours))
    }

    /// Rebuild the catalog from tours fetched elsewhere (e.g. a background task)
    ///
    /// Virtual tours come first in configured order, then stored tours
    /// highest id first.
    pub fn apply_load(&mut self, mut tours: Vec<Tour>) -> &[CatalogEntry] {
        let released = self.previews.begin_generation();
        if released > 0 {
            tracing::debug!("♻️  Released {} previews from the previous load", released);
        }

        tours.sort_by(|a, b| b.id.cmp(&a.id));

        let mut entries = Vec::with_capacity(self.virtual_tours.len() + tours.len());
        entries.extend(self.virtual_tours.iter().cloned().map(CatalogEntry::Virtual));

        for tour in tours {
            let preview = self.previews.create(tour.file_data);
            entries.push(CatalogEntry::Stored(DisplayTour {
                id: tour.id,
                name: tour.name,
                date: tour.date,
                preview,
            }));
        }

        self.entries = entries;
        &self.entries
    }

    /// Store a picked file as a new tour.
    ///
    /// Nothing picked (or an empty file) is not an error, it just does
    /// nothing. The caller reloads the catalog afterwards.
    pub fn import_file(store: &impl TourStore, picked: Option<PickedFile>) -> Result<Option<Tour>> {
        let Some(picked) = picked else {
            return Ok(None);
        };

        if picked.data.is_empty() {
            tracing::debug!("Skipping empty file {}", picked.name);
            return Ok(None);
        }

        let tour = store.insert_tour(&picked.name, Utc::now(), &picked.data)?;
        tracing::info!("📥 Imported {} as tour #{} ({} bytes)", tour.name, tour.id, tour.file_data.len());

        Ok(Some(tour))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Number of stored (non-virtual) tours in the current load
    pub fn stored_count(&self) -> usize {
        self.entries.len() - self.virtual_tours.len()
    }
}

impl Drop for CatalogManager {
    fn drop(&mut self) {
        self.previews.revoke_all();
    }
}

/// Load every tour from the database at `db_path` on a blocking worker
pub async fn load_tours(db_path: PathBuf) -> Result<Vec<Tour>> {
    tokio::task::spawn_blocking(move || {
        // rusqlite::Connection is not Sync, so each task opens its own
        let library = Library::open(&db_path)?;
        library.list_tours()
    })
    .await?
}

/// Read the file at `path` and import it into the database at `db_path`
pub async fn import_tour(db_path: PathBuf, path: Option<PathBuf>) -> Result<Option<Tour>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let data = tokio::fs::read(&path).await.map_err(|e| Error::Read {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tokio::task::spawn_blocking(move || {
        let library = Library::open(&db_path)?;
        CatalogManager::import_file(&library, Some(PickedFile { name, data }))
    })
    .await?
}
