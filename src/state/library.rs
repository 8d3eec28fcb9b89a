use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use super::data::Tour;
use crate::error::{Error, Result};

/// Key-indexed storage for imported tours.
///
/// The catalog manager only ever needs to add a tour and to list every
/// tour newest first. Anything that can do both can back the catalog.
pub trait TourStore {
    /// Insert a new tour. The store assigns the id.
    fn insert_tour(&self, name: &str, date: DateTime<Utc>, file_data: &[u8]) -> Result<Tour>;

    /// Every stored tour, highest id first
    fn list_tours(&self) -> Result<Vec<Tour>>;
}

/// The Library manages the SQLite catalog database.
/// It stores every imported tour, including the image bytes themselves.
pub struct Library {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Library {
    /// Open (or create) the catalog database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        let library = Library {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        library.init_schema()?;

        tracing::debug!("📁 Catalog opened at: {}", db_path.display());
        Ok(library)
    }

    /// A throwaway catalog that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Get the path where the database is stored by default
    ///
    /// - Linux: ~/.local/share/tour-viewer/tours.db
    /// - macOS: ~/Library/Application Support/tour-viewer/tours.db
    /// - Windows: %APPDATA%\tour-viewer\tours.db
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| Error::Store("could not determine user data directory".into()))?;

        path.push("tour-viewer");
        path.push("tours.db");
        Ok(path)
    }

    /// Initialize the database schema.
    /// Creates the tours table and its secondary indexes if they don't exist.
    fn init_schema(&self) -> Result<()> {
        // AUTOINCREMENT guarantees ids are never handed out twice,
        // even after the highest row is gone
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tours (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                date            INTEGER NOT NULL,
                file_data       BLOB NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tours_name ON tours(name)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tours_date ON tours(date)",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file (None for in-memory catalogs)
    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Get a count of tours in the library
    #[cfg(test)]
    pub fn tour_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tours", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl TourStore for Library {
    fn insert_tour(&self, name: &str, date: DateTime<Utc>, file_data: &[u8]) -> Result<Tour> {
        let millis = date.timestamp_millis();

        self.conn.execute(
            "INSERT INTO tours (name, date, file_data) VALUES (?1, ?2, ?3)",
            params![name, millis, file_data],
        )?;

        Ok(Tour {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            // Same precision as what a later read returns
            date: from_millis(millis),
            file_data: file_data.to_vec(),
        })
    }

    fn list_tours(&self) -> Result<Vec<Tour>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, date, file_data FROM tours ORDER BY id DESC")?;

        let tour_iter = stmt.query_map([], |row| {
            Ok(Tour {
                id: row.get(0)?,
                name: row.get(1)?,
                date: from_millis(row.get(2)?),
                file_data: row.get(3)?,
            })
        })?;

        let mut tours = Vec::new();
        for tour in tour_iter {
            tours.push(tour?);
        }

        Ok(tours)
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
