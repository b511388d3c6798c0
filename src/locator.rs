//! Locate or bootstrap the Calibre library and record its location.
//!
//! A run is strictly sequential:
//!
//! ```text
//! discover ──found──────────────────┐
//!    │                              ▼
//!    └─absent─> create_library ─> propagate: dirs.json -> app.db settings
//! ```
//!
//! The first failure ends the run. A failure while updating `app.db` leaves
//! `dirs.json` already rewritten; nothing is rolled back.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{LocatorError, Result};
use crate::library::{self, Discovery};
use crate::stores::{DirsJson, SettingsDb};

pub struct LibraryLocator {
    config: Config,
}

impl LibraryLocator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scan the library root for an existing library database.
    pub fn discover(&self) -> Result<Discovery> {
        let root = &self.config.library.root;
        debug!(root = %root.display(), "Scanning for existing library");

        let discovery = library::discover(root, &self.config.library.marker)?;

        match &discovery {
            Discovery::Absent => {
                info!(root = %root.display(), "No existing library found");
            }
            Discovery::Found(candidate) => {
                info!(
                    library = %library::directory_of(&candidate.path).display(),
                    "Existing library found, mounting now"
                );
            }
            Discovery::Selected { chosen, candidates } => {
                warn!(
                    count = candidates.len(),
                    "Multiple {} files found in library directory",
                    self.config.library.marker
                );
                for candidate in candidates {
                    warn!(path = %candidate.path.display(), size_bytes = candidate.size_bytes, "Candidate database");
                }
                warn!(
                    path = %chosen.path.display(),
                    size_bytes = chosen.size_bytes,
                    "Automatically mounting the largest database"
                );
                warn!(
                    "If this is unwanted, make sure only the desired {} exists under {}, then restart",
                    self.config.library.marker,
                    root.display()
                );
            }
        }

        Ok(discovery)
    }

    /// Create a new, empty library directly under the library root.
    ///
    /// Only meaningful after [`discover`](Self::discover) found nothing.
    /// Returns the path of the new database file.
    pub fn create_library(&self) -> Result<PathBuf> {
        let library = &self.config.library;
        info!(root = %library.root.display(), "Creating new library");

        let database =
            library::create_from_template(&library.template, &library.root, &library.database_name)?;

        info!(path = %database.display(), "New library database created");
        Ok(database)
    }

    /// Record the directory of `database` in dirs.json, then in app.db.
    ///
    /// Nothing is written unless `database` exists. Returns the library
    /// directory that was recorded.
    pub fn propagate(&self, database: &Path) -> Result<PathBuf> {
        if !database.is_file() {
            return Err(LocatorError::DatabaseNotMounted(database.to_path_buf()));
        }

        let library_dir = library::directory_of(database);
        let stores = &self.config.stores;

        let dirs_json = DirsJson::new(&stores.dirs_json, stores.dirs_json_key.as_str());
        info!(path = %dirs_json.path().display(), "Updating dirs.json with library location");
        let previous = dirs_json.set_library_dir(&library_dir)?;
        debug!(previous = ?previous, "dirs.json updated");

        info!(path = %stores.app_db.display(), "Updating settings database with library location");
        let mut settings = SettingsDb::open(&stores.app_db)?;
        let updated = settings.set_library_dir(&library_dir)?;
        if updated == 0 {
            warn!(path = %stores.app_db.display(), "Settings table has no rows, nothing updated");
        } else {
            debug!(rows = updated, "Settings database updated");
        }

        Ok(library_dir)
    }

    /// Full run: discover, create when absent, propagate.
    pub fn run(&self) -> Result<PathBuf> {
        let database = match self.discover()? {
            Discovery::Absent => self.create_library()?,
            Discovery::Found(candidate) => candidate.path,
            Discovery::Selected { chosen, .. } => chosen.path,
        };

        self.propagate(&database)
    }
}
