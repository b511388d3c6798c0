//! Locates or bootstraps a Calibre library and records its location for
//! Calibre-Web.
//!
//! The library directory is written to two places: the `dirs.json`
//! sidecar and the `settings` table of Calibre-Web's `app.db`.

pub mod config;
pub mod error;
pub mod library;
pub mod locator;
pub mod logging;
pub mod stores;

pub use config::Config;
pub use error::{LocatorError, Stage};
pub use library::{directory_of, Candidate, Discovery};
pub use locator::LibraryLocator;
