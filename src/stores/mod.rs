//! The two configuration stores that record where the library lives.

pub mod dirs_json;
pub mod settings;

pub use dirs_json::DirsJson;
pub use settings::SettingsDb;

use std::path::Path;

use crate::error::{LocatorError, Result};

/// The library directory as text. Both stores hold strings, and a lossy
/// conversion would record a path that does not exist.
fn library_dir_str(library_dir: &Path) -> Result<&str> {
    library_dir
        .to_str()
        .ok_or_else(|| LocatorError::NonUtf8Path(library_dir.to_path_buf()))
}
