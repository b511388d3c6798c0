//! Read-modify-write of the `dirs.json` sidecar.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::library_dir_str;
use crate::error::{LocatorError, Result};

pub struct DirsJson {
    path: PathBuf,
    key: String,
}

impl DirsJson {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn library_dir(&self) -> Result<Option<String>> {
        let document = self.read()?;
        Ok(document
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Point the library key at `library_dir`, keeping every other key.
    ///
    /// The whole file is rewritten in place. Returns the previous value.
    pub fn set_library_dir(&self, library_dir: &Path) -> Result<Option<Value>> {
        let library_dir = library_dir_str(library_dir)?;
        let mut document = self.read()?;

        let previous = document.insert(self.key.clone(), Value::String(library_dir.to_string()));

        let mut content = serde_json::to_string_pretty(&document).map_err(|source| {
            LocatorError::DirsJsonWrite {
                path: self.path.clone(),
                source: source.into(),
            }
        })?;
        content.push('\n');

        std::fs::write(&self.path, content).map_err(|source| LocatorError::DirsJsonWrite {
            path: self.path.clone(),
            source,
        })?;

        Ok(previous)
    }

    fn read(&self) -> Result<Map<String, Value>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| LocatorError::DirsJsonRead {
                path: self.path.clone(),
                source,
            })?;

        let value: Value =
            serde_json::from_str(&content).map_err(|source| LocatorError::DirsJsonParse {
                path: self.path.clone(),
                source,
            })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(LocatorError::DirsJsonNotObject(self.path.clone())),
        }
    }
}
