//! Failure kinds for a locator run.
//!
//! Every variant is fatal. Nothing inside the library recovers from or
//! retries any of them; they travel up to `main`, which logs the stage and
//! sets the exit status.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocatorError>;

/// Step of the run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Create,
    Mount,
    DirsJson,
    Settings,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovery",
            Stage::Create => "create",
            Stage::Mount => "mount",
            Stage::DirsJson => "dirs.json",
            Stage::Settings => "settings",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Could not scan library root {root}: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty library template not found at {0}")]
    TemplateMissing(PathBuf),

    #[error("Could not copy template {from} to {to}: {source}")]
    TemplateCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Library database {0} found but not mounted")]
    DatabaseNotMounted(PathBuf),

    #[error("Library path {0} is not valid UTF-8 and cannot be recorded")]
    NonUtf8Path(PathBuf),

    #[error("Could not read {path}: {source}")]
    DirsJsonRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path}: {source}")]
    DirsJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} does not contain a JSON object")]
    DirsJsonNotObject(PathBuf),

    #[error("Could not write {path}: {source}")]
    DirsJsonWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings database not found at {0}")]
    SettingsDbMissing(PathBuf),

    #[error("Could not update settings database {path}: {source}")]
    SettingsDb {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

impl LocatorError {
    pub fn stage(&self) -> Stage {
        match self {
            LocatorError::Discovery { .. } => Stage::Discovery,
            LocatorError::TemplateMissing(_) | LocatorError::TemplateCopy { .. } => Stage::Create,
            LocatorError::DatabaseNotMounted(_) | LocatorError::NonUtf8Path(_) => Stage::Mount,
            LocatorError::DirsJsonRead { .. }
            | LocatorError::DirsJsonParse { .. }
            | LocatorError::DirsJsonNotObject(_)
            | LocatorError::DirsJsonWrite { .. } => Stage::DirsJson,
            LocatorError::SettingsDbMissing(_) | LocatorError::SettingsDb { .. } => Stage::Settings,
        }
    }
}
