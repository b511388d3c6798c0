//! Finding or creating the library database under the library root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{LocatorError, Result};

/// A file under the library root whose name carries the database marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Outcome of scanning the library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// No database file anywhere under the root.
    Absent,
    /// Exactly one database file.
    Found(Candidate),
    /// Several database files; `chosen` was picked automatically from `candidates`.
    Selected {
        chosen: Candidate,
        candidates: Vec<Candidate>,
    },
}

impl Discovery {
    /// The authoritative database file, if any.
    pub fn database(&self) -> Option<&Path> {
        match self {
            Discovery::Absent => None,
            Discovery::Found(candidate) => Some(&candidate.path),
            Discovery::Selected { chosen, .. } => Some(&chosen.path),
        }
    }
}

/// Directory recorded as the library location for a database file.
pub fn directory_of(database: &Path) -> PathBuf {
    database
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| database.to_path_buf())
}

/// Every file under `root` whose file name contains `marker`.
///
/// Entries are visited sorted by file name so the order is the same on
/// every platform. A symlink to a file counts, sized by its target;
/// symlinked directories are not descended into. A missing root yields
/// no candidates.
pub fn find_candidates(root: &Path, marker: &str) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    if !root.exists() {
        return Ok(candidates);
    }

    let scan_error = |source| LocatorError::Discovery {
        root: root.to_path_buf(),
        source,
    };

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| scan_error(e.into()))?;

        if !entry.file_name().to_string_lossy().contains(marker) {
            continue;
        }
        // follows symlinks, unlike entry.file_type()
        if !entry.path().is_file() {
            continue;
        }

        let size_bytes = std::fs::metadata(entry.path()).map_err(scan_error)?.len();
        candidates.push(Candidate {
            path: entry.into_path(),
            size_bytes,
        });
    }

    Ok(candidates)
}

/// Index of the largest candidate; the earliest one wins a size tie.
pub fn select_largest(candidates: &[Candidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        match best {
            Some(current) if candidate.size_bytes <= candidates[current].size_bytes => {}
            _ => best = Some(index),
        }
    }
    best
}

/// Scan `root` and decide which database file is authoritative.
pub fn discover(root: &Path, marker: &str) -> Result<Discovery> {
    let mut candidates = find_candidates(root, marker)?;

    let Some(index) = select_largest(&candidates) else {
        return Ok(Discovery::Absent);
    };

    if candidates.len() == 1 {
        return Ok(Discovery::Found(candidates.swap_remove(index)));
    }

    let chosen = candidates[index].clone();
    Ok(Discovery::Selected { chosen, candidates })
}

/// Copy the empty template into `root` as `database_name`.
///
/// Creates `root` if needed and returns the path of the new database.
pub fn create_from_template(template: &Path, root: &Path, database_name: &str) -> Result<PathBuf> {
    if !template.is_file() {
        return Err(LocatorError::TemplateMissing(template.to_path_buf()));
    }

    let destination = root.join(database_name);
    let copy_error = |source| LocatorError::TemplateCopy {
        from: template.to_path_buf(),
        to: destination.clone(),
        source,
    };

    std::fs::create_dir_all(root).map_err(copy_error)?;
    std::fs::copy(template, &destination).map_err(copy_error)?;

    Ok(destination)
}
