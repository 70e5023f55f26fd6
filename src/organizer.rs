//! Planning and execution of desktop organization.
//!
//! The planner and executor share one matching pass: enumerate the direct
//! children of the desktop, skip protected and hidden names, and route each
//! file to the first category whose extension set contains its suffix (or to
//! the fallback folder). The planner only computes the resulting actions; the
//! executor creates the category folders and performs the moves, optionally
//! copying originals into the backup folder first.

use crate::config::Rules;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder receiving files that match no configured category.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Folder holding pre-move copies when a backup is requested.
pub const BACKUP_DIR: &str = "Backup";

/// A planned or completed file relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Absolute path of the file before the move.
    pub source: PathBuf,
    /// Absolute path of the file after the move.
    pub dest: PathBuf,
}

/// Errors that can occur while planning or performing organization.
#[derive(Debug)]
pub enum OrganizeError {
    /// The desktop directory could not be enumerated.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category, fallback, or backup directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to copy a file into the backup folder.
    FileCopyFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileCopyFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Splits a file name into stem and suffix at the last dot.
///
/// A leading dot is part of the stem, so `.hidden` has no suffix while
/// `archive.tar.gz` splits into `archive.tar` and `.gz`.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Returns the lowercased, dot-prefixed suffix of a file name.
fn name_suffix(name: &str) -> String {
    split_name(name).1.to_lowercase()
}

/// Returns a destination path that does not collide with an existing file.
///
/// If `dest` is free it is returned unchanged; otherwise ` (1)`, ` (2)`, …
/// is inserted before the suffix until a free candidate is found. The check
/// is advisory only: it is not atomic with the eventual move, so a file
/// created by another process in between can still collide.
pub fn unique_destination(dest: &Path) -> PathBuf {
    if !dest.exists() {
        return dest.to_path_buf();
    }

    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, suffix) = split_name(&file_name);
    let parent = dest.parent().unwrap_or_else(|| Path::new(""));

    let mut i = 1;
    loop {
        let candidate = parent.join(format!("{} ({}){}", stem, i, suffix));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

/// One file selected for organization: its path, name, and target category.
struct Candidate {
    path: PathBuf,
    name: String,
    category: String,
}

/// Enumerates the organizable children of the desktop with their categories.
///
/// Shared by the planner and the executor so both apply identical skip and
/// matching rules. Order follows directory iteration order.
fn candidates(desktop: &Path, rules: &Rules) -> OrganizeResult<Vec<Candidate>> {
    let entries = fs::read_dir(desktop).map_err(|e| OrganizeError::ReadDirFailed {
        path: desktop.to_path_buf(),
        source: e,
    })?;

    let mut selected = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();

        // Category folders and explicitly excluded names are never touched.
        if rules.is_protected(&name) {
            continue;
        }
        if let Ok(file_type) = entry.file_type()
            && !file_type.is_file()
        {
            continue;
        }
        if name.starts_with('.') && !rules.move_hidden() {
            continue;
        }

        let category = rules
            .category_for(&name_suffix(&name))
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string();

        selected.push(Candidate {
            path: entry.path(),
            name,
            category,
        });
    }

    Ok(selected)
}

/// Computes the actions an organize run would perform, without mutating
/// the filesystem.
pub fn plan_organize(desktop: &Path, rules: &Rules) -> OrganizeResult<Vec<Action>> {
    let mut actions = Vec::new();
    for candidate in candidates(desktop, rules)? {
        let dest = unique_destination(&desktop.join(&candidate.category).join(&candidate.name));
        actions.push(Action {
            source: candidate.path,
            dest,
        });
    }
    Ok(actions)
}

/// Organizes the desktop, returning the actions actually performed.
///
/// Ensures every category folder, the fallback folder, and (when `backup` is
/// requested) the backup folder exist, then moves each organizable file to a
/// uniquified destination. With `backup`, the original is copied into the
/// backup folder before the move. The batch is not transactional: an error
/// aborts the remaining files and already-moved files stay where they are.
pub fn perform_organize(
    desktop: &Path,
    rules: &Rules,
    backup: bool,
    out: &OutputFormatter,
) -> OrganizeResult<Vec<Action>> {
    for category in rules.category_names() {
        ensure_folder(&desktop.join(category))?;
    }
    ensure_folder(&desktop.join(FALLBACK_CATEGORY))?;
    if backup {
        ensure_folder(&desktop.join(BACKUP_DIR))?;
    }

    let mut actions = Vec::new();
    for candidate in candidates(desktop, rules)? {
        let dest = unique_destination(&desktop.join(&candidate.category).join(&candidate.name));

        if backup {
            let backup_dest = unique_destination(&desktop.join(BACKUP_DIR).join(&candidate.name));
            copy_with_mtime(&candidate.path, &backup_dest)?;
        }

        fs::rename(&candidate.path, &dest).map_err(|e| OrganizeError::FileMoveFailure {
            source: candidate.path.clone(),
            destination: dest.clone(),
            source_error: e,
        })?;

        out.moved(&candidate.path, &dest);
        actions.push(Action {
            source: candidate.path,
            dest,
        });
    }

    Ok(actions)
}

/// Copies a file, carrying over its modification time.
///
/// `fs::copy` preserves permission bits but not timestamps; backup copies
/// keep the original's mtime so they remain faithful replicas.
fn copy_with_mtime(source: &Path, dest: &Path) -> OrganizeResult<()> {
    let copy_failed = |e: std::io::Error| OrganizeError::FileCopyFailed {
        source: source.to_path_buf(),
        destination: dest.to_path_buf(),
        source_error: e,
    };

    let metadata = fs::metadata(source).map_err(copy_failed)?;
    fs::copy(source, dest).map_err(copy_failed)?;

    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(dest, mtime).map_err(copy_failed)?;

    Ok(())
}

/// Creates a folder and any missing parents.
pub fn ensure_folder(folder: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(folder).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: folder.to_path_buf(),
        source: e,
    })
}
