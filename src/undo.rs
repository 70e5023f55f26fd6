//! Structural undo for desktop organization.
//!
//! Undo walks the immediate subdirectories of the desktop root and moves
//! every file directly inside them back to the root. There is no record of
//! which files a previous organize run moved, so this flattens category
//! folders indiscriminately; files added to those folders by other means are
//! restored to the root as well. Name collisions at the root are resolved
//! with the same counter policy the organizer uses.

use crate::organizer::{Action, BACKUP_DIR, OrganizeError, OrganizeResult, unique_destination};
use crate::output::OutputFormatter;
use std::fs;
use std::path::Path;

/// Folders never flattened by undo: the backup folder, version control
/// metadata, and the bundled sample directory.
const RESERVED_DIRS: [&str; 3] = [BACKUP_DIR, ".git", "sample-before-after"];

/// The outcome of an undo run.
#[derive(Debug, Clone, Default)]
pub struct UndoReport {
    /// Every restore performed, in processing order.
    pub restored: Vec<Action>,
}

impl UndoReport {
    /// Number of files moved back to the desktop root.
    pub fn restored_files(&self) -> usize {
        self.restored.len()
    }
}

/// Moves the contents of every category folder back to the desktop root.
///
/// Only files directly inside a subdirectory are restored; nested
/// directories stay in place. The run is not transactional: an error aborts
/// the remaining files and already-restored files stay at the root.
pub fn undo(desktop: &Path, out: &OutputFormatter) -> OrganizeResult<UndoReport> {
    let entries = fs::read_dir(desktop).map_err(|e| OrganizeError::ReadDirFailed {
        path: desktop.to_path_buf(),
        source: e,
    })?;

    let mut report = UndoReport::default();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if RESERVED_DIRS.contains(&name.as_str()) {
            continue;
        }
        if let Ok(file_type) = entry.file_type()
            && !file_type.is_dir()
        {
            continue;
        }

        restore_folder(&entry.path(), desktop, out, &mut report)?;
    }

    out.success(&format!(
        "Undo complete. Restored {} files.",
        report.restored_files()
    ));
    Ok(report)
}

/// Restores every file directly inside `folder` to the desktop root.
fn restore_folder(
    folder: &Path,
    desktop: &Path,
    out: &OutputFormatter,
    report: &mut UndoReport,
) -> OrganizeResult<()> {
    let entries = fs::read_dir(folder).map_err(|e| OrganizeError::ReadDirFailed {
        path: folder.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && !file_type.is_file()
        {
            continue;
        }

        let source = entry.path();
        let dest = unique_destination(&desktop.join(entry.file_name()));

        fs::rename(&source, &dest).map_err(|e| OrganizeError::FileMoveFailure {
            source: source.clone(),
            destination: dest.clone(),
            source_error: e,
        })?;

        out.moved(&source, &dest);
        report.restored.push(Action { source, dest });
    }

    Ok(())
}
