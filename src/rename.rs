// Rename applier: resolves each suggestion back to a scanned directory and
// moves it next to itself under the new name. Every pair is handled on its
// own; a failure never stops the rest of the plan and nothing is rolled
// back.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::scan::DirectoryEntry;
use crate::suggest::RenamePair;

/// What happened to one rename pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// No scanned directory has the original name.
    NotFound { original: String },
    /// More than one scanned directory has the original name.
    Ambiguous { original: String, matches: usize },
    /// The proposed name is not a single path component.
    InvalidTarget { original: String, proposed: String },
    /// Something already exists at the destination.
    TargetExists { original: String, proposed: String },
    DryRun { from: PathBuf, to: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    Failed {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

#[cfg(test)]
impl RenameOutcome {
    /// True when the directory was actually moved.
    pub fn is_renamed(&self) -> bool {
        matches!(self, RenameOutcome::Renamed { .. })
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameOutcome::NotFound { original } => {
                write!(f, "Skipping: {original} (not found)")
            }
            RenameOutcome::Ambiguous { original, matches } => {
                write!(f, "Skipping: {original} (matches {matches} directories)")
            }
            RenameOutcome::InvalidTarget { original, proposed } => {
                write!(f, "Skipping: {original} → {proposed} (invalid target name)")
            }
            RenameOutcome::TargetExists { original, proposed } => {
                write!(f, "Skipping: {original} → {proposed} (target already exists)")
            }
            RenameOutcome::DryRun { from, to } => {
                write!(f, "Dry Run: {} → {}", base_name(from), base_name(to))
            }
            RenameOutcome::Renamed { from, to } => {
                write!(f, "Renamed: {} → {}", base_name(from), base_name(to))
            }
            RenameOutcome::Failed { from, to, error } => write!(
                f,
                "Failed: {} → {} ({error})",
                base_name(from),
                base_name(to)
            ),
        }
    }
}

/// A usable target is exactly one normal path component.
fn is_valid_target(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(std::path::MAIN_SEPARATOR)
}

/// Apply `pairs` in order against the scanned `entries`. In dry-run mode
/// the filesystem is never touched.
pub fn apply(entries: &[DirectoryEntry], pairs: &[RenamePair], dry_run: bool) -> Vec<RenameOutcome> {
    pairs
        .iter()
        .map(|pair| apply_one(entries, pair, dry_run))
        .collect()
}

fn apply_one(entries: &[DirectoryEntry], pair: &RenamePair, dry_run: bool) -> RenameOutcome {
    let matches: Vec<&DirectoryEntry> = entries.iter().filter(|e| e.name == pair.original).collect();
    let entry = match matches.as_slice() {
        [] => {
            return RenameOutcome::NotFound {
                original: pair.original.clone(),
            }
        }
        [only] => *only,
        many => {
            debug!(original = %pair.original, matches = many.len(), "ambiguous original name");
            return RenameOutcome::Ambiguous {
                original: pair.original.clone(),
                matches: many.len(),
            };
        }
    };

    if !is_valid_target(&pair.proposed) {
        return RenameOutcome::InvalidTarget {
            original: pair.original.clone(),
            proposed: pair.proposed.clone(),
        };
    }

    let from = entry.path.clone();
    let to = match from.parent() {
        Some(parent) => parent.join(&pair.proposed),
        None => PathBuf::from(&pair.proposed),
    };

    // symlink_metadata so a dangling link at the destination still counts.
    if std::fs::symlink_metadata(&to).is_ok() {
        return RenameOutcome::TargetExists {
            original: pair.original.clone(),
            proposed: pair.proposed.clone(),
        };
    }

    if dry_run {
        return RenameOutcome::DryRun { from, to };
    }

    debug!(from = %from.display(), to = %to.display(), "renaming");
    match std::fs::rename(&from, &to) {
        Ok(()) => RenameOutcome::Renamed { from, to },
        Err(e) => RenameOutcome::Failed {
            from,
            to,
            error: e.to_string(),
        },
    }
}
