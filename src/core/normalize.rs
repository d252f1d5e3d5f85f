//! Directory case normalizer — lowercase the immediate subdirectories of a
//! parent, merging into an existing lowercase sibling on collision.
//!
//! Renames stage through a temporary sibling name first, so a case-only
//! rename works on case-insensitive filesystems where `Foo` and `foo` are
//! the same entry.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

const TMP_SUFFIX: &str = ".srcmend-tmp";

/// One directory rename performed (or planned, in a dry run).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirRename {
    pub from: String,
    pub to: String,
    /// True when the lowercase target already existed and entries were merged.
    pub merged: bool,
    /// Entries left in place because the target already had an entry with the
    /// same name. Never overwritten.
    pub skipped_entries: Vec<String>,
}

/// A per-directory failure. Non-fatal: normalization continues.
#[derive(Debug, Clone, Serialize)]
pub struct DirSkip {
    pub dir: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeResult {
    pub parent: String,
    pub renames: Vec<DirRename>,
    pub skipped: Vec<DirSkip>,
    pub applied: bool,
}

/// Normalize the immediate subdirectories of `parent` to lowercase names.
///
/// Already-lowercase names are untouched. Files are never renamed. With
/// `write` false this is a dry run that only reports what would happen.
pub fn normalize_dirs(parent: &Path, write: bool) -> Result<NormalizeResult> {
    if !parent.is_dir() {
        return Err(Error::path_not_found(
            parent.display().to_string(),
            Some("directory".to_string()),
        ));
    }

    let mut names: Vec<String> = Vec::new();
    let entries = fs::read_dir(parent)
        .map_err(|e| Error::internal_io(e.to_string(), Some("list parent directory".to_string())))?;
    for entry in entries.flatten() {
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();

    let mut renames = Vec::new();
    let mut skipped = Vec::new();

    for name in names {
        let lower = name.to_lowercase();
        if name == lower {
            continue;
        }
        // A leftover temp dir from an earlier run holds entries that were
        // skipped to avoid overwrites; left alone for manual inspection.
        if name.ends_with(TMP_SUFFIX) {
            continue;
        }

        if !write {
            let target = parent.join(&lower);
            renames.push(DirRename {
                from: name.clone(),
                to: lower,
                merged: target.is_dir(),
                skipped_entries: Vec::new(),
            });
            continue;
        }

        match rename_one(parent, &name, &lower) {
            Ok(rename) => renames.push(rename),
            Err(e) => skipped.push(DirSkip {
                dir: name,
                error: e.to_string(),
            }),
        }
    }

    Ok(NormalizeResult {
        parent: parent.display().to_string(),
        renames,
        skipped,
        applied: write,
    })
}

fn rename_one(parent: &Path, name: &str, lower: &str) -> std::io::Result<DirRename> {
    let source = parent.join(name);
    let tmp = parent.join(format!("{}{}", name, TMP_SUFFIX));
    let target = parent.join(lower);

    // Move away first: only after the source is gone can we tell whether a
    // distinct lowercase sibling exists (on case-insensitive filesystems the
    // target "exists" as long as the source does).
    fs::rename(&source, &tmp)?;

    if target.is_dir() {
        let mut skipped_entries = Vec::new();
        for entry in fs::read_dir(&tmp)?.flatten() {
            let entry_name = entry.file_name();
            let dest = target.join(&entry_name);
            if dest.exists() {
                skipped_entries.push(entry_name.to_string_lossy().to_string());
                continue;
            }
            fs::rename(entry.path(), dest)?;
        }
        // Only empty when nothing was skipped; a non-empty temp dir is left
        // behind and reported rather than deleting skipped entries.
        if let Err(e) = fs::remove_dir(&tmp) {
            if skipped_entries.is_empty() {
                return Err(e);
            }
        }
        Ok(DirRename {
            from: name.to_string(),
            to: lower.to_string(),
            merged: true,
            skipped_entries,
        })
    } else {
        fs::rename(&tmp, &target)?;
        Ok(DirRename {
            from: name.to_string(),
            to: lower.to_string(),
            merged: false,
            skipped_entries: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lowercase_dirs_are_untouched() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("controller")).unwrap();

        let result = normalize_dirs(tmp.path(), true).unwrap();
        assert!(result.renames.is_empty());
        assert!(tmp.path().join("controller").is_dir());
    }

    #[test]
    fn mixed_case_dir_is_lowercased() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Controller")).unwrap();
        fs::write(tmp.path().join("Controller/Y.java"), "y").unwrap();

        let result = normalize_dirs(tmp.path(), true).unwrap();
        assert_eq!(result.renames.len(), 1);
        assert!(!result.renames[0].merged);
        assert!(tmp.path().join("controller/Y.java").is_file());
    }

    #[test]
    fn merge_keeps_existing_entries_and_moves_the_rest() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("controller")).unwrap();
        fs::write(tmp.path().join("controller/X.java"), "x").unwrap();
        fs::create_dir(tmp.path().join("Controller")).unwrap();
        fs::write(tmp.path().join("Controller/Y.java"), "y").unwrap();

        let result = normalize_dirs(tmp.path(), true).unwrap();
        assert_eq!(result.renames.len(), 1);
        assert!(result.renames[0].merged);
        assert!(result.renames[0].skipped_entries.is_empty());

        let merged = tmp.path().join("controller");
        assert!(merged.join("X.java").is_file());
        assert!(merged.join("Y.java").is_file());
        assert!(!tmp.path().join("Controller.srcmend-tmp").exists());
    }

    #[test]
    fn merge_collision_skips_without_overwriting() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("entities")).unwrap();
        fs::write(tmp.path().join("entities/User.java"), "existing").unwrap();
        fs::create_dir(tmp.path().join("Entities")).unwrap();
        fs::write(tmp.path().join("Entities/User.java"), "incoming").unwrap();

        let result = normalize_dirs(tmp.path(), true).unwrap();
        assert_eq!(result.renames.len(), 1);
        assert_eq!(result.renames[0].skipped_entries, vec!["User.java"]);
        // Destination entry untouched
        assert_eq!(
            fs::read_to_string(tmp.path().join("entities/User.java")).unwrap(),
            "existing"
        );
        // Skipped entry survives in the temp dir rather than being deleted
        assert_eq!(
            fs::read_to_string(tmp.path().join("Entities.srcmend-tmp/User.java")).unwrap(),
            "incoming"
        );
    }

    #[test]
    fn files_are_never_renamed() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "hi").unwrap();

        let result = normalize_dirs(tmp.path(), true).unwrap();
        assert!(result.renames.is_empty());
        assert!(tmp.path().join("README.md").is_file());
    }

    #[test]
    fn dry_run_plans_without_renaming() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Repository")).unwrap();

        let result = normalize_dirs(tmp.path(), false).unwrap();
        assert!(!result.applied);
        assert_eq!(result.renames.len(), 1);
        assert_eq!(result.renames[0].to, "repository");
        assert!(tmp.path().join("Repository").is_dir());
    }

    #[test]
    fn missing_parent_is_an_error() {
        let err = normalize_dirs(Path::new("/no/such/parent"), true).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::PathNotFound);
    }
}
