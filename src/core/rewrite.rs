//! Text-substitution file walker — ordered find/replace across a source tree.
//!
//! Given an ordered list of `Rule`s, this module:
//! 1. Walks every file under a root matching an extension filter
//! 2. Applies each rule in order, each rule scanning the output of the previous
//! 3. Writes a file back only when the final content differs from the original
//!
//! Rule order is the contract: callers supply rules in the order they must
//! apply, and later rules may re-match text produced by earlier rules.

use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// ============================================================================
// Rules
// ============================================================================

/// A single find/replace rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Exact substring match.
    Literal { from: String, to: String },
    /// Case-insensitive match of a literal token.
    Insensitive { pattern: Regex, from: String, to: String },
}

impl Rule {
    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Rule::Literal {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Build a case-insensitive rule from a literal token.
    /// The token is escaped, so it is never interpreted as a pattern.
    pub fn insensitive(from: impl Into<String>, to: impl Into<String>) -> Result<Self> {
        let from = from.into();
        if from.is_empty() {
            return Err(Error::ruleset_invalid_rule(from, "empty match token"));
        }
        let pattern = Regex::new(&format!("(?i){}", regex::escape(&from)))
            .map_err(|e| Error::ruleset_invalid_rule(&from, e.to_string()))?;
        Ok(Rule::Insensitive {
            pattern,
            from,
            to: to.into(),
        })
    }

    /// Apply this rule to `content`, returning the new content and the
    /// number of replacements made.
    pub fn apply(&self, content: &str) -> (String, usize) {
        match self {
            Rule::Literal { from, to } => {
                if from.is_empty() {
                    return (content.to_string(), 0);
                }
                let count = content.matches(from.as_str()).count();
                if count == 0 {
                    (content.to_string(), 0)
                } else {
                    (content.replace(from.as_str(), to), count)
                }
            }
            Rule::Insensitive { pattern, to, .. } => {
                let count = pattern.find_iter(content).count();
                if count == 0 {
                    (content.to_string(), 0)
                } else {
                    // NoExpand keeps `$` in the replacement literal.
                    (
                        pattern
                            .replace_all(content, regex::NoExpand(to.as_str()))
                            .into_owned(),
                        count,
                    )
                }
            }
        }
    }

    pub fn summary(&self) -> RuleSummary {
        match self {
            Rule::Literal { from, to } => RuleSummary {
                from: from.clone(),
                to: to.clone(),
                kind: "literal".to_string(),
            },
            Rule::Insensitive { from, to, .. } => RuleSummary {
                from: from.clone(),
                to: to.clone(),
                kind: "insensitive".to_string(),
            },
        }
    }
}

/// Serializable description of a rule, for command output.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub from: String,
    pub to: String,
    pub kind: String,
}

// ============================================================================
// Text encoding
// ============================================================================

/// How a file's bytes were decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Utf8,
    /// Permissive single-byte fallback for files that are not valid UTF-8.
    Latin1,
}

/// Read a file as text. UTF-8 first, Latin-1 as the permissive fallback
/// (every byte decodes, so no file is unreadable for encoding reasons).
pub fn read_text(path: &Path) -> std::io::Result<(String, TextEncoding)> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok((s, TextEncoding::Utf8)),
        Err(e) => {
            let content = e.into_bytes().iter().map(|&b| b as char).collect();
            Ok((content, TextEncoding::Latin1))
        }
    }
}

/// Write text back with the encoding it was read with. A Latin-1 file whose
/// replacement text introduced characters above U+00FF is written as UTF-8
/// rather than silently dropping bytes.
pub fn write_text(path: &Path, content: &str, encoding: TextEncoding) -> std::io::Result<()> {
    match encoding {
        TextEncoding::Utf8 => fs::write(path, content),
        TextEncoding::Latin1 => {
            if content.chars().all(|c| (c as u32) < 0x100) {
                let bytes: Vec<u8> = content.chars().map(|c| c as u8).collect();
                fs::write(path, bytes)
            } else {
                fs::write(path, content)
            }
        }
    }
}

// ============================================================================
// File walking
// ============================================================================

/// Directories to always skip at any depth (dependency/VCS directories).
const ALWAYS_SKIP_DIRS: &[&str] = &["node_modules", ".git", ".svn", ".hg"];

/// Directories to skip only at the root level (build output directories).
/// At deeper levels (e.g., `scripts/build/`) they may contain source files.
const ROOT_ONLY_SKIP_DIRS: &[&str] = &["build", "dist", "target", "tmp"];

fn walk_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_recursive(root, root, extensions, &mut files);
    files.sort();
    files
}

fn walk_recursive(dir: &Path, root: &Path, extensions: &[String], files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let is_root = dir == root;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if ALWAYS_SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            if is_root && ROOT_ONLY_SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk_recursive(&path, root, extensions, files);
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if extensions.is_empty() || extensions.iter().any(|e| e == ext) {
                files.push(path);
            }
        }
    }
}

// ============================================================================
// Rewrite pass
// ============================================================================

/// One file the walker changed (or would change, in a dry run).
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// File path relative to root.
    pub file: String,
    /// Total replacements across all rules.
    pub replacements: usize,
    pub encoding: TextEncoding,
}

/// One file the walker could not process. Non-fatal: the walk continues.
#[derive(Debug, Clone, Serialize)]
pub struct FileSkip {
    pub file: String,
    pub error: String,
}

/// Result of one rewrite pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    pub rules: Vec<RuleSummary>,
    pub files_scanned: usize,
    pub edits: Vec<FileEdit>,
    pub skipped: Vec<FileSkip>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

/// Walk `root`, applying `rules` in order to every file matching `extensions`.
///
/// When `write` is false this is a dry run: edits are computed and reported
/// but nothing touches disk. When `write` is true, a file is rewritten only
/// if its post-substitution content differs from the original, and the whole
/// new content is written in one call — never a partial write. Per-file
/// errors are recorded as skips and do not abort the walk.
pub fn rewrite_tree(
    root: &Path,
    extensions: &[String],
    rules: &[Rule],
    write: bool,
) -> Result<RewriteResult> {
    if !root.is_dir() {
        return Err(Error::path_not_found(
            root.display().to_string(),
            Some("directory".to_string()),
        ));
    }

    let files = walk_files(root, extensions);
    let mut edits = Vec::new();
    let mut skipped = Vec::new();

    for file_path in &files {
        let relative = file_path
            .strip_prefix(root)
            .unwrap_or(file_path)
            .to_string_lossy()
            .to_string();

        let (content, encoding) = match read_text(file_path) {
            Ok(pair) => pair,
            Err(e) => {
                skipped.push(FileSkip {
                    file: relative,
                    error: e.to_string(),
                });
                continue;
            }
        };

        // Each rule scans the output of the previous one.
        let mut new_content = content.clone();
        let mut replacements = 0;
        for rule in rules {
            let (next, count) = rule.apply(&new_content);
            new_content = next;
            replacements += count;
        }

        if new_content == content {
            continue;
        }

        if write {
            if let Err(e) = write_text(file_path, &new_content, encoding) {
                skipped.push(FileSkip {
                    file: relative,
                    error: e.to_string(),
                });
                continue;
            }
        }

        edits.push(FileEdit {
            file: relative,
            replacements,
            encoding,
        });
    }

    Ok(RewriteResult {
        rules: rules.iter().map(|r| r.summary()).collect(),
        files_scanned: files.len(),
        edits,
        skipped,
        applied: write,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn java_ext() -> Vec<String> {
        vec!["java".to_string()]
    }

    #[test]
    fn rules_apply_in_order_to_current_content() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "A.java",
            "package com.ExpenseManagement.Entities;\n",
        );

        let rules = vec![
            Rule::literal("com.ExpenseManagement", "com.expensemanagement"),
            Rule::literal(".Entities", ".entities"),
        ];

        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();
        assert_eq!(result.edits.len(), 1);
        assert_eq!(result.edits[0].replacements, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package com.expensemanagement.entities;\n"
        );
    }

    #[test]
    fn second_pass_is_a_fixed_point() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "A.java", "import com.Old.Repository;\n");
        write_file(tmp.path(), "sub/B.java", "package com.Old;\n");

        let rules = vec![
            Rule::literal("com.Old", "com.new_pkg"),
            Rule::literal(".Repository", ".repository"),
        ];

        let first = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();
        assert_eq!(first.edits.len(), 2);

        let second = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();
        assert!(second.edits.is_empty());
        assert!(second.skipped.is_empty());
    }

    #[test]
    fn unmatched_file_is_not_rewritten() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "A.java", "package untouched;\n");
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        let rules = vec![Rule::literal("com.Old", "com.new_pkg")];
        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();

        assert!(result.edits.is_empty());
        assert_eq!(result.files_scanned, 1);
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn dry_run_reports_edits_without_writing() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "A.java", "com.Old\n");

        let rules = vec![Rule::literal("com.Old", "com.new_pkg")];
        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, false).unwrap();

        assert!(!result.applied);
        assert_eq!(result.edits.len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "com.Old\n");
    }

    #[test]
    fn extension_filter_limits_eligible_files() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "A.java", "com.Old\n");
        let xml = write_file(tmp.path(), "pom.xml", "com.Old\n");

        let rules = vec![Rule::literal("com.Old", "com.new_pkg")];
        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();

        assert_eq!(result.files_scanned, 1);
        assert_eq!(fs::read_to_string(&xml).unwrap(), "com.Old\n");
    }

    #[test]
    fn vcs_and_root_build_dirs_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), ".git/A.java", "com.Old\n");
        write_file(tmp.path(), "target/B.java", "com.Old\n");
        write_file(tmp.path(), "src/C.java", "com.Old\n");

        let rules = vec![Rule::literal("com.Old", "com.new_pkg")];
        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();

        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.edits[0].file, "src/C.java");
    }

    #[test]
    fn insensitive_rule_matches_any_case() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "A.java",
            "import com.EXPENSEMANAGEMENT.dto.X;\nimport com.ExpenseManagement.dto.Y;\n",
        );

        let rules = vec![Rule::insensitive("com.expensemanagement", "com.expensemanagement").unwrap()];
        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();

        assert_eq!(result.edits[0].replacements, 2);
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("EXPENSEMANAGEMENT"));
        assert!(!content.contains("ExpenseManagement"));
    }

    #[test]
    fn insensitive_token_is_not_a_pattern() {
        // The '.' in the token must match only a literal dot.
        let rule = Rule::insensitive("com.Old", "com.new_pkg").unwrap();
        let (out, count) = rule.apply("comXOld stays, com.old goes");
        assert_eq!(count, 1);
        assert_eq!(out, "comXOld stays, com.new_pkg goes");
    }

    #[test]
    fn latin1_file_survives_a_rewrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("A.java");
        // 0xE9 is 'é' in Latin-1 and invalid as a standalone UTF-8 byte.
        fs::write(&path, b"// caf\xe9\ncom.Old\n").unwrap();

        let rules = vec![Rule::literal("com.Old", "com.new_pkg")];
        let result = rewrite_tree(tmp.path(), &java_ext(), &rules, true).unwrap();

        assert_eq!(result.edits.len(), 1);
        assert_eq!(result.edits[0].encoding, TextEncoding::Latin1);
        assert_eq!(fs::read(&path).unwrap(), b"// caf\xe9\ncom.new_pkg\n");
    }

    #[test]
    fn read_errors_are_skips_not_failures() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "ok.java", "com.Old\n");
        let missing_root = tmp.path().join("nope");

        let rules = vec![Rule::literal("com.Old", "com.new_pkg")];
        let err = rewrite_tree(&missing_root, &java_ext(), &rules, true).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::PathNotFound);
    }
}
