use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expand `~` in a user-supplied path and convert to a `PathBuf`.
pub fn expand(input: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(input).into_owned())
}

/// Expand a user-supplied path and require it to be an existing directory.
pub fn require_dir(input: &str) -> Result<PathBuf> {
    let path = expand(input);
    if !path.is_dir() {
        return Err(
            Error::path_not_found(path.display().to_string(), Some("directory".to_string()))
                .with_hint("Check the --path argument"),
        );
    }
    Ok(path)
}

/// Expand a user-supplied path and require it to be an existing file.
pub fn require_file(input: &str) -> Result<PathBuf> {
    let path = expand(input);
    if !path.is_file() {
        return Err(Error::path_not_found(
            path.display().to_string(),
            Some("file".to_string()),
        ));
    }
    Ok(path)
}

/// Join a possibly-relative path onto a base directory.
/// Absolute inputs are returned unchanged.
pub fn join_relative(base: &Path, input: &str) -> PathBuf {
    let expanded = expand(input);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_passes_plain_paths_through() {
        assert_eq!(expand("/var/tmp"), PathBuf::from("/var/tmp"));
        assert_eq!(expand("src/main"), PathBuf::from("src/main"));
    }

    #[test]
    fn require_dir_rejects_missing_path() {
        let err = require_dir("/definitely/not/a/real/dir").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::PathNotFound);
    }

    #[test]
    fn join_relative_keeps_absolute() {
        let base = Path::new("/repo");
        assert_eq!(join_relative(base, "/other"), PathBuf::from("/other"));
        assert_eq!(join_relative(base, "target"), PathBuf::from("/repo/target"));
    }
}
