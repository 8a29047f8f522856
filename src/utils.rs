use crate::errors::CopyError;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Lexically normalises a path: drops `.` components and trailing separators,
/// folds `..` into its parent and uses `/` as the separator. Symlinks are not
/// resolved.
pub fn normalize_path(path: &Path) -> String {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized.to_string_lossy().replace('\\', "/")
}

/// Text after the last `.` of a file name, `None` when the name has no dot or
/// ends with one.
pub fn extension_of(file_name: &str) -> Option<&str> {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Expands shell-style patterns given on the command line. Plain paths that
/// exist are passed through untouched, so folders survive for the caller to
/// resolve.
pub fn expand_patterns(patterns: &[String], base: &Path) -> Result<Vec<PathBuf>, CopyError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let candidate = base.join(pattern);
        if candidate.exists() || !is_glob(pattern) {
            paths.push(candidate);
            continue;
        }

        let full_pattern = candidate.to_string_lossy().replace('\\', "/");
        for entry in glob::glob(&full_pattern)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!("Error processing pattern {}: {:?}", pattern, e),
            }
        }
    }
    Ok(paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dots_and_trailing_separators() {
        assert_eq!(normalize_path(Path::new("/work/./src/../lib/")), "/work/lib");
        assert_eq!(normalize_path(Path::new("/work/src/main.rs")), "/work/src/main.rs");
        assert_eq!(normalize_path(Path::new("/..")), "/");
    }

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of(".gitignore"), Some("gitignore"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("weird."), None);
    }
}
