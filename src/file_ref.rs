use crate::utils::normalize_path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Canonical identity of a file-system entry.
///
/// Two refs are equal iff their normalised path strings are equal, which is
/// what collections deduplicate on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileRef(normalize_path(path.as_ref()))
    }

    /// Joins relative paths onto `base` before normalising.
    pub fn resolve(base: &Path, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_absolute() {
            FileRef::new(path)
        } else {
            FileRef::new(base.join(path))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for FileRef {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}
