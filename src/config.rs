use crate::walker::DEFAULT_MAX_FILES_WITHOUT_CONFIRMATION;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_PERSISTED_REFS: usize = 5000;
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const APP_DIR: &str = "copy-folder-content";
pub const STATE_DIR: &str = ".copy-folder-content";
pub const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone)]
pub struct CopierConfig {
    pub state_file: Option<PathBuf>,
    pub max_files_without_confirmation: usize,
    pub max_persisted_refs: usize,
    /// Treat `#` as a comment marker when stripping.
    pub hash_comments: bool,
    pub stats: bool,
    pub model: String,
}

impl Default for CopierConfig {
    fn default() -> Self {
        CopierConfig {
            state_file: None,
            max_files_without_confirmation: DEFAULT_MAX_FILES_WITHOUT_CONFIRMATION,
            max_persisted_refs: DEFAULT_MAX_PERSISTED_REFS,
            hash_comments: false,
            stats: false,
            model: DEFAULT_MODEL.to_owned(),
        }
    }
}

impl CopierConfig {
    /// Explicit state file, else one under the user's local data folder,
    /// else inside `fallback_root`.
    pub fn state_path(&self, fallback_root: &Path) -> PathBuf {
        if let Some(path) = &self.state_file {
            return path.clone();
        }
        match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join(APP_DIR).join(STATE_FILE),
            None => fallback_root.join(STATE_DIR).join(STATE_FILE),
        }
    }
}
