use crate::errors::CopyError;
use crate::file_ref::FileRef;
use crate::utils::extension_of;
use crate::workspace::{DirEntry, EntryKind, Workspace};
use futures::future::{BoxFuture, FutureExt};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Folders with more files than this need confirmation before copying.
pub const DEFAULT_MAX_FILES_WITHOUT_CONFIRMATION: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkMode {
    DirectChildren,
    Recursive,
    /// Recursive, keeping names that end with `.<ext>` for one of the
    /// extensions (given without the dot).
    RecursiveByExtension(Vec<String>),
}

/// Resolves folders into ordered file lists. Entries are visited in file
/// name order, depth first.
pub struct DirectoryWalker<'a> {
    workspace: &'a dyn Workspace,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(workspace: &'a dyn Workspace) -> Self {
        DirectoryWalker { workspace }
    }

    pub async fn walk(&self, root: &FileRef, mode: &WalkMode) -> Result<Vec<FileRef>, CopyError> {
        let recursive = !matches!(mode, WalkMode::DirectChildren);
        let mut entries = Vec::new();
        self.visit(root, recursive, true, &mut entries).await?;

        let suffixes: Option<Vec<String>> = match mode {
            WalkMode::RecursiveByExtension(extensions) => {
                Some(extensions.iter().map(|ext| format!(".{}", ext)).collect())
            }
            _ => None,
        };

        let files: Vec<FileRef> = entries
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| entry.file_ref)
            .filter(|file| match &suffixes {
                Some(suffixes) => suffixes.iter().any(|s| file.file_name().ends_with(s.as_str())),
                None => true,
            })
            .collect();

        debug!("Walked {} in {:?} mode: {} files", root, mode, files.len());
        Ok(files)
    }

    /// Non-directory entries in the whole subtree.
    pub async fn count_files(&self, root: &FileRef) -> Result<usize, CopyError> {
        let mut entries = Vec::new();
        self.visit(root, true, true, &mut entries).await?;
        Ok(entries.len())
    }

    /// Distinct extensions of the files in the subtree, sorted.
    pub async fn collect_extensions(&self, root: &FileRef) -> Result<Vec<String>, CopyError> {
        let mut entries = Vec::new();
        self.visit(root, true, true, &mut entries).await?;

        let extensions: BTreeSet<String> = entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .filter_map(|entry| extension_of(entry.file_ref.file_name()))
            .map(str::to_owned)
            .collect();
        Ok(extensions.into_iter().collect())
    }

    /// Pushes every non-directory entry under `dir` onto `out`. Only a failure
    /// to list the starting folder is an error; unreadable subfolders are
    /// skipped.
    fn visit<'b>(
        &'b self,
        dir: &'b FileRef,
        recursive: bool,
        is_root: bool,
        out: &'b mut Vec<DirEntry>,
    ) -> BoxFuture<'b, Result<(), CopyError>> {
        async move {
            let mut entries = match self.workspace.read_dir(dir).await {
                Ok(entries) => entries,
                Err(e) if is_root => return Err(e),
                Err(e) => {
                    warn!("Skipping unreadable folder {}: {}", dir, e);
                    return Ok(());
                }
            };
            entries.sort_by(|a, b| a.file_ref.file_name().cmp(b.file_ref.file_name()));

            for entry in entries {
                match entry.kind {
                    EntryKind::Directory if recursive => {
                        self.visit(&entry.file_ref, true, false, out).await?;
                    }
                    EntryKind::Directory => {}
                    _ => out.push(entry),
                }
            }
            Ok(())
        }
        .boxed()
    }
}
