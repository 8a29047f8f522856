use crate::errors::CopyError;
use crate::file_ref::FileRef;
use crate::utils::normalize_path;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, devices, broken symlinks.
    Other,
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub file_ref: FileRef,
    pub kind: EntryKind,
}

/// File-system and path capabilities the copier needs from its host.
#[async_trait]
pub trait Workspace: Send + Sync {
    fn root(&self) -> Option<&Path>;

    async fn metadata(&self, file: &FileRef) -> Result<EntryKind, CopyError>;

    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, CopyError>;

    /// Immediate entries of `dir`, in no particular order. A symbolic link
    /// to a folder is reported as `Other`.
    async fn read_dir(&self, dir: &FileRef) -> Result<Vec<DirEntry>, CopyError>;

    /// Path of `file` relative to the workspace root, or the full path when
    /// the file lives elsewhere.
    fn relative_path(&self, file: &FileRef) -> String {
        let Some(root) = self.root() else {
            return file.to_string();
        };
        let mut prefix = normalize_path(root);
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        match file.as_str().strip_prefix(&prefix) {
            Some(relative) if !relative.is_empty() => relative.to_owned(),
            _ => file.to_string(),
        }
    }

    /// Turns user input into a ref, anchoring relative paths at the root.
    fn resolve(&self, path: &Path) -> FileRef {
        let base = self
            .root()
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();
        FileRef::resolve(&base, path)
    }
}

/// The local disk, optionally anchored at a workspace folder.
pub struct LocalWorkspace {
    root: Option<PathBuf>,
}

impl LocalWorkspace {
    pub fn new(root: Option<PathBuf>) -> Self {
        LocalWorkspace { root }
    }
}

#[async_trait]
impl Workspace for LocalWorkspace {
    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    async fn metadata(&self, file: &FileRef) -> Result<EntryKind, CopyError> {
        let metadata = async_fs::metadata(file)
            .await
            .map_err(|e| CopyError::FileReadError(file.to_string(), e.to_string()))?;
        Ok(kind_of(&metadata.file_type()))
    }

    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, CopyError> {
        async_fs::read(file)
            .await
            .map_err(|e| CopyError::FileReadError(file.to_string(), e.to_string()))
    }

    async fn read_dir(&self, dir: &FileRef) -> Result<Vec<DirEntry>, CopyError> {
        let dir_error =
            |e: std::io::Error| CopyError::DirectoryReadError(dir.to_string(), e.to_string());
        let mut reader = async_fs::read_dir(dir).await.map_err(dir_error)?;
        let mut entries = Vec::new();

        while let Some(entry) = reader.next_entry().await.map_err(dir_error)? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(dir_error)?;
            // Links to folders are not walked. Links to files read as files.
            let kind = if file_type.is_symlink() {
                match async_fs::metadata(&path).await {
                    Ok(target) if target.is_file() => EntryKind::File,
                    _ => EntryKind::Other,
                }
            } else {
                kind_of(&file_type)
            };
            trace!("Listed {:?} as {:?}", path, kind);
            entries.push(DirEntry {
                file_ref: FileRef::new(&path),
                kind,
            });
        }

        Ok(entries)
    }
}

fn kind_of(file_type: &std::fs::FileType) -> EntryKind {
    if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    }
}
