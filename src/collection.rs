use crate::aggregate::{aggregate, Aggregation, AggregationRequest};
use crate::clipboard::ClipboardSink;
use crate::errors::CopyError;
use crate::file_ref::FileRef;
use crate::state::{load_refs, save_refs, StateStore, COLLECTION_KEY};
use crate::workspace::Workspace;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Files gathered across commands: unique, in first-insertion order.
///
/// Every mutation goes through one lock and is mirrored to the state store,
/// so the collection survives restarts.
pub struct CollectionStore {
    files: Mutex<Vec<FileRef>>,
    state: Arc<dyn StateStore>,
    max_persisted_refs: usize,
}

impl CollectionStore {
    pub fn new(state: Arc<dyn StateStore>, max_persisted_refs: usize) -> Self {
        CollectionStore {
            files: Mutex::new(Vec::new()),
            state,
            max_persisted_refs,
        }
    }

    /// Loads the stored collection. A corrupt or stale list leaves the
    /// collection empty.
    pub async fn restore(&self, workspace: &dyn Workspace) -> usize {
        let restored = load_refs(self.state.as_ref(), workspace, COLLECTION_KEY).await;
        let mut files = self.files.lock().await;
        files.clear();
        for file in restored {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        debug!("Collection restored with {} files", files.len());
        files.len()
    }

    pub async fn start_new(&self, file: FileRef) {
        let mut files = self.files.lock().await;
        files.clear();
        files.push(file);
        self.persist(&files).await;
    }

    /// Returns `false` when the file was already collected.
    pub async fn append(&self, file: FileRef) -> bool {
        let mut files = self.files.lock().await;
        if files.contains(&file) {
            debug!("{} is already in the collection", file);
            return false;
        }
        files.push(file);
        self.persist(&files).await;
        true
    }

    /// Appends each file in turn, returning how many were new.
    pub async fn extend(&self, new_files: impl IntoIterator<Item = FileRef>) -> usize {
        let mut files = self.files.lock().await;
        let mut added = 0;
        for file in new_files {
            if !files.contains(&file) {
                files.push(file);
                added += 1;
            }
        }
        if added > 0 {
            self.persist(&files).await;
        }
        added
    }

    pub async fn snapshot(&self) -> Vec<FileRef> {
        self.files.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }

    /// Aggregates the collection without changing it.
    pub async fn copy(&self, workspace: &dyn Workspace) -> Aggregation {
        let files = self.files.lock().await;
        aggregate(workspace, &AggregationRequest::new(files.clone())).await
    }

    /// Aggregates the collection, hands the output to `clipboard` and empties
    /// the collection. The collection is kept when the clipboard write fails.
    pub async fn copy_and_clear(
        &self,
        workspace: &dyn Workspace,
        clipboard: &dyn ClipboardSink,
    ) -> Result<Aggregation, CopyError> {
        let mut files = self.files.lock().await;
        let aggregation = aggregate(workspace, &AggregationRequest::new(files.clone())).await;
        clipboard.write_text(aggregation.content.clone()).await?;

        info!("Clearing collection of {} files", files.len());
        files.clear();
        self.persist(&files).await;
        Ok(aggregation)
    }

    async fn persist(&self, files: &[FileRef]) {
        save_refs(
            self.state.as_ref(),
            COLLECTION_KEY,
            files,
            self.max_persisted_refs,
        )
        .await;
    }
}
