use crate::aggregate::{aggregate, Aggregation, AggregationRequest};
use crate::clipboard::ClipboardSink;
use crate::collection::CollectionStore;
use crate::comments::StripOptions;
use crate::config::CopierConfig;
use crate::errors::CopyError;
use crate::file_ref::FileRef;
use crate::prompt::Prompter;
use crate::reporting::{count_tokens, print_stats};
use crate::state::{load_refs, save_refs, StateStore, LAST_SELECTION_KEY};
use crate::walker::{DirectoryWalker, WalkMode};
use crate::workspace::{EntryKind, Workspace};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySummary {
    pub files: usize,
    pub skipped: usize,
    pub failed: usize,
    pub chars: usize,
}

impl CopySummary {
    fn from_aggregation(aggregation: &Aggregation) -> Self {
        CopySummary {
            files: aggregation.fragments.len(),
            skipped: aggregation.skipped.len(),
            failed: aggregation.failed.len(),
            chars: aggregation.content.chars().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The clipboard now holds the output.
    Copied(CopySummary),
    /// The collection changed; the clipboard was not touched.
    Updated { added: usize, total: usize },
    /// Nothing happened, for the given reason.
    Cancelled(String),
}

/// The commands a host binds to its menus. Holds the collection and the
/// host capabilities; at most one command runs at a time.
pub struct ContentCopier {
    config: CopierConfig,
    workspace: Arc<dyn Workspace>,
    clipboard: Arc<dyn ClipboardSink>,
    prompter: Arc<dyn Prompter>,
    state: Arc<dyn StateStore>,
    collection: CollectionStore,
    operation: Mutex<()>,
}

impl ContentCopier {
    pub fn new(
        config: CopierConfig,
        workspace: Arc<dyn Workspace>,
        clipboard: Arc<dyn ClipboardSink>,
        prompter: Arc<dyn Prompter>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        let collection = CollectionStore::new(state.clone(), config.max_persisted_refs);
        ContentCopier {
            config,
            workspace,
            clipboard,
            prompter,
            state,
            collection,
            operation: Mutex::new(()),
        }
    }

    /// Builds a copier and loads the persisted collection.
    pub async fn restore(
        config: CopierConfig,
        workspace: Arc<dyn Workspace>,
        clipboard: Arc<dyn ClipboardSink>,
        prompter: Arc<dyn Prompter>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        let copier = ContentCopier::new(config, workspace, clipboard, prompter, state);
        copier.collection.restore(copier.workspace.as_ref()).await;
        copier
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    pub fn workspace(&self) -> &dyn Workspace {
        self.workspace.as_ref()
    }

    /// Copies the files directly inside `root`. The output is always wrapped
    /// in the prompt, which defaults to empty.
    pub async fn copy_folder_direct(
        &self,
        root: &FileRef,
        prompt: Option<String>,
        strip_comments: bool,
    ) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let files = self.walker().walk(root, &WalkMode::DirectChildren).await?;
        if !self.confirm_file_count(files.len()).await {
            return Ok(cancelled("Copy cancelled"));
        }

        let request = AggregationRequest::new(files)
            .strip_comments(strip_comments, self.strip_options())
            .with_prompt(prompt.unwrap_or_default());
        self.copy_request(&request).await
    }

    /// Copies every file under `root`.
    pub async fn copy_folder_recursive(
        &self,
        root: &FileRef,
        strip_comments: bool,
    ) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let walker = self.walker();
        let count = walker.count_files(root).await?;
        if !self.confirm_file_count(count).await {
            return Ok(cancelled("Copy cancelled"));
        }

        let files = walker.walk(root, &WalkMode::Recursive).await?;
        let request =
            AggregationRequest::new(files).strip_comments(strip_comments, self.strip_options());
        self.copy_request(&request).await
    }

    /// Copies the files under `root` whose extension the user picks. Content
    /// is copied as is, comments included.
    pub async fn copy_folder_by_extension(&self, root: &FileRef) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let walker = self.walker();
        let count = walker.count_files(root).await?;
        if !self.confirm_file_count(count).await {
            return Ok(cancelled("Copy cancelled"));
        }

        let extensions = walker.collect_extensions(root).await?;
        if extensions.is_empty() {
            return Ok(cancelled("No file extensions found"));
        }
        let selected = match self.prompter.select_extensions(&extensions).await {
            Some(selected) if !selected.is_empty() => selected,
            _ => return Ok(cancelled("No file extensions selected")),
        };
        info!("Copying files with extensions: {}", selected.join(", "));

        let files = walker
            .walk(root, &WalkMode::RecursiveByExtension(selected))
            .await?;
        self.copy_request(&AggregationRequest::new(files)).await
    }

    /// Copies an explicit selection. Files are taken as given, folders
    /// contribute their direct files.
    pub async fn copy_selected(&self, selection: &[FileRef]) -> Result<CopyOutcome, CopyError> {
        if selection.is_empty() {
            return Ok(cancelled("No file or folder selected."));
        }

        let _running = self.operation.lock().await;
        let files = self.resolve_selection(selection).await?;
        if files.is_empty() {
            return Ok(cancelled("No files in selection."));
        }
        if !self.confirm_file_count(files.len()).await {
            return Ok(cancelled("Copy cancelled"));
        }
        self.copy_request(&AggregationRequest::new(files)).await
    }

    /// Adds a file, or a folder's direct files, to the collection.
    pub async fn collection_add(&self, path: &FileRef) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let files = self.resolve_selection(std::slice::from_ref(path)).await?;
        let added = self.collection.extend(files).await;
        Ok(CopyOutcome::Updated {
            added,
            total: self.collection.len().await,
        })
    }

    /// Adds to the collection, then copies the whole collection without
    /// clearing it.
    pub async fn collection_add_and_copy(&self, path: &FileRef) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let files = self.resolve_selection(std::slice::from_ref(path)).await?;
        self.collection.extend(files).await;

        let aggregation = self.collection.copy(self.workspace.as_ref()).await;
        self.deliver(aggregation).await
    }

    /// Replaces the collection with `path` (or a folder's direct files).
    pub async fn collection_start_new(&self, path: &FileRef) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let mut files = self.resolve_selection(std::slice::from_ref(path)).await?.into_iter();
        let Some(first) = files.next() else {
            return Ok(cancelled("Nothing to collect"));
        };

        self.collection.start_new(first).await;
        let added = 1 + self.collection.extend(files).await;
        info!("New collection started with {} files", added);
        Ok(CopyOutcome::Updated {
            added,
            total: self.collection.len().await,
        })
    }

    pub async fn collection_copy(&self) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let aggregation = self.collection.copy(self.workspace.as_ref()).await;
        self.deliver(aggregation).await
    }

    pub async fn collection_copy_and_clear(&self) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let aggregation = self
            .collection
            .copy_and_clear(self.workspace.as_ref(), self.clipboard.as_ref())
            .await?;
        self.after_copy(&aggregation).await;
        Ok(CopyOutcome::Copied(CopySummary::from_aggregation(&aggregation)))
    }

    pub async fn collection_contents(&self) -> Vec<FileRef> {
        self.collection.snapshot().await
    }

    /// Copies the files of the last completed copy again.
    pub async fn copy_last_selection(&self) -> Result<CopyOutcome, CopyError> {
        let _running = self.operation.lock().await;
        let files = load_refs(
            self.state.as_ref(),
            self.workspace.as_ref(),
            LAST_SELECTION_KEY,
        )
        .await;
        if files.is_empty() {
            return Ok(cancelled("No previous selection to copy."));
        }
        self.copy_request(&AggregationRequest::new(files)).await
    }

    fn walker(&self) -> DirectoryWalker<'_> {
        DirectoryWalker::new(self.workspace.as_ref())
    }

    fn strip_options(&self) -> StripOptions {
        StripOptions {
            hash_comments: self.config.hash_comments,
        }
    }

    async fn confirm_file_count(&self, count: usize) -> bool {
        let limit = self.config.max_files_without_confirmation;
        if count <= limit {
            return true;
        }
        let message = format!(
            "The selection contains more than {} files ({} files). Do you want to continue?",
            limit, count
        );
        let confirmed = self.prompter.confirm(&message).await;
        debug!("Large copy of {} files confirmed: {}", count, confirmed);
        confirmed
    }

    async fn resolve_selection(&self, selection: &[FileRef]) -> Result<Vec<FileRef>, CopyError> {
        let walker = self.walker();
        let mut files = Vec::new();
        for item in selection {
            match self.workspace.metadata(item).await? {
                EntryKind::File => files.push(item.clone()),
                EntryKind::Directory => {
                    files.extend(walker.walk(item, &WalkMode::DirectChildren).await?)
                }
                EntryKind::Other => warn!("Skipping {}: not a regular file", item),
            }
        }
        Ok(files)
    }

    async fn copy_request(&self, request: &AggregationRequest) -> Result<CopyOutcome, CopyError> {
        let aggregation = aggregate(self.workspace.as_ref(), request).await;
        self.deliver(aggregation).await
    }

    async fn deliver(&self, aggregation: Aggregation) -> Result<CopyOutcome, CopyError> {
        self.clipboard.write_text(aggregation.content.clone()).await?;
        self.after_copy(&aggregation).await;
        Ok(CopyOutcome::Copied(CopySummary::from_aggregation(&aggregation)))
    }

    async fn after_copy(&self, aggregation: &Aggregation) {
        info!("Copied {} files to clipboard", aggregation.fragments.len());
        save_refs(
            self.state.as_ref(),
            LAST_SELECTION_KEY,
            &aggregation.included(),
            self.config.max_persisted_refs,
        )
        .await;

        if self.config.stats {
            match count_tokens(&aggregation.fragments, &self.config.model) {
                Ok(counts) => print_stats(&counts),
                Err(e) => warn!("Skipping statistics: {}", e),
            }
        }
    }
}

fn cancelled(reason: &str) -> CopyOutcome {
    info!("{}", reason);
    CopyOutcome::Cancelled(reason.to_owned())
}
