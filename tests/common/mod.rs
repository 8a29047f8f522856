#![allow(dead_code)]

use async_trait::async_trait;
use copy_folder_content::clipboard::ClipboardSink;
use copy_folder_content::config::CopierConfig;
use copy_folder_content::prompt::Prompter;
use copy_folder_content::state::StateStore;
use copy_folder_content::workspace::{DirEntry, EntryKind, Workspace};
use copy_folder_content::{ContentCopier, CopyError, FileRef};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const ROOT: &str = "/ws";

pub fn file_ref(relative: &str) -> FileRef {
    FileRef::new(format!("{}/{}", ROOT, relative))
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    UnreadableFile,
    Dir,
    UnreadableDir,
    Other,
}

/// In-memory tree rooted at `/ws`.
pub struct MemoryWorkspace {
    root: PathBuf,
    nodes: Mutex<BTreeMap<String, Node>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT.to_string(), Node::Dir);
        MemoryWorkspace {
            root: PathBuf::from(ROOT),
            nodes: Mutex::new(nodes),
        }
    }

    fn insert(&self, relative: &str, node: Node) {
        let full = format!("{}/{}", ROOT, relative);
        let mut nodes = self.nodes.lock().unwrap();
        let mut parent = full.as_str();
        while let Some((dir, _)) = parent.rsplit_once('/') {
            if dir.is_empty() {
                break;
            }
            nodes.entry(dir.to_string()).or_insert(Node::Dir);
            parent = dir;
        }
        nodes.insert(full, node);
    }

    pub fn add_file(&self, relative: &str, content: impl AsRef<[u8]>) -> FileRef {
        self.insert(relative, Node::File(content.as_ref().to_vec()));
        file_ref(relative)
    }

    pub fn add_unreadable_file(&self, relative: &str) -> FileRef {
        self.insert(relative, Node::UnreadableFile);
        file_ref(relative)
    }

    pub fn add_dir(&self, relative: &str) -> FileRef {
        self.insert(relative, Node::Dir);
        file_ref(relative)
    }

    pub fn add_unreadable_dir(&self, relative: &str) -> FileRef {
        self.insert(relative, Node::UnreadableDir);
        file_ref(relative)
    }

    pub fn add_special(&self, relative: &str) -> FileRef {
        self.insert(relative, Node::Other);
        file_ref(relative)
    }

    pub fn remove(&self, relative: &str) {
        let full = format!("{}/{}", ROOT, relative);
        self.nodes.lock().unwrap().remove(&full);
    }

    fn node(&self, file: &FileRef) -> Option<Node> {
        self.nodes.lock().unwrap().get(file.as_str()).cloned()
    }
}

fn kind(node: &Node) -> EntryKind {
    match node {
        Node::File(_) | Node::UnreadableFile => EntryKind::File,
        Node::Dir | Node::UnreadableDir => EntryKind::Directory,
        Node::Other => EntryKind::Other,
    }
}

#[async_trait]
impl Workspace for MemoryWorkspace {
    fn root(&self) -> Option<&Path> {
        Some(self.root.as_path())
    }

    async fn metadata(&self, file: &FileRef) -> Result<EntryKind, CopyError> {
        self.node(file)
            .map(|node| kind(&node))
            .ok_or_else(|| CopyError::FileReadError(file.to_string(), "not found".to_string()))
    }

    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, CopyError> {
        match self.node(file) {
            Some(Node::File(bytes)) => Ok(bytes),
            _ => Err(CopyError::FileReadError(
                file.to_string(),
                "permission denied".to_string(),
            )),
        }
    }

    async fn read_dir(&self, dir: &FileRef) -> Result<Vec<DirEntry>, CopyError> {
        match self.node(dir) {
            Some(Node::Dir) => {}
            _ => {
                return Err(CopyError::DirectoryReadError(
                    dir.to_string(),
                    "permission denied".to_string(),
                ))
            }
        }
        let prefix = format!("{}/", dir.as_str());
        let nodes = self.nodes.lock().unwrap();
        // Reverse order, so callers cannot rely on listing order.
        Ok(nodes
            .iter()
            .rev()
            .filter(|(path, _)| {
                path.strip_prefix(&prefix)
                    .map(|rest| !rest.is_empty() && !rest.contains('/'))
                    .unwrap_or(false)
            })
            .map(|(path, node)| DirEntry {
                file_ref: FileRef::new(path),
                kind: kind(node),
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    writes: Mutex<usize>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn with_contents(text: &str) -> Self {
        MemoryClipboard {
            contents: Mutex::new(Some(text.to_string())),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        MemoryClipboard {
            fail: true,
            ..Default::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl ClipboardSink for MemoryClipboard {
    async fn write_text(&self, text: String) -> Result<(), CopyError> {
        if self.fail {
            return Err(CopyError::ClipboardWriteError("no display".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Answers every question from a script and remembers what was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub confirm_answer: bool,
    pub prompt_answer: Option<String>,
    pub extension_answer: Option<Vec<String>>,
    pub confirmations: Mutex<Vec<String>>,
    pub offered_extensions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn confirming(answer: bool) -> Self {
        ScriptedPrompter {
            confirm_answer: answer,
            ..Default::default()
        }
    }

    pub fn selecting(extensions: &[&str]) -> Self {
        ScriptedPrompter {
            confirm_answer: true,
            extension_answer: Some(extensions.iter().map(|e| e.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().unwrap().push(message.to_string());
        self.confirm_answer
    }

    async fn ask_prompt(&self) -> Option<String> {
        self.prompt_answer.clone()
    }

    async fn select_extensions(&self, extensions: &[String]) -> Option<Vec<String>> {
        *self.offered_extensions.lock().unwrap() = extensions.to_vec();
        self.extension_answer.clone()
    }
}

#[derive(Default)]
pub struct MemoryState {
    slots: Mutex<HashMap<String, Value>>,
}

impl MemoryState {
    pub fn with(key: &str, value: Value) -> Self {
        let state = MemoryState::default();
        state.slots.lock().unwrap().insert(key.to_string(), value);
        state
    }

    pub fn slot(&self, key: &str) -> Option<Value> {
        self.slots.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryState {
    async fn get(&self, key: &str) -> Result<Option<Value>, CopyError> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CopyError> {
        self.slots.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

pub struct Harness {
    pub workspace: Arc<MemoryWorkspace>,
    pub clipboard: Arc<MemoryClipboard>,
    pub prompter: Arc<ScriptedPrompter>,
    pub state: Arc<MemoryState>,
}

impl Harness {
    pub fn new(workspace: MemoryWorkspace, prompter: ScriptedPrompter) -> Self {
        Harness {
            workspace: Arc::new(workspace),
            clipboard: Arc::new(MemoryClipboard::default()),
            prompter: Arc::new(prompter),
            state: Arc::new(MemoryState::default()),
        }
    }

    pub fn with_clipboard(mut self, clipboard: MemoryClipboard) -> Self {
        self.clipboard = Arc::new(clipboard);
        self
    }

    pub fn with_state(mut self, state: MemoryState) -> Self {
        self.state = Arc::new(state);
        self
    }

    pub async fn copier(&self, config: CopierConfig) -> ContentCopier {
        ContentCopier::restore(
            config,
            self.workspace.clone(),
            self.clipboard.clone(),
            self.prompter.clone(),
            self.state.clone(),
        )
        .await
    }

    pub fn clipboard_text(&self) -> String {
        self.clipboard.contents().unwrap_or_default()
    }
}

/// The framed form of one file, as it appears in copied output.
pub fn fragment(relative: &str, content: &str) -> String {
    format!("------ {} ------\n``````\n{}\n``````\n", relative, content)
}
