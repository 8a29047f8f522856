use crate::errors::CopyError;
use crate::file_ref::FileRef;
use crate::workspace::{EntryKind, Workspace};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, warn};

pub const COLLECTION_KEY: &str = "copyFolderContent.collection";
pub const LAST_SELECTION_KEY: &str = "copyFolderContent.lastSelection";
const UPDATED_AT_KEY: &str = "updatedAt";

/// Durable key-value slot scoped to one workspace.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, CopyError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), CopyError>;
}

/// One JSON file shared by every workspace; each workspace owns the object
/// stored under its scope.
pub struct JsonFileState {
    path: PathBuf,
    scope: String,
}

impl JsonFileState {
    pub fn new(path: PathBuf, scope: impl Into<String>) -> Self {
        JsonFileState {
            path,
            scope: scope.into(),
        }
    }

    async fn load(&self) -> Result<Map<String, Value>, CopyError> {
        let raw = match async_fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(CopyError::StateError(e.to_string())),
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            other => Err(CopyError::StateError(format!(
                "expected an object in {}, found {}",
                self.path.display(),
                other
            ))),
        }
    }
}

#[async_trait]
impl StateStore for JsonFileState {
    async fn get(&self, key: &str) -> Result<Option<Value>, CopyError> {
        match self.load().await?.remove(&self.scope) {
            Some(Value::Object(mut slots)) => Ok(slots.remove(key)),
            Some(_) => Err(CopyError::StateError(format!(
                "state for {} is not an object",
                self.scope
            ))),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CopyError> {
        let mut map = match self.load().await {
            Ok(map) => map,
            Err(e) => {
                warn!("Replacing unreadable state file {}: {}", self.path.display(), e);
                Map::new()
            }
        };

        let mut slots = match map.remove(&self.scope) {
            Some(Value::Object(slots)) => slots,
            _ => Map::new(),
        };
        slots.insert(key.to_owned(), value);
        slots.insert(
            UPDATED_AT_KEY.to_owned(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        map.insert(self.scope.clone(), Value::Object(slots));

        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let serialized = serde_json::to_string_pretty(&Value::Object(map))?;
        async_fs::write(&self.path, serialized).await?;
        debug!("Stored {} for {} in {}", key, self.scope, self.path.display());
        Ok(())
    }
}

/// Stores `refs` under `key` unless the list is longer than `cap`. Failures are
/// logged; returns whether the list was stored.
pub async fn save_refs(state: &dyn StateStore, key: &str, refs: &[FileRef], cap: usize) -> bool {
    if refs.len() > cap {
        warn!(
            "Not persisting {}: {} files exceed the limit of {}",
            key,
            refs.len(),
            cap
        );
        return false;
    }

    let value = match serde_json::to_value(refs) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not serialize {}: {}", key, e);
            return false;
        }
    };
    match state.set(key, value).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not persist {}: {}", key, e);
            false
        }
    }
}

/// Reads the list stored under `key`. Anything unparsable or stale discards
/// the whole list.
pub async fn load_refs(
    state: &dyn StateStore,
    workspace: &dyn Workspace,
    key: &str,
) -> Vec<FileRef> {
    let value = match state.get(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Discarding stored {}: {}", key, e);
            return Vec::new();
        }
    };

    let stored: Vec<String> = match serde_json::from_value(value) {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Discarding stored {}: {}", key, e);
            return Vec::new();
        }
    };

    let mut refs = Vec::with_capacity(stored.len());
    for raw in &stored {
        if raw.is_empty() || !Path::new(raw).is_absolute() {
            warn!("Discarding stored {}: {:?} is not an absolute path", key, raw);
            return Vec::new();
        }
        let file = FileRef::new(raw);
        if !matches!(workspace.metadata(&file).await, Ok(EntryKind::File)) {
            warn!("Discarding stored {}: {} no longer exists", key, file);
            return Vec::new();
        }
        refs.push(file);
    }

    debug!("Restored {} entries from {}", refs.len(), key);
    refs
}
