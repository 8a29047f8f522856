use crate::errors::CopyError;
use arboard::Clipboard;
use async_trait::async_trait;
use tokio::io::{self, AsyncWriteExt};
use tracing::debug;

/// Destination of a finished copy. Writes are fire-and-forget.
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write_text(&self, text: String) -> Result<(), CopyError>;
}

/// The system clipboard.
#[derive(Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write_text(&self, text: String) -> Result<(), CopyError> {
        debug!("Initializing clipboard");
        let mut clipboard =
            Clipboard::new().map_err(|e| CopyError::ClipboardInitError(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| CopyError::ClipboardWriteError(e.to_string()))
    }
}

/// Writes the output to stdout, for piping or headless machines.
#[derive(Default)]
pub struct StdoutSink;

#[async_trait]
impl ClipboardSink for StdoutSink {
    async fn write_text(&self, text: String) -> Result<(), CopyError> {
        let mut stdout = io::stdout();
        stdout
            .write_all(text.as_bytes())
            .await
            .map_err(|e| CopyError::ClipboardWriteError(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| CopyError::ClipboardWriteError(e.to_string()))
    }
}
