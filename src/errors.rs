use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Clipboard initialization failed: {0}")]
    ClipboardInitError(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteError(String),

    #[error("Could not read file {0}: {1}")]
    FileReadError(String, String),

    #[error("Could not read folder {0}: {1}")]
    DirectoryReadError(String, String),

    #[error("IO Error: {0}")]
    IoError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Pattern error: {0}")]
    PatternError(String),

    #[error("Tokenizer Error: {0}")]
    TokenizerError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for CopyError {
    fn from(err: std::io::Error) -> Self {
        CopyError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for CopyError {
    fn from(err: serde_json::Error) -> Self {
        CopyError::StateError(err.to_string())
    }
}

impl From<glob::PatternError> for CopyError {
    fn from(err: glob::PatternError) -> Self {
        CopyError::PatternError(err.to_string())
    }
}
