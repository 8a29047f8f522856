pub mod aggregate;
pub mod clipboard;
pub mod collection;
pub mod comments;
pub mod config;
pub mod copy;
pub mod encoding;
pub mod errors;
pub mod file_ref;
pub mod logger;
pub mod prompt;
pub mod render;
pub mod reporting;
pub mod state;
pub mod utils;
pub mod walker;
pub mod workspace;

pub use copy::{ContentCopier, CopyOutcome, CopySummary};
pub use errors::CopyError;
pub use file_ref::FileRef;
