use crate::comments::{strip_comments, StripOptions};
use crate::encoding::DecodedText;
use crate::errors::CopyError;
use crate::file_ref::FileRef;
use crate::workspace::{EntryKind, Workspace};
use tracing::{debug, trace};

pub const HEADER_MARK: &str = "------";
pub const FENCE: &str = "``````";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub strip_comments: bool,
    pub strip: StripOptions,
}

/// One file's framed content, newline-terminated.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFragment {
    pub source: FileRef,
    pub relative_path: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    NotARegularFile,
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderedFragment),
    Skipped(FileRef, SkipReason),
    Failed(FileRef, CopyError),
}

/// Frames content under its path header. Content gets exactly one trailing
/// newline before the closing fence.
pub fn frame(relative_path: &str, content: &str) -> String {
    format!(
        "{mark} {path} {mark}\n{fence}\n{content}\n{fence}\n",
        mark = HEADER_MARK,
        path = relative_path,
        fence = FENCE,
        content = content
    )
}

pub async fn render_file(
    workspace: &dyn Workspace,
    file: &FileRef,
    options: RenderOptions,
) -> RenderOutcome {
    match workspace.metadata(file).await {
        Ok(EntryKind::File) => {}
        Ok(EntryKind::Directory) => {
            return RenderOutcome::Skipped(file.clone(), SkipReason::Directory)
        }
        Ok(EntryKind::Other) => {
            return RenderOutcome::Skipped(file.clone(), SkipReason::NotARegularFile)
        }
        Err(e) => return RenderOutcome::Failed(file.clone(), e),
    }

    let bytes = match workspace.read(file).await {
        Ok(bytes) => bytes,
        Err(e) => return RenderOutcome::Failed(file.clone(), e),
    };

    let decoded = DecodedText::from_bytes(file.clone(), &bytes);
    trace!("Decoded {} as {}", decoded.source, decoded.encoding);

    let content = if options.strip_comments {
        strip_comments(&decoded.text, options.strip)
    } else {
        decoded.text
    };

    let relative_path = workspace.relative_path(file);
    debug!("Rendered {}", relative_path);
    RenderOutcome::Rendered(RenderedFragment {
        text: frame(&relative_path, &content),
        source: decoded.source,
        relative_path,
    })
}
