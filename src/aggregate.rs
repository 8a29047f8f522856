use crate::comments::StripOptions;
use crate::file_ref::FileRef;
use crate::render::{render_file, RenderOptions, RenderOutcome, RenderedFragment, SkipReason};
use crate::workspace::Workspace;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Default)]
pub struct AggregationRequest {
    pub files: Vec<FileRef>,
    pub strip_comments: bool,
    pub strip: StripOptions,
    /// When set, the output is `prompt\n<body>\nprompt`, even for an empty
    /// prompt.
    pub prompt: Option<String>,
}

impl AggregationRequest {
    pub fn new(files: Vec<FileRef>) -> Self {
        AggregationRequest {
            files,
            ..Default::default()
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn strip_comments(mut self, strip_comments: bool, strip: StripOptions) -> Self {
        self.strip_comments = strip_comments;
        self.strip = strip;
        self
    }
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub content: String,
    pub fragments: Vec<RenderedFragment>,
    pub skipped: Vec<(FileRef, SkipReason)>,
    pub failed: Vec<(FileRef, String)>,
}

impl Aggregation {
    /// Refs that made it into the output, in output order.
    pub fn included(&self) -> Vec<FileRef> {
        self.fragments.iter().map(|f| f.source.clone()).collect()
    }
}

/// Renders the requested files in the given order. A file that fails to read
/// is logged and left out; the rest of the batch still goes through.
pub async fn aggregate(workspace: &dyn Workspace, request: &AggregationRequest) -> Aggregation {
    let options = RenderOptions {
        strip_comments: request.strip_comments,
        strip: request.strip,
    };
    let mut aggregation = Aggregation::default();
    let mut body = String::new();

    for file in &request.files {
        trace!("Processing file: {}", file);
        match render_file(workspace, file, options).await {
            RenderOutcome::Rendered(fragment) => {
                body.push_str(&fragment.text);
                aggregation.fragments.push(fragment);
            }
            RenderOutcome::Skipped(file, reason) => {
                debug!("Skipping {}: {:?}", file, reason);
                aggregation.skipped.push((file, reason));
            }
            RenderOutcome::Failed(file, e) => {
                warn!("Failed to read file {}: {}", file, e);
                aggregation.failed.push((file, e.to_string()));
            }
        }
    }

    aggregation.content = match &request.prompt {
        Some(prompt) => format!("{}\n{}\n{}", prompt, body, prompt),
        None => body,
    };
    trace!("Final content length: {}", aggregation.content.len());
    aggregation
}
