use crate::errors::CopyError;
use crate::render::RenderedFragment;
use std::collections::BTreeMap;
use tiktoken_rs::get_bpe_from_model;
use tracing::{debug, info, trace};

/// Path tree of token counts; leaves are files.
#[derive(Debug, Default)]
pub struct StatsNode {
    pub children: BTreeMap<String, StatsNode>,
    pub token_count: Option<usize>,
}

impl StatsNode {
    pub fn insert(&mut self, path: &str, token_count: usize) {
        let mut current = self;
        for component in path.split('/').filter(|c| !c.is_empty()) {
            current = current.children.entry(component.to_owned()).or_default();
        }
        current.token_count = Some(token_count);
    }

    pub fn total_tokens(&self) -> usize {
        self.token_count.unwrap_or(0)
            + self
                .children
                .values()
                .map(StatsNode::total_tokens)
                .sum::<usize>()
    }
}

/// Tokens per copied file, keyed by the path shown in its header.
pub fn count_tokens(
    fragments: &[RenderedFragment],
    model: &str,
) -> Result<Vec<(String, usize)>, CopyError> {
    let tokenizer =
        get_bpe_from_model(model).map_err(|e| CopyError::TokenizerError(e.to_string()))?;
    Ok(fragments
        .iter()
        .map(|fragment| {
            let count = tokenizer.encode_ordinary(&fragment.text).len();
            trace!("File {} has {} tokens", fragment.relative_path, count);
            (fragment.relative_path.clone(), count)
        })
        .collect())
}

/// Renders the counts as an indented tree with per-folder totals.
pub fn stats_lines(token_counts: &[(String, usize)]) -> Vec<String> {
    let mut root = StatsNode::default();
    for (path, count) in token_counts {
        root.insert(path, *count);
    }

    let mut lines = vec![format!("Overall ({} tokens)", root.total_tokens())];
    push_tree(&root, "", &mut lines);
    lines
}

fn push_tree(node: &StatsNode, prefix: &str, lines: &mut Vec<String>) {
    let last_index = node.children.len().saturating_sub(1);
    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = i == last_index;
        let connector = if is_last { "┗━━" } else { "┣━━" };
        match child.token_count {
            Some(count) if child.children.is_empty() => {
                lines.push(format!("{}{} {} ({} tokens)", prefix, connector, name, count));
            }
            _ => {
                lines.push(format!(
                    "{}{} {}/ ({} tokens)",
                    prefix,
                    connector,
                    name,
                    child.total_tokens()
                ));
                let child_prefix = format!("{}{}    ", prefix, if is_last { " " } else { "┃" });
                push_tree(child, &child_prefix, lines);
            }
        }
    }
}

pub fn print_stats(token_counts: &[(String, usize)]) {
    debug!("Printing statistics for {} files", token_counts.len());
    for line in stats_lines(token_counts) {
        info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_sum_their_files() {
        let counts = vec![
            ("src/main.rs".to_string(), 10),
            ("src/lib.rs".to_string(), 5),
            ("README.md".to_string(), 2),
        ];
        let lines = stats_lines(&counts);
        assert_eq!(
            lines,
            vec![
                "Overall (17 tokens)",
                "┣━━ README.md (2 tokens)",
                "┗━━ src/ (15 tokens)",
                "     ┣━━ lib.rs (5 tokens)",
                "     ┗━━ main.rs (10 tokens)",
            ]
        );
    }
}
