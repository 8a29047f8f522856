use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// Questions the copier may need to ask the user. `None` means the user
/// dismissed the question.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;

    async fn ask_prompt(&self) -> Option<String>;

    async fn select_extensions(&self, extensions: &[String]) -> Option<Vec<String>>;
}

/// Asks on stderr and reads answers from stdin. Preset answers skip the
/// question entirely.
#[derive(Debug, Default, Clone)]
pub struct TerminalPrompter {
    pub assume_yes: bool,
    pub preset_prompt: Option<String>,
    pub preset_extensions: Option<Vec<String>>,
}

impl TerminalPrompter {
    async fn ask(&self, question: &str) -> Option<String> {
        let mut stderr = io::stderr();
        if stderr.write_all(question.as_bytes()).await.is_err() || stderr.flush().await.is_err() {
            return None;
        }

        let mut line = String::new();
        match BufReader::new(io::stdin()).read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
            Err(e) => {
                warn!("Could not read answer: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match self.ask(&format!("{} [y/N] ", message)).await {
            Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    async fn ask_prompt(&self) -> Option<String> {
        if let Some(prompt) = &self.preset_prompt {
            return Some(prompt.clone());
        }
        self.ask("Enter the prompt: ").await
    }

    async fn select_extensions(&self, extensions: &[String]) -> Option<Vec<String>> {
        if let Some(preset) = &self.preset_extensions {
            return Some(
                preset
                    .iter()
                    .map(|ext| ext.trim_start_matches('.').to_owned())
                    .filter(|ext| !ext.is_empty())
                    .collect(),
            );
        }

        let mut listing = String::from("Select file extensions:\n");
        for (i, ext) in extensions.iter().enumerate() {
            listing.push_str(&format!("  {:>3}) .{}\n", i + 1, ext));
        }
        listing.push_str("Numbers or names, separated by spaces or commas: ");

        let answer = self.ask(&listing).await?;
        Some(parse_selection(&answer, extensions))
    }
}

/// Maps an answer like `1, 3 toml` onto the offered extensions. Unknown
/// tokens are dropped.
pub fn parse_selection(answer: &str, extensions: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for token in answer
        .split([',', ' ', '\t'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let picked = match token.parse::<usize>() {
            Ok(n) if n >= 1 => extensions.get(n - 1),
            _ => {
                let name = token.trim_start_matches('.');
                extensions.iter().find(|ext| ext.as_str() == name)
            }
        };
        match picked {
            Some(ext) if !selected.contains(ext) => selected.push(ext.clone()),
            Some(_) => {}
            None => warn!("Ignoring unknown extension choice: {}", token),
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_accepts_numbers_and_names() {
        let offered = vec!["json".to_string(), "rs".to_string(), "toml".to_string()];
        assert_eq!(parse_selection("1, .toml rs 9 xyz", &offered), vec!["json", "toml", "rs"]);
        assert!(parse_selection("", &offered).is_empty());
    }
}
