use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(\r?\n)(?:[ \t]*\r?\n)+").expect("blank line pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct StripOptions {
    /// Also treat `#` as a line comment. A leading shebang is always kept.
    pub hash_comments: bool,
}

#[derive(Error, Debug, PartialEq)]
pub enum StripError {
    #[error("unterminated block comment starting at offset {0}")]
    UnterminatedComment(usize),
}

/// Removes comments and collapses blank-line runs. Text the scanner cannot
/// make sense of is returned untouched.
pub fn strip_comments(text: &str, options: StripOptions) -> String {
    match remove_comments(text, options) {
        Ok(stripped) => {
            let collapsed = collapse_blank_lines(&stripped);
            // Only text that lost comments is reduced to nothing.
            if stripped != text && collapsed.trim().is_empty() {
                String::new()
            } else {
                collapsed
            }
        }
        Err(e) => {
            debug!("Leaving content as is: {}", e);
            text.to_owned()
        }
    }
}

/// Replaces every run of two or more blank lines with a single empty line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUN.replace_all(text, "$1").into_owned()
}

/// Best-effort, language-agnostic removal of `//`, `/* */`, `<!-- -->` and
/// optionally `#` comments. Quoted text is copied through verbatim.
pub fn remove_comments(text: &str, options: StripOptions) -> Result<String, StripError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '/' if next == Some('/') => {
                trim_trailing_blanks(&mut out);
                i = skip_line(&chars, i);
            }
            '/' if next == Some('*') => {
                i = find(&chars, i + 2, "*/").ok_or(StripError::UnterminatedComment(i))? + 2;
            }
            '<' if starts_with(&chars, i, "<!--") => {
                i = find(&chars, i + 4, "-->").ok_or(StripError::UnterminatedComment(i))? + 3;
            }
            '#' if options.hash_comments && !(i == 0 && next == Some('!')) => {
                trim_trailing_blanks(&mut out);
                i = skip_line(&chars, i);
            }
            '"' | '\'' | '`' => match closing_quote(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..end]);
                    i = end;
                }
                None => {
                    out.push(c);
                    i += 1;
                }
            },
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn skip_line(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

fn trim_trailing_blanks(out: &mut String) {
    let kept = out.trim_end_matches([' ', '\t']).len();
    out.truncate(kept);
}

fn starts_with(chars: &[char], at: usize, needle: &str) -> bool {
    let mut idx = at;
    for n in needle.chars() {
        if chars.get(idx) != Some(&n) {
            return false;
        }
        idx += 1;
    }
    true
}

fn find(chars: &[char], from: usize, needle: &str) -> Option<usize> {
    (from..chars.len()).find(|&idx| starts_with(chars, idx, needle))
}

/// Index just past the quote closing the literal opened at `start`.
/// Single and double quotes must close on the same line, otherwise the quote
/// is treated as a plain character (apostrophes, lifetimes).
fn closing_quote(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    let mut j = start + 1;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            '\n' if quote != '`' => return None,
            ch if ch == quote => return Some(j + 1),
            _ => j += 1,
        }
    }
    None
}
