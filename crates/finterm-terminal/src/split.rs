//! Command path splitting.
//!
//! A raw input line such as `stocks/load AAPL/ta/rsi -w 20` is a chain of
//! commands separated by `/`. Arguments that legitimately contain `/` (file
//! paths, mostly) are protected by filter expressions: every filter match is
//! swapped for a placeholder before the split and restored afterwards.

use regex::Regex;

use finterm_types::error::Result;

/// Separator between commands in a command path.
pub const COMMAND_SEPARATOR: char = '/';

/// Synthetic command that replaces the empty leading segment of an absolute path.
pub const HOME: &str = "home";

/// Protects `-f <path>` / `--file <path>` arguments ending in a known extension.
pub const FILE_ARG_FILTER: &str =
    r"( -f | --file ).*?(\.xlsx|\.csv|\.xls|\.tsv|\.json|\.yaml|\.ini|\.fin|\.ipynb)";

/// Marker wrapped around placeholder indices. Private-use, so never typed.
const PLACEHOLDER_MARK: char = '\u{E000}';

/// Splits command paths into command tokens.
#[derive(Debug, Clone)]
pub struct PathSplitter {
    filters: Vec<Regex>,
}

impl PathSplitter {
    /// Splitter with the built-in file argument filter plus `custom` patterns.
    pub fn new(custom: &[&str]) -> Result<Self> {
        let mut filters = Vec::with_capacity(custom.len() + 1);
        filters.push(Regex::new(FILE_ARG_FILTER)?);
        for pattern in custom {
            filters.push(Regex::new(pattern)?);
        }
        Ok(Self { filters })
    }

    /// Splitter with only the built-in file argument filter.
    pub fn with_default_filters() -> Result<Self> {
        Self::new(&[])
    }

    /// Split `input` into trimmed, non-empty command tokens.
    ///
    /// A leading `/` makes the path absolute: the first token is `home`.
    /// Empty input yields no tokens.
    pub fn split(&self, input: &str) -> Vec<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let (protected, spans) = self.protect(trimmed);

        let mut tokens = Vec::new();
        if protected.starts_with(COMMAND_SEPARATOR) {
            tokens.push(HOME.to_string());
        }
        for segment in protected.split(COMMAND_SEPARATOR) {
            let restored = restore(segment, &spans);
            let restored = restored.trim();
            if !restored.is_empty() {
                tokens.push(restored.to_string());
            }
        }
        tokens
    }

    /// Replace every filter match with a placeholder, leftmost match first.
    fn protect(&self, input: &str) -> (String, Vec<String>) {
        let mut text = input.to_string();
        let mut spans = Vec::new();

        loop {
            let earliest = self
                .filters
                .iter()
                .filter_map(|re| re.find(&text))
                .filter(|m| !m.as_str().is_empty())
                .min_by_key(|m| m.start())
                .map(|m| (m.start(), m.end()));

            let Some((start, end)) = earliest else {
                break;
            };
            let placeholder = placeholder(spans.len());
            spans.push(text[start..end].to_string());
            text.replace_range(start..end, &placeholder);
        }

        (text, spans)
    }
}

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_MARK}{index}{PLACEHOLDER_MARK}")
}

fn restore(segment: &str, spans: &[String]) -> String {
    if spans.is_empty() || !segment.contains(PLACEHOLDER_MARK) {
        return segment.to_string();
    }
    let mut out = segment.to_string();
    for (i, span) in spans.iter().enumerate() {
        out = out.replace(&placeholder(i), span);
    }
    out
}
