//! Interactive line sources: rustyline with menu-aware completion, or a
//! plain stdin reader when the line editor is turned off.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use finterm_terminal::LineSource;
use finterm_terminal::split::COMMAND_SEPARATOR;
use finterm_types::error::{FintermError, Result};

const HISTORY_FILE: &str = ".finterm_history";

/// Completes the first word of the segment under the cursor from the
/// names the active menu recognizes.
#[derive(Default)]
struct MenuCompleter {
    choices: Vec<String>,
}

impl Helper for MenuCompleter {}

impl Highlighter for MenuCompleter {}

impl Hinter for MenuCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Validator for MenuCompleter {}

impl Completer for MenuCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = complete_segment(line, pos, &self.choices);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

/// Start of the word being completed and the matching names. Only the
/// command word of a segment completes; arguments get nothing.
fn complete_segment(line: &str, pos: usize, choices: &[String]) -> (usize, Vec<String>) {
    let before = &line[..pos];
    let start = before.rfind(COMMAND_SEPARATOR).map_or(0, |i| i + 1);
    let word = before[start..].trim_start();
    let start = pos - word.len();
    if word.contains(char::is_whitespace) {
        return (pos, Vec::new());
    }
    let mut names: Vec<String> = choices
        .iter()
        .filter(|c| c.starts_with(word))
        .cloned()
        .collect();
    names.sort();
    names.dedup();
    (start, names)
}

/// Line editor with history in `~/.finterm_history`.
pub struct RustylineInput {
    editor: Editor<MenuCompleter, DefaultHistory>,
    history: Option<PathBuf>,
}

impl RustylineInput {
    pub fn new() -> Result<Self> {
        let mut editor: Editor<MenuCompleter, DefaultHistory> =
            Editor::new().map_err(|e| FintermError::Input(format!("failed to init line editor: {e}")))?;
        editor.set_helper(Some(MenuCompleter::default()));

        let history = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
        if let Some(path) = &history {
            // A missing history file is normal on first start.
            if let Err(e) = editor.load_history(path) {
                log::debug!("No history loaded from {}: {e}", path.display());
            }
        }
        Ok(Self { editor, history })
    }
}

impl LineSource for RustylineInput {
    fn read_line(&mut self, prompt: &str, choices: &[String]) -> Result<Option<String>> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.choices = choices.to_vec();
        }
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        log::warn!("Failed to record history: {e}");
                    }
                }
                Ok(Some(line))
            },
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(FintermError::Input(format!("readline error: {e}"))),
        }
    }
}

impl Drop for RustylineInput {
    fn drop(&mut self) {
        if let Some(path) = &self.history {
            if let Err(e) = self.editor.save_history(path) {
                log::warn!("Failed to save history to {}: {e}", path.display());
            }
        }
    }
}

/// Prompt on stdout, read from stdin. No completion or history.
#[derive(Debug, Default)]
pub struct StdinInput;

impl LineSource for StdinInput {
    fn read_line(&mut self, prompt: &str, _choices: &[String]) -> Result<Option<String>> {
        let mut out = std::io::stdout().lock();
        write!(out, "{prompt}")?;
        out.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        ["load", "quote", "ta", "quit", "help", "home"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn completes_first_word() {
        let (start, names) = complete_segment("qu", 2, &choices());
        assert_eq!(start, 0);
        assert_eq!(names, ["quit", "quote"]);
    }

    #[test]
    fn completes_after_separator() {
        let line = "load aapl/h";
        let (start, names) = complete_segment(line, line.len(), &choices());
        assert_eq!(start, 10);
        assert_eq!(names, ["help", "home"]);
    }

    #[test]
    fn leading_space_in_segment_is_skipped() {
        let line = "load aapl/ t";
        let (start, names) = complete_segment(line, line.len(), &choices());
        assert_eq!(start, 11);
        assert_eq!(names, ["ta"]);
    }

    #[test]
    fn arguments_do_not_complete() {
        let line = "load aa";
        let (start, names) = complete_segment(line, line.len(), &choices());
        assert_eq!(start, line.len());
        assert!(names.is_empty());
    }

    #[test]
    fn empty_line_lists_everything() {
        let (_, names) = complete_segment("", 0, &choices());
        assert_eq!(names.len(), 6);
    }
}
