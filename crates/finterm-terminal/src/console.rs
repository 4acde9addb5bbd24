//! Output and input seams of the terminal.
//!
//! The dispatcher never touches stdout or stdin directly. It prints through a
//! [`Console`] and blocks on a [`LineSource`] when its queue runs dry, so the
//! same loop drives the interactive prompt, routine replay and tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use std::rc::Rc;

use finterm_types::error::Result;

use crate::interpreter::CommandOutput;

/// Sink for everything the terminal prints.
pub trait Console {
    /// Print `text` followed by a newline.
    fn print(&mut self, text: &str);

    /// Clear the screen.
    fn clear(&mut self);
}

/// Console writing to stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth aborting the session over.
        let _ = writeln!(out, "{text}");
    }

    fn clear(&mut self) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\x1b[2J\x1b[H");
        let _ = out.flush();
    }
}

/// Console that discards everything (quiet batch runs).
#[derive(Debug, Default)]
pub struct NullConsole;

impl Console for NullConsole {
    fn print(&mut self, _text: &str) {}
    fn clear(&mut self) {}
}

/// Console that records printed lines. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    lines: Rc<RefCell<Vec<String>>>,
    clears: Rc<RefCell<usize>>,
}

impl BufferConsole {
    /// All lines printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Everything printed so far as one string.
    pub fn text(&self) -> String {
        self.lines.borrow().join("\n")
    }

    /// Whether any printed line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    /// Number of times the screen was cleared.
    pub fn clears(&self) -> usize {
        *self.clears.borrow()
    }
}

impl Console for BufferConsole {
    fn print(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }

    fn clear(&mut self) {
        *self.clears.borrow_mut() += 1;
    }
}

/// Print a command's output on `console`.
pub fn render(console: &mut dyn Console, output: &CommandOutput) {
    match output {
        CommandOutput::Text(text) => {
            if !text.is_empty() {
                console.print(text);
            }
        },
        CommandOutput::Table { headers, rows } => console.print(&format_table(headers, rows)),
        CommandOutput::Clear => console.clear(),
        CommandOutput::None => {},
    }
}

/// Left-aligned table with columns padded to their widest cell.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = cell.chars().count();
            match widths.get_mut(i) {
                Some(slot) => *slot = (*slot).max(w),
                None => widths.push(w),
            }
        }
    }

    let fmt_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = fmt_row(headers);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push('\n');
        out.push_str(&fmt_row(row));
    }
    out
}

/// Where the dispatcher gets a line when its queue is empty.
pub trait LineSource {
    /// Read one line after showing `prompt`. `choices` are the names the
    /// current menu recognizes (for completion).
    ///
    /// `Ok(None)` means end of input or an interrupt; the dispatcher treats
    /// it as `exit`.
    fn read_line(&mut self, prompt: &str, choices: &[String]) -> Result<Option<String>>;
}

/// Line source replaying a fixed list of lines, then reporting end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Rc::default(),
        }
    }

    /// Prompts shown so far. Clones share the record.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str, _choices: &[String]) -> Result<Option<String>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
