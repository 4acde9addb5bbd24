//! Queue of pending command tokens.

use std::collections::VecDeque;
use std::fmt;

use crate::split::COMMAND_SEPARATOR;

/// Ordered store of command tokens waiting to run.
///
/// The active menu owns the queue. Compound actions (submenu entry, reset,
/// routines) insert batches at the head so they run before anything that was
/// already pending. Empty tokens are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    items: VecDeque<String>,
}

impl CommandQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tokens` at the head; `tokens[0]` becomes the next to run.
    pub fn push_front<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch: Vec<String> = tokens
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.is_empty())
            .collect();
        for token in batch.into_iter().rev() {
            self.items.push_front(token);
        }
    }

    /// Insert a single token at the head.
    pub fn push_front_one(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !token.is_empty() {
            self.items.push_front(token);
        }
    }

    /// Append a token at the tail.
    pub fn push_back(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !token.is_empty() {
            self.items.push_back(token);
        }
    }

    /// Remove and return the next token.
    pub fn pop_front(&mut self) -> Option<String> {
        self.items.pop_front()
    }

    /// Peek at the next token.
    pub fn front(&self) -> Option<&str> {
        self.items.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Move every token out, leaving the queue empty.
    pub fn take(&mut self) -> Vec<String> {
        self.items.drain(..).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CommandQueue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = Self::new();
        for token in iter {
            queue.push_back(token);
        }
        queue
    }
}

impl From<Vec<String>> for CommandQueue {
    fn from(tokens: Vec<String>) -> Self {
        tokens.into_iter().collect()
    }
}

/// Tokens joined with the command separator, as they would be typed.
impl fmt::Display for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = String::new();
        for token in &self.items {
            write!(f, "{sep}{token}")?;
            sep = COMMAND_SEPARATOR.to_string();
        }
        Ok(())
    }
}
