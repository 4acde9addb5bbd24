//! Argument handling for commands.
//!
//! Commands parse their arguments with clap. A malformed argument list or a
//! help request comes back as a [`ParseOutcome`] variant rather than exiting,
//! so the command can print the message and leave the user in the menu.

use clap::Parser;
use clap::error::ErrorKind;

use finterm_types::error::{FintermError, Result};

use crate::console::Console;

/// Result of parsing a command's arguments.
#[derive(Debug)]
pub enum ParseOutcome<T> {
    Parsed(T),
    /// Help was requested; the text to print.
    Help(String),
    /// The arguments were malformed; the message to print.
    Invalid(String),
}

impl<T> ParseOutcome<T> {
    /// Print help or the error on `console` and return the parsed value, if
    /// any.
    pub fn or_report(self, console: &mut dyn Console) -> Option<T> {
        match self {
            ParseOutcome::Parsed(value) => Some(value),
            ParseOutcome::Help(text) | ParseOutcome::Invalid(text) => {
                console.print(text.trim_end());
                None
            },
        }
    }
}

/// Parse `args` for the command `prog`.
pub fn parse_command_args<T: Parser>(prog: &str, args: &[&str]) -> ParseOutcome<T> {
    let argv = std::iter::once(prog).chain(args.iter().copied());
    match T::try_parse_from(argv) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let mut text = e.render().to_string();
                if prog != "about" {
                    text.push_str(&format!(
                        "\nFor more information and examples, use 'about {prog}' to access the related guide."
                    ));
                }
                ParseOutcome::Help(text)
            },
            _ => ParseOutcome::Invalid(e.render().to_string()),
        },
    }
}

/// Insert `flag` before a leading positional value, so `load AAPL` parses
/// as `load -t AAPL`.
pub fn with_default_flag<'a>(args: &[&'a str], flag: &'a str) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(args.len() + 1);
    if args.first().is_some_and(|first| !first.starts_with('-')) {
        out.push(flag);
    }
    out.extend_from_slice(args);
    out
}

/// Split a command token into words. Single and double quotes group words;
/// backslash escapes the next character outside single quotes.
pub fn split_words(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => match chars.peek() {
                    Some(&next @ ('"' | '\\')) => {
                        current.push(next);
                        chars.next();
                    },
                    _ => current.push('\\'),
                },
                _ => current.push(ch),
            }
        } else {
            match ch {
                '\'' => {
                    in_single = true;
                    quoted = true;
                },
                '"' => {
                    in_double = true;
                    quoted = true;
                },
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                c if c.is_whitespace() => {
                    if !current.is_empty() || quoted {
                        words.push(std::mem::take(&mut current));
                    }
                    quoted = false;
                },
                _ => current.push(ch),
            }
        }
    }

    if in_single {
        return Err(FintermError::Input("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(FintermError::Input("unterminated double quote".to_string()));
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    Ok(words)
}
