//! Error types for finterm.

use std::io;

/// Errors produced by the finterm framework.
#[derive(Debug, thiserror::Error)]
pub enum FintermError {
    /// A menu was defined with a malformed path or duplicate command names.
    #[error("menu definition error: {0}")]
    MenuDefinition(String),

    /// The input names no command, submenu, or universal command of the menu.
    #[error("the command '{input}' doesn't exist on the {path} menu")]
    UnknownCommand { input: String, path: String },

    #[error("command error: {0}")]
    Command(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("routine error: {0}")]
    Routine(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("filter pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl FintermError {
    /// Build an `UnknownCommand` error for `input` typed at `path`.
    pub fn unknown_command(input: &str, path: &str) -> Self {
        Self::UnknownCommand {
            input: input.to_string(),
            path: path.to_string(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, FintermError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_definition_display() {
        let e = FintermError::MenuDefinition("bad path".into());
        assert_eq!(format!("{e}"), "menu definition error: bad path");
    }

    #[test]
    fn unknown_command_display() {
        let e = FintermError::unknown_command("loda AAPL", "/stocks/");
        assert_eq!(
            format!("{e}"),
            "the command 'loda AAPL' doesn't exist on the /stocks/ menu"
        );
    }

    #[test]
    fn command_error_display() {
        let e = FintermError::Command("no ticker loaded".into());
        assert_eq!(format!("{e}"), "command error: no ticker loaded");
    }

    #[test]
    fn config_error_display() {
        let e = FintermError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn routine_error_display() {
        let e = FintermError::Routine("empty routine".into());
        assert_eq!(format!("{e}"), "routine error: empty routine");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: FintermError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let bad_toml = "this is [[[not valid toml";
        let toml_err = toml::from_str::<toml::Value>(bad_toml).unwrap_err();
        let e: FintermError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn regex_error_from_conversion() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let e: FintermError = regex_err.into();
        assert!(format!("{e}").contains("filter pattern error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(FintermError::Input("closed".into()));
        assert!(r.is_err());
    }
}
