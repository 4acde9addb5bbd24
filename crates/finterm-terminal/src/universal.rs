//! Commands every menu answers, and the `about`/`support` argument parsers.

use clap::{Parser, ValueEnum};

use crate::menu::MenuPath;

/// A command present in every menu regardless of its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Universal {
    Cls,
    Home,
    Help,
    Quit,
    Reset,
    Exit,
    About,
    Support,
}

impl Universal {
    pub const ALL: [Universal; 8] = [
        Universal::Cls,
        Universal::Home,
        Universal::Help,
        Universal::Quit,
        Universal::Reset,
        Universal::Exit,
        Universal::About,
        Universal::Support,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Universal::Cls => "cls",
            Universal::Home => "home",
            Universal::Help => "help",
            Universal::Quit => "quit",
            Universal::Reset => "reset",
            Universal::Exit => "exit",
            Universal::About => "about",
            Universal::Support => "support",
        }
    }

    /// Short forms normalised to this command before resolution.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Universal::Help => &["?", "h"],
            Universal::Quit => &["q", ".."],
            Universal::Reset => &["r"],
            _ => &[],
        }
    }

    /// Look up a canonical name. Aliases are not accepted here; run
    /// [`normalize_alias`] first.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.name() == name)
    }
}

/// Map `..`/`q` to `quit`, `?`/`h` to `help` and `r` to `reset`.
pub fn normalize_alias(name: &str) -> &str {
    Universal::ALL
        .into_iter()
        .find(|u| u.aliases().iter().any(|alias| *alias == name))
        .map_or(name, |u| u.name())
}

/// Whether `token` makes a menu loop return to its parent.
pub fn is_quit(token: &str) -> bool {
    normalize_alias(token) == Universal::Quit.name()
}

// ---------------------------------------------------------------------------
// about
// ---------------------------------------------------------------------------

/// Display the documentation of the menu or one of its commands.
#[derive(Debug, Parser)]
#[command(name = "about")]
pub struct AboutArgs {
    /// Command or menu to show documentation for
    #[arg(short = 'c', long = "command")]
    pub command: Option<String>,
}

impl AboutArgs {
    /// Reject a `--command` the menu does not define.
    pub fn check_command(&self, allowed: &[String]) -> std::result::Result<(), String> {
        match &self.command {
            Some(cmd) if !allowed.contains(cmd) => Err(format!(
                "invalid choice: '{cmd}' (choose from {})",
                allowed.join(", ")
            )),
            _ => Ok(()),
        }
    }
}

/// Documentation URL for `path`, optionally narrowed to one command.
pub fn documentation_url(docs_url: &str, path: &MenuPath, command: Option<&str>) -> String {
    let base = docs_url.trim_end_matches('/');
    match command {
        Some(cmd) => format!("{base}{path}{cmd}"),
        None => format!("{base}{path}"),
    }
}

// ---------------------------------------------------------------------------
// support
// ---------------------------------------------------------------------------

/// Kind of support request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SupportType {
    Bug,
    Suggestion,
    Question,
    Generic,
}

impl SupportType {
    fn as_str(self) -> &'static str {
        match self {
            SupportType::Bug => "bug",
            SupportType::Suggestion => "suggestion",
            SupportType::Question => "question",
            SupportType::Generic => "generic",
        }
    }
}

/// Submit a support request.
#[derive(Debug, Parser)]
#[command(name = "support")]
pub struct SupportArgs {
    /// Command that needs support (or `generic`)
    #[arg(short = 'c', long = "command")]
    pub command: String,

    /// Message to send
    #[arg(short = 'm', long = "msg", num_args = 1..)]
    pub msg: Vec<String>,

    /// Support ticket type
    #[arg(short = 't', long = "type", value_enum, default_value = "generic")]
    pub kind: SupportType,
}

/// Prefilled support-request URL.
pub fn support_url(support_base: &str, path: &MenuPath, args: &SupportArgs) -> String {
    let message = args.msg.join(" ");
    format!(
        "{}?type={}&menu={}&command={}&message={}&path={}",
        support_base.trim_end_matches('/'),
        args.kind.as_str(),
        urlencoding::encode(path.main_menu()),
        urlencoding::encode(&args.command),
        urlencoding::encode(&message),
        urlencoding::encode(path.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ParseOutcome, parse_command_args};

    #[test]
    fn aliases_normalise() {
        assert_eq!(normalize_alias(".."), "quit");
        assert_eq!(normalize_alias("q"), "quit");
        assert_eq!(normalize_alias("?"), "help");
        assert_eq!(normalize_alias("h"), "help");
        assert_eq!(normalize_alias("r"), "reset");
        assert_eq!(normalize_alias("load"), "load");
    }

    #[test]
    fn aliases_normalise_borrowed_input() {
        let typed = String::from("..");
        assert_eq!(normalize_alias(&typed), "quit");
        let typed = String::from("quote");
        assert_eq!(normalize_alias(&typed), "quote");
    }

    #[test]
    fn from_name_is_canonical_only() {
        assert_eq!(Universal::from_name("exit"), Some(Universal::Exit));
        assert_eq!(Universal::from_name("q"), None);
        assert_eq!(Universal::from_name("QUIT"), None);
    }

    #[test]
    fn quit_tokens() {
        assert!(is_quit("quit"));
        assert!(is_quit(".."));
        assert!(is_quit("q"));
        assert!(!is_quit("quit now"));
        assert!(!is_quit("exit"));
    }

    #[test]
    fn docs_url_for_menu_and_command() {
        let path = MenuPath::new("/stocks/").unwrap();
        assert_eq!(
            documentation_url("https://docs.example/terminal/", &path, None),
            "https://docs.example/terminal/stocks/"
        );
        assert_eq!(
            documentation_url("https://docs.example/terminal", &path, Some("load")),
            "https://docs.example/terminal/stocks/load"
        );
    }

    #[test]
    fn support_url_is_encoded() {
        let path = MenuPath::new("/stocks/ta/").unwrap();
        let ParseOutcome::Parsed(args) = parse_command_args::<SupportArgs>(
            "support",
            &["-c", "rsi", "--type", "bug", "--msg", "wrong", "window"],
        ) else {
            panic!("support args should parse");
        };
        assert_eq!(
            support_url("https://help.example", &path, &args),
            "https://help.example?type=bug&menu=stocks&command=rsi&message=wrong%20window&path=%2Fstocks%2Fta%2F"
        );
    }

    #[test]
    fn support_url_encodes_reserved_and_unicode() {
        let path = MenuPath::new("/crypto/").unwrap();
        let ParseOutcome::Parsed(args) = parse_command_args::<SupportArgs>(
            "support",
            &["-c", "load", "-m", "eth&btc", "ü"],
        ) else {
            panic!("support args should parse");
        };
        let url = support_url("https://help.example/", &path, &args);
        assert!(url.starts_with("https://help.example?type=generic&menu=crypto&command=load"));
        assert!(url.contains("message=eth%26btc%20%C3%BC"));
    }

    #[test]
    fn support_requires_command() {
        assert!(matches!(
            parse_command_args::<SupportArgs>("support", &[]),
            ParseOutcome::Invalid(_)
        ));
        assert!(matches!(
            parse_command_args::<SupportArgs>("support", &["-h"]),
            ParseOutcome::Help(_)
        ));
    }
}
