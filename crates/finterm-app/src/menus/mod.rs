//! The finterm menu tree.
//!
//! ```text
//! /            exe, stocks, crypto, featflags
//! /stocks/     load, quote, ta
//! /stocks/ta/  rsi, quote
//! /crypto/     load, quote
//! /featflags/  flags, retryload, rcontext, exithelp, autocls, readline, flair
//! ```
//!
//! Leaf commands record and echo state; they fetch no market data.

mod crypto;
mod featflags;
mod root;
mod stocks;
mod ta;

pub use root::root;

use finterm_terminal::Menu;

/// Help text: a title line, optional context lines, then the listing.
pub(crate) fn help_page(menu: &Menu, title: &str, context: &[String]) -> String {
    let mut out = format!("{title} ({})\n", menu.path());
    for line in context {
        out.push_str(line);
        out.push('\n');
    }
    if !context.is_empty() {
        out.push('\n');
    }
    out.push_str(&menu.listing());
    out
}

#[cfg(test)]
mod tests {
    use finterm_terminal::{BufferConsole, MenuState, ScriptedInput, Terminal};
    use finterm_types::Settings;

    use super::*;

    fn run(cmds: &[&str]) -> BufferConsole {
        let console = BufferConsole::default();
        let settings = Settings {
            flair: ":hidden".to_string(),
            ..Settings::default()
        };
        let mut terminal = Terminal::new(
            root,
            settings,
            Box::new(console.clone()),
            Box::new(ScriptedInput::default()),
        );
        terminal
            .run(cmds.iter().map(|c| c.to_string()).collect())
            .unwrap();
        console
    }

    #[test]
    fn every_menu_builds() {
        let root = root(&MenuState::default()).unwrap();
        assert!(root.path().is_root());
        for sub in root.submenus() {
            let menu = (sub.factory())(root.state()).unwrap();
            assert_eq!(menu.path().segments(), vec![sub.name()]);
            for child in menu.submenus() {
                assert!((child.factory())(menu.state()).is_ok());
            }
        }
    }

    #[test]
    fn stocks_chain() {
        let console = run(&["stocks/load aapl -s 2020-01-01/ta/rsi -w 20", "exit"]);
        assert!(console.contains("Loading Daily AAPL stock with starting period 2020-01-01."));
        assert!(console.contains("RSI(20) requested for AAPL"));
    }

    #[test]
    fn crypto_quote_table() {
        let console = run(&["crypto/load eth --vs eur/quote", "exit"]);
        assert!(console.contains("Loaded ETH against EUR"));
        assert!(console.text().contains("ETH   EUR"));
    }

    #[test]
    fn ta_without_ticker_reports() {
        let console = run(&["stocks/ta/rsi", "exit"]);
        assert!(console.contains("no ticker loaded"));
    }

    #[test]
    fn featflags_toggle_changes_settings() {
        let console = BufferConsole::default();
        let mut terminal = Terminal::new(
            root,
            Settings::default(),
            Box::new(console.clone()),
            Box::new(ScriptedInput::default()),
        );
        terminal
            .run(vec!["featflags/retryload/flair :rocket/flags".to_string(), "exit".to_string()])
            .unwrap();
        assert!(terminal.settings().retry_with_load);
        assert_eq!(terminal.settings().flair, ":rocket");
        assert!(console.contains("(🚀) /featflags/ $ flags"));
    }

    #[test]
    fn retry_with_load_in_stocks() {
        let console = run(&["featflags/retryload/home/stocks/msft/quote", "exit"]);
        assert!(console.contains("Trying `load msft`"));
        assert!(console.contains("MSFT"));
    }

    #[test]
    fn stocks_reset_reloads_ticker() {
        let console = run(&["stocks/load nvda/reset/quote", "exit"]);
        let loads = console
            .lines()
            .iter()
            .filter(|l| l.starts_with("Loading Daily NVDA"))
            .count();
        assert_eq!(loads, 2);
    }
}
