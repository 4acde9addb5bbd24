//! `/stocks/ta/` menu. Entered with a copy of the stocks menu state.

use clap::Parser;

use finterm_terminal::{
    Command, CommandContext, CommandOutput, Menu, MenuState, parse_command_args,
};
use finterm_types::error::Result;

use super::help_page;
use super::stocks::{QuoteCmd, TICKER, no_ticker};

pub fn ta(parent: &MenuState) -> Result<Menu> {
    Menu::builder("/stocks/ta/", help)
        .command(Box::new(RsiCmd))
        .command(Box::new(QuoteCmd))
        .custom_reset(reload)
        .state(parent.clone())
        .build()
}

fn help(menu: &Menu) -> String {
    let ticker = menu.state().get(TICKER).unwrap_or("");
    help_page(menu, "Technical Analysis", &[format!("Ticker: {ticker}")])
}

fn reload(state: &MenuState) -> Vec<String> {
    match state.get(TICKER) {
        Some(ticker) => vec!["stocks".to_string(), format!("load {ticker}"), "ta".to_string()],
        None => vec!["stocks".to_string(), "ta".to_string()],
    }
}

#[derive(Debug, Parser)]
#[command(name = "rsi", about = "Relative strength index")]
struct RsiArgs {
    /// Window length
    #[arg(short = 'w', long = "window", default_value_t = 14)]
    window: u32,
}

struct RsiCmd;
impl Command for RsiCmd {
    fn name(&self) -> &str {
        "rsi"
    }
    fn description(&self) -> &str {
        "Relative strength index"
    }
    fn usage(&self) -> &str {
        "rsi [-w window]"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let Some(parsed) = parse_command_args::<RsiArgs>("rsi", args).or_report(ctx.console) else {
            return Ok(CommandOutput::None);
        };
        let ticker = ctx.state.get(TICKER).ok_or_else(no_ticker)?;
        Ok(CommandOutput::Text(format!("RSI({}) requested for {ticker}", parsed.window)))
    }
}

#[cfg(test)]
mod tests {
    use finterm_terminal::BufferConsole;
    use finterm_types::Settings;

    use super::*;

    #[test]
    fn inherits_parent_ticker() {
        let mut parent = MenuState::default();
        parent.set(TICKER, "AMD");
        let mut menu = ta(&parent).unwrap();
        assert_eq!(menu.state().get(TICKER), Some("AMD"));

        let mut settings = Settings::default();
        let mut console = BufferConsole::default();
        let out = menu
            .execute_command("rsi", &[], &mut settings, &mut console)
            .unwrap();
        assert_eq!(out, CommandOutput::Text("RSI(14) requested for AMD".into()));
    }

    #[test]
    fn reset_goes_through_stocks() {
        let mut parent = MenuState::default();
        parent.set(TICKER, "AMD");
        let menu = ta(&parent).unwrap();
        assert_eq!(menu.custom_reset(), vec!["stocks", "load AMD", "ta"]);
        let bare = ta(&MenuState::default()).unwrap();
        assert_eq!(bare.custom_reset(), vec!["stocks", "ta"]);
    }
}
