//! `/stocks/` menu.

use clap::Parser;

use finterm_terminal::{
    Command, CommandContext, CommandOutput, Menu, MenuState, Submenu, parse_command_args,
    with_default_flag,
};
use finterm_types::error::{FintermError, Result};

use super::{help_page, ta};

pub(crate) const TICKER: &str = "ticker";
const START: &str = "start";
const INTERVAL: &str = "interval";

/// Daily bars, in minutes.
const DAILY: u32 = 1440;

pub fn stocks(_: &MenuState) -> Result<Menu> {
    Menu::builder("/stocks/", help)
        .command(Box::new(LoadCmd))
        .command(Box::new(QuoteCmd))
        .submenu(Submenu::new("ta", "Technical analysis of the loaded ticker", ta::ta).inheriting())
        .custom_reset(reload)
        .load_capable()
        .build()
}

fn help(menu: &Menu) -> String {
    let ticker = menu.state().get(TICKER).unwrap_or("");
    help_page(menu, "Stocks", &[format!("Ticker: {ticker}")])
}

/// Reset back into `/stocks/` with the same ticker loaded.
fn reload(state: &MenuState) -> Vec<String> {
    match state.get(TICKER) {
        Some(ticker) => vec!["stocks".to_string(), format!("load {ticker}")],
        None => Vec::new(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "load", about = "Load a stock ticker to analyse")]
struct LoadArgs {
    /// Stock ticker
    #[arg(short = 't', long = "ticker")]
    ticker: String,

    /// Start date (YYYY-MM-DD)
    #[arg(short = 's', long = "start")]
    start: Option<String>,

    /// Bar interval in minutes
    #[arg(short = 'i', long = "interval", default_value_t = DAILY)]
    interval: u32,
}

struct LoadCmd;
impl Command for LoadCmd {
    fn name(&self) -> &str {
        "load"
    }
    fn description(&self) -> &str {
        "Load a stock ticker"
    }
    fn usage(&self) -> &str {
        "load <ticker> [-s start] [-i interval]"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let args = with_default_flag(args, "-t");
        let Some(parsed) = parse_command_args::<LoadArgs>("load", &args).or_report(ctx.console) else {
            return Ok(CommandOutput::None);
        };

        let ticker = parsed.ticker.to_uppercase();
        let kind = if parsed.interval == DAILY {
            "Daily".to_string()
        } else {
            format!("Intraday {}min", parsed.interval)
        };

        ctx.state.set(TICKER, ticker.clone());
        ctx.state.set(INTERVAL, parsed.interval.to_string());
        let text = match parsed.start {
            Some(start) => {
                ctx.state.set(START, start.clone());
                format!("Loading {kind} {ticker} stock with starting period {start}.")
            },
            None => {
                ctx.state.remove(START);
                format!("Loading {kind} {ticker} stock.")
            },
        };
        log::debug!("{} loaded {ticker}", ctx.path);
        Ok(CommandOutput::Text(text))
    }
}

pub(crate) struct QuoteCmd;
impl Command for QuoteCmd {
    fn name(&self) -> &str {
        "quote"
    }
    fn description(&self) -> &str {
        "Show the loaded ticker"
    }
    fn usage(&self) -> &str {
        "quote"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let ticker = ctx.state.get(TICKER).ok_or_else(no_ticker)?;
        Ok(CommandOutput::Table {
            headers: vec!["Ticker".into(), "Start".into(), "Interval".into()],
            rows: vec![vec![
                ticker.to_string(),
                ctx.state.get(START).unwrap_or("-").to_string(),
                ctx.state.get(INTERVAL).unwrap_or("-").to_string(),
            ]],
        })
    }
}

pub(crate) fn no_ticker() -> FintermError {
    FintermError::Command("no ticker loaded, use 'load <ticker>' first".to_string())
}
