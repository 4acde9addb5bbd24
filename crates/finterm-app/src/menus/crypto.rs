//! `/crypto/` menu.

use clap::Parser;

use finterm_terminal::{
    Command, CommandContext, CommandOutput, Menu, MenuState, parse_command_args,
    with_default_flag,
};
use finterm_types::error::{FintermError, Result};

use super::help_page;

const COIN: &str = "coin";
const VS: &str = "vs";

pub fn crypto(_: &MenuState) -> Result<Menu> {
    Menu::builder("/crypto/", help)
        .command(Box::new(LoadCmd))
        .command(Box::new(QuoteCmd))
        .custom_reset(reload)
        .load_capable()
        .build()
}

fn help(menu: &Menu) -> String {
    let state = menu.state();
    let context = match (state.get(COIN), state.get(VS)) {
        (Some(coin), Some(vs)) => vec![format!("Coin: {coin} ({vs})")],
        _ => vec!["Coin:".to_string()],
    };
    help_page(menu, "Cryptocurrency", &context)
}

fn reload(state: &MenuState) -> Vec<String> {
    match (state.get(COIN), state.get(VS)) {
        (Some(coin), Some(vs)) => vec!["crypto".to_string(), format!("load {coin} --vs {vs}")],
        _ => Vec::new(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "load", about = "Load a coin to analyse")]
struct LoadArgs {
    /// Coin symbol
    #[arg(short = 'c', long = "coin")]
    coin: String,

    /// Quote currency
    #[arg(long = "vs", default_value = "usd")]
    vs: String,
}

struct LoadCmd;
impl Command for LoadCmd {
    fn name(&self) -> &str {
        "load"
    }
    fn description(&self) -> &str {
        "Load a coin"
    }
    fn usage(&self) -> &str {
        "load <coin> [--vs currency]"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let args = with_default_flag(args, "-c");
        let Some(parsed) = parse_command_args::<LoadArgs>("load", &args).or_report(ctx.console) else {
            return Ok(CommandOutput::None);
        };
        let coin = parsed.coin.to_uppercase();
        let vs = parsed.vs.to_uppercase();
        ctx.state.set(COIN, coin.clone());
        ctx.state.set(VS, vs.clone());
        Ok(CommandOutput::Text(format!("Loaded {coin} against {vs}")))
    }
}

struct QuoteCmd;
impl Command for QuoteCmd {
    fn name(&self) -> &str {
        "quote"
    }
    fn description(&self) -> &str {
        "Show the loaded coin"
    }
    fn usage(&self) -> &str {
        "quote"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let (Some(coin), Some(vs)) = (ctx.state.get(COIN), ctx.state.get(VS)) else {
            return Err(FintermError::Command(
                "no coin loaded, use 'load <coin>' first".to_string(),
            ));
        };
        Ok(CommandOutput::Table {
            headers: vec!["Coin".into(), "Currency".into()],
            rows: vec![vec![coin.to_string(), vs.to_string()]],
        })
    }
}

#[cfg(test)]
mod tests {
    use finterm_terminal::BufferConsole;
    use finterm_types::Settings;

    use super::*;

    #[test]
    fn load_defaults_to_usd() {
        let mut menu = crypto(&MenuState::default()).unwrap();
        let mut settings = Settings::default();
        let mut console = BufferConsole::default();
        let out = menu
            .execute_command("load", &["btc"], &mut settings, &mut console)
            .unwrap();
        assert_eq!(out, CommandOutput::Text("Loaded BTC against USD".into()));
        assert_eq!(menu.custom_reset(), vec!["crypto", "load BTC --vs USD"]);
        assert!(menu.help_text().contains("Coin: BTC (USD)"));
    }

    #[test]
    fn quote_before_load_fails() {
        let mut menu = crypto(&MenuState::default()).unwrap();
        let mut settings = Settings::default();
        let mut console = BufferConsole::default();
        let err = menu
            .execute_command("quote", &[], &mut settings, &mut console)
            .unwrap_err();
        assert!(err.to_string().contains("no coin loaded"));
    }
}
