//! Root menu and the `exe` routine runner.

use std::path::{Path, PathBuf};

use clap::Parser;

use finterm_terminal::routine::{ROUTINE_EXTENSION, resolve_export_folder};
use finterm_terminal::{
    Command, CommandContext, CommandOutput, Menu, MenuState, Routine, Submenu,
    parse_command_args, with_default_flag,
};
use finterm_types::error::Result;

use super::{crypto, featflags, help_page, stocks};

/// Keeps `exe some/dir/file.fin` in one segment.
const EXE_PATH_FILTER: &str = r"exe [^\s-]\S*?\.fin";

pub fn root(_: &MenuState) -> Result<Menu> {
    Menu::builder("/", help)
        .command(Box::new(ExeCmd))
        .submenu(Submenu::new("stocks", "Stocks: load a ticker, quotes, technical analysis", stocks::stocks))
        .submenu(Submenu::new("crypto", "Cryptocurrencies: load a coin, quotes", crypto::crypto))
        .submenu(Submenu::new("featflags", "Feature flags of this session", featflags::featflags))
        .filter(EXE_PATH_FILTER)
        .build()
}

fn help(menu: &Menu) -> String {
    help_page(menu, "finterm", &[])
}

#[derive(Debug, Parser)]
#[command(name = "exe", about = "Execute a routine file")]
struct ExeArgs {
    /// Routine file to run
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Comma-separated values substituted for $ARGV[n]
    #[arg(short = 'i', long = "input", value_delimiter = ',')]
    input: Vec<String>,
}

struct ExeCmd;
impl Command for ExeCmd {
    fn name(&self) -> &str {
        "exe"
    }
    fn description(&self) -> &str {
        "Execute a routine file"
    }
    fn usage(&self) -> &str {
        "exe [-f] <file.fin> [-i a,b,...]"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let args = with_default_flag(args, "--file");
        let Some(parsed) = parse_command_args::<ExeArgs>("exe", &args).or_report(ctx.console) else {
            return Ok(CommandOutput::None);
        };

        let path = locate_routine(&parsed.file);
        let routine = Routine::load(&path, &parsed.input, false)?;

        if let Some(raw) = &routine.export_folder {
            let base = std::env::current_dir()?;
            let folder = resolve_export_folder(raw, &base)?;
            ctx.console.print(&format!(
                "Export data to be saved in the selected folder: '{}'",
                folder.display()
            ));
            ctx.settings.export_folder = folder.to_string_lossy().into_owned();
        }

        let count = routine.commands.len();
        ctx.queue.push_front(routine.commands);
        Ok(CommandOutput::Text(format!(
            "Running {} ({count} commands)",
            path.display()
        )))
    }
}

/// `file` as given if it exists, otherwise the same name in
/// `~/.finterm/routines/` (with the routine extension added if missing).
fn locate_routine(file: &Path) -> PathBuf {
    if file.exists() {
        return file.to_path_buf();
    }
    let Some(home) = dirs::home_dir() else {
        return file.to_path_buf();
    };
    let mut candidate = home.join(".finterm").join("routines").join(file);
    if candidate.extension().is_none() {
        candidate.set_extension(ROUTINE_EXTENSION);
    }
    if candidate.exists() { candidate } else { file.to_path_buf() }
}
