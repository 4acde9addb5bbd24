//! finterm entry point.
//!
//! Starts an interactive menu session, optionally seeded with commands or a
//! routine file. `--test` replays routine files in batch and exits non-zero
//! if any fail.

mod menus;
mod readline;
mod test_runner;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use finterm_terminal::routine::{is_routine_file, resolve_export_folder};
use finterm_terminal::{LineSource, Routine, StdConsole, Terminal};
use finterm_types::Settings;

use readline::{RustylineInput, StdinInput};

const WELCOME: &str = "Welcome to finterm. Type 'help' for the menu, 'exit' to leave.";
const GOODBYE: &str = "Goodbye.";
const DEFAULT_ROUTINE_DIR: &str = "routines";

#[derive(Debug, Parser)]
#[command(name = "finterm", version, about = "Menu-driven financial terminal")]
struct Cli {
    /// Commands to run first (e.g. `stocks/load aapl/ta`), a routine file,
    /// or with --test the routine files and folders to replay
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    /// Routine file to run at startup
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Replay routine files in batch and report failures
    #[arg(short = 't', long = "test")]
    test: bool,

    /// With --test, only run routines whose path contains this text
    #[arg(long = "filter")]
    filter: Option<String>,

    /// Comma-separated values substituted for $ARGV[n] in routines
    #[arg(short = 'i', long = "input", value_delimiter = ',')]
    input: Vec<String>,

    /// Debug logging; command errors end the session
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// With --test, show the routines' own output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut overrides = Overrides {
        debug: cli.debug,
        export_folder: None,
    };
    let mut settings = Settings::load()?;
    overrides.apply(&mut settings);

    if cli.test {
        return run_test_mode(&cli, &settings);
    }

    let initial = initial_commands(&cli, &mut overrides)?;
    overrides.apply(&mut settings);

    let input: Box<dyn LineSource> = if settings.use_readline {
        match RustylineInput::new() {
            Ok(editor) => Box::new(editor),
            Err(e) => {
                log::warn!("{e}, falling back to plain input");
                Box::new(StdinInput)
            },
        }
    } else {
        Box::new(StdinInput)
    };

    let mut terminal = Terminal::new(menus::root, settings, Box::new(StdConsole), input)
        .with_settings_loader(reload_with(Settings::load, overrides))
        .with_welcome(WELCOME)
        .with_goodbye(GOODBYE);
    terminal.run(initial)?;
    Ok(())
}

/// Settings taken from the command line instead of the settings file. They
/// win over the file at startup and again after every root `reset`.
#[derive(Debug, Clone, Default)]
struct Overrides {
    debug: bool,
    export_folder: Option<String>,
}

impl Overrides {
    fn apply(&self, settings: &mut Settings) {
        settings.debug |= self.debug;
        if let Some(folder) = &self.export_folder {
            settings.export_folder = folder.clone();
        }
    }
}

/// Settings loader for root resets: `load`, then the command-line overrides.
fn reload_with<F>(load: F, overrides: Overrides) -> impl Fn() -> finterm_types::Result<Settings>
where
    F: Fn() -> finterm_types::Result<Settings>,
{
    move || {
        let mut settings = load()?;
        overrides.apply(&mut settings);
        Ok(settings)
    }
}

/// Commands queued before the first prompt: a routine's lines, or the
/// positional arguments joined into one input line. A routine's export
/// folder is recorded in `overrides`.
fn initial_commands(cli: &Cli, overrides: &mut Overrides) -> Result<Vec<String>> {
    let routine_path = cli.file.clone().or_else(|| {
        cli.args
            .first()
            .map(PathBuf::from)
            .filter(|p| is_routine_file(p))
    });

    let Some(path) = routine_path else {
        if cli.args.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![cli.args.join(" ")]);
    };

    let routine = Routine::load(&path, &cli.input, false)?;
    if let Some(raw) = &routine.export_folder {
        let folder = resolve_export_folder(raw, &std::env::current_dir()?)?;
        overrides.export_folder = Some(folder.to_string_lossy().into_owned());
    }
    log::info!("Running routine {} ({} commands)", path.display(), routine.commands.len());
    Ok(routine.commands)
}

fn run_test_mode(cli: &Cli, settings: &Settings) -> Result<()> {
    let paths: Vec<PathBuf> = if cli.args.is_empty() {
        vec![PathBuf::from(DEFAULT_ROUTINE_DIR)]
    } else {
        cli.args.iter().map(PathBuf::from).collect()
    };
    let files = test_runner::collect_routines(&paths, cli.filter.as_deref())?;
    if files.is_empty() {
        bail!("no routine files found");
    }

    let mut console = StdConsole;
    let report = test_runner::run_tests(&files, &cli.input, cli.verbose, settings, &mut console);
    if !report.passed() {
        bail!("{} of {} routines failed", report.failures.len(), files.len());
    }
    Ok(())
}
