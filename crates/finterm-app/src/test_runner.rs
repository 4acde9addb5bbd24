//! Batch mode: replay routine files and report which ones fail.
//!
//! Each routine runs in its own session with debug on, so the first command
//! error ends that routine and counts as a failure.

use std::path::{Path, PathBuf};

use finterm_terminal::routine::{is_routine_file, resolve_export_folder};
use finterm_terminal::{Console, NullConsole, Routine, ScriptedInput, StdConsole, Terminal};
use finterm_types::Settings;
use finterm_types::error::Result;

use crate::menus;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct TestReport {
    pub successes: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Routine files named by `paths`, directories searched recursively, sorted.
/// With `filter`, only files whose path contains it are kept.
pub fn collect_routines(paths: &[PathBuf], filter: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(path, &mut found)?;
        } else if is_routine_file(path) {
            found.push(path.clone());
        } else {
            log::warn!("Skipping {}: not a routine file", path.display());
        }
    }
    if let Some(filter) = filter {
        found.retain(|p| p.to_string_lossy().contains(filter));
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, found)?;
        } else if is_routine_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// Run every routine in `files`, printing progress and a summary on
/// `console`. With `verbose`, the routines' own output goes to stdout.
pub fn run_tests(
    files: &[PathBuf],
    routine_args: &[String],
    verbose: bool,
    settings: &Settings,
    console: &mut dyn Console,
) -> TestReport {
    let mut report = TestReport::default();
    let total = files.len();

    for (i, file) in files.iter().enumerate() {
        match run_one(file, routine_args, verbose, settings) {
            Ok(()) => report.successes += 1,
            Err(e) => {
                log::warn!("Routine {} failed: {e}", file.display());
                report.failures.push((file.clone(), e.to_string()));
            },
        }
        let pct = (i + 1) as f64 * 100.0 / total as f64;
        console.print(&format!("{}  {pct:.1}%", file.display()));
    }

    if !report.failures.is_empty() {
        console.print("");
        console.print("Failures:");
        for (file, err) in &report.failures {
            console.print(&format!("{}: {err}", file.display()));
        }
    }
    console.print("");
    console.print(&format!(
        "Summary: Successes: {} Failures: {}",
        report.successes,
        report.failures.len()
    ));
    report
}

fn run_one(file: &Path, routine_args: &[String], verbose: bool, settings: &Settings) -> Result<()> {
    let routine = Routine::load(file, routine_args, true)?;

    let mut settings = Settings {
        debug: true,
        ..settings.clone()
    };
    if let Some(raw) = &routine.export_folder {
        let base = file.parent().unwrap_or_else(|| Path::new("."));
        settings.export_folder = resolve_export_folder(raw, base)?.to_string_lossy().into_owned();
    }

    let console: Box<dyn Console> = if verbose {
        Box::new(StdConsole)
    } else {
        Box::new(NullConsole)
    };
    let mut terminal = Terminal::new(
        menus::root,
        settings,
        console,
        Box::new(ScriptedInput::default()),
    );
    terminal.run(routine.commands)
}
