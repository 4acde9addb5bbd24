//! Routine files: newline-separated command paths replayed as a batch.
//!
//! ```text
//! # weekly check
//! export ~/reports/weekly
//! stocks
//! load $ARGV[0]
//! ta/rsi
//! /crypto/load BTC
//! ```
//!
//! Comment lines, blank lines and `reset` lines are skipped. `$ARGV[n]` is
//! replaced by the n-th routine argument. A first line `export <dir>` picks
//! the export folder for the run.

use std::path::{Path, PathBuf};

use finterm_types::error::{FintermError, Result};

use crate::split::{HOME, PathSplitter};

/// File extension of routine files.
pub const ROUTINE_EXTENSION: &str = "fin";

/// A parsed routine, ready to be queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routine {
    /// Command tokens in execution order, starting from the root menu.
    pub commands: Vec<String>,
    /// Raw folder from an `export` first line.
    pub export_folder: Option<String>,
}

impl Routine {
    /// Parse routine text.
    ///
    /// In `test_mode` an `exit` is appended unless the last line already
    /// contains one, so the run always terminates.
    pub fn parse(source: &str, routine_args: &[String], test_mode: bool) -> Result<Self> {
        let mut lines: Vec<String> = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !is_reset(line))
            .map(|line| substitute_args(line, routine_args))
            .collect();

        if test_mode && !lines.last().is_some_and(|last| last.contains("exit")) {
            lines.push("exit".to_string());
        }

        let mut export_folder = None;
        if let Some(folder) = lines.first().and_then(|l| l.strip_prefix("export ")) {
            export_folder = Some(folder.trim().to_string());
            lines.remove(0);
        }

        if let Some(unused) = lines.iter().find(|l| l.contains("$ARGV[")) {
            return Err(FintermError::Routine(format!(
                "missing routine argument in '{unused}'"
            )));
        }

        let splitter = PathSplitter::with_default_filters()?;
        let mut commands: Vec<String> = lines.iter().flat_map(|l| splitter.split(l)).collect();

        // Routines always start at the root, so a leading `home` is redundant.
        if commands.first().is_some_and(|c| c == HOME) {
            commands.remove(0);
        }

        if commands.is_empty() {
            return Err(FintermError::Routine("routine has no commands".to_string()));
        }

        Ok(Self {
            commands,
            export_folder,
        })
    }

    /// Read and parse the routine at `path`.
    pub fn load(path: &Path, routine_args: &[String], test_mode: bool) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        log::info!("Loaded routine {} ({} bytes)", path.display(), source.len());
        Self::parse(&source, routine_args, test_mode)
            .map_err(|e| FintermError::Routine(format!("{}: {e}", path.display())))
    }
}

/// Whether `path` names a routine file.
pub fn is_routine_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ROUTINE_EXTENSION)
}

/// Resolve an export folder: `~` expands to the home directory, relative
/// paths are taken from `base`. The directory is created if missing.
pub fn resolve_export_folder(raw: &str, base: &Path) -> Result<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FintermError::Routine("empty export folder".to_string()));
    }
    let path = if let Some(rest) = raw.strip_prefix('~') {
        let home = dirs::home_dir()
            .ok_or_else(|| FintermError::Routine("no home directory for '~'".to_string()))?;
        home.join(rest.trim_start_matches('/'))
    } else {
        let p = PathBuf::from(raw);
        if p.is_absolute() { p } else { base.join(p) }
    };

    if path.is_dir() {
        log::info!("Export data to be saved in {}", path.display());
    } else {
        std::fs::create_dir_all(&path)?;
        log::info!("Created export folder {}", path.display());
    }
    Ok(path)
}

fn is_reset(line: &str) -> bool {
    let first = line.split('/').next().unwrap_or_default().trim();
    first == "reset" || first == "r"
}

fn substitute_args(line: &str, args: &[String]) -> String {
    let mut out = line.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("$ARGV[{i}]"), arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Routine {
        Routine::parse(source, &[], false).unwrap()
    }

    #[test]
    fn lines_become_commands() {
        let r = parse("stocks\nload AAPL\nta\n");
        assert_eq!(r.commands, vec!["stocks", "load AAPL", "ta"]);
        assert_eq!(r.export_folder, None);
    }

    #[test]
    fn comments_blanks_and_resets_skipped() {
        let r = parse("# header\n\nstocks\n   \n  # indented comment\nreset\nr/stocks\nload TSLA\n");
        assert_eq!(r.commands, vec!["stocks", "load TSLA"]);
    }

    #[test]
    fn argv_substitution() {
        let args = vec!["AAPL".to_string(), "20".to_string()];
        let r = Routine::parse("stocks/load $ARGV[0]\nta/rsi -w $ARGV[1]", &args, false).unwrap();
        assert_eq!(r.commands, vec!["stocks", "load AAPL", "ta", "rsi -w 20"]);
    }

    #[test]
    fn missing_argv_is_error() {
        let err = Routine::parse("stocks/load $ARGV[1]", &["AAPL".to_string()], false).unwrap_err();
        assert!(matches!(err, FintermError::Routine(_)));
    }

    #[test]
    fn export_first_line() {
        let r = parse("export reports/weekly\nstocks\n");
        assert_eq!(r.export_folder.as_deref(), Some("reports/weekly"));
        assert_eq!(r.commands, vec!["stocks"]);
    }

    #[test]
    fn test_mode_appends_exit() {
        let r = Routine::parse("stocks\nload AAPL", &[], true).unwrap();
        assert_eq!(r.commands.last().map(String::as_str), Some("exit"));
        let r = Routine::parse("stocks\nexit", &[], true).unwrap();
        assert_eq!(r.commands, vec!["stocks", "exit"]);
    }

    #[test]
    fn absolute_lines_go_home() {
        let r = parse("/stocks/load AAPL\n/crypto\n");
        assert_eq!(r.commands, vec!["stocks", "load AAPL", "home", "crypto"]);
    }

    #[test]
    fn empty_routine_is_error() {
        assert!(Routine::parse("# nothing\n\n", &[], false).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weekly.fin");
        std::fs::write(&path, "stocks\nload $ARGV[0]\n").unwrap();
        let r = Routine::load(&path, &["MSFT".to_string()], false).unwrap();
        assert_eq!(r.commands, vec!["stocks", "load MSFT"]);
        assert!(is_routine_file(&path));
        assert!(!is_routine_file(&dir.path().join("weekly.txt")));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Routine::load(&dir.path().join("nope.fin"), &[], false).unwrap_err();
        assert!(matches!(err, FintermError::Io(_)));
    }

    #[test]
    fn export_folder_relative_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve_export_folder("out/weekly", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("out/weekly"));
        assert!(path.is_dir());
        // Existing folders are reused.
        assert_eq!(resolve_export_folder("out/weekly", dir.path()).unwrap(), path);
    }

    #[test]
    fn export_folder_absolute_kept() {
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("abs");
        let raw = abs.to_string_lossy().to_string();
        assert_eq!(resolve_export_folder(&raw, Path::new("/unused")).unwrap(), abs);
    }
}
