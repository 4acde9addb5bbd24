//! Feature-flag settings.
//!
//! Settings come from an optional `settings.toml` and are then overridden by
//! `FINTERM_*` environment variables. A `reset` at the root menu reloads them.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FintermError, Result};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "FINTERM_CONFIG";

/// Prefix shared by all flag override variables.
pub const ENV_PREFIX: &str = "FINTERM_";

/// Runtime feature flags consulted by the dispatcher and the menus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Reuse the last instance of a menu when navigating back into it.
    #[serde(default = "default_true")]
    pub remember_contexts: bool,
    /// Print the menu help when returning to it with nothing left to run.
    #[serde(default = "default_true")]
    pub exit_auto_help: bool,
    /// Retry unrecognized input as `load <input>` in menus that can load.
    #[serde(default)]
    pub retry_with_load: bool,
    /// Clear the screen before every command.
    #[serde(default)]
    pub clear_after_cmd: bool,
    /// Use the line editor (history, completion) for interactive input.
    #[serde(default = "default_true")]
    pub use_readline: bool,
    /// Prompt flair name, e.g. `:openbb` or `:rocket`.
    #[serde(default = "default_flair")]
    pub flair: String,
    /// Folder exported files are written to. Empty means the default.
    #[serde(default)]
    pub export_folder: String,
    /// Base URL used by `about`.
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
    /// Base URL used by `support`.
    #[serde(default = "default_support_url")]
    pub support_url: String,
    /// Propagate command failures instead of reporting and continuing.
    #[serde(default)]
    pub debug: bool,
}

fn default_true() -> bool {
    true
}

fn default_flair() -> String {
    ":openbb".to_string()
}

fn default_docs_url() -> String {
    "https://finterm.dev/docs/terminal".to_string()
}

fn default_support_url() -> String {
    "https://finterm.dev/support".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remember_contexts: true,
            exit_auto_help: true,
            retry_with_load: false,
            clear_after_cmd: false,
            use_readline: true,
            flair: default_flair(),
            export_folder: String::new(),
            docs_url: default_docs_url(),
            support_url: default_support_url(),
            debug: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from `path` if it exists, defaults otherwise.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| FintermError::Config(format!("{}: {e}", path.display())))
    }

    /// Load from the default location and apply process environment overrides.
    pub fn load() -> Result<Self> {
        let mut settings = match default_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Override flags from `FINTERM_*` variables obtained through `lookup`.
    ///
    /// Boolean values that fail to parse are logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let bools: [(&str, &mut bool); 6] = [
            ("REMEMBER_CONTEXTS", &mut self.remember_contexts),
            ("ENABLE_EXIT_AUTO_HELP", &mut self.exit_auto_help),
            ("RETRY_WITH_LOAD", &mut self.retry_with_load),
            ("USE_CLEAR_AFTER_CMD", &mut self.clear_after_cmd),
            ("USE_READLINE", &mut self.use_readline),
            ("DEBUG", &mut self.debug),
        ];
        for (name, slot) in bools {
            let key = format!("{ENV_PREFIX}{name}");
            if let Some(raw) = lookup(&key) {
                match parse_bool(&raw) {
                    Some(value) => *slot = value,
                    None => log::warn!("Ignoring {key}={raw}: not a boolean"),
                }
            }
        }
        if let Some(flair) = lookup(&format!("{ENV_PREFIX}USE_FLAIR")) {
            self.flair = flair;
        }
        if let Some(folder) = lookup(&format!("{ENV_PREFIX}EXPORT_FOLDER_PATH")) {
            self.export_folder = folder;
        }
    }

    /// Symbol shown at the start of the prompt for the configured flair.
    ///
    /// Unknown flair names are shown verbatim.
    pub fn flair_symbol(&self) -> String {
        let symbol = match self.flair.as_str() {
            ":openbb" => "(🦋)",
            ":rocket" => "(🚀)",
            ":diamond" => "(💎)",
            ":stars" => "(✨)",
            ":baseball" => "(⚾)",
            ":boat" => "(⛵)",
            ":phone" => "(☎)",
            ":mercury" => "(☿)",
            ":sun" => "(☼)",
            ":moon" => "(☾)",
            ":nuke" => "(☢)",
            ":hazard" => "(☣)",
            ":king" => "(♔)",
            ":queen" => "(♕)",
            ":knight" => "(♘)",
            ":recycle" => "(♻)",
            ":hidden" => "",
            other => other,
        };
        symbol.to_string()
    }

    /// One-line summary of the flags, logged at startup.
    pub fn summary(&self) -> String {
        format!(
            "rcontext={} exithelp={} retryload={} cls={} readline={} flair={} debug={}",
            self.remember_contexts,
            self.exit_auto_help,
            self.retry_with_load,
            self.clear_after_cmd,
            self.use_readline,
            self.flair,
            self.debug,
        )
    }
}

/// `$FINTERM_CONFIG` if set, otherwise `~/.finterm/settings.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".finterm").join("settings.toml"))
}

/// Parse a boolean the way `strtobool` does.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
