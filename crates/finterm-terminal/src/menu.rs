//! Menus: navigable command namespaces.
//!
//! A [`Menu`] is one concrete type assembled by [`MenuBuilder`]: a validated
//! path, a registry of menu-specific commands, a list of submenu factories, a
//! help function and optional reset/load behavior. Every menu also answers
//! the universal commands (`help`, `quit`, `reset`, ...).

use std::collections::BTreeMap;
use std::fmt;

use finterm_types::Settings;
use finterm_types::error::{FintermError, Result};

use crate::console::Console;
use crate::interpreter::{Command, CommandContext, CommandOutput, CommandRegistry};
use crate::queue::CommandQueue;
use crate::split::{COMMAND_SEPARATOR, HOME, PathSplitter};
use crate::universal::Universal;

/// Produces the help text printed by `help` and on first entry.
pub type HelpFn = fn(&Menu) -> String;

/// Produces the command tokens that rebuild a menu after `reset`.
pub type ResetFn = fn(&MenuState) -> Vec<String>;

/// Builds a menu, given the state of the menu it is entered from.
pub type MenuFactory = fn(&MenuState) -> Result<Menu>;

// ---------------------------------------------------------------------------
// MenuPath
// ---------------------------------------------------------------------------

/// Position of a menu in the tree, e.g. `/stocks/ta/`.
///
/// Always starts and ends with `/` and contains only lowercase ASCII letters
/// and `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuPath(String);

impl MenuPath {
    /// Validate `path`.
    pub fn new(path: &str) -> Result<Self> {
        if !path.starts_with(COMMAND_SEPARATOR) {
            return Err(FintermError::MenuDefinition(format!(
                "path '{path}' must begin with '/'"
            )));
        }
        if !path.ends_with(COMMAND_SEPARATOR) {
            return Err(FintermError::MenuDefinition(format!(
                "path '{path}' must end with '/'"
            )));
        }
        if !path
            .chars()
            .all(|c| c == COMMAND_SEPARATOR || c.is_ascii_lowercase())
        {
            return Err(FintermError::MenuDefinition(format!(
                "path '{path}' may only contain lowercase letters and '/'"
            )));
        }
        Ok(Self(path.to_string()))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self(COMMAND_SEPARATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Non-empty segments, e.g. `["stocks", "ta"]` for `/stocks/ta/`.
    pub fn segments(&self) -> Vec<&str> {
        self.0
            .split(COMMAND_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Number of levels below the root (0 for `/`).
    pub fn depth(&self) -> usize {
        self.segments().len()
    }

    /// Path of the submenu `name` below this one.
    pub fn child(&self, name: &str) -> Result<Self> {
        Self::new(&format!("{}{name}{COMMAND_SEPARATOR}", self.0))
    }

    /// First segment, or `home` at the root.
    pub fn main_menu(&self) -> &str {
        self.segments().first().copied().unwrap_or(HOME)
    }
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// MenuState
// ---------------------------------------------------------------------------

/// Per-instance key/value state, e.g. the loaded ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    values: BTreeMap<String, String>,
}

impl MenuState {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Submenu
// ---------------------------------------------------------------------------

/// A named entry point into a child menu.
#[derive(Debug, Clone)]
pub struct Submenu {
    name: String,
    description: String,
    factory: MenuFactory,
    inherits_state: bool,
}

impl Submenu {
    pub fn new(name: &str, description: &str, factory: MenuFactory) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            factory,
            inherits_state: false,
        }
    }

    /// The child reads the parent's state, so it is always built fresh
    /// instead of being served from the saved-menu cache.
    pub fn inheriting(mut self) -> Self {
        self.inherits_state = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn factory(&self) -> MenuFactory {
        self.factory
    }

    pub fn inherits_state(&self) -> bool {
        self.inherits_state
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// What a command name refers to in a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Universal(Universal),
    /// A menu-specific command.
    Command,
    /// Index into the menu's submenus.
    Submenu(usize),
    Unrecognized,
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// One navigable command namespace.
pub struct Menu {
    path: MenuPath,
    commands: CommandRegistry,
    submenus: Vec<Submenu>,
    help: HelpFn,
    custom_reset: Option<ResetFn>,
    try_reload: bool,
    splitter: PathSplitter,
    state: MenuState,
    queue: CommandQueue,
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("path", &self.path)
            .field("commands", &self.commands.names())
            .field("submenus", &self.submenus.len())
            .field("state", &self.state)
            .field("queue", &self.queue)
            .finish()
    }
}

impl Menu {
    /// Start building a menu at `path` with the mandatory help function.
    pub fn builder(path: &str, help: HelpFn) -> MenuBuilder {
        MenuBuilder {
            path: path.to_string(),
            help,
            commands: Vec::new(),
            submenus: Vec::new(),
            custom_reset: None,
            try_reload: false,
            filters: Vec::new(),
            state: MenuState::default(),
        }
    }

    pub fn path(&self) -> &MenuPath {
        &self.path
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn submenus(&self) -> &[Submenu] {
        &self.submenus
    }

    pub fn submenu(&self, index: usize) -> Option<&Submenu> {
        self.submenus.get(index)
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MenuState {
        &mut self.state
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut CommandQueue {
        &mut self.queue
    }

    /// Move the queue out, leaving this menu with an empty one.
    pub fn take_queue(&mut self) -> CommandQueue {
        std::mem::take(&mut self.queue)
    }

    pub fn set_queue(&mut self, queue: CommandQueue) {
        self.queue = queue;
    }

    /// Whether unrecognized input may be retried as `load <input>`.
    pub fn can_load(&self) -> bool {
        self.try_reload
    }

    /// Help text for this menu.
    pub fn help_text(&self) -> String {
        (self.help)(self)
    }

    /// Tokens that rebuild this menu after a reset. Empty means "replay the
    /// path".
    pub fn custom_reset(&self) -> Vec<String> {
        self.custom_reset
            .map(|reset| reset(&self.state))
            .unwrap_or_default()
    }

    /// Split an input line with this menu's filters.
    pub fn split(&self, input: &str) -> Vec<String> {
        self.splitter.split(input)
    }

    /// Every name this menu recognizes: its commands, its submenus, and the
    /// universal commands with their aliases.
    pub fn choices(&self) -> Vec<String> {
        let mut choices: Vec<String> = self
            .commands
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();
        choices.extend(self.submenus.iter().map(|s| s.name.clone()));
        for universal in Universal::ALL {
            choices.push(universal.name().to_string());
            choices.extend(universal.aliases().iter().map(|a| a.to_string()));
        }
        choices
    }

    /// Names `about` and `support` accept: commands and submenus.
    pub fn documented_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();
        names.extend(self.submenus.iter().map(|s| s.name.clone()));
        names
    }

    /// Resolve an alias-normalised command name. Matching is case-sensitive.
    pub fn resolve(&self, name: &str) -> Resolved {
        if let Some(universal) = Universal::from_name(name) {
            return Resolved::Universal(universal);
        }
        if self.commands.contains(name) {
            return Resolved::Command;
        }
        match self.submenus.iter().position(|s| s.name == name) {
            Some(index) => Resolved::Submenu(index),
            None => Resolved::Unrecognized,
        }
    }

    /// Run the menu-specific command `name`.
    pub fn execute_command(
        &mut self,
        name: &str,
        args: &[&str],
        settings: &mut Settings,
        console: &mut dyn Console,
    ) -> Result<CommandOutput> {
        let cmd = self
            .commands
            .get(name)
            .ok_or_else(|| FintermError::unknown_command(name, self.path.as_str()))?;
        let mut ctx = CommandContext {
            path: &self.path,
            state: &mut self.state,
            queue: &mut self.queue,
            settings,
            console,
        };
        cmd.execute(args, &mut ctx)
    }

    /// Two-column listing of the menu's commands and submenus, for help
    /// functions.
    pub fn listing(&self) -> String {
        let mut lines = Vec::new();
        for (name, desc) in self.commands.list_commands() {
            lines.push(format!("    {name:<16}{desc}"));
        }
        if !self.submenus.is_empty() && !lines.is_empty() {
            lines.push(String::new());
        }
        for sub in &self.submenus {
            lines.push(format!(">   {:<16}{}", sub.name, sub.description));
        }
        lines.join("\n")
    }
}

// ---------------------------------------------------------------------------
// MenuBuilder
// ---------------------------------------------------------------------------

/// Assembles a [`Menu`]. Validation happens in [`MenuBuilder::build`].
pub struct MenuBuilder {
    path: String,
    help: HelpFn,
    commands: Vec<Box<dyn Command>>,
    submenus: Vec<Submenu>,
    custom_reset: Option<ResetFn>,
    try_reload: bool,
    filters: Vec<String>,
    state: MenuState,
}

impl MenuBuilder {
    pub fn command(mut self, cmd: Box<dyn Command>) -> Self {
        self.commands.push(cmd);
        self
    }

    pub fn submenu(mut self, submenu: Submenu) -> Self {
        self.submenus.push(submenu);
        self
    }

    pub fn custom_reset(mut self, reset: ResetFn) -> Self {
        self.custom_reset = Some(reset);
        self
    }

    /// Mark the menu as having a `load` command that unrecognized input may
    /// be retried with.
    pub fn load_capable(mut self) -> Self {
        self.try_reload = true;
        self
    }

    /// Add a splitter filter protecting spans that contain `/`.
    pub fn filter(mut self, pattern: &str) -> Self {
        self.filters.push(pattern.to_string());
        self
    }

    /// Initial state, e.g. values inherited from the parent menu.
    pub fn state(mut self, state: MenuState) -> Self {
        self.state = state;
        self
    }

    /// Validate the definition and build the menu.
    ///
    /// Fails with [`FintermError::MenuDefinition`] on a malformed path, a
    /// duplicate name, or a name that shadows a universal command.
    pub fn build(self) -> Result<Menu> {
        let path = MenuPath::new(&self.path)?;

        let mut commands = CommandRegistry::new();
        for cmd in self.commands {
            if Universal::from_name(cmd.name()).is_some() {
                return Err(FintermError::MenuDefinition(format!(
                    "{path}: '{}' shadows a universal command",
                    cmd.name()
                )));
            }
            commands.register(cmd)?;
        }

        let mut seen = Vec::with_capacity(self.submenus.len());
        for sub in &self.submenus {
            if commands.contains(&sub.name)
                || seen.contains(&sub.name.as_str())
                || Universal::from_name(&sub.name).is_some()
            {
                return Err(FintermError::MenuDefinition(format!(
                    "{path}: submenu '{}' is defined twice",
                    sub.name
                )));
            }
            seen.push(sub.name.as_str());
        }

        let filters: Vec<&str> = self.filters.iter().map(String::as_str).collect();
        let splitter = PathSplitter::new(&filters)?;

        Ok(Menu {
            path,
            commands,
            submenus: self.submenus,
            help: self.help,
            custom_reset: self.custom_reset,
            try_reload: self.try_reload,
            splitter,
            state: self.state,
            queue: CommandQueue::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;

    struct LoadCmd;
    impl Command for LoadCmd {
        fn name(&self) -> &str {
            "load"
        }
        fn description(&self) -> &str {
            "Load a ticker"
        }
        fn usage(&self) -> &str {
            "load <ticker>"
        }
        fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
            let ticker = args.first().copied().unwrap_or_default().to_uppercase();
            ctx.state.set("ticker", ticker.clone());
            Ok(CommandOutput::Text(format!("Loaded {ticker}")))
        }
    }

    fn help(menu: &Menu) -> String {
        format!("{}\n{}", menu.path(), menu.listing())
    }

    fn empty(_: &MenuState) -> Result<Menu> {
        Menu::builder("/stocks/ta/", help).build()
    }

    fn stocks() -> Menu {
        Menu::builder("/stocks/", help)
            .command(Box::new(LoadCmd))
            .submenu(Submenu::new("ta", "technical analysis", empty).inheriting())
            .build()
            .unwrap()
    }

    #[test]
    fn valid_paths() {
        assert!(MenuPath::new("/").unwrap().is_root());
        let p = MenuPath::new("/stocks/ta/").unwrap();
        assert_eq!(p.segments(), vec!["stocks", "ta"]);
        assert_eq!(p.depth(), 2);
        assert_eq!(p.main_menu(), "stocks");
        assert_eq!(MenuPath::root().main_menu(), "home");
    }

    #[test]
    fn malformed_paths_rejected() {
        for bad in ["stocks/", "/stocks", "/Stocks/", "/st0cks/", "/stocks ta/", ""] {
            let err = MenuPath::new(bad).unwrap_err();
            assert!(matches!(err, FintermError::MenuDefinition(_)), "{bad}");
        }
    }

    #[test]
    fn child_path() {
        let p = MenuPath::new("/stocks/").unwrap();
        assert_eq!(p.child("ta").unwrap().as_str(), "/stocks/ta/");
        assert!(p.child("TA").is_err());
    }

    #[test]
    fn builder_rejects_bad_path() {
        assert!(Menu::builder("stocks", help).build().is_err());
    }

    #[test]
    fn resolve_kinds() {
        let menu = stocks();
        assert_eq!(menu.resolve("load"), Resolved::Command);
        assert_eq!(menu.resolve("ta"), Resolved::Submenu(0));
        assert_eq!(menu.resolve("help"), Resolved::Universal(Universal::Help));
        assert_eq!(menu.resolve("reset"), Resolved::Universal(Universal::Reset));
        assert_eq!(menu.resolve("Load"), Resolved::Unrecognized);
        assert_eq!(menu.resolve("zzz"), Resolved::Unrecognized);
    }

    #[test]
    fn choices_include_universal_and_aliases() {
        let choices = stocks().choices();
        for name in ["load", "ta", "cls", "home", "help", "?", "h", "quit", "q", "..", "reset", "r", "exit", "about", "support"] {
            assert!(choices.iter().any(|c| c == name), "{name}");
        }
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Menu::builder("/stocks/", help)
            .command(Box::new(LoadCmd))
            .command(Box::new(LoadCmd))
            .build()
            .unwrap_err();
        assert!(matches!(err, FintermError::MenuDefinition(_)));

        let err = Menu::builder("/stocks/", help)
            .command(Box::new(LoadCmd))
            .submenu(Submenu::new("load", "clash", empty))
            .build()
            .unwrap_err();
        assert!(matches!(err, FintermError::MenuDefinition(_)));

        let err = Menu::builder("/stocks/", help)
            .submenu(Submenu::new("help", "clash", empty))
            .build()
            .unwrap_err();
        assert!(matches!(err, FintermError::MenuDefinition(_)));
    }

    #[test]
    fn execute_command_updates_state() {
        let mut menu = stocks();
        let mut settings = Settings::default();
        let console = BufferConsole::default();
        let mut sink = console.clone();
        let out = menu
            .execute_command("load", &["aapl"], &mut settings, &mut sink)
            .unwrap();
        assert_eq!(out, CommandOutput::Text("Loaded AAPL".into()));
        assert_eq!(menu.state().get("ticker"), Some("AAPL"));
    }

    #[test]
    fn custom_reset_defaults_to_empty() {
        let mut menu = stocks();
        assert!(menu.custom_reset().is_empty());

        fn reload(state: &MenuState) -> Vec<String> {
            match state.get("ticker") {
                Some(t) => vec!["stocks".into(), format!("load {t}")],
                None => Vec::new(),
            }
        }
        menu = Menu::builder("/stocks/", help)
            .custom_reset(reload)
            .build()
            .unwrap();
        assert!(menu.custom_reset().is_empty());
        menu.state_mut().set("ticker", "TSLA");
        assert_eq!(menu.custom_reset(), vec!["stocks", "load TSLA"]);
    }

    #[test]
    fn custom_filter_is_used() {
        let menu = Menu::builder("/forex/", help)
            .filter(r"[A-Z]{3}/[A-Z]{3}")
            .build()
            .unwrap();
        assert_eq!(menu.split("load EUR/USD/quote"), vec!["load EUR/USD", "quote"]);
    }

    #[test]
    fn take_queue_leaves_empty() {
        let mut menu = stocks();
        menu.queue_mut().push_front(["a", "b"]);
        let q = menu.take_queue();
        assert_eq!(q.len(), 2);
        assert!(menu.queue().is_empty());
    }

    #[test]
    fn listing_shows_commands_and_menus() {
        let text = stocks().listing();
        assert!(text.contains("load"));
        assert!(text.contains(">   ta"));
    }
}
