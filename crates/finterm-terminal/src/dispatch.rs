//! The dispatcher: per-menu loops, `switch`, universal commands, and
//! recovery from unrecognized input.
//!
//! Control flow is a queue of command tokens owned by the active menu. Each
//! iteration pops one token (or prompts when the queue is empty) and feeds it
//! to [`Terminal::switch`]. Entering a submenu moves the queue into the child
//! and runs the child's loop to completion; a `quit` at the head of the
//! queue ends that loop and hands the remainder back to the parent. Going up
//! N levels is N `quit` tokens.

use std::collections::HashMap;

use finterm_types::Settings;
use finterm_types::error::{FintermError, Result};

use crate::args::{parse_command_args, split_words, with_default_flag};
use crate::console::{Console, LineSource, render};
use crate::fuzzy::{FUZZY_CUTOFF, closest_match};
use crate::menu::{Menu, MenuFactory, MenuState, Resolved};
use crate::queue::CommandQueue;
use crate::universal::{
    AboutArgs, SupportArgs, Universal, documentation_url, is_quit, normalize_alias, support_url,
};

/// Menu whose inputs and queue are kept out of the logs.
pub const KEYS_MENU: &str = "keys/";

const QUIT: &str = "quit";

/// Reloads settings when the root menu is reset. Callers re-apply their
/// own overrides (CLI flags, routine export folder) inside the loader.
pub type SettingsLoader = Box<dyn Fn() -> Result<Settings>>;

/// A terminal session: settings, saved menus, and the I/O seams.
pub struct Terminal {
    settings: Settings,
    /// Last instance of each visited menu, keyed by path. Lives for the
    /// session; cleared by a root `reset`.
    saved: HashMap<String, Menu>,
    console: Box<dyn Console>,
    input: Box<dyn LineSource>,
    root: MenuFactory,
    settings_loader: Option<SettingsLoader>,
    welcome: Option<String>,
    goodbye: Option<String>,
    restart: bool,
}

impl Terminal {
    pub fn new(
        root: MenuFactory,
        settings: Settings,
        console: Box<dyn Console>,
        input: Box<dyn LineSource>,
    ) -> Self {
        Self {
            settings,
            saved: HashMap::new(),
            console,
            input,
            root,
            settings_loader: None,
            welcome: None,
            goodbye: None,
            restart: false,
        }
    }

    /// Reload settings with `loader` on a root `reset`.
    pub fn with_settings_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<Settings> + 'static,
    {
        self.settings_loader = Some(Box::new(loader));
        self
    }

    /// Message printed when the session starts without queued commands.
    pub fn with_welcome(mut self, text: impl Into<String>) -> Self {
        self.welcome = Some(text.into());
        self
    }

    /// Message printed when the root menu quits.
    pub fn with_goodbye(mut self, text: impl Into<String>) -> Self {
        self.goodbye = Some(text.into());
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Whether a menu instance for `path` is saved.
    pub fn is_saved(&self, path: &str) -> bool {
        self.saved.contains_key(path)
    }

    /// Run the session until the root menu quits.
    ///
    /// `initial` is queued on the root menu before the first prompt. A root
    /// `reset` rebuilds the root menu, drops saved menus and reloads
    /// settings, then carries on with whatever is still queued.
    pub fn run(&mut self, initial: Vec<String>) -> Result<()> {
        log::info!("START");
        log::info!("Settings: {}", self.settings.summary());
        let mut pending = CommandQueue::from(initial);
        if !pending.is_empty() {
            log::info!("INPUT: {pending}");
        }

        loop {
            if pending.is_empty()
                && let Some(welcome) = &self.welcome
            {
                self.console.print(welcome);
            }

            let mut root = self.build_root()?;
            root.set_queue(pending);
            self.restart = false;

            let remainder = self.menu_loop(&mut root, "")?;
            if !self.restart {
                break;
            }

            log::info!("Resetting terminal");
            self.saved.clear();
            if let Some(loader) = &self.settings_loader {
                self.settings = loader()?;
            }
            pending = remainder.into();
        }

        if let Some(goodbye) = &self.goodbye {
            self.console.print(goodbye);
        }
        log::info!("END");
        Ok(())
    }

    fn build_root(&self) -> Result<Menu> {
        let root = (self.root)(&MenuState::default())?;
        if !root.path().is_root() {
            return Err(FintermError::MenuDefinition(format!(
                "root menu has path {}",
                root.path()
            )));
        }
        Ok(root)
    }

    /// Drive `menu` until a `quit` reaches the head of its queue. Returns
    /// the tokens queued after that `quit`.
    ///
    /// `custom_path_menu_above` is queued first in the remainder, for menus
    /// entered from outside their tree parent.
    pub fn menu_loop(&mut self, menu: &mut Menu, custom_path_menu_above: &str) -> Result<Vec<String>> {
        let mut fresh = true;

        loop {
            let head_is_quit = menu.queue().front().map(is_quit);
            let input = match head_is_quit {
                Some(true) => {
                    let mut remainder = menu.take_queue().take();
                    remainder.remove(0);
                    if !custom_path_menu_above.is_empty() {
                        remainder.insert(0, custom_path_menu_above.to_string());
                    }
                    return Ok(remainder);
                },
                Some(false) => {
                    let input = menu.queue_mut().pop_front().unwrap_or_default();
                    fresh = false;
                    if should_echo(menu, &input) {
                        let prompt = self.prompt(menu);
                        self.console.print(&format!("{prompt}{input}"));
                    }
                    input
                },
                None => {
                    if fresh {
                        self.console.print(&menu.help_text());
                        fresh = false;
                    }
                    let prompt = self.prompt(menu);
                    match self.input.read_line(&prompt, &menu.choices())? {
                        Some(line) => line,
                        None => Universal::Exit.name().to_string(),
                    }
                },
            };

            match self.switch(menu, &input) {
                Ok(()) => {},
                Err(FintermError::UnknownCommand { .. }) => self.recover_unknown(menu, &input),
                Err(e) if self.settings.debug => return Err(e),
                Err(e) => {
                    if !contains_keys(menu, &input) {
                        log::error!("{}: '{}' failed: {e}", menu.path(), input.trim());
                    }
                    self.console.print(&e.to_string());
                },
            }
        }
    }

    /// Process one input line in `menu`.
    ///
    /// Several segments are queued (nothing runs yet). A single command is
    /// alias-normalised, resolved and executed. Unresolved names fail with
    /// [`FintermError::UnknownCommand`].
    pub fn switch(&mut self, menu: &mut Menu, input: &str) -> Result<()> {
        let actions = menu.split(input);
        match actions.len() {
            0 => return Ok(()),
            1 => {},
            _ => {
                menu.queue_mut().push_front(actions);
                log_queue(menu);
                return Ok(());
            },
        }

        let line = &actions[0];
        let words = split_words(line)?;
        let Some((name, rest)) = words.split_first() else {
            return Ok(());
        };
        let name = normalize_alias(name);
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        if !contains_keys(menu, input) {
            log::info!(
                "CMD: {{'path': '{}', 'known_cmd': '{name}', 'other_args': '{}', 'input': '{line}'}}",
                menu.path(),
                args.join(";"),
            );
        }

        match menu.resolve(name) {
            Resolved::Universal(universal) => self.run_universal(menu, universal, &args)?,
            Resolved::Command => {
                if self.settings.clear_after_cmd {
                    self.console.clear();
                }
                let output =
                    menu.execute_command(name, &args, &mut self.settings, self.console.as_mut())?;
                render(self.console.as_mut(), &output);
            },
            Resolved::Submenu(index) => self.enter_submenu(menu, index)?,
            Resolved::Unrecognized => {
                return Err(FintermError::unknown_command(line, menu.path().as_str()));
            },
        }

        log_queue(menu);
        Ok(())
    }

    fn run_universal(&mut self, menu: &mut Menu, universal: Universal, args: &[&str]) -> Result<()> {
        let depth = menu.path().depth();
        match universal {
            Universal::Cls => self.console.clear(),
            Universal::Help => self.console.print(&menu.help_text()),
            Universal::Home => {
                if depth == 0 && self.settings.exit_auto_help {
                    self.console.print(&menu.help_text());
                }
                menu.queue_mut().push_front(vec![QUIT; depth]);
            },
            Universal::Quit => menu.queue_mut().push_front_one(QUIT),
            Universal::Exit => menu.queue_mut().push_front(vec![QUIT; depth + 1]),
            Universal::Reset => self.reset(menu),
            Universal::About => self.about(menu, args),
            Universal::Support => self.support(menu, args),
        }
        Ok(())
    }

    /// Rebuild the current menu from the root.
    ///
    /// Below the root this queues `quit` per level, `reset`, then the tokens
    /// that lead back here, ahead of anything already pending. At the root
    /// it ends the root loop and asks [`Terminal::run`] to restart.
    fn reset(&mut self, menu: &mut Menu) {
        if menu.path().is_root() {
            self.restart = true;
            menu.queue_mut().push_front_one(QUIT);
            return;
        }

        let mut rebuild = menu.custom_reset();
        if rebuild.is_empty() {
            rebuild = menu
                .path()
                .segments()
                .into_iter()
                .map(str::to_string)
                .collect();
        }

        let mut batch = vec![QUIT.to_string(); menu.path().depth()];
        batch.push(Universal::Reset.name().to_string());
        batch.extend(rebuild);
        menu.queue_mut().push_front(batch);
    }

    fn about(&mut self, menu: &Menu, args: &[&str]) {
        let args = with_default_flag(args, "-c");
        let Some(parsed) = parse_command_args::<AboutArgs>("about", &args)
            .or_report(self.console.as_mut())
        else {
            return;
        };
        if let Err(msg) = parsed.check_command(&menu.documented_names()) {
            self.console.print(&msg);
            return;
        }
        let url = documentation_url(&self.settings.docs_url, menu.path(), parsed.command.as_deref());
        self.console.print(&url);
    }

    fn support(&mut self, menu: &Menu, args: &[&str]) {
        let args = with_default_flag(args, "-c");
        let Some(parsed) = parse_command_args::<SupportArgs>("support", &args)
            .or_report(self.console.as_mut())
        else {
            return;
        };
        let mut allowed = vec!["generic".to_string()];
        allowed.extend(menu.documented_names());
        if !allowed.contains(&parsed.command) {
            self.console.print(&format!(
                "invalid choice: '{}' (choose from {})",
                parsed.command,
                allowed.join(", ")
            ));
            return;
        }
        let url = support_url(&self.settings.support_url, menu.path(), &parsed);
        self.console.print(&url);
    }

    /// Enter submenu `index` of `menu` and run it until it quits.
    fn enter_submenu(&mut self, menu: &mut Menu, index: usize) -> Result<()> {
        let Some(sub) = menu.submenu(index).cloned() else {
            return Ok(());
        };
        let key = menu.path().child(sub.name())?.as_str().to_string();
        let reusable = self.settings.remember_contexts && !sub.inherits_state();

        let cached = if reusable { self.saved.remove(&key) } else { None };
        let mut child = match cached {
            Some(child) => {
                log::debug!("Reusing saved menu {key}");
                child
            },
            None => (sub.factory())(menu.state())?,
        };

        child.set_queue(menu.take_queue());
        // A child always returns to its tree parent, so nothing is queued above it.
        let remainder = self.menu_loop(&mut child, "");
        let remainder = match remainder {
            Ok(remainder) => remainder,
            Err(e) => {
                // Give the pending tokens back so the parent stays consistent.
                menu.set_queue(child.take_queue());
                return Err(e);
            },
        };

        if reusable {
            self.saved.insert(key, child);
        }

        if remainder.is_empty() && self.settings.exit_auto_help {
            self.console.print(&menu.help_text());
        }
        menu.queue_mut().push_front(remainder);
        Ok(())
    }

    /// Handle input that named nothing in `menu`.
    ///
    /// A close match of the first word is queued with the original
    /// arguments. Failing that, menus with a `load` command may retry the
    /// input as `load <input>`.
    fn recover_unknown(&mut self, menu: &mut Menu, input: &str) {
        let input = input.trim();
        let path = menu.path().to_string();
        if !contains_keys(menu, input) {
            log::warn!("The command '{input}' doesn't exist on the {path} menu.");
        }
        self.console
            .print(&format!("The command '{input}' doesn't exist on the {path} menu."));

        let (first, rest) = match input.split_once(' ') {
            Some((first, rest)) => (first, Some(rest)),
            None => (input, None),
        };
        let choices = menu.choices();
        match closest_match(first, choices.iter().map(String::as_str), FUZZY_CUTOFF) {
            Some(candidate) => {
                let replacement = match rest {
                    Some(rest) => format!("{candidate} {rest}"),
                    None => candidate.to_string(),
                };
                if replacement == input {
                    menu.queue_mut().clear();
                    return;
                }
                if !contains_keys(menu, &replacement) {
                    log::warn!("Replacing by {replacement}");
                }
                self.console.print(&format!(" Replacing by '{replacement}'."));
                menu.queue_mut().push_front_one(replacement);
            },
            None => {
                if menu.can_load() && self.settings.retry_with_load {
                    self.console.print(&format!("Trying `load {input}`"));
                    menu.queue_mut().push_front_one(format!("load {input}"));
                }
            },
        }
    }

    fn prompt(&self, menu: &Menu) -> String {
        let flair = self.settings.flair_symbol();
        if flair.is_empty() {
            format!("{} $ ", menu.path())
        } else {
            format!("{flair} {} $ ", menu.path())
        }
    }
}

/// Echo queued input whose first word the menu recognizes, except the
/// navigation noise of `home` and `help`.
fn should_echo(menu: &Menu, input: &str) -> bool {
    if input.is_empty() || input == "home" || input == "help" {
        return false;
    }
    let first = input.split(' ').next().unwrap_or_default();
    menu.choices().iter().any(|c| c == first)
}

fn contains_keys(menu: &Menu, text: &str) -> bool {
    text.contains(KEYS_MENU) || menu.path().as_str().contains(KEYS_MENU)
}

fn log_queue(menu: &Menu) {
    let queue = menu.queue();
    if queue.is_empty() {
        return;
    }
    let joined = queue.to_string();
    if !contains_keys(menu, &joined) {
        log::info!(
            "QUEUE: {{'path': '{}', 'queue': '{joined}'}}",
            menu.path()
        );
    }
}
