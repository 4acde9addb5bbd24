//! Command trait, per-menu registry, and the context commands run in.

use std::collections::HashMap;

use finterm_types::Settings;
use finterm_types::error::{FintermError, Result};

use crate::console::Console;
use crate::menu::{MenuPath, MenuState};
use crate::queue::CommandQueue;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Tabular data (header row + data rows).
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Command produced no visible output.
    None,
    /// Signal to clear the screen.
    Clear,
}

/// Everything a command may read or change while it runs.
///
/// Commands that chain further work (routines, reloads) push onto `queue`;
/// the dispatcher picks those tokens up on its next iteration.
pub struct CommandContext<'a> {
    /// Path of the menu the command runs in.
    pub path: &'a MenuPath,
    /// State of the running menu instance.
    pub state: &'a mut MenuState,
    /// Pending commands of the running menu.
    pub queue: &'a mut CommandQueue,
    /// Session-wide feature flags.
    pub settings: &'a mut Settings,
    /// Console for progress messages printed before the command returns.
    pub console: &'a mut dyn Console,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for help listings and `about`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "load <ticker> \[-s start\]").
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments.
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput>;
}

/// Commands recognized by one menu, keyed by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Names must be unique within the registry.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let name = cmd.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(FintermError::MenuDefinition(format!(
                "command '{name}' registered twice"
            )));
        }
        self.commands.insert(name, cmd);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Sorted command names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [text...]"
        }
        fn execute(&self, args: &[&str], _ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(args.join(" ")))
        }
    }

    struct QuoteCmd;
    impl Command for QuoteCmd {
        fn name(&self) -> &str {
            "quote"
        }
        fn description(&self) -> &str {
            "Show the loaded symbol"
        }
        fn usage(&self) -> &str {
            "quote"
        }
        fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
            ctx.state
                .get("ticker")
                .map(|t| CommandOutput::Text(t.to_string()))
                .ok_or_else(|| FintermError::Command("no ticker loaded".to_string()))
        }
    }

    #[test]
    fn register_and_get() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd)).unwrap();
        assert!(reg.contains("echo"));
        assert_eq!(reg.get("echo").map(|c| c.usage()), Some("echo [text...]"));
        assert!(reg.get("ECHO").is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd)).unwrap();
        let err = reg.register(Box::new(EchoCmd)).unwrap_err();
        assert!(matches!(err, FintermError::MenuDefinition(_)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn list_commands_sorted() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(QuoteCmd)).unwrap();
        reg.register(Box::new(EchoCmd)).unwrap();
        let cmds = reg.list_commands();
        assert_eq!(cmds[0], ("echo", "Print arguments"));
        assert_eq!(reg.names(), vec!["echo", "quote"]);
    }

    #[test]
    fn execute_reads_menu_state() {
        use crate::console::BufferConsole;

        let path = MenuPath::new("/stocks/").unwrap();
        let mut state = MenuState::default();
        let mut queue = CommandQueue::new();
        let mut settings = Settings::default();
        let mut console = BufferConsole::default();
        let mut ctx = CommandContext {
            path: &path,
            state: &mut state,
            queue: &mut queue,
            settings: &mut settings,
            console: &mut console,
        };
        assert!(QuoteCmd.execute(&[], &mut ctx).is_err());
        ctx.state.set("ticker", "AAPL");
        assert_eq!(
            QuoteCmd.execute(&[], &mut ctx).unwrap(),
            CommandOutput::Text("AAPL".into())
        );
    }
}
