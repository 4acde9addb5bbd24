//! `/featflags/` menu: session feature flags.
//!
//! Changes apply to the running session only. A root `reset` reloads the
//! flags from the settings file and environment.

use finterm_terminal::{Command, CommandContext, CommandOutput, Menu, MenuState};
use finterm_types::Settings;
use finterm_types::error::{FintermError, Result};

use super::help_page;

pub fn featflags(_: &MenuState) -> Result<Menu> {
    let mut builder = Menu::builder("/featflags/", help).command(Box::new(FlagsCmd));
    for toggle in TOGGLES {
        builder = builder.command(Box::new(toggle));
    }
    builder.command(Box::new(FlairCmd)).build()
}

fn help(menu: &Menu) -> String {
    help_page(menu, "Feature flags", &[])
}

/// Flips one boolean setting each time it runs.
#[derive(Clone, Copy)]
struct Toggle {
    name: &'static str,
    field: &'static str,
    description: &'static str,
    flag: fn(&mut Settings) -> &mut bool,
}

const TOGGLES: [Toggle; 5] = [
    Toggle {
        name: "retryload",
        field: "retry_with_load",
        description: "Retry unknown input as 'load <input>'",
        flag: retry_with_load,
    },
    Toggle {
        name: "rcontext",
        field: "remember_contexts",
        description: "Keep menu state when leaving a menu",
        flag: remember_contexts,
    },
    Toggle {
        name: "exithelp",
        field: "exit_auto_help",
        description: "Show help when returning to a menu",
        flag: exit_auto_help,
    },
    Toggle {
        name: "autocls",
        field: "clear_after_cmd",
        description: "Clear the screen after each command",
        flag: clear_after_cmd,
    },
    Toggle {
        name: "readline",
        field: "use_readline",
        description: "Line editor with completion (next start)",
        flag: use_readline,
    },
];

fn retry_with_load(s: &mut Settings) -> &mut bool {
    &mut s.retry_with_load
}

fn remember_contexts(s: &mut Settings) -> &mut bool {
    &mut s.remember_contexts
}

fn exit_auto_help(s: &mut Settings) -> &mut bool {
    &mut s.exit_auto_help
}

fn clear_after_cmd(s: &mut Settings) -> &mut bool {
    &mut s.clear_after_cmd
}

fn use_readline(s: &mut Settings) -> &mut bool {
    &mut s.use_readline
}

impl Command for Toggle {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        self.description
    }
    fn usage(&self) -> &str {
        self.name
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let flag = (self.flag)(ctx.settings);
        *flag = !*flag;
        let value = *flag;
        log::info!("{} = {value}", self.field);
        Ok(CommandOutput::Text(format!("Setting {} to {value}", self.field)))
    }
}

struct FlairCmd;
impl Command for FlairCmd {
    fn name(&self) -> &str {
        "flair"
    }
    fn description(&self) -> &str {
        "Prompt flair, e.g. :rocket or :hidden"
    }
    fn usage(&self) -> &str {
        "flair <:name>"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let [name] = args else {
            return Err(FintermError::Command(format!("usage: {}", self.usage())));
        };
        ctx.settings.flair = (*name).to_string();
        Ok(CommandOutput::Text(format!("Setting flair to {name}")))
    }
}

struct FlagsCmd;
impl Command for FlagsCmd {
    fn name(&self) -> &str {
        "flags"
    }
    fn description(&self) -> &str {
        "Show the current flags"
    }
    fn usage(&self) -> &str {
        "flags"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
        let mut rows: Vec<Vec<String>> = TOGGLES
            .iter()
            .map(|t| vec![t.name.to_string(), (t.flag)(ctx.settings).to_string()])
            .collect();
        rows.push(vec!["flair".to_string(), ctx.settings.flair.clone()]);
        rows.push(vec!["export".to_string(), ctx.settings.export_folder.clone()]);
        Ok(CommandOutput::Table {
            headers: vec!["Flag".into(), "Value".into()],
            rows,
        })
    }
}
