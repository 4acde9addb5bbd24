//! Menu dispatch core.
//!
//! Input lines are split into command tokens, queued on the active menu, and
//! dispatched one at a time. Menus form a tree; entering a submenu hands the
//! queue to the child, and each `quit` token unwinds one level.

pub mod args;
pub mod console;
mod dispatch;
pub mod fuzzy;
mod interpreter;
pub mod menu;
mod queue;
pub mod routine;
pub mod split;
pub mod universal;

/// Outcome of parsing a command's arguments with clap.
pub use args::{ParseOutcome, parse_command_args, with_default_flag};
/// Output sink and interactive input seams.
pub use console::{BufferConsole, Console, LineSource, NullConsole, ScriptedInput, StdConsole};
/// The session driver: menu loops, switch, universal commands.
pub use dispatch::{SettingsLoader, Terminal};
/// A single executable command trait.
pub use interpreter::Command;
/// Everything a command may read or change while it runs.
pub use interpreter::CommandContext;
/// Output produced by a command (text, table, signals).
pub use interpreter::CommandOutput;
/// Per-menu registry of commands.
pub use interpreter::CommandRegistry;
/// Menus and their building blocks.
pub use menu::{Menu, MenuBuilder, MenuFactory, MenuPath, MenuState, Resolved, Submenu};
/// Pending command tokens of the active menu.
pub use queue::CommandQueue;
/// Routine files replayed as a batch.
pub use routine::Routine;
/// Command path splitting.
pub use split::PathSplitter;
