use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, optimize::optimize},
};

/// Dispatch to the command handler.
///
/// Returns `Err` when the command fails (config, I/O, parse errors); findings
/// that do not stop a command are carried in the [`CommandResult`].
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Optimize(cmd)) => optimize(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
