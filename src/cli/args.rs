//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `optimize`: Replace translation keys with ordinals in a build output directory
//! - `init`: Initialize keyshrink configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Optimize(cmd)) => cmd.args.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Parser)]
pub struct OptimizeArgs {
    /// Project directory to search for the config file from
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Build output directory (overrides config file)
    #[arg(long)]
    pub dist_root: Option<PathBuf>,

    /// Reference language code (overrides config file)
    #[arg(long)]
    pub reference_language: Option<String>,

    /// Actually rewrite files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Write a position map next to every rewritten file (requires --apply)
    #[arg(long, requires = "apply")]
    pub emit_maps: bool,

    /// Write the key to ordinal index as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub emit_index: Option<PathBuf>,

    /// Exit with status 1 when translations are missing or unused
    #[arg(long)]
    pub deny_warnings: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct OptimizeCommand {
    #[command(flatten)]
    pub args: OptimizeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace translation keys with compact ordinals in built bundles
    Optimize(OptimizeCommand),
    /// Initialize a new .keyshrinkrc.json configuration file
    Init,
}
