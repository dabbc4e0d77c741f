//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

use commands::publish::PublishCommands;

#[derive(Debug, Parser)]
#[command(
    name = "metercube-news",
    version,
    about = "Publish unlaunched news rows from a Google Sheet as a SQL script"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render pending rows into a SQL script and mark them launched (default)
    Publish(PublishCommands),
}

impl Cli {
    /// The command to run, `publish` when none was given
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Publish(PublishCommands::default()))
    }
}
