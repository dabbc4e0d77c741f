//! `publish` command

pub mod handler;

use clap::Args;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::news::QuoteMode;

pub use handler::handle_publish_command;

#[derive(Debug, Clone, Default, Args)]
pub struct PublishCommands {
    /// Render the script to stdout without writing a file or updating the sheet
    #[arg(long)]
    pub dry_run: bool,

    /// Directory the SQL script is written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Service account JSON key
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// TOML file with default settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How single quotes in text fields are handled
    #[arg(long, value_enum)]
    pub quote_mode: Option<QuoteMode>,
}

impl PublishCommands {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            key_file: self.key_file.clone(),
            output_dir: self.output_dir.clone(),
            quote_mode: self.quote_mode,
        }
    }
}
