mod api;
mod cli;
mod config;
mod news;
mod pipeline;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use log::info;

use cli::commands::publish::handle_publish_command;
use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the variables may come from the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.into_command() {
        Commands::Publish(args) => handle_publish_command(args).await?,
    }

    info!("Script completed");
    Ok(())
}
