pub mod cli;
pub mod config;
pub mod controller;
pub mod export;
pub mod recorder;

use clap::Parser;

/// Binary entry point: logging, argument parsing, dispatch.
pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    cli::run(cli::Cli::parse())
}
