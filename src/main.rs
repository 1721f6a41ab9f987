mod app;
mod cli;
mod color;
mod data;
mod export;
mod state;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();
    cli::run(cli::Cli::parse())
}
