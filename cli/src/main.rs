use clap::Parser;

mod cli;
mod config;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
