//! tildegen CLI — list the tilde users of a shared host.
//!
//! Enumerates accounts in the configured group, inspects their public web
//! directories, and writes the listing in every configured format.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
