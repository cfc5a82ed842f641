//! vtdex CLI — VTuber directory scraper.
//!
//! Collects the hololist ranking, enriches each entry from its profile
//! page, and attaches YouTube channel metadata, one JSON file per stage.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
