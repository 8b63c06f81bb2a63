//! DealBrief CLI — investor research report generation.
//!
//! Turns intake company records into validated intelligence briefs and
//! renders them as one-pager and deep-dive Markdown reports.

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
