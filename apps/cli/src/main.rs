//! bookgrab CLI: download an online book into a single HTML file.
//!
//! Fetches the book's index page, follows its table of contents one chapter
//! at a time, and writes everything to `<title>.html` or a given path.

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
