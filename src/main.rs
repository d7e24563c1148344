use anyhow::Result;
use clap::Parser;
use terminal_skies::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    terminal_skies::run(cli).await
}
