use anyhow::Result;
use clap::Parser;
use mirror_sky::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    mirror_sky::run(cli).await
}
