use anyhow::Result;
use atm_ledger::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    atm_ledger::logging::init(cli.verbose);
    cli.run().await
}
