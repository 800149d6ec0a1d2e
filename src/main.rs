//! CLI entry point for the layered collection generator

use clap::Parser;
use layerforge::io::cli::{Cli, GenerationCommand};
use layerforge::io::logging::init_tracing;

#[tokio::main]
async fn main() -> layerforge::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let command = GenerationCommand::new(cli);
    command.process().await?;
    Ok(())
}
