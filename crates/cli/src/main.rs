use anyhow::Result;
use clap::Parser;
use lamden_cli::{commands, config, logging, CliArgs};
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    if let Err(err) = run(args).await {
        error!(target: "lamden", error = %err, "command failed");
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = config::load(&args)?;
    if let Err(err) = logging::init_tracing(&config.logger) {
        eprintln!("Warning: {:#}", err);
    }
    debug!(target: "lamden", network = %config.network.name, hosts = ?config.network.hosts, "configuration loaded");

    let output = commands::run(&args.command, &config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
