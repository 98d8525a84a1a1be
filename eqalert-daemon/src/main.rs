use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;

use eqalert_daemon::cli::{Commands, DaemonCli, RunArgs};
use eqalert_daemon::orchestrator::{self, Daemon};
use eqalert_daemon::output::OutputWriter;
use eqalert_daemon::{commands, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let mut config = orchestrator::load_config(cli.config.as_deref()).await?;
    orchestrator::apply_cli_overrides(&mut config, cli.log_level, cli.log_format)?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;

    let writer = OutputWriter::new(cli.output);
    match cli.command.unwrap_or_default() {
        Commands::Run(args) => run(config, args).await,
        Commands::Classify(args) => commands::classify(args, &writer),
        Commands::Categories(args) => commands::categories(args, &writer),
    }
}

async fn run(config: eqalert_core::config::EqAlertConfig, args: RunArgs) -> Result<()> {
    tracing::info!("eqalert-daemon starting");
    let daemon = Daemon::build_from_config(config)?;
    let stdout = tokio::io::stdout();

    match args.input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))?;
            daemon.run(BufReader::new(file), stdout).await?;
        }
        None => {
            daemon.run(BufReader::new(tokio::io::stdin()), stdout).await?;
        }
    }

    tracing::info!("eqalert-daemon shut down");
    Ok(())
}
