mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockroom_core::{Catalog, ProductClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the catalog
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "stockroom", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let (cfg, client_config) = config::resolve(&cli.global)?;
            config::apply_output_default(&mut cli.global, &cfg)?;
            let client = ProductClient::new(&client_config)?;
            let catalog = Catalog::new();

            tracing::debug!(command = ?cmd, base_url = %client_config.base_url, "dispatching command");
            let result = commands::dispatch(cmd, &catalog, &client, &cfg, &cli.global).await;
            catalog.close();
            result
        }
    }
}
