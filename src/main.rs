use clap::Parser;
use std::process::ExitCode;

use glassdeck::cli::{Cli, Commands, ConfigAction};
use glassdeck::commands::{RunOptions, cmd_config_set, cmd_config_show, cmd_normalize, cmd_run};
use glassdeck::config::Config;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GLASSDECK_LOG";

/// Log to stderr; stdout belongs to the simulator protocol.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let configured = Config::load().ok().and_then(|config| config.log_filter);
        EnvFilter::try_new(configured.as_deref().unwrap_or("info"))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run {
            storage,
            ephemeral,
            rows_per_page,
        } => {
            cmd_run(RunOptions {
                storage,
                ephemeral,
                rows_per_page,
            })
            .await
        }
        Commands::Normalize { json } => cmd_normalize(json).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
