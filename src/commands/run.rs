//! `run`: the app wired to the stdio simulator

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::App;
use crate::bridge::simulator::spawn_input;
use crate::bridge::{HostBridge, SimulatorBridge};
use crate::config::Config;
use crate::error::Result;
use crate::services::{AppDataService, HttpFeedSource, RssConfigService, ShoppingConfigService};

const INPUT_BUFFER: usize = 64;

#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub storage: Option<PathBuf>,
    pub ephemeral: bool,
    pub rows_per_page: Option<usize>,
}

/// Effective configuration for a run: the loaded config with CLI overrides applied.
fn effective_config(mut config: Config, options: &RunOptions) -> Result<Config> {
    if let Some(rows) = options.rows_per_page {
        config.rows_per_page = rows;
    }
    if let Some(storage) = &options.storage {
        config.storage_file = Some(storage.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Run until stdin closes
pub async fn cmd_run(options: RunOptions) -> Result<()> {
    let config = effective_config(Config::load()?, &options)?;

    let simulator = SimulatorBridge::stdio();
    let simulator = if options.ephemeral {
        simulator
    } else {
        simulator.with_storage_file(config.storage_path())?
    };
    let bridge: Arc<dyn HostBridge> = Arc::new(simulator);

    let feeds = HttpFeedSource::new(config.feed_timeout())?;
    let data = Arc::new(AppDataService::new(
        RssConfigService::new(bridge.clone()),
        ShoppingConfigService::new(bridge.clone()),
        Arc::new(feeds),
    ));

    let storage = if options.ephemeral {
        "memory".to_string()
    } else {
        config.storage_path().display().to_string()
    };
    tracing::info!(
        rows_per_page = config.rows_per_page,
        autoscroll_ms = config.autoscroll_interval_ms,
        storage = %storage,
        "starting"
    );

    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    let reader = spawn_input(tokio::io::stdin(), tx);
    App::new(bridge, data, &config).run(rx).await;
    reader.abort();
    Ok(())
}
