//! Duel bot binary.
//!
//! Composition root that loads content and configuration, builds the runtime
//! and attaches a console chat platform to it.
//!
//! ```bash
//! DUEL_ADMINS=99 cargo run -p duel-bot
//! ```

mod config;
mod console;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use duel_content::{CardLoader, ConfigLoader, ContentFactory};
use duel_core::{CardCatalog, DuelConfig};
use runtime::{FileRatingRepository, Runtime, RuntimeConfig};

use crate::config::BotConfig;
use crate::console::ConsolePlatform;

/// Upper bound on waiting for running duels to release the runtime.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting duel bot");

    let (catalog, duel) = load_content(&config)?;
    tracing::info!("Loaded {} cards", catalog.len());

    let ratings = FileRatingRepository::new(&config.ratings_path).with_context(|| {
        format!("Failed to open rating store {}", config.ratings_path.display())
    })?;
    tracing::info!("Ratings: {}", ratings.path().display());

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            duel,
            command_prefix: config.command_prefix.clone(),
            ..RuntimeConfig::default()
        })
        .catalog(catalog)
        .platform(Arc::new(ConsolePlatform::new(config.admins.clone())))
        .ratings(Arc::new(ratings))
        .build()
        .await?;

    tokio::select! {
        result = console::run(runtime.handle(), config.guild) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }

    match tokio::time::timeout(SHUTDOWN_GRACE, runtime.shutdown()).await {
        Ok(result) => result?,
        Err(_) => tracing::warn!("Duels still running at shutdown; exiting anyway"),
    }

    tracing::info!("Duel bot stopped");
    Ok(())
}

/// Explicit file paths win over the data directory, which wins over the
/// bundled catalog and default rules.
fn load_content(config: &BotConfig) -> Result<(CardCatalog, DuelConfig)> {
    let factory = config.data_dir.as_ref().map(ContentFactory::new);
    if let Some(factory) = &factory {
        tracing::info!("Content directory: {}", factory.data_dir().display());
    }

    let catalog = match (&config.cards_path, &factory) {
        (Some(path), _) => CardLoader::load(path)?,
        (None, Some(factory)) => factory.load_catalog()?,
        (None, None) => CardLoader::builtin()?,
    };

    let duel = match (&config.config_path, &factory) {
        (Some(path), _) => ConfigLoader::load(path)?,
        (None, Some(factory)) => factory.load_config()?,
        (None, None) => DuelConfig::default(),
    };

    Ok((catalog, duel))
}
