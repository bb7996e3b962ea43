//! Runtime assembly and lifecycle.
//!
//! The runtime owns the rating worker, wires up the message and event
//! channels, and exposes a builder-based API for adapters to feed chat input.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use duel_core::{CardCatalog, DuelConfig, InstanceIdGenerator};

use crate::api::{ChatPlatform, IncomingMessage, RatingHandle, Result, RuntimeError, RuntimeHandle};
use crate::duel::DuelRegistry;
use crate::events::{Event, EventBus, Topic};
use crate::repository::{InMemoryRatingRepo, RatingRepository};
use crate::services::Services;
use crate::workers::{Command, RatingWorker};

/// Knobs shared by command handlers and duel tasks.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub duel: DuelConfig,
    /// Marks a chat line as a command, e.g. `!duel`.
    pub command_prefix: String,
    /// Inbound chat lines buffered per waiting duel or prompt.
    pub message_buffer_size: usize,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            duel: DuelConfig::default(),
            command_prefix: "!".to_string(),
            message_buffer_size: 256,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that hosts duels for any number of guilds
///
/// Runtime owns the rating worker. [`RuntimeHandle`] provides a cloneable
/// façade for adapters and tests.
pub struct Runtime {
    handle: RuntimeHandle,
    rating_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Handle for adapters; clone it freely.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shorthand for [`RuntimeHandle::deliver`].
    pub fn deliver(&self, message: IncomingMessage) -> Option<JoinHandle<()>> {
        self.handle.deliver(message)
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Wait for the rating worker to finish its queue.
    ///
    /// The rating worker drains once every handle clone, including those held
    /// by running duels, has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.rating_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Collects the platform, catalog and rating store a [`Runtime`] needs.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<CardCatalog>,
    platform: Option<Arc<dyn ChatPlatform>>,
    ratings: Option<Arc<dyn RatingRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            platform: None,
            ratings: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the duel rules
    pub fn duel_config(mut self, duel: DuelConfig) -> Self {
        self.config.duel = duel;
        self
    }

    /// Set required card catalog
    pub fn catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set required chat platform
    pub fn platform(mut self, platform: Arc<dyn ChatPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the rating store (defaults to in-memory)
    pub fn ratings(mut self, repository: Arc<dyn RatingRepository>) -> Self {
        self.ratings = Some(repository);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let platform = self.platform.ok_or(RuntimeError::MissingPlatform)?;
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let repository = self
            .ratings
            .unwrap_or_else(|| Arc::new(InMemoryRatingRepo::new()));

        let table = repository.load()?;
        info!(
            "Runtime starting with {} cards and {} rated players",
            catalog.len(),
            table.len()
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (message_tx, _message_rx) =
            broadcast::channel::<IncomingMessage>(self.config.message_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let rating_worker = RatingWorker::new(table, repository, command_rx, event_bus.clone());
        let rating_worker_handle = tokio::spawn(async move {
            rating_worker.run().await;
        });

        let services = Arc::new(Services {
            platform,
            catalog: Arc::new(catalog),
            config: self.config,
            ids: InstanceIdGenerator::new(),
            ratings: RatingHandle::new(command_tx),
            registry: DuelRegistry::new(),
            events: event_bus,
        });

        Ok(Runtime {
            handle: RuntimeHandle::new(services, message_tx),
            rating_worker_handle,
        })
    }
}
