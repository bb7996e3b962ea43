//! Shared collaborators reachable from every command and duel task.

use std::sync::Arc;

use duel_core::{CardCatalog, InstanceIdGenerator};

use crate::api::{ChannelId, ChatPlatform, OutgoingMessage, RatingHandle, Result};
use crate::duel::DuelRegistry;
use crate::events::EventBus;
use crate::runtime::RuntimeConfig;

pub(crate) struct Services {
    pub platform: Arc<dyn ChatPlatform>,
    pub catalog: Arc<CardCatalog>,
    pub config: RuntimeConfig,
    pub ids: InstanceIdGenerator,
    pub ratings: RatingHandle,
    pub registry: DuelRegistry,
    pub events: EventBus,
}

impl Services {
    /// Post to `channel`, surfacing platform failures as runtime errors.
    pub async fn say(&self, channel: ChannelId, message: impl Into<OutgoingMessage>) -> Result<()> {
        self.platform.send(channel, message.into()).await?;
        Ok(())
    }
}
