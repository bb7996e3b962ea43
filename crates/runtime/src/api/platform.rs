//! Contract for the chat platform that hosts duels.
//!
//! The runtime never talks to a chat service directly. Adapters implement
//! [`ChatPlatform`] for outbound effects (posting, channel management,
//! permission checks) and push inbound chat lines into
//! [`RuntimeHandle::deliver`](crate::RuntimeHandle::deliver).
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use duel_core::PlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::message::OutgoingMessage;

/// Server (community) that owns channels and at most one active duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GuildId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat line as received from the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub author: PlayerId,
    pub content: String,
}

impl IncomingMessage {
    pub fn new(
        guild: GuildId,
        channel: ChannelId,
        author: PlayerId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            guild,
            channel,
            author,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("channel {0} does not exist")]
    UnknownChannel(ChannelId),

    #[error("missing permission: {0}")]
    PermissionDenied(String),

    #[error("platform request failed: {0}")]
    Request(String),
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Post a message to a channel.
    async fn send(&self, channel: ChannelId, message: OutgoingMessage)
    -> Result<(), PlatformError>;

    /// Create a channel in `guild` that only `participants` can read.
    async fn create_duel_channel(
        &self,
        guild: GuildId,
        participants: [PlayerId; 2],
    ) -> Result<ChannelId, PlatformError>;

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), PlatformError>;

    async fn is_administrator(
        &self,
        guild: GuildId,
        player: PlayerId,
    ) -> Result<bool, PlatformError>;

    /// Human-readable name used in embed titles.
    async fn display_name(&self, _guild: GuildId, player: PlayerId) -> String {
        format!("Player {player}")
    }

    /// Round-trip latency to the platform, reported by `ping`.
    fn latency(&self) -> Duration {
        Duration::ZERO
    }
}
