//! Runtime orchestration for chat-hosted card duels.
//!
//! This crate wires together the chat-platform abstraction, the duel
//! registry, per-duel tasks, the rating worker and its repositories into a
//! cohesive runtime API. Adapters embed [`Runtime`], push chat input through
//! [`RuntimeHandle::deliver`], and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`duel`] owns per-guild sessions and the task that plays a duel
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`commands`] parses prefixed chat lines
//! - [`repository`] persists ratings
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod commands;
pub mod duel;
pub mod events;
pub mod inbox;
pub mod repository;
pub mod runtime;

mod services;
mod workers;

pub use api::{
    ChannelId, ChannelMention, ChatPlatform, CommandContext, Embed, EmbedField, ForfeitOutcome,
    GuildId, IncomingMessage, Mention, OutgoingMessage, PlatformError, RatingHandle, Rejection,
    Result, RuntimeError, RuntimeHandle, Tone,
};
pub use commands::{Command, CommandKind};
pub use duel::{DuelPhase, DuelRegistry, SessionInfo};
pub use events::{DuelEvent, EndReason, Event, EventBus, RatingEvent, Topic};
pub use inbox::Inbox;
pub use repository::{FileRatingRepository, InMemoryRatingRepo, RatingRepository, RepositoryError};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
