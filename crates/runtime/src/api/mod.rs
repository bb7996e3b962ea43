//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on duel orchestration, workers, or
//! infrastructure.

pub mod errors;
pub mod handle;
pub mod message;
pub mod platform;
pub mod ratings;

pub use errors::{Rejection, Result, RuntimeError};
pub use handle::{CommandContext, ForfeitOutcome, RuntimeHandle};
pub use message::{ChannelMention, Embed, EmbedField, Mention, OutgoingMessage, Tone};
pub use platform::{ChannelId, ChatPlatform, GuildId, IncomingMessage, PlatformError};
pub use ratings::RatingHandle;
