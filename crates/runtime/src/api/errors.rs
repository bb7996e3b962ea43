//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and the chat
//! platform so clients can bubble them up with consistent context. Requests
//! that the runtime turns down on purpose are reported as [`Rejection`]s.
use thiserror::Error;
use tokio::sync::oneshot;

pub use super::platform::PlatformError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// A request refused by duel rules. The text is what the requester sees.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("No active duel found for this guild.")]
    NoActiveDuel,

    #[error("No active duel room found.")]
    NoActiveDuelRoom,

    #[error("You are not a participant in this duel.")]
    NotParticipant,

    #[error("You need to have the administrator role to use this command.")]
    NotAdministrator,

    #[error("A duel is already in progress in this server.")]
    DuelInProgress,

    #[error("You can't challenge yourself to a duel.")]
    SelfChallenge,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("runtime requires a chat platform to be configured before building")]
    MissingPlatform,

    #[error("runtime requires a card catalog to be configured before building")]
    MissingCatalog,

    #[error("message inbox closed")]
    InboxClosed,

    #[error("rating worker command channel closed")]
    CommandChannelClosed,

    #[error("rating worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("rating worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RuntimeError {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            RuntimeError::Rejected(rejection) => Some(*rejection),
            _ => None,
        }
    }
}
