//! Duel sessions and the task that plays each one out.
//!
//! [`DuelRegistry`] tracks one session per guild. A spawned [`DuelTask`]
//! drives summoning, the battle loop, and the conclusion for its session,
//! reading chat input through its own inbox.

mod battle;
mod session;
mod summoning;
mod task;
mod waiter;

pub use session::{DuelPhase, DuelRegistry, SessionInfo};
pub(crate) use task::DuelTask;
