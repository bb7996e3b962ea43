//! Worker tasks that back the runtime orchestration.
//!
//! The rating worker owns the rating table so that every update is applied
//! and persisted one at a time, whichever duel produced it.

mod rating;

pub use rating::{Command, RatingWorker};
