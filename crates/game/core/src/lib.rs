//! Deterministic duel rules shared by the runtime and content tooling.
//!
//! `duel-core` defines the canonical card-duel rules: the card catalog, card
//! instances, per-player duel state, roster summoning, simultaneous clash
//! resolution, game-over evaluation, and the Elo-style rating engine. Every
//! API here is synchronous and free of I/O; the runtime crate drives them
//! from chat input.
pub mod battle;
pub mod card;
pub mod config;
pub mod outcome;
pub mod player;
pub mod rating;
pub mod summon;

pub use battle::{CardMatching, Clash, RoundTracker, resolve_clash};
pub use card::{CardCatalog, CardDefinition, CardInstance, CatalogError, InstanceId, InstanceIdGenerator};
pub use config::DuelConfig;
pub use outcome::{DuelOutcome, Evaluation, evaluate};
pub use player::{PlayerDuelState, PlayerId, PlayerPhase, Seat};
pub use rating::{
    INITIAL_RATING, Ordinal, RatingChange, RatingTable, Standing, expected_score, k_factor,
};
pub use summon::{Roster, SummonError};
