//! Data-driven duel content and loaders.
//!
//! This crate houses static duel content and provides loaders for data files:
//! - Card catalogs (JSON in the legacy `cards.json` layout, or RON)
//! - Duel rules and timings (TOML)
//!
//! Content is read once at startup and never mutated during play.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CardLoader, ConfigLoader, ContentFactory};
