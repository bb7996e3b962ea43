//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during play and outlives a process:
//! currently the rating table.
//!
//! Static duel content (the card catalog) is loaded once by `duel-content`
//! and never goes through a repository.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileRatingRepository;
pub use memory::InMemoryRatingRepo;
pub use traits::RatingRepository;
