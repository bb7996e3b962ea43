//! Repository contracts for loading and saving ratings.

use duel_core::RatingTable;

use super::error::Result;

/// Persistent store for the rating table.
///
/// The runtime loads the table once at startup and saves the whole table
/// after every change. Implementations treat a missing or unreadable-as-JSON
/// store as an empty table rather than an error.
pub trait RatingRepository: Send + Sync {
    /// Load every known rating.
    fn load(&self) -> Result<RatingTable>;

    /// Replace the stored ratings with `table`.
    fn save(&self, table: &RatingTable) -> Result<()>;
}
