//! In-memory RatingRepository implementation for tests and local runs.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use duel_core::RatingTable;

use crate::repository::{RatingRepository, RepositoryError, Result};

/// In-memory implementation of RatingRepository.
///
/// Counts saves so tests can observe write-through behaviour.
#[derive(Default)]
pub struct InMemoryRatingRepo {
    table: RwLock<RatingTable>,
    saves: AtomicUsize,
}

impl InMemoryRatingRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-existing ratings.
    pub fn with_table(table: RatingTable) -> Self {
        Self {
            table: RwLock::new(table),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the last saved table.
    pub fn snapshot(&self) -> Result<RatingTable> {
        self.load()
    }
}

impl RatingRepository for InMemoryRatingRepo {
    fn load(&self) -> Result<RatingTable> {
        let table = self
            .table
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(table.clone())
    }

    fn save(&self, table: &RatingTable) -> Result<()> {
        let mut stored = self
            .table
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = table.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
