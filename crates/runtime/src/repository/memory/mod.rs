//! In-memory repository implementations for tests and local runs.

mod ratings;

pub use ratings::InMemoryRatingRepo;
