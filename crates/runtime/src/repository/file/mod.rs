//! File-based repository implementations.

mod ratings;

pub use ratings::FileRatingRepository;
