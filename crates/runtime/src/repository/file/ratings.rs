//! File-based RatingRepository implementation.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use duel_core::{PlayerId, RatingTable};

use crate::repository::{RatingRepository, RepositoryError, Result};

/// Stores the rating table as a single JSON object.
///
/// # File Format
///
/// Keys are player ids as decimal strings, values are ratings:
///
/// ```json
/// {"386162509943668758": 116.0, "1040675149348884530": 84.0}
/// ```
pub struct FileRatingRepository {
    path: PathBuf,
}

impl FileRatingRepository {
    /// Create a repository backed by `path`, creating parent directories.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RatingRepository for FileRatingRepository {
    fn load(&self) -> Result<RatingTable> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No rating store at {}, starting empty", self.path.display());
                return Ok(RatingTable::new());
            }
            Err(e) => return Err(RepositoryError::Io(e)),
        };

        let raw: BTreeMap<String, f64> = match serde_json::from_slice(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "Rating store {} is corrupt ({}), starting empty",
                    self.path.display(),
                    e
                );
                return Ok(RatingTable::new());
            }
        };

        let table: RatingTable = raw
            .into_iter()
            .filter_map(|(key, rating)| match key.parse::<u64>() {
                Ok(id) => Some((PlayerId(id), rating)),
                Err(_) => {
                    tracing::warn!("Skipping rating entry with invalid player id {:?}", key);
                    None
                }
            })
            .collect();

        tracing::debug!("Loaded {} ratings from {}", table.len(), self.path.display());

        Ok(table)
    }

    fn save(&self, table: &RatingTable) -> Result<()> {
        let raw: BTreeMap<String, f64> = table
            .iter()
            .map(|(player, rating)| (player.0.to_string(), rating))
            .collect();

        let bytes =
            serde_json::to_vec_pretty(&raw).map_err(|e| RepositoryError::Json(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");

        // Write to temp file
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved {} ratings to {}", table.len(), self.path.display());

        Ok(())
    }
}
