//! Content factory for loading duel content from a data directory.

use std::path::{Path, PathBuf};

use duel_core::{CardCatalog, DuelConfig};

use crate::loaders::{CardLoader, ConfigLoader, LoadResult};

/// Content factory that loads all duel content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml          (optional)
/// └── cards.json | cards.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load duel configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<DuelConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(DuelConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the card catalog from `cards.json`, falling back to `cards.ron`.
    pub fn load_catalog(&self) -> LoadResult<CardCatalog> {
        let json = self.data_dir.join("cards.json");
        if json.exists() {
            return CardLoader::load(&json);
        }
        CardLoader::load(&self.data_dir.join("cards.ron"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
