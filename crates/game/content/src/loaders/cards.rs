//! Card catalog loader.

use std::path::Path;

use duel_core::{CardCatalog, CardDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const BUILTIN_CARDS: &str = include_str!("../../data/cards.json");

/// Card catalog structure for data files.
///
/// JSON catalogs may be a bare array (the legacy `cards.json` layout) or an
/// object with a `cards` list. RON catalogs use `(cards: [...])`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardCatalogFile {
    Bare(Vec<CardDefinition>),
    Wrapped { cards: Vec<CardDefinition> },
}

impl CardCatalogFile {
    fn into_cards(self) -> Vec<CardDefinition> {
        match self {
            CardCatalogFile::Bare(cards) | CardCatalogFile::Wrapped { cards } => cards,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RonCatalog {
    cards: Vec<CardDefinition>,
}

/// Loader for card catalogs.
pub struct CardLoader;

impl CardLoader {
    /// Load a catalog, choosing RON for `.ron` files and JSON otherwise.
    pub fn load(path: &Path) -> LoadResult<CardCatalog> {
        let content = read_file(path)?;
        let is_ron = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));

        if is_ron {
            Self::parse_ron(&content)
        } else {
            Self::parse_json(&content)
        }
    }

    pub fn parse_json(content: &str) -> LoadResult<CardCatalog> {
        let file: CardCatalogFile = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog JSON: {}", e))?;
        Self::build(file.into_cards())
    }

    pub fn parse_ron(content: &str) -> LoadResult<CardCatalog> {
        let file: RonCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;
        Self::build(file.cards)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> LoadResult<CardCatalog> {
        Self::parse_json(BUILTIN_CARDS)
    }

    fn build(cards: Vec<CardDefinition>) -> LoadResult<CardCatalog> {
        CardCatalog::new(cards).map_err(|e| anyhow::anyhow!("Invalid card catalog: {}", e))
    }
}
