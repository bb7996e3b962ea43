//! Card definitions, the read-only catalog, and in-play card instances.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Immutable catalog entry. The name is the identity and is matched
/// case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub name: String,
    pub attack: u32,
    pub health: u32,
    /// Ability labels in display order. Legacy catalogs call this `ability`.
    #[cfg_attr(feature = "serde", serde(default, alias = "ability"))]
    pub abilities: Vec<String>,
}

impl CardDefinition {
    pub fn new(name: impl Into<String>, attack: u32, health: u32) -> Self {
        Self {
            name: name.into(),
            attack,
            health,
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.abilities.push(ability.into());
        self
    }

    /// Catalog key for this card.
    pub fn key(&self) -> String {
        normalize(&self.name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("card name must not be empty")]
    EmptyName,

    #[error("card {0:?} is defined more than once")]
    DuplicateCard(String),
}

/// Read-only collection of card definitions, loaded once at startup.
///
/// Iteration preserves load order so the card list can be displayed the way
/// the content author wrote it.
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<CardDefinition>,
    index: HashMap<String, usize>,
}

impl CardCatalog {
    /// Builds a catalog, rejecting empty or duplicate (case-insensitive) names.
    pub fn new(cards: impl IntoIterator<Item = CardDefinition>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for card in cards {
            let key = card.key();
            if key.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if catalog.index.contains_key(&key) {
                return Err(CatalogError::DuplicateCard(card.name));
            }
            catalog.index.insert(key, catalog.cards.len());
            catalog.cards.push(card);
        }
        Ok(catalog)
    }

    /// Case-insensitive exact lookup on the full card name.
    pub fn lookup(&self, name: &str) -> Option<&CardDefinition> {
        self.index.get(&normalize(name)).map(|&slot| &self.cards[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Identifier assigned to a card instance when it is summoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of [`InstanceId`]s, safe to share across duels.
#[derive(Debug)]
pub struct InstanceIdGenerator {
    next: AtomicU64,
}

impl InstanceIdGenerator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> InstanceId {
        InstanceId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for InstanceIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A card in play: a copy of its definition plus an identity and a health
/// counter. Only `health` ever changes after summoning.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardInstance {
    id: InstanceId,
    definition: CardDefinition,
    pub health: u32,
}

impl CardInstance {
    /// Creates an instance at full health.
    pub fn summon(definition: &CardDefinition, id: InstanceId) -> Self {
        Self {
            id,
            health: definition.health,
            definition: definition.clone(),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn definition(&self) -> &CardDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn attack(&self) -> u32 {
        self.definition.attack
    }

    pub fn is_depleted(&self) -> bool {
        self.health == 0
    }

    /// Returns a copy of this instance after taking `amount` damage.
    #[must_use]
    pub fn damaged(&self, amount: u32) -> Self {
        Self {
            health: self.health.saturating_sub(amount),
            ..self.clone()
        }
    }
}
