//! Roster building during the summoning phase.

use thiserror::Error;

use crate::card::{CardCatalog, CardInstance, InstanceIdGenerator};

/// Why a summon request was turned down. The roster is untouched in every case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummonError {
    #[error("you don't have {0} in your collection")]
    UnknownCard(String),

    #[error("you can't choose the same card more than once")]
    Duplicate(String),

    #[error("you can't have more than {limit} cards in your deck")]
    RosterFull { limit: usize },
}

/// Cards one player has summoned so far.
#[derive(Clone, Debug)]
pub struct Roster {
    cards: Vec<CardInstance>,
    limit: usize,
}

impl Roster {
    pub fn new(limit: usize) -> Self {
        Self {
            cards: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Validates `request` against the catalog and the roster, then appends a
    /// fresh full-health instance.
    ///
    /// Checks run in order: catalog membership, duplicate name, roster limit.
    pub fn try_summon(
        &mut self,
        catalog: &CardCatalog,
        request: &str,
        ids: &InstanceIdGenerator,
    ) -> Result<&CardInstance, SummonError> {
        let definition = catalog
            .lookup(request)
            .ok_or_else(|| SummonError::UnknownCard(request.trim().to_string()))?;

        if self
            .cards
            .iter()
            .any(|card| card.definition().key() == definition.key())
        {
            return Err(SummonError::Duplicate(definition.name.clone()));
        }

        if self.cards.len() >= self.limit {
            return Err(SummonError::RosterFull { limit: self.limit });
        }

        self.cards.push(CardInstance::summon(definition, ids.next_id()));
        Ok(&self.cards[self.cards.len() - 1])
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    pub fn into_limbo(self) -> Vec<CardInstance> {
        self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardDefinition;

    fn catalog() -> CardCatalog {
        CardCatalog::new([
            CardDefinition::new("Knight", 4, 9),
            CardDefinition::new("Archer", 5, 5),
            CardDefinition::new("Cleric", 1, 7),
            CardDefinition::new("Ogre", 6, 12),
        ])
        .unwrap()
    }

    #[test]
    fn summons_until_the_limit() {
        let (catalog, ids) = (catalog(), InstanceIdGenerator::new());
        let mut roster = Roster::new(3);

        for name in ["knight", "ARCHER", "Cleric"] {
            roster.try_summon(&catalog, name, &ids).unwrap();
        }

        assert!(roster.is_complete());
        assert_eq!(
            roster.try_summon(&catalog, "ogre", &ids).unwrap_err(),
            SummonError::RosterFull { limit: 3 }
        );
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn rejects_same_card_twice() {
        let (catalog, ids) = (catalog(), InstanceIdGenerator::new());
        let mut roster = Roster::new(3);
        roster.try_summon(&catalog, "Knight", &ids).unwrap();

        let err = roster.try_summon(&catalog, "kNiGhT", &ids).unwrap_err();

        assert_eq!(err, SummonError::Duplicate("Knight".into()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn unknown_cards_never_touch_the_roster() {
        let (catalog, ids) = (catalog(), InstanceIdGenerator::new());
        let mut roster = Roster::new(3);

        for _ in 0..10 {
            let err = roster.try_summon(&catalog, "Dragon", &ids).unwrap_err();
            assert_eq!(err, SummonError::UnknownCard("Dragon".into()));
        }

        assert!(roster.is_empty());
    }

    #[test]
    fn each_summon_gets_a_fresh_identity_at_full_health() {
        let (catalog, ids) = (catalog(), InstanceIdGenerator::new());
        let mut roster = Roster::new(3);
        let first = roster.try_summon(&catalog, "Ogre", &ids).unwrap().clone();
        let second = roster.try_summon(&catalog, "Cleric", &ids).unwrap().clone();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.health, 12);
        assert_eq!(second.health, 7);
    }
}
