//! Card selection and damage resolution for battle rounds.

use std::collections::HashSet;

use crate::card::{CardInstance, InstanceId};

/// How a chat message is matched against card names when choosing a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CardMatching {
    /// The card name appears anywhere in the message (case-insensitive).
    #[default]
    Substring,
    /// The trimmed message is exactly the card name (case-insensitive).
    Exact,
}

impl CardMatching {
    pub fn matches(self, card_name: &str, message: &str) -> bool {
        let card_name = card_name.to_lowercase();
        let message = message.to_lowercase();
        match self {
            CardMatching::Substring => message.contains(&card_name),
            CardMatching::Exact => message.trim() == card_name,
        }
    }
}

/// Instances already committed during the current round.
///
/// One tracker spans both sub-rounds and both the attack and defence choices,
/// so a card that fought once this round cannot be picked again until the
/// next round begins.
#[derive(Clone, Debug, Default)]
pub struct RoundTracker {
    used: HashSet<InstanceId>,
}

impl RoundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, id: InstanceId) {
        self.used.insert(id);
    }

    pub fn is_used(&self, id: InstanceId) -> bool {
        self.used.contains(&id)
    }

    /// Living, unused cards from `limbo`, in roster order.
    pub fn eligible<'a>(
        &'a self,
        limbo: &'a [CardInstance],
    ) -> impl Iterator<Item = &'a CardInstance> + 'a {
        limbo
            .iter()
            .filter(move |card| !card.is_depleted() && !self.is_used(card.id()))
    }

    pub fn has_eligible(&self, limbo: &[CardInstance]) -> bool {
        self.eligible(limbo).next().is_some()
    }

    /// Resolves a message to the first eligible instance it names.
    pub fn select(
        &self,
        limbo: &[CardInstance],
        message: &str,
        matching: CardMatching,
    ) -> Option<InstanceId> {
        self.eligible(limbo)
            .find(|card| matching.matches(card.name(), message))
            .map(CardInstance::id)
    }
}

/// Result of one attacker/defender exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clash {
    pub attacker: CardInstance,
    pub defender: CardInstance,
    pub damage_to_attacker: u32,
    pub damage_to_defender: u32,
}

/// Resolves simultaneous damage between two cards.
///
/// Both damage values come from the attack stats of the untouched inputs, so
/// neither side's result depends on which update is applied first.
pub fn resolve_clash(attacker: &CardInstance, defender: &CardInstance) -> Clash {
    let damage_to_defender = attacker.attack();
    let damage_to_attacker = defender.attack();

    Clash {
        attacker: attacker.damaged(damage_to_attacker),
        defender: defender.damaged(damage_to_defender),
        damage_to_attacker,
        damage_to_defender,
    }
}
