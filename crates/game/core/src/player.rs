//! Players, seats, and the per-player state that lives for one duel.

use std::fmt;

use strum::Display;

use crate::card::{CardInstance, InstanceId};

/// Stable platform identifier for a player. Used as the rating key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a duel a player sits on. The challenger always acts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Seat {
    Challenger,
    Opponent,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::Challenger, Seat::Opponent];

    pub const fn other(self) -> Self {
        match self {
            Seat::Challenger => Seat::Opponent,
            Seat::Opponent => Seat::Challenger,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Seat::Challenger => 0,
            Seat::Opponent => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PlayerPhase {
    #[default]
    Planning,
    Summoning,
    Battling,
    Concluded,
}

/// One player's side of a duel.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerDuelState {
    pub phase: PlayerPhase,
    /// Active roster, in summoning order.
    pub limbo: Vec<CardInstance>,
    /// Tracked for display only; battle damage lands on cards.
    pub health: u32,
}

impl PlayerDuelState {
    pub fn new(starting_health: u32) -> Self {
        Self {
            phase: PlayerPhase::Planning,
            limbo: Vec::new(),
            health: starting_health,
        }
    }

    /// Cards that can still be shown and chosen.
    pub fn available(&self) -> impl Iterator<Item = &CardInstance> {
        self.limbo.iter().filter(|card| !card.is_depleted())
    }

    pub fn card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.limbo.iter().find(|card| card.id() == id)
    }

    /// Swaps in an updated copy of an instance, matched by identifier.
    /// Returns `false` when no card with that identifier is held.
    pub fn replace(&mut self, updated: CardInstance) -> bool {
        match self.limbo.iter_mut().find(|card| card.id() == updated.id()) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Removes every depleted card and returns them in roster order.
    pub fn prune_depleted(&mut self) -> Vec<CardInstance> {
        let (depleted, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.limbo)
            .into_iter()
            .partition(CardInstance::is_depleted);
        self.limbo = alive;
        depleted
    }

    pub fn is_out_of_cards(&self) -> bool {
        self.limbo.is_empty()
    }

    pub fn reset(&mut self) {
        self.limbo.clear();
        self.phase = PlayerPhase::Planning;
    }
}
