//! Post-exchange game-over evaluation.

use crate::card::CardInstance;
use crate::player::{PlayerDuelState, Seat};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuelOutcome {
    Ongoing,
    Draw,
    Victory { winner: Seat },
}

impl DuelOutcome {
    pub fn is_concluded(self) -> bool {
        !matches!(self, DuelOutcome::Ongoing)
    }

    pub fn winner(self) -> Option<Seat> {
        match self {
            DuelOutcome::Victory { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn loser(self) -> Option<Seat> {
        self.winner().map(Seat::other)
    }
}

/// What [`evaluate`] removed and decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: DuelOutcome,
    /// Depleted cards removed from each seat, indexed by [`Seat::index`].
    pub pruned: [Vec<CardInstance>; 2],
}

impl Evaluation {
    pub fn pruned_for(&self, seat: Seat) -> &[CardInstance] {
        &self.pruned[seat.index()]
    }
}

/// Prunes depleted cards from both sides and decides whether the duel is over.
///
/// Both sides empty is a draw; one side empty loses to the other.
pub fn evaluate(challenger: &mut PlayerDuelState, opponent: &mut PlayerDuelState) -> Evaluation {
    let pruned = [challenger.prune_depleted(), opponent.prune_depleted()];

    let outcome = match (challenger.is_out_of_cards(), opponent.is_out_of_cards()) {
        (true, true) => DuelOutcome::Draw,
        (true, false) => DuelOutcome::Victory {
            winner: Seat::Opponent,
        },
        (false, true) => DuelOutcome::Victory {
            winner: Seat::Challenger,
        },
        (false, false) => DuelOutcome::Ongoing,
    };

    Evaluation { outcome, pruned }
}
