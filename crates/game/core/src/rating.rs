//! Elo-style skill ratings.
//!
//! # Update rule
//!
//! ```text
//! diff = R_loser - R_winner
//! K    = 32 if diff <= 0, 24 if diff <= 100, else 16
//! E    = 1 / (1 + 10^(diff / 400))
//! R_winner' = R_winner + K * (1 - E)
//! R_loser'  = R_loser  - K * E
//! ```
//!
//! Unseen players start at [`INITIAL_RATING`].

use std::collections::BTreeMap;
use std::fmt;

use crate::player::PlayerId;

pub const INITIAL_RATING: f64 = 100.0;

/// K-factor for a rating gap of `diff = R_loser - R_winner`.
pub fn k_factor(diff: f64) -> f64 {
    if diff <= 0.0 {
        32.0
    } else if diff <= 100.0 {
        24.0
    } else {
        16.0
    }
}

/// Winner's expected score for a rating gap of `diff = R_loser - R_winner`.
pub fn expected_score(diff: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(diff / 400.0))
}

/// Before/after ratings for one decided duel.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingChange {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winner_before: f64,
    pub winner_after: f64,
    pub loser_before: f64,
    pub loser_after: f64,
}

/// A player's place on the ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Standing {
    pub player: PlayerId,
    pub rating: f64,
    /// 1-indexed position, highest rating first.
    pub rank: usize,
    pub ranked_players: usize,
}

/// Ratings keyed by player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingTable {
    ratings: BTreeMap<PlayerId, f64>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: PlayerId) -> Option<f64> {
        self.ratings.get(&player).copied()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.ratings.contains_key(&player)
    }

    pub fn set(&mut self, player: PlayerId, rating: f64) {
        self.ratings.insert(player, rating);
    }

    /// Gives `player` the initial rating if they have none.
    /// Returns `true` when a record was created.
    pub fn ensure(&mut self, player: PlayerId) -> bool {
        if self.contains(player) {
            return false;
        }
        self.ratings.insert(player, INITIAL_RATING);
        true
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, f64)> + '_ {
        self.ratings.iter().map(|(&player, &rating)| (player, rating))
    }

    /// Applies one win/loss result and returns the transition.
    pub fn record_win(&mut self, winner: PlayerId, loser: PlayerId) -> RatingChange {
        let winner_before = self.get(winner).unwrap_or(INITIAL_RATING);
        let loser_before = self.get(loser).unwrap_or(INITIAL_RATING);

        let diff = loser_before - winner_before;
        let k = k_factor(diff);
        let expected = expected_score(diff);

        let winner_after = winner_before + k * (1.0 - expected);
        let loser_after = loser_before - k * expected;

        self.set(winner, winner_after);
        self.set(loser, loser_after);

        RatingChange {
            winner,
            loser,
            winner_before,
            winner_after,
            loser_before,
            loser_after,
        }
    }

    /// Every rated player, highest first. Equal ratings order by ascending id.
    pub fn leaderboard(&self) -> Vec<(PlayerId, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    pub fn standing(&self, player: PlayerId) -> Option<Standing> {
        let leaderboard = self.leaderboard();
        let position = leaderboard.iter().position(|(id, _)| *id == player)?;
        Some(Standing {
            player,
            rating: leaderboard[position].1,
            rank: position + 1,
            ranked_players: leaderboard.len(),
        })
    }
}

impl FromIterator<(PlayerId, f64)> for RatingTable {
    fn from_iter<I: IntoIterator<Item = (PlayerId, f64)>>(iter: I) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

/// English ordinal rendering: 1st, 2nd, 3rd, 4th, 11th, 21st.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ordinal(pub usize);

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        let suffix = if (10..=20).contains(&(n % 100)) {
            "th"
        } else {
            match n % 10 {
                1 => "st",
                2 => "nd",
                3 => "rd",
                _ => "th",
            }
        };
        write!(f, "{n}{suffix}")
    }
}
