//! Event types for different topics.

use duel_core::{CardInstance, Clash, DuelOutcome, PlayerId, RatingChange};
use serde::{Deserialize, Serialize};

use crate::api::{ChannelId, GuildId};

/// Why a duel task stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Game-over evaluation reached a draw or a victory.
    Concluded(DuelOutcome),
    Forfeited { loser: PlayerId },
    Stopped,
    /// A platform or repository failure aborted the duel.
    Failed,
}

/// Events describing a duel's lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DuelEvent {
    Started {
        guild: GuildId,
        channel: ChannelId,
        challenger: PlayerId,
        opponent: PlayerId,
    },

    CardSummoned {
        guild: GuildId,
        player: PlayerId,
        card: CardInstance,
    },

    /// Summoning for one player finished, possibly short of a full roster.
    RosterLocked {
        guild: GuildId,
        player: PlayerId,
        cards: usize,
    },

    ClashResolved {
        guild: GuildId,
        attacker: PlayerId,
        defender: PlayerId,
        clash: Clash,
    },

    CardsPruned {
        guild: GuildId,
        player: PlayerId,
        cards: Vec<CardInstance>,
    },

    Ended {
        guild: GuildId,
        channel: ChannelId,
        reason: EndReason,
    },

    /// The duel channel was deleted.
    ChannelClosed { guild: GuildId, channel: ChannelId },
}

/// Events related to the rating table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RatingEvent {
    Registered { player: PlayerId },
    Updated(RatingChange),
}
