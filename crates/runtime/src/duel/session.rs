//! Per-guild duel sessions.
//!
//! A guild hosts at most one duel at a time. Each session carries its own
//! phase channel, so stopping or forfeiting a duel in one guild never touches
//! another guild's duel.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use duel_core::{PlayerId, Seat};
use tokio::sync::watch;

use crate::api::{ChannelId, GuildId, Rejection};

/// Shared phase of one duel session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuelPhase {
    Planning,
    Summoning,
    Battling,
    Concluded,
    Forfeited,
    Stopped,
}

impl DuelPhase {
    /// Once terminal, the duel task must stop at its next checkpoint.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DuelPhase::Concluded | DuelPhase::Forfeited | DuelPhase::Stopped
        )
    }
}

/// Who is dueling where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub challenger: PlayerId,
    pub opponent: PlayerId,
}

impl SessionInfo {
    pub fn player(&self, seat: Seat) -> PlayerId {
        match seat {
            Seat::Challenger => self.challenger,
            Seat::Opponent => self.opponent,
        }
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        Seat::BOTH.into_iter().find(|&seat| self.player(seat) == player)
    }

    pub fn participants(&self) -> [PlayerId; 2] {
        [self.challenger, self.opponent]
    }
}

struct SessionEntry {
    info: SessionInfo,
    phase: watch::Sender<DuelPhase>,
}

/// Active sessions keyed by guild.
///
/// Removing an entry is how a duel ends; whoever removes it (the duel task on
/// game over, a forfeit, or a force stop) owns the teardown.
#[derive(Clone, Default)]
pub struct DuelRegistry {
    sessions: Arc<Mutex<HashMap<GuildId, SessionEntry>>>,
}

impl DuelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GuildId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new session and hands back its phase receiver.
    pub fn open(&self, info: SessionInfo) -> Result<watch::Receiver<DuelPhase>, Rejection> {
        match self.lock().entry(info.guild) {
            Entry::Occupied(_) => Err(Rejection::DuelInProgress),
            Entry::Vacant(slot) => {
                let (phase, rx) = watch::channel(DuelPhase::Planning);
                slot.insert(SessionEntry { info, phase });
                Ok(rx)
            }
        }
    }

    pub fn get(&self, guild: GuildId) -> Option<SessionInfo> {
        self.lock().get(&guild).map(|entry| entry.info)
    }

    pub fn is_active(&self, guild: GuildId) -> bool {
        self.lock().contains_key(&guild)
    }

    pub fn phase(&self, guild: GuildId) -> Option<DuelPhase> {
        self.lock().get(&guild).map(|entry| *entry.phase.borrow())
    }

    /// Advances the phase of the session living in `channel`.
    pub fn set_phase(&self, guild: GuildId, channel: ChannelId, phase: DuelPhase) -> bool {
        match self.lock().get(&guild) {
            Some(entry) if entry.info.channel == channel => {
                entry.phase.send_replace(phase);
                true
            }
            _ => false,
        }
    }

    /// Ends the guild's session from outside the duel task.
    ///
    /// The running task observes `phase` at its next wait or checkpoint.
    pub fn end(&self, guild: GuildId, phase: DuelPhase) -> Option<SessionInfo> {
        let entry = self.lock().remove(&guild)?;
        entry.phase.send_replace(phase);
        Some(entry.info)
    }

    /// Ends the session only if it is still the one living in `channel`.
    ///
    /// Returns `None` when another path ended it first or a newer duel has
    /// taken the guild since.
    pub fn end_in(
        &self,
        guild: GuildId,
        channel: ChannelId,
        phase: DuelPhase,
    ) -> Option<SessionInfo> {
        let mut sessions = self.lock();
        let owned = sessions
            .get(&guild)
            .is_some_and(|entry| entry.info.channel == channel);
        if !owned {
            return None;
        }

        let entry = sessions.remove(&guild)?;
        entry.phase.send_replace(phase);
        Some(entry.info)
    }

    /// Ends the session from inside the duel task.
    ///
    /// Returns `false` when a forfeit or force stop got there first, in which
    /// case the caller must not announce a result or touch ratings.
    pub fn conclude(&self, guild: GuildId, channel: ChannelId) -> bool {
        self.end_in(guild, channel, DuelPhase::Concluded).is_some()
    }
}
