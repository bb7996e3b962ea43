use std::time::Duration;

use crate::battle::CardMatching;

/// Duel rules and timing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DuelConfig {
    /// Cards each player summons.
    pub roster_size: usize,
    pub starting_health: u32,
    /// Idle time allowed between summon messages.
    pub summon_timeout_secs: u64,
    /// Time allowed to pick an attacking or defending card.
    pub choice_timeout_secs: u64,
    /// Time allowed to confirm a forfeit.
    pub forfeit_timeout_secs: u64,
    /// Pause before the duel channel is deleted after a normal finish.
    pub teardown_delay_secs: u64,
    /// Pause before the duel channel is deleted after a forfeit.
    pub forfeit_teardown_delay_secs: u64,
    pub card_matching: CardMatching,
}

impl DuelConfig {
    pub const DEFAULT_ROSTER_SIZE: usize = 3;
    pub const DEFAULT_STARTING_HEALTH: u32 = 20;
    pub const DEFAULT_SUMMON_TIMEOUT_SECS: u64 = 120;
    pub const DEFAULT_CHOICE_TIMEOUT_SECS: u64 = 120;
    pub const DEFAULT_FORFEIT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_TEARDOWN_DELAY_SECS: u64 = 6;
    pub const DEFAULT_FORFEIT_TEARDOWN_DELAY_SECS: u64 = 15;

    pub fn new() -> Self {
        Self {
            roster_size: Self::DEFAULT_ROSTER_SIZE,
            starting_health: Self::DEFAULT_STARTING_HEALTH,
            summon_timeout_secs: Self::DEFAULT_SUMMON_TIMEOUT_SECS,
            choice_timeout_secs: Self::DEFAULT_CHOICE_TIMEOUT_SECS,
            forfeit_timeout_secs: Self::DEFAULT_FORFEIT_TIMEOUT_SECS,
            teardown_delay_secs: Self::DEFAULT_TEARDOWN_DELAY_SECS,
            forfeit_teardown_delay_secs: Self::DEFAULT_FORFEIT_TEARDOWN_DELAY_SECS,
            card_matching: CardMatching::default(),
        }
    }

    pub fn summon_timeout(&self) -> Duration {
        Duration::from_secs(self.summon_timeout_secs)
    }

    pub fn choice_timeout(&self) -> Duration {
        Duration::from_secs(self.choice_timeout_secs)
    }

    pub fn forfeit_timeout(&self) -> Duration {
        Duration::from_secs(self.forfeit_timeout_secs)
    }

    pub fn teardown_delay(&self) -> Duration {
        Duration::from_secs(self.teardown_delay_secs)
    }

    pub fn forfeit_teardown_delay(&self) -> Duration {
        Duration::from_secs(self.forfeit_teardown_delay_secs)
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self::new()
    }
}
