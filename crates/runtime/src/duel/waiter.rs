//! Message waits that also watch the session phase.

use std::time::Duration;

use tokio::sync::watch;

use super::session::DuelPhase;
use crate::api::{IncomingMessage, Result};
use crate::inbox::Inbox;

pub(crate) enum Wait {
    Message(IncomingMessage),
    TimedOut,
    /// The session was forfeited or force stopped while waiting.
    Interrupted,
}

pub(crate) struct MessageWaiter {
    inbox: Inbox,
    phase: watch::Receiver<DuelPhase>,
}

impl MessageWaiter {
    pub fn new(inbox: Inbox, phase: watch::Receiver<DuelPhase>) -> Self {
        Self { inbox, phase }
    }

    /// Checkpoint used at the top of rounds and sub-rounds.
    pub fn is_interrupted(&self) -> bool {
        self.phase.borrow().is_terminal()
    }

    pub async fn wait_for<F>(&mut self, timeout: Duration, filter: F) -> Result<Wait>
    where
        F: FnMut(&IncomingMessage) -> bool,
    {
        let Self { inbox, phase } = self;

        tokio::select! {
            biased;
            _ = phase.wait_for(DuelPhase::is_terminal) => Ok(Wait::Interrupted),
            received = inbox.wait_for(timeout, filter) => Ok(match received? {
                Some(message) => Wait::Message(message),
                None => Wait::TimedOut,
            }),
        }
    }
}
