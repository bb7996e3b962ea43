//! Per-waiter view of the inbound chat stream.
//!
//! Every [`Inbox`] holds its own broadcast receiver, so a duel task and a
//! forfeit confirmation in the same guild both see each message and filter it
//! independently.

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, timeout_at};
use tracing::warn;

use crate::api::{IncomingMessage, Result, RuntimeError};

/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

pub struct Inbox {
    rx: broadcast::Receiver<IncomingMessage>,
}

impl Inbox {
    pub(crate) fn new(rx: broadcast::Receiver<IncomingMessage>) -> Self {
        Self { rx }
    }

    /// Wait up to `timeout` for the first message accepted by `filter`.
    ///
    /// Messages rejected by the filter are dropped; they do not extend the
    /// deadline. Returns `Ok(None)` when the deadline passes.
    pub async fn wait_for<F>(
        &mut self,
        timeout: Duration,
        mut filter: F,
    ) -> Result<Option<IncomingMessage>>
    where
        F: FnMut(&IncomingMessage) -> bool,
    {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);

        loop {
            match timeout_at(deadline, self.rx.recv()).await {
                Err(_elapsed) => return Ok(None),
                Ok(Ok(message)) => {
                    if filter(&message) {
                        return Ok(Some(message));
                    }
                }
                Ok(Err(RecvError::Lagged(skipped))) => {
                    warn!("Inbox lagged behind, {} messages skipped", skipped);
                }
                Ok(Err(RecvError::Closed)) => return Err(RuntimeError::InboxClosed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChannelId, GuildId};
    use duel_core::PlayerId;

    fn message(author: u64, content: &str) -> IncomingMessage {
        IncomingMessage::new(GuildId(1), ChannelId(10), PlayerId(author), content)
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_matching_message() {
        let (tx, rx) = broadcast::channel(8);
        let mut inbox = Inbox::new(rx);

        tx.send(message(1, "hello")).unwrap();
        tx.send(message(2, "pick me")).unwrap();

        let found = inbox
            .wait_for(Duration::from_secs(5), |m| m.author == PlayerId(2))
            .await
            .unwrap();
        assert_eq!(found.map(|m| m.content), Some("pick me".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_nothing_matches() {
        let (tx, rx) = broadcast::channel(8);
        let mut inbox = Inbox::new(rx);
        tx.send(message(1, "ignored")).unwrap();

        let start = Instant::now();
        let found = inbox
            .wait_for(Duration::from_secs(30), |m| m.author == PlayerId(2))
            .await
            .unwrap();

        assert!(found.is_none());
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_timeout_still_waits_for_messages() {
        let (tx, rx) = broadcast::channel(8);
        let mut inbox = Inbox::new(rx);
        tx.send(message(3, "Titan")).unwrap();

        let found = inbox
            .wait_for(Duration::from_secs(u64::MAX), |_| true)
            .await
            .unwrap();
        assert_eq!(found.map(|m| m.author), Some(PlayerId(3)));
    }

    #[tokio::test]
    async fn closed_stream_is_an_error() {
        let (tx, rx) = broadcast::channel::<IncomingMessage>(8);
        let mut inbox = Inbox::new(rx);
        drop(tx);

        let result = inbox.wait_for(Duration::from_secs(1), |_| true).await;
        assert!(matches!(result, Err(RuntimeError::InboxClosed)));
    }
}
