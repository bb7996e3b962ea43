//! Cloneable façade over the rating worker.
use tokio::sync::{mpsc, oneshot};

use duel_core::{PlayerId, RatingChange, RatingTable, Standing};

use super::errors::{Result, RuntimeError};
use crate::workers::Command;

#[derive(Clone)]
pub struct RatingHandle {
    command_tx: mpsc::Sender<Command>,
}

impl RatingHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Make sure every player has a rating record.
    pub async fn register(&self, players: Vec<PlayerId>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Register {
                players,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Apply a decided duel and return the before/after ratings.
    pub async fn record_win(&self, winner: PlayerId, loser: PlayerId) -> Result<RatingChange> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::RecordWin {
                winner,
                loser,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn standing(&self, player: PlayerId) -> Result<Option<Standing>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Standing {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Copy of the current table (read-only snapshot)
    pub async fn snapshot(&self) -> Result<RatingTable> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
