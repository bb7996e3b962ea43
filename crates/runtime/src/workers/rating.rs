//! Rating worker that owns the authoritative [`duel_core::RatingTable`].
//!
//! Receives commands from [`RatingHandle`](crate::api::RatingHandle), applies
//! them in arrival order, writes the table through to the repository after
//! every change, and publishes rating events.

use std::sync::Arc;

use duel_core::{PlayerId, RatingChange, RatingTable, Standing};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::api::Result;
use crate::events::{EventBus, RatingEvent};
use crate::repository::RatingRepository;

/// Commands that can be sent to the rating worker
pub enum Command {
    /// Give unseen players the initial rating.
    Register {
        players: Vec<PlayerId>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Apply one decided duel.
    RecordWin {
        winner: PlayerId,
        loser: PlayerId,
        reply: oneshot::Sender<Result<RatingChange>>,
    },
    /// Look up a player's rating and rank.
    Standing {
        player: PlayerId,
        reply: oneshot::Sender<Option<Standing>>,
    },
    /// Copy of the whole table.
    Snapshot { reply: oneshot::Sender<RatingTable> },
}

/// Background task that serializes rating reads and writes.
///
/// Two duels ending at the same moment for the same player queue up here
/// instead of racing on the table.
pub struct RatingWorker {
    table: RatingTable,
    repository: Arc<dyn RatingRepository>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl RatingWorker {
    pub fn new(
        table: RatingTable,
        repository: Arc<dyn RatingRepository>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!("RatingWorker initialized with {} rated players", table.len());

        Self {
            table,
            repository,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("RatingWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Register { players, reply } => {
                let result = self.handle_register(&players);
                if reply.send(result).is_err() {
                    debug!("Register reply channel closed (caller dropped)");
                }
            }
            Command::RecordWin {
                winner,
                loser,
                reply,
            } => {
                let result = self.handle_record_win(winner, loser);
                if reply.send(result).is_err() {
                    debug!("RecordWin reply channel closed (caller dropped)");
                }
            }
            Command::Standing { player, reply } => {
                if reply.send(self.table.standing(player)).is_err() {
                    debug!("Standing reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.table.clone()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_register(&mut self, players: &[PlayerId]) -> Result<()> {
        let mut created = Vec::new();
        for &player in players {
            if self.table.ensure(player) {
                created.push(player);
            }
        }

        if created.is_empty() {
            return Ok(());
        }

        self.persist()?;
        for player in created {
            debug!(%player, "Registered player with initial rating");
            self.event_bus.publish(RatingEvent::Registered { player });
        }
        Ok(())
    }

    fn handle_record_win(&mut self, winner: PlayerId, loser: PlayerId) -> Result<RatingChange> {
        let change = self.table.record_win(winner, loser);
        info!(
            %winner,
            %loser,
            "Ratings updated: winner {:.1} -> {:.1}, loser {:.1} -> {:.1}",
            change.winner_before,
            change.winner_after,
            change.loser_before,
            change.loser_after
        );

        self.persist()?;
        self.event_bus.publish(RatingEvent::Updated(change));
        Ok(change)
    }

    fn persist(&self) -> Result<()> {
        self.repository.save(&self.table).map_err(|e| {
            error!("Failed to persist ratings: {}", e);
            e.into()
        })
    }
}
