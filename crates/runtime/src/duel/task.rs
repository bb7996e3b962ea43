use std::sync::Arc;

use duel_core::{CardCatalog, DuelOutcome, PlayerDuelState, PlayerPhase, Seat};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::session::{DuelPhase, SessionInfo};
use super::waiter::MessageWaiter;
use crate::api::{Embed, Mention, Result, Tone};
use crate::events::{DuelEvent, EndReason};
use crate::inbox::Inbox;
use crate::services::Services;

/// Whether a duel step ran to completion or saw the session end underneath it.
pub(super) enum Flow {
    Continue,
    Interrupted,
}

/// One running duel. Owns both players' state for the duel's lifetime.
pub(crate) struct DuelTask {
    pub(super) services: Arc<Services>,
    pub(super) info: SessionInfo,
    pub(super) waiter: MessageWaiter,
    pub(super) players: [PlayerDuelState; 2],
    pub(super) names: [String; 2],
    /// Set once this task has claimed the end of its session.
    concluded: bool,
}

impl DuelTask {
    pub(crate) fn new(
        services: Arc<Services>,
        info: SessionInfo,
        inbox: Inbox,
        phase: watch::Receiver<DuelPhase>,
        names: [String; 2],
    ) -> Self {
        let starting_health = services.config.duel.starting_health;
        Self {
            services,
            info,
            waiter: MessageWaiter::new(inbox, phase),
            players: [
                PlayerDuelState::new(starting_health),
                PlayerDuelState::new(starting_health),
            ],
            names,
            concluded: false,
        }
    }

    /// Runs the duel on its own task, watched by a second task that frees the
    /// session and channel if the duel task panics.
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        let services = Arc::clone(&self.services);
        let info = self.info;
        let duel = tokio::spawn(self.run());

        tokio::spawn(async move {
            let Err(e) = duel.await else {
                return;
            };
            if !e.is_panic() {
                return;
            }
            error!(guild = %info.guild, channel = %info.channel, "Duel task panicked");
            if services
                .registry
                .end_in(info.guild, info.channel, DuelPhase::Stopped)
                .is_some()
            {
                release(&services, info).await;
            }
        })
    }

    async fn run(mut self) {
        let SessionInfo { guild, channel, .. } = self.info;

        if let Err(e) = self.play().await {
            error!(%guild, %channel, "Duel aborted: {}", e);
            self.abort().await;
        }
    }

    async fn play(&mut self) -> Result<()> {
        let SessionInfo { guild, channel, .. } = self.info;

        self.introduce().await?;

        self.services
            .registry
            .set_phase(guild, channel, DuelPhase::Summoning);
        for seat in Seat::BOTH {
            if let Flow::Interrupted = self.summon(seat).await? {
                debug!(%guild, "Duel ended during summoning");
                return Ok(());
            }
        }

        self.services
            .registry
            .set_phase(guild, channel, DuelPhase::Battling);
        for player in &mut self.players {
            player.phase = PlayerPhase::Battling;
        }

        let mut round = 1;
        let outcome = loop {
            if self.waiter.is_interrupted() {
                debug!(%guild, round, "Duel ended before round");
                return Ok(());
            }

            debug!(%guild, round, "Starting round");
            match self.play_round().await? {
                RoundEnd::Continue => round += 1,
                RoundEnd::Over(outcome) => break outcome,
                RoundEnd::Interrupted => return Ok(()),
            }
        };

        self.conclude(outcome).await
    }

    async fn introduce(&mut self) -> Result<()> {
        let services = Arc::clone(&self.services);
        let SessionInfo {
            channel,
            challenger,
            opponent,
            ..
        } = self.info;

        services
            .say(
                channel,
                format!("Challenging {} to a duel!", Mention(opponent)),
            )
            .await?;
        services
            .say(
                channel,
                format!(
                    "{} and {}, get ready for a duel!",
                    Mention(challenger),
                    Mention(opponent)
                ),
            )
            .await?;
        services.say(channel, card_list(&services.catalog)).await
    }

    async fn conclude(&mut self, outcome: DuelOutcome) -> Result<()> {
        let services = Arc::clone(&self.services);
        let SessionInfo { guild, channel, .. } = self.info;

        if !services.registry.conclude(guild, channel) {
            debug!(%guild, "Session already ended, skipping conclusion");
            return Ok(());
        }
        self.concluded = true;
        for player in &mut self.players {
            player.phase = PlayerPhase::Concluded;
        }

        match (outcome.winner(), outcome.loser()) {
            (Some(winner), Some(loser)) => {
                let winner = self.info.player(winner);
                let loser = self.info.player(loser);
                services
                    .say(
                        channel,
                        format!(
                            "{} has won the match. This channel will be deleted shortly.",
                            Mention(winner)
                        ),
                    )
                    .await?;
                if let Err(e) = services.ratings.record_win(winner, loser).await {
                    error!(%guild, %winner, %loser, "Failed to record duel result: {}", e);
                }
            }
            _ => {
                services
                    .say(
                        channel,
                        "It's a draw! Both players have no cards left. This channel will be deleted shortly.",
                    )
                    .await?;
            }
        }

        info!(%guild, %channel, ?outcome, "Duel concluded");
        for player in &mut self.players {
            player.reset();
        }
        services.events.publish(DuelEvent::Ended {
            guild,
            channel,
            reason: EndReason::Concluded(outcome),
        });

        tokio::time::sleep(services.config.duel.teardown_delay()).await;
        services.platform.delete_channel(channel).await?;
        services
            .events
            .publish(DuelEvent::ChannelClosed { guild, channel });
        Ok(())
    }

    /// Releases the session and its channel after a collaborator failure.
    async fn abort(&mut self) {
        let services = Arc::clone(&self.services);
        let SessionInfo { guild, channel, .. } = self.info;

        if self.concluded {
            delete_channel(&services, self.info).await;
        } else if services.registry.conclude(guild, channel) {
            release(&services, self.info).await;
        }
    }
}

/// Reports a failed duel whose session the caller already removed, then
/// deletes its channel.
async fn release(services: &Services, info: SessionInfo) {
    services.events.publish(DuelEvent::Ended {
        guild: info.guild,
        channel: info.channel,
        reason: EndReason::Failed,
    });
    delete_channel(services, info).await;
}

async fn delete_channel(services: &Services, info: SessionInfo) {
    let SessionInfo { guild, channel, .. } = info;
    match services.platform.delete_channel(channel).await {
        Ok(()) => services
            .events
            .publish(DuelEvent::ChannelClosed { guild, channel }),
        Err(e) => warn!(%guild, %channel, "Failed to delete duel channel: {}", e),
    }
}

/// How a full round ended.
pub(super) enum RoundEnd {
    Continue,
    Over(DuelOutcome),
    Interrupted,
}

fn card_list(catalog: &CardCatalog) -> Embed {
    catalog
        .iter()
        .fold(Embed::new("List of Cards", Tone::Info), |embed, card| {
            let abilities = if card.abilities.is_empty() {
                "None".to_string()
            } else {
                card.abilities.join(", ")
            };
            embed.field(
                &card.name,
                format!(
                    "Attack: {}\nHealth: {}\nAbility: {}",
                    card.attack, card.health, abilities
                ),
                true,
            )
        })
}
