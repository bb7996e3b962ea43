//! Roster collection, one player at a time.

use std::sync::Arc;

use duel_core::{PlayerPhase, Roster, Seat, SummonError};
use tracing::{debug, info};

use super::task::{DuelTask, Flow};
use super::waiter::Wait;
use crate::api::{Embed, Mention, Result, Tone};
use crate::events::DuelEvent;

/// Typed by a player to end their own summoning wait. Never treated as a card.
const DONE_TOKEN: &str = "done";

impl DuelTask {
    /// Collects up to `roster_size` distinct cards from the player in `seat`.
    ///
    /// Ends early when the idle timeout passes; whatever was collected by
    /// then becomes the player's limbo.
    pub(super) async fn summon(&mut self, seat: Seat) -> Result<Flow> {
        let services = Arc::clone(&self.services);
        let config = &services.config.duel;
        let guild = self.info.guild;
        let channel = self.info.channel;
        let summoner = self.info.player(seat);
        let participants = self.info.participants();

        self.players[seat.index()].phase = PlayerPhase::Summoning;
        services
            .say(
                channel,
                Embed::new(
                    format!("Summoning Phase for {}", self.names[seat.index()]),
                    Tone::Info,
                )
                .description(format!(
                    "Summon your cards one by one. (Please select {} cards)",
                    config.roster_size
                )),
            )
            .await?;

        let mut roster = Roster::new(config.roster_size);
        while !roster.is_complete() {
            let wait = self
                .waiter
                .wait_for(config.summon_timeout(), |message| {
                    message.guild == guild
                        && message.channel == channel
                        && participants.contains(&message.author)
                        && !message.content.trim().eq_ignore_ascii_case(DONE_TOKEN)
                })
                .await?;

            let message = match wait {
                Wait::Message(message) => message,
                Wait::TimedOut => {
                    services.say(channel, "Time's up for this phase!").await?;
                    break;
                }
                Wait::Interrupted => return Ok(Flow::Interrupted),
            };

            if message.author != summoner {
                services
                    .say(channel, "Only the mentioned players can summon cards.")
                    .await?;
                continue;
            }

            let reply = match roster.try_summon(&services.catalog, &message.content, &services.ids) {
                Ok(card) => {
                    debug!(%guild, player = %summoner, card = card.name(), id = %card.id(), "Card summoned");
                    services.events.publish(DuelEvent::CardSummoned {
                        guild,
                        player: summoner,
                        card: card.clone(),
                    });
                    format!("You summoned {}.", card.name())
                }
                Err(SummonError::UnknownCard(name)) => format!(
                    "{} You don't have {} in your collection.",
                    Mention(summoner),
                    name
                ),
                Err(SummonError::Duplicate(_)) => {
                    "You can't choose the same card more than once.".to_string()
                }
                Err(SummonError::RosterFull { limit }) => {
                    format!("You can't have more than {limit} cards in your deck.")
                }
            };
            services.say(channel, reply).await?;
        }

        let limbo = roster.into_limbo();
        info!(%guild, player = %summoner, cards = limbo.len(), "Roster locked");
        services.events.publish(DuelEvent::RosterLocked {
            guild,
            player: summoner,
            cards: limbo.len(),
        });
        self.players[seat.index()].limbo = limbo;

        Ok(Flow::Continue)
    }
}
