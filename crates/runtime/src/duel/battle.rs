//! Battle rounds: two sub-rounds of attack and defence with simultaneous damage.

use std::sync::Arc;

use duel_core::{DuelOutcome, InstanceId, RoundTracker, Seat, evaluate, resolve_clash};
use tracing::debug;

use super::task::{DuelTask, Flow, RoundEnd};
use super::waiter::Wait;
use crate::api::{Embed, Mention, Result, Tone};
use crate::events::DuelEvent;

#[derive(Clone, Copy, Debug)]
enum Stance {
    Attack,
    Defend,
}

impl Stance {
    fn prompt(self) -> &'static str {
        match self {
            Stance::Attack => "choose a card to attack with:",
            Stance::Defend => "choose a card to defend:",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Stance::Attack => "attacks",
            Stance::Defend => "defends",
        }
    }
}

enum Choice {
    Picked(InstanceId),
    Skipped,
    Interrupted,
}

impl DuelTask {
    /// Plays the challenger's sub-round then the opponent's, checking for
    /// game over after each.
    pub(super) async fn play_round(&mut self) -> Result<RoundEnd> {
        let mut tracker = RoundTracker::new();

        for attacker in Seat::BOTH {
            if self.waiter.is_interrupted() {
                return Ok(RoundEnd::Interrupted);
            }

            if let Flow::Interrupted = self.sub_round(attacker, &mut tracker).await? {
                return Ok(RoundEnd::Interrupted);
            }

            let outcome = self.check_game_over();
            if outcome.is_concluded() {
                return Ok(RoundEnd::Over(outcome));
            }
        }

        Ok(RoundEnd::Continue)
    }

    async fn sub_round(&mut self, attacker: Seat, tracker: &mut RoundTracker) -> Result<Flow> {
        let defender = attacker.other();

        let attacking = match self.choose(attacker, Stance::Attack, tracker).await? {
            Choice::Picked(id) => id,
            Choice::Skipped => return Ok(Flow::Continue),
            Choice::Interrupted => return Ok(Flow::Interrupted),
        };
        let defending = match self.choose(defender, Stance::Defend, tracker).await? {
            Choice::Picked(id) => id,
            Choice::Skipped => return Ok(Flow::Continue),
            Choice::Interrupted => return Ok(Flow::Interrupted),
        };

        let (Some(attacking), Some(defending)) = (
            self.players[attacker.index()].card(attacking),
            self.players[defender.index()].card(defending),
        ) else {
            return Ok(Flow::Continue);
        };
        let clash = resolve_clash(attacking, defending);

        self.players[attacker.index()].replace(clash.attacker.clone());
        self.players[defender.index()].replace(clash.defender.clone());

        let services = Arc::clone(&self.services);
        let channel = self.info.channel;
        services
            .say(
                channel,
                format!(
                    "{} took {} damage!",
                    clash.defender.name(),
                    clash.damage_to_defender
                ),
            )
            .await?;
        services
            .say(
                channel,
                format!(
                    "{} took {} damage!",
                    clash.attacker.name(),
                    clash.damage_to_attacker
                ),
            )
            .await?;

        services.events.publish(DuelEvent::ClashResolved {
            guild: self.info.guild,
            attacker: self.info.player(attacker),
            defender: self.info.player(defender),
            clash,
        });

        Ok(Flow::Continue)
    }

    /// Asks the player in `seat` for an unused living card and marks it used.
    async fn choose(
        &mut self,
        seat: Seat,
        stance: Stance,
        tracker: &mut RoundTracker,
    ) -> Result<Choice> {
        let services = Arc::clone(&self.services);
        let guild = self.info.guild;
        let channel = self.info.channel;
        let player = self.info.player(seat);
        let mention = Mention(player);
        let matching = services.config.duel.card_matching;

        if !tracker.has_eligible(&self.players[seat.index()].limbo) {
            services
                .say(
                    channel,
                    format!("{mention} has no cards left to choose this round."),
                )
                .await?;
            return Ok(Choice::Skipped);
        }

        services
            .say(channel, format!("{mention}, {}", stance.prompt()))
            .await?;
        services.say(channel, self.available_cards(seat)).await?;

        let wait = {
            let limbo = &self.players[seat.index()].limbo;
            let used = &*tracker;
            self.waiter
                .wait_for(services.config.duel.choice_timeout(), |message| {
                    message.guild == guild
                        && message.channel == channel
                        && message.author == player
                        && used.select(limbo, &message.content, matching).is_some()
                })
                .await?
        };

        let message = match wait {
            Wait::Message(message) => message,
            Wait::TimedOut => {
                services
                    .say(channel, format!("{mention}, time's up to choose a card!"))
                    .await?;
                return Ok(Choice::Skipped);
            }
            Wait::Interrupted => return Ok(Choice::Interrupted),
        };

        let limbo = &self.players[seat.index()].limbo;
        let Some(card) = tracker
            .select(limbo, &message.content, matching)
            .and_then(|id| limbo.iter().find(|card| card.id() == id))
        else {
            return Ok(Choice::Skipped);
        };
        let id = card.id();
        let announcement = format!("{mention} {} with {}!", stance.verb(), card.name());
        tracker.mark_used(id);
        debug!(%guild, %player, ?stance, card = %id, "Card chosen");

        services.say(channel, announcement).await?;
        Ok(Choice::Picked(id))
    }

    fn available_cards(&self, seat: Seat) -> Embed {
        let title = format!("{}'s Available Cards", self.names[seat.index()]);
        let mut cards = self.players[seat.index()].available().peekable();

        if cards.peek().is_none() {
            return Embed::new(title, Tone::Info).description("No cards available.");
        }

        cards.fold(Embed::new(title, Tone::Info), |embed, card| {
            embed.field(
                card.name(),
                format!("Attack: {}\nHealth: {}", card.attack(), card.health),
                false,
            )
        })
    }

    /// Prunes depleted cards and reports what game-over evaluation decided.
    fn check_game_over(&mut self) -> DuelOutcome {
        let [challenger, opponent] = &mut self.players;
        let evaluation = evaluate(challenger, opponent);

        for seat in Seat::BOTH {
            let pruned = evaluation.pruned_for(seat);
            if pruned.is_empty() {
                continue;
            }
            debug!(guild = %self.info.guild, player = %self.info.player(seat), count = pruned.len(), "Cards pruned");
            self.services.events.publish(DuelEvent::CardsPruned {
                guild: self.info.guild,
                player: self.info.player(seat),
                cards: pruned.to_vec(),
            });
        }

        evaluation.outcome
    }
}
