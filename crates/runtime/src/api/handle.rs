//! Cloneable façade for feeding chat input to the runtime and invoking
//! commands.
//!
//! [`RuntimeHandle`] hides channel plumbing. Adapters push every inbound chat
//! line through [`RuntimeHandle::deliver`]; prefixed lines run as commands,
//! everything else reaches the duels waiting for input.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use duel_core::{Ordinal, PlayerId, Standing};

use super::errors::{Rejection, Result, RuntimeError};
use super::message::{ChannelMention, Embed, Mention, Tone};
use super::platform::{ChannelId, GuildId, IncomingMessage};
use super::ratings::RatingHandle;
use crate::commands::{Command, CommandKind};
use crate::duel::{DuelPhase, DuelTask, SessionInfo};
use crate::events::{DuelEvent, EndReason, Event, Topic};
use crate::inbox::Inbox;
use crate::services::Services;

/// Where a command was issued and by whom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandContext {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub author: PlayerId,
}

impl From<&IncomingMessage> for CommandContext {
    fn from(message: &IncomingMessage) -> Self {
        Self {
            guild: message.guild,
            channel: message.channel,
            author: message.author,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForfeitOutcome {
    Forfeited { winner: PlayerId },
    Declined,
    /// No answer in time. The duel carries on.
    TimedOut,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    services: Arc<Services>,
    messages: broadcast::Sender<IncomingMessage>,
}

impl RuntimeHandle {
    pub(crate) fn new(services: Arc<Services>, messages: broadcast::Sender<IncomingMessage>) -> Self {
        Self { services, messages }
    }

    /// Route one inbound chat line.
    ///
    /// Commands get their own task and are returned so callers can await
    /// them. Plain messages go to every active wait and return `None`.
    pub fn deliver(&self, message: IncomingMessage) -> Option<JoinHandle<()>> {
        let Some(command) = Command::parse(&self.services.config.command_prefix, &message.content)
        else {
            // No receivers just means nobody is waiting right now.
            let _ = self.messages.send(message);
            return None;
        };

        debug!(guild = %message.guild, author = %message.author, ?command, "Dispatching command");
        let ctx = CommandContext::from(&message);
        // Subscribe before spawning so replies delivered right after the
        // command are not missed.
        let inbox = self.inbox();
        let handle = self.clone();

        Some(tokio::spawn(async move {
            match handle.execute(command, ctx, inbox).await {
                Ok(()) | Err(RuntimeError::Rejected(_)) => {}
                Err(e) => error!(guild = %ctx.guild, "Command failed: {}", e),
            }
        }))
    }

    /// A fresh view of inbound chat, starting from now.
    pub fn inbox(&self) -> Inbox {
        Inbox::new(self.messages.subscribe())
    }

    async fn execute(&self, command: Command, ctx: CommandContext, inbox: Inbox) -> Result<()> {
        match command {
            Command::Duel {
                opponent: Some(opponent),
            } => self.challenge_with(inbox, ctx, opponent).await.map(drop),
            Command::Duel { opponent: None } => {
                let prefix = &self.services.config.command_prefix;
                self.services
                    .say(
                        ctx.channel,
                        format!("Usage: {prefix}duel @opponent"),
                    )
                    .await
            }
            Command::Forfeit => self.forfeit_with(inbox, ctx).await.map(drop),
            Command::ForceStop => self.force_stop(ctx).await,
            Command::Rank => self.rank(ctx).await.map(drop),
            Command::Ping => self.ping(ctx).await,
            Command::Help => self.help(ctx).await,
            Command::Unknown(name) => {
                let prefix = &self.services.config.command_prefix;
                self.services
                    .say(
                        ctx.channel,
                        format!("Unknown command `{name}`. Type {prefix}help to see all commands."),
                    )
                    .await
            }
        }
    }

    /// Tell the requester why nothing happened, then report the refusal.
    async fn reject<T>(&self, channel: ChannelId, rejection: Rejection) -> Result<T> {
        debug!(%channel, %rejection, "Request rejected");
        self.services.say(channel, rejection.to_string()).await?;
        Err(rejection.into())
    }

    /// Challenge `opponent` and start the duel task.
    pub async fn challenge(&self, ctx: CommandContext, opponent: PlayerId) -> Result<SessionInfo> {
        self.challenge_with(self.inbox(), ctx, opponent).await
    }

    async fn challenge_with(
        &self,
        inbox: Inbox,
        ctx: CommandContext,
        opponent: PlayerId,
    ) -> Result<SessionInfo> {
        let services = &self.services;
        let challenger = ctx.author;

        if opponent == challenger {
            return self.reject(ctx.channel, Rejection::SelfChallenge).await;
        }
        if services.registry.is_active(ctx.guild) {
            return self.reject(ctx.channel, Rejection::DuelInProgress).await;
        }

        services.ratings.register(vec![challenger, opponent]).await?;

        let channel = services
            .platform
            .create_duel_channel(ctx.guild, [challenger, opponent])
            .await?;
        let info = SessionInfo {
            guild: ctx.guild,
            channel,
            challenger,
            opponent,
        };

        let phase = match services.registry.open(info) {
            Ok(phase) => phase,
            Err(rejection) => {
                if let Err(e) = services.platform.delete_channel(channel).await {
                    warn!(%channel, "Failed to delete unused duel channel: {}", e);
                }
                return self.reject(ctx.channel, rejection).await;
            }
        };

        info!(guild = %ctx.guild, %channel, %challenger, %opponent, "Duel created");
        services.events.publish(DuelEvent::Started {
            guild: ctx.guild,
            channel,
            challenger,
            opponent,
        });

        let names = [
            services.platform.display_name(ctx.guild, challenger).await,
            services.platform.display_name(ctx.guild, opponent).await,
        ];
        let task = DuelTask::new(Arc::clone(services), info, inbox, phase, names);
        task.spawn();

        services
            .say(
                ctx.channel,
                Embed::new("Duel Invitation", Tone::Invitation).description(format!(
                    "A duel room has been opened for {} and {}. Click on this to start: {}",
                    Mention(challenger),
                    Mention(opponent),
                    ChannelMention(channel)
                )),
            )
            .await?;

        Ok(info)
    }

    /// Ask the requester to confirm, then hand the win to the other player.
    pub async fn forfeit(&self, ctx: CommandContext) -> Result<ForfeitOutcome> {
        self.forfeit_with(self.inbox(), ctx).await
    }

    async fn forfeit_with(&self, mut inbox: Inbox, ctx: CommandContext) -> Result<ForfeitOutcome> {
        let services = &self.services;

        let Some(info) = services.registry.get(ctx.guild) else {
            return self.reject(ctx.channel, Rejection::NoActiveDuel).await;
        };
        let Some(seat) = info.seat_of(ctx.author) else {
            return self.reject(ctx.channel, Rejection::NotParticipant).await;
        };

        services
            .say(ctx.channel, "Are you sure you want to forfeit? (y/n)")
            .await?;

        let answer = inbox
            .wait_for(services.config.duel.forfeit_timeout(), |message| {
                message.guild == ctx.guild
                    && message.author == ctx.author
                    && parse_confirmation(&message.content).is_some()
            })
            .await?;

        let Some(answer) = answer else {
            debug!(guild = %ctx.guild, player = %ctx.author, "Forfeit prompt expired");
            return Ok(ForfeitOutcome::TimedOut);
        };
        if parse_confirmation(&answer.content) != Some(true) {
            services
                .say(ctx.channel, "You decided not to forfeit.")
                .await?;
            return Ok(ForfeitOutcome::Declined);
        }

        // The duel may have finished while the prompt was open.
        let Some(info) = services
            .registry
            .end_in(ctx.guild, info.channel, DuelPhase::Forfeited)
        else {
            return self.reject(ctx.channel, Rejection::NoActiveDuel).await;
        };

        let loser = ctx.author;
        let winner = info.player(seat.other());
        info!(guild = %ctx.guild, %winner, %loser, "Duel forfeited");

        if let Err(e) = services.ratings.record_win(winner, loser).await {
            error!(guild = %ctx.guild, %winner, %loser, "Failed to record forfeit: {}", e);
        }

        services
            .say(
                info.channel,
                format!(
                    "{} has forfeited the duel. {} wins the match! This channel will be deleted shortly.",
                    Mention(loser),
                    Mention(winner)
                ),
            )
            .await?;
        services.events.publish(DuelEvent::Ended {
            guild: ctx.guild,
            channel: info.channel,
            reason: EndReason::Forfeited { loser },
        });

        tokio::time::sleep(services.config.duel.forfeit_teardown_delay()).await;
        services.platform.delete_channel(info.channel).await?;
        services.events.publish(DuelEvent::ChannelClosed {
            guild: ctx.guild,
            channel: info.channel,
        });

        Ok(ForfeitOutcome::Forfeited { winner })
    }

    /// Administrator-only: end the guild's duel without a result.
    pub async fn force_stop(&self, ctx: CommandContext) -> Result<()> {
        let services = &self.services;

        if !services
            .platform
            .is_administrator(ctx.guild, ctx.author)
            .await?
        {
            return self.reject(ctx.channel, Rejection::NotAdministrator).await;
        }

        let Some(info) = services.registry.end(ctx.guild, DuelPhase::Stopped) else {
            return self.reject(ctx.channel, Rejection::NoActiveDuelRoom).await;
        };
        info!(guild = %ctx.guild, channel = %info.channel, admin = %ctx.author, "Duel force stopped");

        services.events.publish(DuelEvent::Ended {
            guild: ctx.guild,
            channel: info.channel,
            reason: EndReason::Stopped,
        });
        services.platform.delete_channel(info.channel).await?;
        services.events.publish(DuelEvent::ChannelClosed {
            guild: ctx.guild,
            channel: info.channel,
        });

        if ctx.channel != info.channel {
            services
                .say(
                    ctx.channel,
                    "The game has been force stopped, and the duel room has been deleted.",
                )
                .await?;
        }
        Ok(())
    }

    /// Reply with the author's rating and rank.
    pub async fn rank(&self, ctx: CommandContext) -> Result<Option<Standing>> {
        let services = &self.services;

        let Some(standing) = services.ratings.standing(ctx.author).await? else {
            services
                .say(ctx.channel, "You don't have a rating yet.")
                .await?;
            return Ok(None);
        };

        services
            .say(
                ctx.channel,
                Embed::new("Rating and Ranking", Tone::Ranking)
                    .field("Your Rating", (standing.rating.round() as i64).to_string(), false)
                    .field("Your Ranking", Ordinal(standing.rank).to_string(), false),
            )
            .await?;
        Ok(Some(standing))
    }

    pub async fn ping(&self, ctx: CommandContext) -> Result<()> {
        let latency = self.services.platform.latency();
        self.services
            .say(ctx.channel, format!("Pong! {} ms.", latency.as_millis()))
            .await
    }

    pub async fn help(&self, ctx: CommandContext) -> Result<()> {
        let prefix = &self.services.config.command_prefix;
        let embed = CommandKind::all().fold(Embed::new("Bot Commands", Tone::Help), |embed, kind| {
            embed.field(format!("{prefix}{kind}"), kind.description(), false)
        });
        self.services.say(ctx.channel, embed).await
    }

    /// Session currently running in `guild`, if any.
    pub fn active_duel(&self, guild: GuildId) -> Option<SessionInfo> {
        self.services.registry.get(guild)
    }

    pub fn duel_phase(&self, guild: GuildId) -> Option<DuelPhase> {
        self.services.registry.phase(guild)
    }

    pub fn ratings(&self) -> &RatingHandle {
        &self.services.ratings
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Duel` - Duel lifecycle, summons, clashes, and teardown
    /// - `Topic::Rating` - Rating registrations and updates
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.services.events.subscribe(topic)
    }

    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.services.events.subscribe_multiple(topics)
    }
}

/// `y` confirms, `n` declines, anything else is not an answer.
fn parse_confirmation(content: &str) -> Option<bool> {
    match content.trim().to_lowercase().as_str() {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}
