//! Chat platform over stdin/stdout for local play.
//!
//! Input lines are either `<author_id>: <text>`, posted to the current
//! channel, or `#<channel_id>`, which switches the current channel. Everything
//! the runtime posts is printed with its channel id.

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use duel_core::PlayerId;
use runtime::{
    ChannelId, ChatPlatform, GuildId, IncomingMessage, OutgoingMessage, PlatformError,
    RuntimeHandle,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Channel every console session starts in.
pub const LOBBY: ChannelId = ChannelId(1);

/// First id handed out for duel channels. Lower ids are treated as
/// ordinary channels that always exist.
const FIRST_DUEL_CHANNEL: u64 = 100;

pub struct ConsolePlatform {
    admins: HashSet<PlayerId>,
    next_channel: AtomicU64,
    duel_channels: Mutex<BTreeSet<ChannelId>>,
}

impl ConsolePlatform {
    pub fn new(admins: HashSet<PlayerId>) -> Self {
        Self {
            admins,
            next_channel: AtomicU64::new(FIRST_DUEL_CHANNEL),
            duel_channels: Mutex::new(BTreeSet::new()),
        }
    }
}

#[async_trait]
impl ChatPlatform for ConsolePlatform {
    async fn send(
        &self,
        channel: ChannelId,
        message: OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let is_known = channel.0 < FIRST_DUEL_CHANNEL
            || self
                .duel_channels
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(&channel);
        if !is_known {
            return Err(PlatformError::UnknownChannel(channel));
        }

        println!("{}", render(channel, &message));
        Ok(())
    }

    async fn create_duel_channel(
        &self,
        guild: GuildId,
        participants: [PlayerId; 2],
    ) -> Result<ChannelId, PlatformError> {
        let channel = ChannelId(self.next_channel.fetch_add(1, Ordering::Relaxed));
        self.duel_channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel);

        info!(%guild, %channel, "Created duel channel for {} and {}", participants[0], participants[1]);
        println!("[system] #{channel} opened; type #{channel} to switch to it");
        Ok(channel)
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), PlatformError> {
        let removed = self
            .duel_channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&channel);
        if !removed {
            return Err(PlatformError::UnknownChannel(channel));
        }

        println!("[system] #{channel} deleted");
        Ok(())
    }

    async fn is_administrator(
        &self,
        _guild: GuildId,
        player: PlayerId,
    ) -> Result<bool, PlatformError> {
        Ok(self.admins.contains(&player))
    }
}

/// Text form of an outgoing message; embeds are indented under their title.
pub fn render(channel: ChannelId, message: &OutgoingMessage) -> String {
    match message {
        OutgoingMessage::Text(text) => format!("[#{channel}] {text}"),
        OutgoingMessage::Embed(embed) => {
            let mut lines = vec![format!("[#{channel}] == {} ==", embed.title)];
            if let Some(description) = &embed.description {
                lines.push(format!("    {description}"));
            }
            for field in &embed.fields {
                lines.push(format!("    {}", field.name));
                lines.extend(field.value.lines().map(|line| format!("        {line}")));
            }
            lines.join("\n")
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Switch(ChannelId),
    Say { author: PlayerId, content: String },
}

/// Parses one input line. Blank and malformed lines yield `None`.
pub fn parse_line(line: &str) -> Option<ConsoleInput> {
    let line = line.trim();

    if let Some(channel) = line.strip_prefix('#') {
        return channel.trim().parse().ok().map(|id| ConsoleInput::Switch(ChannelId(id)));
    }

    let (author, content) = line.split_once(':')?;
    let author = author.trim().parse().ok().map(PlayerId)?;
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    Some(ConsoleInput::Say {
        author,
        content: content.to_string(),
    })
}

/// Feed stdin into the runtime until end of input.
pub async fn run(handle: RuntimeHandle, guild: GuildId) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current = LOBBY;

    println!("[system] you are in #{current}; write `<player_id>: <message>`");
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Some(ConsoleInput::Switch(channel)) => {
                current = channel;
                println!("[system] now in #{current}");
            }
            Some(ConsoleInput::Say { author, content }) => {
                debug!(%author, channel = %current, "Console input");
                // Command tasks run detached; their replies print as they come.
                let _ = handle.deliver(IncomingMessage::new(guild, current, author, content));
            }
            None if line.trim().is_empty() => {}
            None => println!("[system] expected `<player_id>: <message>` or `#<channel_id>`"),
        }
    }

    info!("Console input closed");
    Ok(())
}
