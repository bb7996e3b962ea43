//! Shared fixtures: a recording chat platform and a runtime harness.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use duel_core::{CardCatalog, CardDefinition, DuelConfig, PlayerId};
use runtime::{
    ChannelId, ChatPlatform, DuelEvent, Event, GuildId, InMemoryRatingRepo, IncomingMessage,
    OutgoingMessage, PlatformError, RatingRepository, Runtime, RuntimeHandle, Topic,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub const GUILD: GuildId = GuildId(1);
pub const OTHER_GUILD: GuildId = GuildId(2);
pub const LOBBY: ChannelId = ChannelId(10);
pub const OTHER_LOBBY: ChannelId = ChannelId(20);

pub const ALICE: PlayerId = PlayerId(1);
pub const BOB: PlayerId = PlayerId(2);
pub const CAROL: PlayerId = PlayerId(3);
pub const DAVE: PlayerId = PlayerId(4);
pub const ADMIN: PlayerId = PlayerId(99);

/// Strong attackers for one side, fragile cards for the other.
pub fn test_catalog() -> CardCatalog {
    CardCatalog::new([
        CardDefinition::new("Titan", 10, 30).with_ability("Crush"),
        CardDefinition::new("Ogre", 8, 30),
        CardDefinition::new("Wolf", 6, 30).with_ability("Pack"),
        CardDefinition::new("Pebble", 1, 5),
        CardDefinition::new("Twig", 1, 5),
        CardDefinition::new("Leaf", 1, 5),
    ])
    .unwrap()
}

#[derive(Default)]
struct Recorded {
    sent: Vec<(ChannelId, OutgoingMessage)>,
    created: Vec<(GuildId, [PlayerId; 2], ChannelId)>,
    deleted: Vec<ChannelId>,
}

/// In-memory platform that records every effect.
///
/// Posting to a deleted channel fails the way a real platform would.
pub struct RecordingPlatform {
    recorded: Mutex<Recorded>,
    next_channel: AtomicU64,
    admins: HashSet<PlayerId>,
    panic_on: Mutex<Option<String>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Recorded::default()),
            next_channel: AtomicU64::new(1000),
            admins: HashSet::from([ADMIN]),
            panic_on: Mutex::new(None),
        }
    }

    /// Make `send` panic for any message whose text starts with `prefix`;
    /// `None` restores normal sends.
    pub fn panic_on_send(&self, prefix: Option<&str>) {
        *self.panic_on.lock().unwrap() = prefix.map(str::to_string);
    }

    /// Plain-text rendering of everything posted to `channel`, in order.
    pub fn texts(&self, channel: ChannelId) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|(to, _)| *to == channel)
            .map(|(_, message)| message.plain_text())
            .collect()
    }

    pub fn messages(&self, channel: ChannelId) -> Vec<OutgoingMessage> {
        self.recorded
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|(to, _)| *to == channel)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn last_text(&self, channel: ChannelId) -> Option<String> {
        self.texts(channel).pop()
    }

    pub fn has_text(&self, channel: ChannelId, text: &str) -> bool {
        self.texts(channel).iter().any(|t| t == text)
    }

    pub fn created_channels(&self) -> usize {
        self.recorded.lock().unwrap().created.len()
    }

    pub fn deleted(&self) -> Vec<ChannelId> {
        self.recorded.lock().unwrap().deleted.clone()
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn send(
        &self,
        channel: ChannelId,
        message: OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let trigger = self.panic_on.lock().unwrap().clone();
        if let Some(prefix) = trigger {
            assert!(
                !message.plain_text().starts_with(&prefix),
                "platform failure on {prefix:?}"
            );
        }

        let mut recorded = self.recorded.lock().unwrap();
        if recorded.deleted.contains(&channel) {
            return Err(PlatformError::UnknownChannel(channel));
        }
        recorded.sent.push((channel, message));
        Ok(())
    }

    async fn create_duel_channel(
        &self,
        guild: GuildId,
        participants: [PlayerId; 2],
    ) -> Result<ChannelId, PlatformError> {
        let channel = ChannelId(self.next_channel.fetch_add(1, Ordering::Relaxed));
        self.recorded
            .lock()
            .unwrap()
            .created
            .push((guild, participants, channel));
        Ok(channel)
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), PlatformError> {
        let mut recorded = self.recorded.lock().unwrap();
        if recorded.deleted.contains(&channel) {
            return Err(PlatformError::UnknownChannel(channel));
        }
        recorded.deleted.push(channel);
        Ok(())
    }

    async fn is_administrator(
        &self,
        _guild: GuildId,
        player: PlayerId,
    ) -> Result<bool, PlatformError> {
        Ok(self.admins.contains(&player))
    }

    async fn display_name(&self, _guild: GuildId, player: PlayerId) -> String {
        format!("Duelist {player}")
    }

    fn latency(&self) -> Duration {
        Duration::from_millis(42)
    }
}

/// A built runtime plus direct access to its fake platform.
pub struct Harness {
    pub runtime: Runtime,
    pub handle: RuntimeHandle,
    pub platform: Arc<RecordingPlatform>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::build(DuelConfig::default(), Arc::new(InMemoryRatingRepo::new())).await
    }

    pub async fn build(duel: DuelConfig, ratings: Arc<dyn RatingRepository>) -> Self {
        let platform = Arc::new(RecordingPlatform::new());
        let runtime = Runtime::builder()
            .duel_config(duel)
            .catalog(test_catalog())
            .platform(platform.clone())
            .ratings(ratings)
            .build()
            .await
            .unwrap();
        let handle = runtime.handle();

        Self {
            runtime,
            handle,
            platform,
        }
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.handle.subscribe(Topic::Duel)
    }

    /// Start a command in `GUILD`'s lobby without waiting for it.
    pub fn spawn_command(&self, author: PlayerId, content: &str) -> JoinHandle<()> {
        self.spawn_command_in(GUILD, LOBBY, author, content)
    }

    pub fn spawn_command_in(
        &self,
        guild: GuildId,
        channel: ChannelId,
        author: PlayerId,
        content: &str,
    ) -> JoinHandle<()> {
        self.handle
            .deliver(IncomingMessage::new(guild, channel, author, content))
            .expect("content should parse as a command")
    }

    /// Run a command in `GUILD`'s lobby to completion.
    pub async fn command(&self, author: PlayerId, content: &str) {
        self.spawn_command(author, content).await.unwrap();
    }

    pub async fn command_in(
        &self,
        guild: GuildId,
        channel: ChannelId,
        author: PlayerId,
        content: &str,
    ) {
        self.spawn_command_in(guild, channel, author, content)
            .await
            .unwrap();
    }

    /// Post ordinary chat in `GUILD`.
    pub fn chat(&self, channel: ChannelId, author: PlayerId, content: &str) {
        self.chat_in(GUILD, channel, author, content);
    }

    pub fn chat_in(&self, guild: GuildId, channel: ChannelId, author: PlayerId, content: &str) {
        let routed = self
            .handle
            .deliver(IncomingMessage::new(guild, channel, author, content));
        assert!(routed.is_none(), "{content:?} was parsed as a command");
    }

    pub fn duel_channel(&self) -> ChannelId {
        self.duel_channel_in(GUILD)
    }

    pub fn duel_channel_in(&self, guild: GuildId) -> ChannelId {
        self.handle
            .active_duel(guild)
            .expect("guild should have an active duel")
            .channel
    }

    pub async fn rating(&self, player: PlayerId) -> Option<f64> {
        self.handle.ratings().snapshot().await.unwrap().get(player)
    }
}

/// Next duel event accepted by `predicate`, skipping others.
pub async fn next_duel_event<F>(rx: &mut broadcast::Receiver<Event>, mut predicate: F) -> DuelEvent
where
    F: FnMut(&DuelEvent) -> bool,
{
    loop {
        let event = tokio::time::timeout(Duration::from_secs(3600), rx.recv())
            .await
            .expect("duel event within an hour of game time")
            .expect("event bus open");
        if let Event::Duel(event) = event {
            if predicate(&event) {
                return event;
            }
        }
    }
}

/// Wait until the duel channel in `channel` has been deleted.
pub async fn channel_closed(rx: &mut broadcast::Receiver<Event>, channel: ChannelId) {
    next_duel_event(rx, |event| {
        matches!(event, DuelEvent::ChannelClosed { channel: closed, .. } if *closed == channel)
    })
    .await;
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Poll `condition` on game time until it holds.
pub async fn until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(3600), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    })
    .await
    .expect("condition within an hour of game time");
}
