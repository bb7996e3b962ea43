//! Outbound message shapes: plain text and structured embeds.
use std::fmt;

use duel_core::PlayerId;
use serde::{Deserialize, Serialize};

use super::platform::ChannelId;

/// Inline reference to a player. Adapters render `<@id>` however their
/// platform expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mention(pub PlayerId);

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}>", self.0)
    }
}

/// Inline reference to a channel, rendered as `<#id>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMention(pub ChannelId);

impl fmt::Display for ChannelMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<#{}>", self.0)
    }
}

/// Accent colour of an embed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Info,
    Success,
    Error,
    Invitation,
    Ranking,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub tone: Tone,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: title.into(),
            description: None,
            tone,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutgoingMessage {
    Text(String),
    Embed(Embed),
}

impl OutgoingMessage {
    /// Flattened plain-text rendering, one line per title/description/field.
    pub fn plain_text(&self) -> String {
        match self {
            OutgoingMessage::Text(text) => text.clone(),
            OutgoingMessage::Embed(embed) => {
                let mut lines = vec![embed.title.clone()];
                lines.extend(embed.description.clone());
                for field in &embed.fields {
                    lines.push(format!("{}: {}", field.name, field.value.replace('\n', ", ")));
                }
                lines.join("\n")
            }
        }
    }
}

impl From<String> for OutgoingMessage {
    fn from(text: String) -> Self {
        OutgoingMessage::Text(text)
    }
}

impl From<&str> for OutgoingMessage {
    fn from(text: &str) -> Self {
        OutgoingMessage::Text(text.to_string())
    }
}

impl From<Embed> for OutgoingMessage {
    fn from(embed: Embed) -> Self {
        OutgoingMessage::Embed(embed)
    }
}
