//! Text command parsing for prefixed chat lines.

use duel_core::PlayerId;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Command names with their help text, in the order `help` lists them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    Duel,
    Forfeit,
    #[strum(serialize = "forcestopgame")]
    ForceStop,
    Rank,
    Ping,
    Help,
}

impl CommandKind {
    pub fn description(self) -> &'static str {
        match self {
            CommandKind::Duel => "Challenge another player to a duel!\nUsage: duel @opponent",
            CommandKind::Forfeit => "Forfeit the duel (End the game)",
            CommandKind::ForceStop => "Forcefully stops a duel (Admin)",
            CommandKind::Rank => "Check your rating and ranking.",
            CommandKind::Ping => "Shows the bot's latency in ms.",
            CommandKind::Help => "Displays all commands",
        }
    }

    pub fn all() -> impl Iterator<Item = CommandKind> {
        CommandKind::iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `opponent` is `None` when the argument is missing or not a player.
    Duel { opponent: Option<PlayerId> },
    Forfeit,
    ForceStop,
    Rank,
    Ping,
    Help,
    Unknown(String),
}

impl Command {
    /// Parses `content` when it starts with `prefix`.
    ///
    /// Returns `None` for ordinary chat, which is routed to duel waits instead.
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let body = content.trim_start().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let name = words.next()?.to_lowercase();

        let command = match name.as_str() {
            "duel" => Command::Duel {
                opponent: words.next().and_then(parse_player),
            },
            "forfeit" => Command::Forfeit,
            "forcestopgame" => Command::ForceStop,
            "rank" => Command::Rank,
            "ping" => Command::Ping,
            "help" => Command::Help,
            _ => Command::Unknown(name),
        };
        Some(command)
    }
}

/// Accepts `<@id>`, `<@!id>`, `@id`, or a bare id.
fn parse_player(token: &str) -> Option<PlayerId> {
    let id = match token.strip_prefix("<@").and_then(|t| t.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => token.strip_prefix('@').unwrap_or(token),
    };
    id.parse().ok().map(PlayerId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(Command::parse("!", "!forfeit"), Some(Command::Forfeit));
        assert_eq!(
            Command::parse("!", "!forcestopgame"),
            Some(Command::ForceStop)
        );
        assert_eq!(Command::parse("!", "  !RANK"), Some(Command::Rank));
        assert_eq!(Command::parse("!", "!ping"), Some(Command::Ping));
        assert_eq!(Command::parse("!", "!help me"), Some(Command::Help));
        assert_eq!(
            Command::parse("!", "!dance"),
            Some(Command::Unknown("dance".into()))
        );
    }

    #[test]
    fn duel_accepts_mentions_and_ids() {
        for arg in ["<@42>", "<@!42>", "@42", "42"] {
            assert_eq!(
                Command::parse("!", &format!("!duel {arg}")),
                Some(Command::Duel {
                    opponent: Some(PlayerId(42))
                }),
                "{arg}"
            );
        }
        assert_eq!(
            Command::parse("!", "!duel sherlock"),
            Some(Command::Duel { opponent: None })
        );
        assert_eq!(
            Command::parse("!", "!duel"),
            Some(Command::Duel { opponent: None })
        );
    }

    #[test]
    fn plain_chat_is_not_a_command() {
        assert_eq!(Command::parse("!", "Ember Drake"), None);
        assert_eq!(Command::parse("!", "!"), None);
        assert_eq!(Command::parse("?", "!rank"), None);
    }

    #[test]
    fn help_lists_commands_by_name() {
        let names: Vec<_> = CommandKind::all().map(|kind| kind.to_string()).collect();
        assert_eq!(
            names,
            ["duel", "forfeit", "forcestopgame", "rank", "ping", "help"]
        );
    }
}
