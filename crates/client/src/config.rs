//! Bot configuration loaded from the process environment.
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use duel_core::PlayerId;
use runtime::GuildId;

/// Settings for one bot process.
#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Directory holding `cards.json`/`cards.ron` and `config.toml`.
    pub data_dir: Option<PathBuf>,
    /// Card catalog file; the bundled catalog is used when unset.
    pub cards_path: Option<PathBuf>,
    /// Duel rules file (TOML); defaults apply when unset.
    pub config_path: Option<PathBuf>,
    pub ratings_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub command_prefix: String,
    pub admins: HashSet<PlayerId>,
    pub guild: GuildId,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cards_path: None,
            config_path: None,
            ratings_path: PathBuf::from("ratings.json"),
            log_dir: default_log_dir(),
            command_prefix: "!".to_string(),
            admins: HashSet::new(),
            guild: GuildId(1),
        }
    }
}

impl BotConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUEL_DATA_DIR` - Content directory, see `ContentFactory` (default: unset)
    /// - `DUEL_CARDS_PATH` - Card catalog, `.json` or `.ron` (default: bundled)
    /// - `DUEL_CONFIG_PATH` - Duel rules TOML (default: built-in defaults)
    /// - `DUEL_RATINGS_PATH` - Rating store (default: `ratings.json`)
    /// - `DUEL_LOG_DIR` - Log file directory (default: platform cache dir)
    /// - `DUEL_COMMAND_PREFIX` - Command prefix (default: `!`)
    /// - `DUEL_ADMINS` - Comma-separated administrator ids
    /// - `DUEL_GUILD_ID` - Guild the console plays in (default: 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var_os("DUEL_DATA_DIR").map(PathBuf::from);
        config.cards_path = env::var_os("DUEL_CARDS_PATH").map(PathBuf::from);
        config.config_path = env::var_os("DUEL_CONFIG_PATH").map(PathBuf::from);

        if let Some(path) = env::var_os("DUEL_RATINGS_PATH") {
            config.ratings_path = PathBuf::from(path);
        }

        if let Some(dir) = env::var_os("DUEL_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        if let Ok(prefix) = env::var("DUEL_COMMAND_PREFIX")
            && !prefix.trim().is_empty()
        {
            config.command_prefix = prefix.trim().to_string();
        }

        if let Ok(admins) = env::var("DUEL_ADMINS") {
            config.admins = parse_admins(&admins);
        }

        if let Some(guild) = read_env::<u64>("DUEL_GUILD_ID") {
            config.guild = GuildId(guild);
        }

        config
    }
}

/// Comma-separated ids; entries that are not numbers are skipped.
fn parse_admins(value: &str) -> HashSet<PlayerId> {
    value
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .map(PlayerId)
        .collect()
}

/// Platform log directory, e.g. `~/.cache/duel-bot/logs` on Linux.
fn default_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "duel-bot").map(|dirs| dirs.cache_dir().join("logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
