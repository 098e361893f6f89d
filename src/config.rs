use anyhow::{Context, Result};

/// Runtime configuration, loaded once at startup from the environment.
///
/// The hosting platform provides everything through env vars; there is no
/// config file. `BOT_TOKEN` is the only required variable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API credential (`BOT_TOKEN`, required).
    pub bot_token: String,
    /// Chat id for startup/diagnostic notifications (`LOG_CHAT_ID`, optional).
    pub log_chat_id: Option<i64>,
    /// Telegram long-poll timeout in seconds (`POLL_TIMEOUT_SEC`).
    pub poll_timeout_sec: u32,
    /// Backoff after a failed poll, in seconds (`POLL_SLEEP_SEC`).
    pub poll_sleep_sec: u64,
    /// Health server port (`PORT`, injected by the hosting platform).
    pub port: u16,
}

fn default_poll_timeout_sec() -> u32 {
    25
}

fn default_poll_sleep_sec() -> u64 {
    2
}

fn default_port() -> u16 {
    5000
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Tests pass a closure over a map so
    /// they never touch process-global environment state.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = get("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .context("BOT_TOKEN environment variable is required")?;

        let log_chat_id = get("LOG_CHAT_ID")
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("LOG_CHAT_ID must be a chat id, got {raw:?}"))
            })
            .transpose()?;

        let poll_timeout_sec = parse_or(
            get("POLL_TIMEOUT_SEC"),
            "POLL_TIMEOUT_SEC",
            default_poll_timeout_sec(),
        )?;
        let poll_sleep_sec = parse_or(
            get("POLL_SLEEP_SEC"),
            "POLL_SLEEP_SEC",
            default_poll_sleep_sec(),
        )?;
        let port = parse_or(get("PORT"), "PORT", default_port())?;

        Ok(Self {
            bot_token,
            log_chat_id,
            poll_timeout_sec,
            poll_sleep_sec,
            port,
        })
    }
}

/// Parse an optional numeric env value, falling back to `default` when unset.
/// A value that is set but unparseable is a startup error, not a silent
/// fallback.
fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be an integer, got {raw:?}")),
        None => Ok(default),
    }
}
