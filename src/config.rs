// Process configuration, read once at startup from the environment.
//
// `main` loads `.env` (if present) with dotenv before calling `from_env`, so
// local development and hosted deployments read the same variables.

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_MODERATION_MODEL: &str = "omni-moderation-latest";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub moderation_model: String,
    pub max_tokens: u32,
    /// Upper bound on each moderation and completion call
    pub request_timeout: Duration,
    /// Zone used to decide what "today" is in the system prompt
    pub timezone: Tz,
    /// Extra operator instructions appended after the date line
    pub extra_instructions: Option<String>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| anyhow!("Missing {key} environment variable!"))
        };

        let max_tokens = match get("OPENAI_MAX_TOKENS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("OPENAI_MAX_TOKENS must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_MAX_TOKENS,
        };
        if max_tokens == 0 {
            return Err(anyhow!("OPENAI_MAX_TOKENS must be greater than zero"));
        }

        let timeout_secs = match get("OPENAI_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("OPENAI_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("OPENAI_TIMEOUT_SECS must be greater than zero"));
        }

        let timezone = match get("BOT_TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| anyhow!("BOT_TIMEZONE {raw:?} is not a known time zone: {e}"))?,
            None => chrono_tz::UTC,
        };

        let extra_instructions = match get("SYSTEM_PROMPT_FILE") {
            Some(path) => Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read system prompt file at {path}"))?,
            ),
            None => get("SYSTEM_PROMPT"),
        };

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            api_key: required("OPENAI_API_KEY")?,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            moderation_model: get("OPENAI_MODERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_MODERATION_MODEL.to_string()),
            max_tokens,
            request_timeout: Duration::from_secs(timeout_secs),
            timezone,
            extra_instructions,
        })
    }
}
