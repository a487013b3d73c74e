// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "relay/mention_relay.rs"]
pub mod relay;

use crate::core::moderation::StrikeLedger;
use crate::core::relay::RelayService;
use crate::infra::ai::OpenAiClient;
use crate::infra::moderation::OpenAiModerationClient;
use chrono_tz::Tz;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command and event.
pub struct Data {
    pub strikes: Arc<StrikeLedger>,
    pub relay: Arc<RelayService<OpenAiModerationClient, OpenAiClient>>,
    /// Zone that decides which calendar date goes into the system prompt
    pub timezone: Tz,
}
