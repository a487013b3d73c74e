// This is the entry point of the mention relay bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): strike ledger, relay flow, moderation and completion ports
// - `infra/` = Implementations of core traits (OpenAI-compatible HTTP clients)
// - `discord/` = Discord-specific adapters (mention relay, commands, presence)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::ai::{AiConfig, AiService};
use crate::core::moderation::{ModerationService, StrikeLedger};
use crate::core::relay::RelayService;
use crate::discord::commands::presence;
use crate::discord::relay;
use crate::discord::{Data, Error};
use crate::infra::ai::OpenAiClient;
use crate::infra::moderation::OpenAiModerationClient;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            presence::on_ready(ctx, data_about_bot);
        }
        serenity::FullEvent::Message { new_message } => {
            relay::handle_message(ctx, new_message, data).await?;
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    // Strike state lives exactly as long as the process
    let strike_ledger = Arc::new(StrikeLedger::new());

    let moderation_client = OpenAiModerationClient::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.moderation_model.clone(),
        config.request_timeout,
    )
    .context("Failed to create moderation client")?;
    let moderation_service = ModerationService::new(moderation_client, config.request_timeout);

    let ai_client = OpenAiClient::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.request_timeout,
    )
    .context("Failed to create completion client")?;
    let ai_config = AiConfig {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
    };
    let ai_service = AiService::new(
        ai_client,
        config.extra_instructions.clone(),
        ai_config,
        config.request_timeout,
    );

    let relay_service = Arc::new(RelayService::new(
        Arc::clone(&strike_ledger),
        moderation_service,
        ai_service,
    ));

    tracing::info!(
        model = %config.model,
        moderation_model = %config.moderation_model,
        timezone = %config.timezone,
        timeout_secs = config.request_timeout.as_secs(),
        "Services initialized"
    );

    let data = Data {
        strikes: Arc::clone(&strike_ledger),
        relay: Arc::clone(&relay_service),
        timezone: config.timezone,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT; // Required to read message content

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![discord::commands::strikes::strikes()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                // Global registration can take a while to propagate
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    Ok(())
}
