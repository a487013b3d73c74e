// Discord-specific mention relay - translates core relay outcomes into
// Discord replies.
//
// The core decides; this layer only extracts primitives from Discord types,
// posts the placeholder and edits it with the result.

use crate::core::relay::{Refusal, RelayDecision, RelayReply};
use crate::discord::{Data, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;

pub const BLOCKED_REPLY: &str =
    "🚫 You are blocked from using this bot due to repeated inappropriate messages.";
pub const BLOCKED_NOW_REPLY: &str =
    "🚫 user.. asked an inappropriate question multiple times and is now blocked.";
pub const WARNED_REPLY: &str =
    "⚠️ user.. asked an inappropriate question and will not be generated.";
pub const PLACEHOLDER_REPLY: &str = "💭 Generating message...";
pub const EMPTY_COMPLETION_REPLY: &str = "⚠️ Sorry, I couldn't generate a response.";
pub const ERROR_REPLY: &str = "⚠️ I hit an error while processing that.";

/// Discord rejects message bodies longer than this many characters.
const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Entry point for every new message.
///
/// Failures past the mention check are logged and answered with a generic
/// apology; they never bubble up to the framework.
pub async fn handle_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    // Ignore bot messages (including our own)
    if msg.author.bot {
        return Ok(());
    }

    let bot_id = ctx.cache.current_user().id;
    if !msg.mentions.iter().any(|u| u.id == bot_id) {
        return Ok(());
    }

    if let Err(err) = relay_mention(ctx, msg, data, bot_id.get()).await {
        tracing::error!(user_id = msg.author.id.get(), "Bot error: {}", err);
        if let Err(e) = msg.reply(&ctx.http, ERROR_REPLY).await {
            tracing::warn!("Failed to send error reply: {}", e);
        }
    }

    Ok(())
}

async fn relay_mention(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    bot_id: u64,
) -> Result<(), Error> {
    let decision = data
        .relay
        .decide(msg.author.id.get(), &msg.content, bot_id)
        .await?;

    let user_text = match decision {
        RelayDecision::Ignore => return Ok(()),
        RelayDecision::Refuse(refusal) => {
            msg.reply(&ctx.http, refusal_reply(refusal)).await?;
            return Ok(());
        }
        RelayDecision::Generate(text) => text,
    };

    let today = Utc::now().with_timezone(&data.timezone).date_naive();
    let mut placeholder = msg.reply(&ctx.http, PLACEHOLDER_REPLY).await?;

    let content = match data.relay.generate(&user_text, today).await? {
        RelayReply::Answer(answer) => fit_discord_limit(&answer),
        RelayReply::Fallback => EMPTY_COMPLETION_REPLY.to_string(),
    };

    placeholder
        .edit(&ctx.http, serenity::EditMessage::new().content(content))
        .await?;

    Ok(())
}

/// User-facing notice for a refused mention.
pub fn refusal_reply(refusal: Refusal) -> &'static str {
    match refusal {
        Refusal::Blocked => BLOCKED_REPLY,
        Refusal::BlockedNow => BLOCKED_NOW_REPLY,
        Refusal::Warned => WARNED_REPLY,
    }
}

fn fit_discord_limit(text: &str) -> String {
    if text.chars().count() <= DISCORD_MESSAGE_LIMIT {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(DISCORD_MESSAGE_LIMIT - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_replies() {
        assert_eq!(refusal_reply(Refusal::Warned), WARNED_REPLY);
        assert_eq!(refusal_reply(Refusal::BlockedNow), BLOCKED_NOW_REPLY);
        assert_eq!(refusal_reply(Refusal::Blocked), BLOCKED_REPLY);
    }

    #[test]
    fn test_long_answers_fit_one_message() {
        let short = "short answer";
        assert_eq!(fit_discord_limit(short), short);

        let long = "é".repeat(2500);
        let fitted = fit_discord_limit(&long);
        assert_eq!(fitted.chars().count(), DISCORD_MESSAGE_LIMIT);
        assert!(fitted.ends_with('…'));
    }
}
