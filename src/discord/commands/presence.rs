// Bot presence and lifecycle events.
//
// Discord-layer glue only: we work with Discord SDK types (Context, Ready,
// ActivityData) and keep the logic short.

use poise::serenity_prelude as serenity;

/// Announce the login and show that the bot answers mentions.
pub fn on_ready(ctx: &serenity::Context, ready: &serenity::Ready) {
    tracing::info!("✅ Logged in as {}", ready.user.tag());

    let activity = serenity::ActivityData::listening("mentions");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
