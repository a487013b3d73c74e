// Strike status slash command. Read-only: blocks last for the lifetime of
// the process and there is no reset.

use crate::core::moderation::{StrikeStatus, BLOCK_AFTER};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Show how many moderation strikes a user has.
#[poise::command(slash_command)]
pub async fn strikes(
    ctx: Context<'_>,
    #[description = "User to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target = user.as_ref().unwrap_or_else(|| ctx.author());
    let status = ctx.data().strikes.status(target.id.get());

    ctx.say(describe_status(&target.name, status, BLOCK_AFTER))
        .await?;
    Ok(())
}

fn describe_status(name: &str, status: StrikeStatus, block_after: u32) -> String {
    if status.blocked {
        format!(
            "🚫 **{}** is blocked ({}/{} strikes).",
            name, status.strikes, block_after
        )
    } else if status.strikes == 0 {
        format!("✅ **{}** has no strikes.", name)
    } else {
        format!(
            "⚠️ **{}** has {}/{} strikes.",
            name, status.strikes, block_after
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_clean_user() {
        assert_eq!(
            describe_status("ferris", StrikeStatus::default(), 3),
            "✅ **ferris** has no strikes."
        );
    }

    #[test]
    fn test_describe_warned_and_blocked_users() {
        let warned = StrikeStatus {
            strikes: 2,
            blocked: false,
        };
        assert_eq!(
            describe_status("ferris", warned, 3),
            "⚠️ **ferris** has 2/3 strikes."
        );

        let blocked = StrikeStatus {
            strikes: 3,
            blocked: true,
        };
        assert_eq!(
            describe_status("ferris", blocked, 3),
            "🚫 **ferris** is blocked (3/3 strikes)."
        );
    }
}
