// Relay service - decides what happens to one mention of the bot.
//
// The flow is split in two so the Discord layer can post its placeholder in
// between:
// 1. `decide`: blocked check, mention removal, moderation, strike ledger
// 2. `generate`: completion for a message that was allowed through
//
// NO Discord dependencies here - the caller passes primitives in and turns
// the outcome into replies.

use crate::core::ai::{AiError, AiProvider, AiService};
use crate::core::moderation::{
    ModerationError, ModerationProvider, ModerationService, StrikeAction, StrikeLedger,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Why a mention was refused instead of answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// User was blocked before this message
    Blocked,
    /// This message was the strike that blocked the user
    BlockedNow,
    /// Message was flagged; the user is not blocked yet
    Warned,
}

/// Outcome of the first half of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayDecision {
    /// Nothing left to answer once the mention is removed
    Ignore,
    /// Answer with a refusal notice and stop
    Refuse(Refusal),
    /// Go ahead and generate a reply for this cleaned text
    Generate(String),
}

/// Outcome of the completion half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayReply {
    Answer(String),
    /// The model returned nothing usable
    Fallback,
}

pub struct RelayService<M: ModerationProvider, A: AiProvider> {
    strikes: Arc<StrikeLedger>,
    moderation: ModerationService<M>,
    ai: AiService<A>,
}

impl<M: ModerationProvider, A: AiProvider> RelayService<M, A> {
    pub fn new(
        strikes: Arc<StrikeLedger>,
        moderation: ModerationService<M>,
        ai: AiService<A>,
    ) -> Self {
        Self {
            strikes,
            moderation,
            ai,
        }
    }

    /// Decide whether a mention gets answered.
    ///
    /// Blocked users are refused before the mention is even inspected, and
    /// neither they nor empty messages ever reach the moderation provider.
    pub async fn decide(
        &self,
        user_id: u64,
        content: &str,
        bot_id: u64,
    ) -> Result<RelayDecision, ModerationError> {
        if self.strikes.is_blocked(user_id) {
            return Ok(RelayDecision::Refuse(Refusal::Blocked));
        }

        let user_text = strip_bot_mention(content, bot_id);
        if user_text.is_empty() {
            return Ok(RelayDecision::Ignore);
        }

        let verdict = self.moderation.check(&user_text).await?;

        let decision = match self.strikes.evaluate(user_id, verdict.flagged) {
            StrikeAction::Allowed => RelayDecision::Generate(user_text),
            StrikeAction::Warned { .. } => RelayDecision::Refuse(Refusal::Warned),
            StrikeAction::BlockedNow => RelayDecision::Refuse(Refusal::BlockedNow),
            // Blocked by a concurrent message while we were waiting on moderation
            StrikeAction::AlreadyBlocked => RelayDecision::Refuse(Refusal::Blocked),
        };

        Ok(decision)
    }

    /// Generate the reply for text that `decide` let through.
    pub async fn generate(&self, user_text: &str, today: NaiveDate) -> Result<RelayReply, AiError> {
        match self.ai.complete(user_text, today).await {
            Ok(answer) => Ok(RelayReply::Answer(answer)),
            Err(AiError::EmptyResponse) => Ok(RelayReply::Fallback),
            Err(e) => Err(e),
        }
    }
}

/// Remove every `<@id>` / `<@!id>` mention of the bot and trim what's left.
pub fn strip_bot_mention(content: &str, bot_id: u64) -> String {
    content
        .replace(&format!("<@{}>", bot_id), "")
        .replace(&format!("<@!{}>", bot_id), "")
        .trim()
        .to_string()
}

// ============================================================================
// TESTS
// ============================================================================
