// Moderation domain models - data structures for the strike system.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer will convert these to replies.

/// Strikes at which a user is blocked for the rest of the process lifetime.
pub const BLOCK_AFTER: u32 = 3;

/// What the strike ledger decided for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeAction {
    /// Message was not flagged - go ahead and generate a reply
    Allowed,
    /// Message was flagged and a strike was recorded
    Warned { strikes: u32 },
    /// This strike pushed the user over the threshold
    BlockedNow,
    /// User was already blocked; nothing was evaluated
    AlreadyBlocked,
}

/// Read-only snapshot of one user's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrikeStatus {
    pub strikes: u32,
    pub blocked: bool,
}

/// Result of running one piece of text through the moderation provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModerationVerdict {
    /// Whether the provider classified the text as disallowed
    pub flagged: bool,
    /// Names of the categories that triggered, for logging only
    pub categories: Vec<String>,
}

impl ModerationVerdict {
    /// A verdict for text that passed moderation.
    pub fn clean() -> Self {
        Self::default()
    }

    /// A flagged verdict with the categories that triggered it.
    pub fn flagged(categories: Vec<String>) -> Self {
        Self {
            flagged: true,
            categories,
        }
    }
}
