// Strike ledger - the three-strikes decision engine.
//
// Turns one (user, flagged) pair into a StrikeAction and updates the
// per-user record. Counters live only for the lifetime of the process.
//
// NO Discord dependencies here - just pure domain logic.

use super::moderation_models::{StrikeAction, StrikeStatus, BLOCK_AFTER};
use dashmap::DashMap;

/// Data we keep for each user that has ever been flagged.
#[derive(Debug, Clone, Copy, Default)]
struct StrikeRecord {
    strikes: u32,
    blocked: bool,
}

/// In-memory strike ledger.
///
/// Every `evaluate` runs inside the DashMap entry guard for that user, so two
/// flagged messages from the same user arriving at once are serialized and
/// both strikes are counted.
pub struct StrikeLedger {
    /// Maps user_id -> strike record
    records: DashMap<u64, StrikeRecord>,
}

impl StrikeLedger {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Precondition check run before the moderation API is consulted.
    pub fn is_blocked(&self, user_id: u64) -> bool {
        self.records
            .get(&user_id)
            .map(|record| record.blocked)
            .unwrap_or(false)
    }

    /// Apply one moderation verdict for a user.
    ///
    /// Blocked users short-circuit without touching their record, and a clean
    /// verdict never creates or changes a record.
    pub fn evaluate(&self, user_id: u64, flagged: bool) -> StrikeAction {
        if !flagged {
            return if self.is_blocked(user_id) {
                StrikeAction::AlreadyBlocked
            } else {
                StrikeAction::Allowed
            };
        }

        // Holding the entry locks this user's shard until we're done.
        let mut record = self.records.entry(user_id).or_default();
        if record.blocked {
            return StrikeAction::AlreadyBlocked;
        }

        record.strikes = record.strikes.saturating_add(1);
        let strikes = record.strikes;

        if strikes >= BLOCK_AFTER {
            record.blocked = true;
            drop(record);
            tracing::warn!(
                user_id,
                strikes,
                blocked_users = self.blocked_count(),
                "User blocked after repeated flagged messages"
            );
            StrikeAction::BlockedNow
        } else {
            tracing::warn!(user_id, strikes, "Recorded moderation strike");
            StrikeAction::Warned { strikes }
        }
    }

    /// Snapshot of a user's record. Unknown users are clean.
    pub fn status(&self, user_id: u64) -> StrikeStatus {
        self.records
            .get(&user_id)
            .map(|record| StrikeStatus {
                strikes: record.strikes,
                blocked: record.blocked,
            })
            .unwrap_or_default()
    }

    /// Number of users currently in the blocked set.
    pub fn blocked_count(&self) -> usize {
        self.records.iter().filter(|entry| entry.blocked).count()
    }
}

impl Default for StrikeLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
