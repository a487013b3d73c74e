// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "relay/mod.rs"]
pub mod relay;
