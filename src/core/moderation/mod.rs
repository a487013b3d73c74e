// Core moderation module - the strike ledger plus the moderation-check port.
// Following the same pattern as the ai module.

pub mod moderation_models;
pub mod moderation_service;
pub mod strike_ledger;

pub use moderation_models::*;
pub use moderation_service::*;
pub use strike_ledger::*;
