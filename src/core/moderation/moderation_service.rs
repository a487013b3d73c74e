// Moderation service - wraps the external moderation check.
//
// The provider trait is the port; infra supplies the HTTP implementation.
// The service adds the one thing every provider needs: a hard time limit.

use super::moderation_models::ModerationVerdict;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Moderation request failed: {0}")]
    Http(String),

    #[error("Moderation API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Malformed moderation response: {0}")]
    MalformedResponse(String),

    #[error("Moderation check timed out after {0:?}")]
    Timeout(Duration),
}

// ============================================================================
// PROVIDER TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Classify a single piece of text.
    async fn check(&self, text: &str) -> Result<ModerationVerdict, ModerationError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationService<P: ModerationProvider> {
    provider: P,
    timeout: Duration,
}

impl<P: ModerationProvider> ModerationService<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Run the text through the provider, giving up after the configured timeout.
    pub async fn check(&self, text: &str) -> Result<ModerationVerdict, ModerationError> {
        let verdict = tokio::time::timeout(self.timeout, self.provider.check(text))
            .await
            .map_err(|_| ModerationError::Timeout(self.timeout))??;

        if verdict.flagged {
            tracing::info!(categories = ?verdict.categories, "Message flagged by moderation");
        }

        Ok(verdict)
    }
}
