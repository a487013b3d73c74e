use super::models::{AiConfig, AiMessage};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Completion request failed: {0}")]
    Http(String),

    #[error("Completion API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion came back empty")]
    EmptyResponse,

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a chat completion request to the AI provider and returns the raw reply text.
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, AiError>;
}

/// Formats a date the way a person would write it out, e.g. "October 7, 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// System instruction carrying today's date, optionally followed by operator instructions.
pub fn build_system_prompt(today: NaiveDate, extra_instructions: Option<&str>) -> String {
    let mut prompt = format!(
        "Today's real date is {}. Use this if the user asks about today's date.",
        format_long_date(today)
    );

    if let Some(extra) = extra_instructions.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(extra);
    }

    prompt
}

pub struct AiService<P: AiProvider> {
    provider: P,
    extra_instructions: Option<String>,
    config: AiConfig,
    timeout: Duration,
}

impl<P: AiProvider> AiService<P> {
    pub fn new(
        provider: P,
        extra_instructions: Option<String>,
        config: AiConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            extra_instructions,
            config,
            timeout,
        }
    }

    /// Generate a reply to one cleaned user message.
    ///
    /// The reply is trimmed; a blank reply is `AiError::EmptyResponse` so the
    /// caller can show its own fallback text.
    pub async fn complete(&self, user_text: &str, today: NaiveDate) -> Result<String, AiError> {
        let messages = [
            AiMessage::system(build_system_prompt(
                today,
                self.extra_instructions.as_deref(),
            )),
            AiMessage::user(user_text),
        ];

        let content = tokio::time::timeout(
            self.timeout,
            self.provider.chat_complete(&messages, &self.config),
        )
        .await
        .map_err(|_| AiError::Timeout(self.timeout))??;

        let answer = content.trim();
        if answer.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records what it was asked and answers with a canned reply.
    struct RecordingProvider {
        reply: String,
        seen: Mutex<Vec<AiMessage>>,
    }

    impl RecordingProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiProvider for RecordingProvider {
        async fn chat_complete(
            &self,
            messages: &[AiMessage],
            _config: &AiConfig,
        ) -> Result<String, AiError> {
            self.seen.lock().unwrap().extend(messages.iter().cloned());
            Ok(self.reply.clone())
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl AiProvider for SlowProvider {
        async fn chat_complete(
            &self,
            _messages: &[AiMessage],
            _config: &AiConfig,
        ) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn config() -> AiConfig {
        AiConfig {
            model: "test-model".to_string(),
            max_tokens: 300,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_long_date_has_no_padding() {
        assert_eq!(format_long_date(date(2026, 10, 7)), "October 7, 2026");
        assert_eq!(format_long_date(date(2025, 1, 31)), "January 31, 2025");
    }

    #[test]
    fn test_system_prompt_with_and_without_extras() {
        let today = date(2026, 3, 4);

        assert_eq!(
            build_system_prompt(today, None),
            "Today's real date is March 4, 2026. Use this if the user asks about today's date."
        );

        let with_extra = build_system_prompt(today, Some("  Answer like a pirate.\n"));
        assert!(with_extra.starts_with("Today's real date is March 4, 2026."));
        assert!(with_extra.ends_with("\n\nAnswer like a pirate."));

        // Whitespace-only extras are ignored
        assert_eq!(
            build_system_prompt(today, Some("   ")),
            build_system_prompt(today, None)
        );
    }

    #[tokio::test]
    async fn test_complete_sends_system_then_user() {
        let service = AiService::new(
            RecordingProvider::new("  Hi there!  \n"),
            None,
            config(),
            Duration::from_secs(1),
        );

        let answer = service
            .complete("what day is it?", date(2026, 10, 17))
            .await
            .unwrap();
        assert_eq!(answer, "Hi there!");

        let seen = service.provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, "system");
        assert!(seen[0].content.contains("October 17, 2026"));
        assert_eq!(seen[1], AiMessage::user("what day is it?"));
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_response() {
        let service = AiService::new(
            RecordingProvider::new(" \n\t "),
            None,
            config(),
            Duration::from_secs(1),
        );

        let err = service.complete("hello", date(2026, 1, 1)).await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let service = AiService::new(SlowProvider, None, config(), Duration::from_millis(20));

        let err = service.complete("hello", date(2026, 1, 1)).await.unwrap_err();
        assert!(matches!(err, AiError::Timeout(_)));
    }
}
