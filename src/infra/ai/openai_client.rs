use crate::core::ai::{AiConfig, AiError, AiMessage, AiProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Chat completions against any OpenAI-compatible endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        base_url: String,
        connect_timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Pull the reply text out of a completion response body.
fn extract_content(response: CompletionResponse) -> Result<String, AiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AiError::MalformedResponse("missing choices[0].message.content".into()))
}

#[async_trait]
impl AiProvider for OpenAiClient {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let payload = json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": config.max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AiError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| AiError::Http(e.to_string()))?;
            return Err(AiError::Api { status, body });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        extract_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();

        assert_eq!(extract_content(parsed).unwrap(), "Hello!");
    }

    #[test]
    fn test_missing_content_is_malformed() {
        let no_choices: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            extract_content(no_choices),
            Err(AiError::MalformedResponse(_))
        ));

        let null_content: CompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            extract_content(null_content),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = OpenAiClient::new(
            "key".to_string(),
            "https://api.openai.com/v1/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        // Port 9 (discard) is closed on test machines; the connect fails fast
        let client = OpenAiClient::new(
            "key".to_string(),
            "http://127.0.0.1:9/v1".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();
        let config = AiConfig {
            model: "test-model".to_string(),
            max_tokens: 10,
        };

        let err = client
            .chat_complete(&[AiMessage::user("hello")], &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Http(_)));
    }
}
