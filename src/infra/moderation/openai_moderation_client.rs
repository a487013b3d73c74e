// OpenAI moderation endpoint - implements the core ModerationProvider port.

use crate::core::moderation::{ModerationError, ModerationProvider, ModerationVerdict};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

pub struct OpenAiModerationClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiModerationClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        connect_timeout: Duration,
    ) -> Result<Self, ModerationError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ModerationError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: BTreeMap<String, bool>,
}

/// Only the first result matters: we always send exactly one input.
fn into_verdict(response: ModerationResponse) -> Result<ModerationVerdict, ModerationError> {
    let result = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ModerationError::MalformedResponse("missing results[0]".into()))?;

    if !result.flagged {
        return Ok(ModerationVerdict::clean());
    }

    let categories = result
        .categories
        .into_iter()
        .filter_map(|(name, hit)| hit.then_some(name))
        .collect();

    Ok(ModerationVerdict::flagged(categories))
}

#[async_trait]
impl ModerationProvider for OpenAiModerationClient {
    async fn check(&self, text: &str) -> Result<ModerationVerdict, ModerationError> {
        let url = format!("{}/moderations", self.base_url);

        let payload = json!({
            "model": self.model,
            "input": text,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModerationError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ModerationError::Http(e.to_string()))?;
            return Err(ModerationError::Api { status, body });
        }

        let parsed: ModerationResponse = response
            .json()
            .await
            .map_err(|e| ModerationError::MalformedResponse(e.to_string()))?;

        into_verdict(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged_result_lists_triggered_categories() {
        let body = r#"{
            "id": "modr-1",
            "model": "omni-moderation-latest",
            "results": [{
                "flagged": true,
                "categories": {"harassment": true, "violence": false, "hate": true},
                "category_scores": {"harassment": 0.91, "violence": 0.01, "hate": 0.7}
            }]
        }"#;
        let parsed: ModerationResponse = serde_json::from_str(body).unwrap();
        let verdict = into_verdict(parsed).unwrap();

        assert!(verdict.flagged);
        assert_eq!(verdict.categories, vec!["harassment", "hate"]);
    }

    #[test]
    fn test_clean_result() {
        let body = r#"{"results": [{"flagged": false, "categories": {"harassment": false}}]}"#;
        let parsed: ModerationResponse = serde_json::from_str(body).unwrap();

        assert_eq!(into_verdict(parsed).unwrap(), ModerationVerdict::clean());
    }

    #[test]
    fn test_empty_results_are_malformed() {
        let parsed: ModerationResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();

        assert!(matches!(
            into_verdict(parsed),
            Err(ModerationError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client = OpenAiModerationClient::new(
            "key".to_string(),
            "http://127.0.0.1:9/v1".to_string(),
            "omni-moderation-latest".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.check("hello").await.unwrap_err();
        assert!(matches!(err, ModerationError::Http(_)));
    }
}
