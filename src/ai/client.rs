//! HTTP client for the AI reviewer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::error::{GavelError, Result};
use crate::host::ReviewContext;

use super::prompt::build_review_prompt;
use super::types::AiReview;
use super::AiReviewer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Completion request sent to the model endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

/// Completion response: the model's output text, which must itself be the
/// review JSON
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Production [`AiReviewer`] talking to a completion-style HTTP API
pub struct HttpAiReviewer {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HttpAiReviewer {
    pub fn new(config: &AiConfig) -> Result<Self> {
        if config.api_url.is_empty() {
            return Err(GavelError::config("AI reviewer API URL is required"));
        }
        if config.api_key.is_empty() {
            return Err(GavelError::config("AI reviewer API key is required"));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GavelError::config("failed to create HTTP client").with_source(e))?;

        info!(model = %config.model, "initialized AI reviewer client");

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Extract the review JSON from the model output, tolerating a
    /// markdown code fence around it
    fn parse_review(content: &str) -> Result<AiReview> {
        let trimmed = content.trim();
        let body = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .unwrap_or(trimmed);

        serde_json::from_str(body.trim())
            .map_err(|e| GavelError::ai("failed to parse reviewer response as JSON").with_source(e))
    }
}

#[async_trait]
impl AiReviewer for HttpAiReviewer {
    async fn review(&self, context: &ReviewContext) -> Result<AiReview> {
        let prompt = build_review_prompt(context);
        debug!(
            change = %context.change.change_id,
            prompt_len = prompt.len(),
            "sending review request"
        );

        let request = CompletionRequest {
            model: &self.model,
            prompt: &prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GavelError::ai("reviewer request failed").with_source(e))?
            .error_for_status()
            .map_err(|e| GavelError::ai("reviewer returned an error status").with_source(e))?;

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GavelError::ai("malformed completion envelope").with_source(e))?;

        if completion.content.trim().is_empty() {
            return Err(GavelError::ai("empty response from reviewer"));
        }

        let review = Self::parse_review(&completion.content)?;
        info!(
            change = %context.change.change_id,
            overall = review.overall_score,
            "received AI review"
        );
        Ok(review)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_json() -> String {
        r#"{
            "overall_score": 8.0,
            "overall_feedback": "Good",
            "criteria_scores": {},
            "approval_recommendation": "APPROVE",
            "confidence_level": 0.9
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_bare_json() {
        let review = HttpAiReviewer::parse_review(&review_json()).unwrap();
        assert_eq!(review.overall_score, 8.0);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", review_json());
        let review = HttpAiReviewer::parse_review(&fenced).unwrap();
        assert_eq!(review.overall_score, 8.0);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(HttpAiReviewer::parse_review("I think it looks fine!").is_err());
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = AiConfig::default();
        assert!(HttpAiReviewer::new(&config).is_err());
    }
}
