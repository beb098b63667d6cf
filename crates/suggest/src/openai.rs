use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::{SuggestError, Suggestion, SuggestionClient};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4.1-nano";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROMPT: &str = "\
You are a financial categorization expert. Given one bank transaction \
description, assign it a spending category and rate your confidence.

RULES:
- Use a short, generic category name (e.g. \"Groceries\", \"Utilities\", \"Salary\").
- confidence is a number between 0 and 1; be conservative.
- keywords are merchant/service names extracted from the description, \
suitable for matching future transactions. Skip IDs, amounts, dates.

Answer with ONLY this JSON object, no explanations:
{\"category\": \"...\", \"confidence\": 0.0, \"keywords\": [\"...\"]}

TRANSACTION:
";

/// OpenAI-backed suggester. Every call is bounded by the client timeout, so a
/// batch categorization can never hang on a single transaction.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_options(api_key, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(OpenAiClient {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Point the client at a different endpoint (local proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl SuggestionClient for OpenAiClient {
    async fn suggest(&self, description: &str) -> Result<Suggestion, SuggestError> {
        let request = ChatRequest {
            model: &self.model,
            max_tokens: 512,
            temperature: 0.1,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{PROMPT}{description}"),
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Api(status.as_u16()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| SuggestError::Malformed("empty choices".to_string()))?;

        debug!(raw = content, "suggestion response");
        parse_suggestion(content)
    }
}

/// Parse a model reply into a [`Suggestion`], tolerating markdown code fences
/// some models wrap JSON in.
pub(crate) fn parse_suggestion(content: &str) -> Result<Suggestion, SuggestError> {
    let cleaned = strip_code_fences(content.trim());
    let suggestion: Suggestion = serde_json::from_str(cleaned)
        .map_err(|e| SuggestError::Malformed(format!("{e}: {cleaned}")))?;

    if !(0.0..=1.0).contains(&suggestion.confidence) {
        return Err(SuggestError::Malformed(format!(
            "confidence out of range: {}",
            suggestion.confidence
        )));
    }
    if suggestion.category.trim().is_empty() {
        return Err(SuggestError::Malformed("empty category".to_string()));
    }
    Ok(suggestion)
}

fn strip_code_fences(s: &str) -> &str {
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    s.strip_suffix("```").unwrap_or(s).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_json() {
        let s = parse_suggestion(
            r#"{"category": "Groceries", "confidence": 0.92, "keywords": ["MERCADONA"]}"#,
        )
        .unwrap();
        assert_eq!(s.category, "Groceries");
        assert_eq!(s.confidence, 0.92);
        assert_eq!(s.keywords, vec!["MERCADONA"]);
    }

    #[test]
    fn parse_without_keywords() {
        let s = parse_suggestion(r#"{"category": "Salary", "confidence": 0.85}"#).unwrap();
        assert!(s.keywords.is_empty());
    }

    #[test]
    fn parse_fenced_json() {
        let raw = "```json\n{\"category\": \"Utilities\", \"confidence\": 0.9}\n```";
        let s = parse_suggestion(raw).unwrap();
        assert_eq!(s.category, "Utilities");
    }

    #[test]
    fn parse_rejects_prose() {
        assert!(matches!(
            parse_suggestion("I think this is groceries."),
            Err(SuggestError::Malformed(_))
        ));
    }

    #[test]
    fn parse_rejects_out_of_range_confidence() {
        assert!(parse_suggestion(r#"{"category": "X", "confidence": 1.5}"#).is_err());
        assert!(parse_suggestion(r#"{"category": "X", "confidence": -0.1}"#).is_err());
    }

    #[test]
    fn parse_rejects_blank_category() {
        assert!(parse_suggestion(r#"{"category": "  ", "confidence": 0.9}"#).is_err());
    }
}
