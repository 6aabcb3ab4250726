//! The claim extraction stage and its API client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use veris_core::{AppConfig, Category, Claim, ExtractedFrom, RawItem};

use crate::error::ExtractError;
use crate::pacer::Pacer;

/// Keys shorter than this fail the shape check and block any network call.
const MIN_API_KEY_LEN: usize = 20;
/// Prompts shorter than this carry too little signal to extract from. The
/// prompt template itself contributes ~51 characters, so this floor demands
/// roughly 50 characters of actual title + body text.
const MIN_PROMPT_LEN: usize = 100;
/// Character budget for the item body, respecting the API's input limits.
const BODY_CHAR_BUDGET: usize = 3000;
const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 500;
/// Fixed confidence assigned to every extracted claim.
const CLAIM_CONFIDENCE: f32 = 0.8;
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

const SYSTEM_INSTRUCTION: &str = "Extract key factual claims from news content. \
Return JSON with claims array: {\"claims\": [{\"claim\": \"statement\", \"category\": \"politics\"}]}. \
Categories: politics, health, science, economy, social, technology, other.";

/// Configuration for the extraction stage.
#[derive(Clone)]
pub struct ExtractorConfig {
    /// API key; `None` or too short means every item fails closed.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL of the chat-completions API, without the request path.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Minimum spacing between successive extraction requests.
    pub min_request_interval: Duration,
}

impl ExtractorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
            base_url: config.ai_base_url.clone(),
            timeout_secs: config.ai_timeout_secs,
            min_request_interval: Duration::from_millis(config.ai_min_request_interval_ms),
        }
    }
}

impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("min_request_interval", &self.min_request_interval)
            .finish()
    }
}

/// Batch claim extraction over raw items.
///
/// The batch result maps each item's URL to its claims; failed items map to
/// an empty list, never to an absent key.
#[async_trait]
pub trait ClaimExtractor: Send + Sync {
    async fn extract_batch(&self, items: &[RawItem]) -> HashMap<String, Vec<Claim>>;
}

#[async_trait]
impl<T: ClaimExtractor + ?Sized> ClaimExtractor for Arc<T> {
    async fn extract_batch(&self, items: &[RawItem]) -> HashMap<String, Vec<Claim>> {
        (**self).extract_batch(items).await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
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

/// One entry of the model's `claims` array, before normalization.
struct RawClaim {
    claim: Option<String>,
    category: Option<String>,
}

/// Extracts claims by prompting a chat-completions API.
pub struct ExtractionStage {
    client: reqwest::Client,
    config: ExtractorConfig,
    endpoint: String,
    pacer: Mutex<Pacer>,
}

impl ExtractionStage {
    /// Create the stage and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let endpoint = format!(
            "{}{COMPLETIONS_PATH}",
            config.base_url.trim_end_matches('/')
        );
        let pacer = Mutex::new(Pacer::new(config.min_request_interval));
        Ok(Self {
            client,
            config,
            endpoint,
            pacer,
        })
    }

    /// Extract claims from one item.
    ///
    /// Never fails past this boundary: credential and prompt gates, network
    /// errors, and malformed responses all produce an empty list.
    pub async fn extract(&self, item: &RawItem) -> Vec<Claim> {
        let Some(api_key) = self.usable_api_key() else {
            tracing::warn!(url = %item.url, "invalid or missing API key; skipping extraction");
            return Vec::new();
        };

        let prompt = build_prompt(item);
        if prompt.chars().count() < MIN_PROMPT_LEN {
            tracing::warn!(url = %item.url, "content too short; skipping extraction");
            return Vec::new();
        }

        let content = match self.request_completion(api_key, &prompt).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(url = %item.url, error = %e, "extraction request failed");
                return Vec::new();
            }
        };

        match parse_claims(&content) {
            Ok(raw_claims) => {
                let claims: Vec<Claim> = raw_claims
                    .into_iter()
                    .map(|raw| to_claim(raw, item))
                    .collect();
                tracing::info!(url = %item.url, count = claims.len(), "claims extracted");
                claims
            }
            Err(e) => {
                tracing::warn!(url = %item.url, error = %e, "invalid extraction response");
                Vec::new()
            }
        }
    }

    fn usable_api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| key.len() >= MIN_API_KEY_LEN)
    }

    async fn request_completion(&self, api_key: &str, prompt: &str) -> Result<String, ExtractError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractError::Api {
                status: response.status().as_u16(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ExtractError::MalformedResponse("response has no choices".to_string()))
    }
}

#[async_trait]
impl ClaimExtractor for ExtractionStage {
    /// Process items strictly sequentially, spacing requests by the
    /// configured minimum interval. A failure on one item never prevents the
    /// next from being attempted.
    async fn extract_batch(&self, items: &[RawItem]) -> HashMap<String, Vec<Claim>> {
        let mut results = HashMap::with_capacity(items.len());

        for item in items {
            self.pacer.lock().await.wait().await;
            let claims = self.extract(item).await;
            results.insert(item.url.clone(), claims);
        }

        results
    }
}

/// Assemble the user prompt from the item's title and a capped slice of its
/// body text.
fn build_prompt(item: &RawItem) -> String {
    let title = item.metadata.title.as_deref().unwrap_or("");
    let truncated: String = item.raw_text.chars().take(BODY_CHAR_BUDGET).collect();
    format!("Title: {title}\n\nContent: {truncated}\n\nExtract all key factual claims.")
}

/// Parse the model's text output as the `{"claims": [...]}` schema.
fn parse_claims(content: &str) -> Result<Vec<RawClaim>, ExtractError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ExtractError::MalformedResponse(format!("not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| ExtractError::MalformedResponse("response is not a JSON object".to_string()))?;

    let claims = object
        .get("claims")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ExtractError::MalformedResponse("`claims` is missing or not an array".to_string())
        })?;

    Ok(claims
        .iter()
        .map(|entry| RawClaim {
            claim: entry.get("claim").and_then(Value::as_str).map(str::to_owned),
            category: entry
                .get("category")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
        .collect())
}

/// Normalize one raw claim: missing text becomes an empty string, unknown
/// categories default to `other`, confidence is the stage's fixed constant.
fn to_claim(raw: RawClaim, item: &RawItem) -> Claim {
    Claim {
        claim: raw.claim.unwrap_or_default(),
        category: raw
            .category
            .as_deref()
            .map_or(Category::Other, Category::from_label),
        confidence: CLAIM_CONFIDENCE,
        extracted_from: ExtractedFrom {
            content_type: item.content_type,
            source_url: item.url.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use veris_core::{ContentType, ItemMetadata};

    use super::*;

    fn item(url: &str, title: &str, body: &str) -> RawItem {
        RawItem {
            source: "test".to_string(),
            url: url.to_string(),
            content_type: ContentType::Text,
            raw_text: body.to_string(),
            images: None,
            videos: None,
            metadata: ItemMetadata {
                title: Some(title.to_string()),
                ..ItemMetadata::default()
            },
        }
    }

    #[test]
    fn build_prompt_includes_title_and_body() {
        let prompt = build_prompt(&item("http://x/1", "T", "Some body text"));
        assert!(prompt.starts_with("Title: T\n\nContent: Some body text"));
        assert!(prompt.ends_with("Extract all key factual claims."));
    }

    #[test]
    fn build_prompt_caps_body_at_budget() {
        let long_body = "x".repeat(BODY_CHAR_BUDGET * 2);
        let prompt = build_prompt(&item("http://x/1", "T", &long_body));
        let xs = prompt.chars().filter(|&c| c == 'x').count();
        assert_eq!(xs, BODY_CHAR_BUDGET);
    }

    #[test]
    fn parse_claims_rejects_non_json() {
        assert!(parse_claims("definitely not json").is_err());
    }

    #[test]
    fn parse_claims_rejects_non_object() {
        assert!(parse_claims("[1, 2, 3]").is_err());
        assert!(parse_claims("\"just a string\"").is_err());
    }

    #[test]
    fn parse_claims_rejects_non_array_claims() {
        assert!(parse_claims("{\"claims\": 42}").is_err());
        assert!(parse_claims("{\"other\": []}").is_err());
    }

    #[test]
    fn parse_claims_accepts_valid_schema() {
        let raw = parse_claims(
            "{\"claims\": [{\"claim\": \"Sky is blue\", \"category\": \"science\"}, {}]}",
        )
        .expect("valid schema should parse");
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].claim.as_deref(), Some("Sky is blue"));
        assert_eq!(raw[0].category.as_deref(), Some("science"));
        assert!(raw[1].claim.is_none());
    }

    #[test]
    fn to_claim_applies_defaults() {
        let source = item("http://x/1", "T", "body");
        let claim = to_claim(
            RawClaim {
                claim: None,
                category: Some("nonsense".to_string()),
            },
            &source,
        );
        assert_eq!(claim.claim, "");
        assert_eq!(claim.category, Category::Other);
        assert!((claim.confidence - 0.8).abs() < f32::EPSILON);
        assert_eq!(claim.extracted_from.source_url, "http://x/1");
        assert_eq!(claim.extracted_from.content_type, ContentType::Text);
    }
}
