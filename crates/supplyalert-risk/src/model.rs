//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RiskError;
use crate::types::GenerationSettings;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const SERVICE: &str = "model";

/// One prompt plus the sampling parameters to run it with.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub settings: GenerationSettings,
    /// Ask the model to constrain output to the verdict JSON schema.
    pub structured: bool,
}

/// A text-generating model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run the prompt and return the model's raw text answer.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RiskError>;
}

/// HTTP client for the Gemini REST API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Response schema for the structured verdict.
fn verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER" },
            "explanation": { "type": "STRING" },
            "verdict": { "type": "STRING" }
        },
        "required": ["score", "explanation", "verdict"]
    })
}

impl GeminiClient {
    /// Creates a client for `model` against the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Upstream`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, RiskError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Upstream`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, RiskError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("supplyalert/0.1 (route-risk)")
            .build()
            .map_err(|e| RiskError::upstream(SERVICE, format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            url: format!(
                "{}/v1beta/models/{model}:generateContent",
                base_url.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, RiskError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.settings.temperature,
                max_output_tokens: request.settings.max_output_tokens,
                response_mime_type: request.structured.then_some("application/json"),
                response_schema: request.structured.then(verdict_schema),
            },
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RiskError::upstream(SERVICE, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RiskError::upstream(
                SERVICE,
                format!("returned status {status}: {}", truncate(&detail, 300)),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RiskError::upstream(SERVICE, format!("response parse error: {e}")))?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, RiskError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(RiskError::upstream(
            SERVICE,
            format!("empty response: {reason}"),
        ));
    };

    let finish_reason = candidate
        .finish_reason
        .unwrap_or_else(|| "unknown".to_string());
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(RiskError::upstream(
            SERVICE,
            format!("empty answer: finish reason {finish_reason}"),
        ));
    }

    Ok(text)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
