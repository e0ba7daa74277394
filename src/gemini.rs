//! Gemini-backed interpretation gateway.
//!
//! Calls the hosted `generateContent` endpoint with a JSON response schema so
//! the model answers in the report wire shape directly. The engine never
//! depends on this transport: anything implementing
//! [`InterpretationGateway`](crate::gateway::InterpretationGateway) works.

use crate::catalog::Dimension;
use crate::gateway::{DiagnosisPayload, GatewayError, InterpretationGateway};
use crate::scoring::DimensionTotals;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;

pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGateway {
    pub fn new(api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::Request(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

fn score_line(scores: &DimensionTotals, dimension: Dimension) -> String {
    format!(
        "- {}: {}",
        dimension.label(),
        scores.get(&dimension).copied().unwrap_or(0)
    )
}

fn build_prompt(scores: &DimensionTotals) -> String {
    let mut lines = String::new();
    for dimension in Dimension::ALL {
        lines.push_str(&score_line(scores, dimension));
        lines.push('\n');
    }
    format!(
        "You are a psychologist specialising in Five Factor Model (NEO) personality \
         interpretation. Below are a user's per-dimension totals (12 items per \
         dimension, so each total ranges from 12 to 60):\n{lines}\n\
         Based on these scores, produce a diagnosis report that satisfies all of:\n\
         1. An overall interpretation of the personality profile, roughly half an A4 \
         page of prose, written with depth.\n\
         2. Exactly three concrete strengths and three areas to improve, each framed \
         for everyday and work situations.\n\
         3. An activity guide for balancing the profile and easing stress: a 4-week \
         plan where every week has one overarching goal and seven daily missions, \
         each mission specific, actionable, and paired with a practical tip.\n\
         Respond strictly in the requested JSON shape."
    )
}

fn response_schema() -> serde_json::Value {
    let mission = json!({
        "type": "OBJECT",
        "properties": {
            "day": { "type": "NUMBER" },
            "task": { "type": "STRING" },
            "tip": { "type": "STRING" }
        },
        "required": ["day", "task", "tip"]
    });
    json!({
        "type": "OBJECT",
        "properties": {
            "interpretation": { "type": "STRING" },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weeklyPlans": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "week": { "type": "NUMBER" },
                        "title": { "type": "STRING" },
                        "missions": { "type": "ARRAY", "items": mission }
                    },
                    "required": ["week", "title", "missions"]
                }
            }
        },
        "required": ["interpretation", "strengths", "weaknesses", "weeklyPlans"]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

fn extract_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

/// First `max_chars` characters of an error body for log/error context.
/// Char-based so a snippet boundary never lands inside a multi-byte
/// character.
fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn parse_payload(text: &str) -> Result<DiagnosisPayload, GatewayError> {
    let payload: DiagnosisPayload = serde_json::from_str(text.trim()).map_err(|e| {
        GatewayError::InvalidResponse(format!(
            "json parse error: {}. Raw: {}",
            e,
            snippet(text, 200)
        ))
    })?;
    payload.validate()?;
    Ok(payload)
}

#[async_trait]
impl InterpretationGateway for GeminiGateway {
    async fn interpret(&self, scores: &DimensionTotals) -> Result<DiagnosisPayload, GatewayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(scores) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        let url = self.api_url();
        tracing::debug!(%url, "requesting diagnosis interpretation");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("gemini request failed: {}", e);
                GatewayError::Request(e.to_string())
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::Request(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::error!(%status, "gemini returned an error status");
            return Err(GatewayError::Request(format!(
                "HTTP {}: {}",
                status,
                snippet(&response_text, 200)
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::InvalidResponse(format!("envelope parse error: {}", e)))?;
        let text = extract_text(parsed)?;
        parse_payload(&text)
    }
}
