//! Narrative insight adapters.
//!
//! [`GeminiInsightClient`] talks to a `generateContent`-style HTTP API and is
//! allowed to fail. [`FallbackInsightProvider`] wraps any client and turns
//! every failure into the static insight, so callers always get something to
//! display.

use crate::domain::model::{CountryArchetype, Insight, InsightOutcome};
use crate::domain::ports::{InsightClient, InsightProvider};
use crate::utils::error::{PopuvizError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const KEY_STAT_COUNT: usize = 3;

pub fn fallback_insight() -> Insight {
    Insight {
        title: "Demographic Trends".to_string(),
        content: "As nations progress, they typically move from high birth and death rates to low \
                  birth and death rates. This transition impacts economic growth, healthcare, and \
                  social structures."
            .to_string(),
        key_stats: vec![
            "Birth Rate: Variable".to_string(),
            "Life Expectancy: Improving".to_string(),
            "Median Age: Rising".to_string(),
        ],
    }
}

pub fn build_prompt(year: i32, archetype: CountryArchetype) -> String {
    let kind = match archetype {
        CountryArchetype::Developed => "Developed",
        CountryArchetype::Developing => "Developing",
    };
    format!(
        "Analyze the demographic situation of a {kind} country in the year {year}.\n\
         Provide:\n\
         1. A short educational title.\n\
         2. A brief analysis of challenges (e.g., aging population, workforce shortage, or youth bulge).\n\
         3. 3 key demographic \"stats\" (realistic but fictional).\n\n\
         Return the response in JSON format matching this structure:\n\
         {{\n  \"title\": \"string\",\n  \"content\": \"string\",\n  \"keyStats\": [\"string\", \"string\", \"string\"]\n}}"
    )
}

/// Parses the provider's text payload, tolerating a surrounding code fence.
pub fn parse_insight(text: &str) -> Result<Insight> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let insight: Insight =
        serde_json::from_str(body).map_err(|e| PopuvizError::InsightResponseError {
            message: format!("insight payload is not valid JSON: {}", e),
        })?;

    if insight.title.trim().is_empty() || insight.content.trim().is_empty() {
        return Err(PopuvizError::InsightResponseError {
            message: "title and content must not be empty".to_string(),
        });
    }
    if insight.key_stats.len() != KEY_STAT_COUNT {
        return Err(PopuvizError::InsightResponseError {
            message: format!(
                "expected {} key stats, got {}",
                KEY_STAT_COUNT,
                insight.key_stats.len()
            ),
        });
    }

    Ok(insight)
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiInsightClient {
    settings: GeminiSettings,
    client: Client,
}

impl GeminiInsightClient {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self { settings, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl InsightClient for GeminiInsightClient {
    async fn request_insight(&self, year: i32, archetype: CountryArchetype) -> Result<Insight> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PopuvizError::MissingConfigError {
                field: "insight.api_key".to_string(),
            })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(year, archetype)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        tracing::debug!("Requesting insight from: {}", self.url());
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Insight response status: {}", status);
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PopuvizError::InsightProviderError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .ok_or_else(|| PopuvizError::InsightResponseError {
                message: "response contained no text candidate".to_string(),
            })?;

        parse_insight(&text)
    }
}

/// Wraps a fallible client; failures are logged and replaced by the static insight.
pub struct FallbackInsightProvider<C: InsightClient> {
    client: C,
}

impl<C: InsightClient> FallbackInsightProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: InsightClient> InsightProvider for FallbackInsightProvider<C> {
    async fn fetch_insight(&self, year: i32, archetype: CountryArchetype) -> InsightOutcome {
        match self.client.request_insight(year, archetype).await {
            Ok(insight) => InsightOutcome::Generated(insight),
            Err(e) => {
                tracing::warn!(
                    "Insight fetch failed for {} in {}: {} (Category: {:?})",
                    archetype,
                    year,
                    e,
                    e.category()
                );
                InsightOutcome::Fallback(fallback_insight())
            }
        }
    }
}

/// Always answers with the static insight. Used offline and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticInsightProvider;

#[async_trait]
impl InsightProvider for StaticInsightProvider {
    async fn fetch_insight(&self, _year: i32, _archetype: CountryArchetype) -> InsightOutcome {
        InsightOutcome::Fallback(fallback_insight())
    }
}
