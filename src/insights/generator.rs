//! Text-insight service seam and its HTTP implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::models::{ExamSummary, PerformanceSummary};
use crate::config::InsightConfig;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Insight service returned no text")]
    EmptyResponse,

    #[error("API key not set in ${0}")]
    MissingApiKey(String),

    #[error("Insight generation is disabled")]
    Disabled,
}

pub type Result<T> = std::result::Result<T, InsightError>;

pub const STUDY_INSIGHTS_PLACEHOLDER: &str = "Insights are not available right now.";
pub const STUDY_INSIGHTS_WAITING: &str =
    "Finish your first study session to get an analysis of your performance.";
pub const EXAM_ANALYSIS_PLACEHOLDER: &str =
    "The exam analysis could not be produced yet. Keep taking mock exams!";
pub const EXAM_ANALYSIS_WAITING: &str =
    "Your pass estimate will appear here after the first mock exam.";

/// Turns aggregated statistics into prose
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Practical advice based on study session performance
    async fn study_insights(&self, summary: &PerformanceSummary) -> Result<String>;

    /// Pass-chance estimate based on mock exam results
    async fn exam_analysis(&self, summary: &ExamSummary) -> Result<String>;
}

/// Ask for study insights, never failing: errors become a placeholder
pub async fn study_insights_or_placeholder(
    generator: &dyn InsightGenerator,
    summary: &PerformanceSummary,
) -> String {
    if summary.is_empty() {
        return STUDY_INSIGHTS_WAITING.to_string();
    }
    match generator.study_insights(summary).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => STUDY_INSIGHTS_PLACEHOLDER.to_string(),
        Err(e) => {
            log::error!("Failed to generate study insights: {}", e);
            STUDY_INSIGHTS_PLACEHOLDER.to_string()
        }
    }
}

/// Ask for an exam analysis, never failing: errors become a placeholder
pub async fn exam_analysis_or_placeholder(
    generator: &dyn InsightGenerator,
    summary: &ExamSummary,
) -> String {
    if summary.is_empty() {
        return EXAM_ANALYSIS_WAITING.to_string();
    }
    match generator.exam_analysis(summary).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => EXAM_ANALYSIS_PLACEHOLDER.to_string(),
        Err(e) => {
            log::error!("Failed to generate exam analysis: {}", e);
            EXAM_ANALYSIS_PLACEHOLDER.to_string()
        }
    }
}

const STUDY_SYSTEM_PROMPT: &str = "You are a mentor specialised in competitive exam preparation \
    and productivity. Give actionable advice grounded in the data.";

const EXAM_SYSTEM_PROMPT: &str = "You are a data analyst specialised in pass rates for large \
    competitive exams. Assess how competitive the student is.";

/// Client for the Google generative language REST API
pub struct GeminiInsightGenerator {
    client: Client,
    api_key: String,
    config: InsightConfig,
}

impl GeminiInsightGenerator {
    /// Create a client, reading the API key from the configured environment variable
    pub fn new(config: InsightConfig) -> Result<Self> {
        if !config.enabled {
            return Err(InsightError::Disabled);
        }
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| InsightError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_api_key(api_key, config)
    }

    pub fn with_api_key(api_key: String, config: InsightConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }

    async fn generate(&self, model: &str, system: &str, prompt: String) -> Result<String> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        log::debug!("Requesting insight from model {}", model);
        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InsightError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.text().ok_or(InsightError::EmptyResponse)
    }
}

#[async_trait]
impl InsightGenerator for GeminiInsightGenerator {
    async fn study_insights(&self, summary: &PerformanceSummary) -> Result<String> {
        let prompt = format!(
            "Analyse the following study performance and give 3 practical tips to improve it: {}",
            json!(summary)
        );
        self.generate(&self.config.study_model, STUDY_SYSTEM_PROMPT, prompt)
            .await
    }

    async fn exam_analysis(&self, summary: &ExamSummary) -> Result<String> {
        let prompt = format!(
            "Analyse these mock exam results: {}. Estimate a pass chance from 0 to 100 percent \
             based on consistency and progress, explain it, and say what is missing to reach 90%+. \
             Be motivating but realistic.",
            json!(summary)
        );
        self.generate(&self.config.exam_model, EXAM_SYSTEM_PROMPT, prompt)
            .await
    }
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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
