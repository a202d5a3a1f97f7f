//! News article summarization
//!
//! One generation call per article. On failure the caller shows the article
//! without a summary, so there is no retry here.

use crate::errors::{AdvisorError, Result};
use crate::gemini::{GenerationParams, GenerationRequest, GenerativeBackend, OutputFormat, SafetySetting};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of takeaway points requested
pub const TAKEAWAY_COUNT: usize = 10;

const TAKEAWAYS_KEY: &str = "TakeAway_points_10";
const SUMMARY_KEY: &str = "Summary_in_650_words";
const CONCLUSION_KEY: &str = "Conclusion_in_45_words";

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// Article fields the summary is written from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Structured blog-style summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Ordered, exactly [`TAKEAWAY_COUNT`] entries
    pub takeaways: Vec<String>,
    pub summary: String,
    pub conclusion: String,
}

fn response_schema() -> Value {
    let keys: Vec<String> = (1..=TAKEAWAY_COUNT).map(|i| i.to_string()).collect();
    let properties: Map<String, Value> = keys
        .iter()
        .map(|k| (k.clone(), json!({ "type": "string" })))
        .collect();

    json!({
        "type": "object",
        "properties": {
            (TAKEAWAYS_KEY): {
                "type": "object",
                "properties": properties,
                "required": keys,
            },
            (SUMMARY_KEY): { "type": "string" },
            (CONCLUSION_KEY): { "type": "string" },
        },
        "required": [TAKEAWAYS_KEY, SUMMARY_KEY, CONCLUSION_KEY],
    })
}

/// Build the summarization request for `article`
pub fn build_request(article: &ArticleSource) -> GenerationRequest {
    let schema = response_schema();
    let schema_text = serde_json::to_string_pretty(&schema).unwrap_or_default();

    let instructions = format!(
        r#"You are a blog-writer API. Read the source article below and answer with one JSON object only, no other text.

Write a short, engaging blog post that sticks to the facts of the original post: {count} takeaway points, a detailed summary of about 650 words, and a conclusion of about 45 words. Keep a natural, human tone and never output null, undefined or "NA".

Input:
- article_title: {title}
- article_description: {description}
- article_url: {url}

Output schema:
{schema}"#,
        count = TAKEAWAY_COUNT,
        title = article.title,
        description = article.description,
        url = article.url,
        schema = schema_text,
    );

    GenerationRequest {
        instructions,
        history: Vec::new(),
        query: String::new(),
        params: GenerationParams {
            temperature: 1.2,
            top_k: 64,
            top_p: 0.95,
            max_output_tokens: 8192,
            output_format: OutputFormat::Json,
            response_schema: Some(schema),
        },
        safety: HARM_CATEGORIES
            .iter()
            .map(|category| SafetySetting::new(category, BLOCK_THRESHOLD))
            .collect(),
    }
}

#[derive(Deserialize)]
struct WireSummary {
    #[serde(rename = "TakeAway_points_10")]
    takeaways: Map<String, Value>,
    #[serde(rename = "Summary_in_650_words")]
    summary: String,
    #[serde(rename = "Conclusion_in_45_words")]
    conclusion: String,
}

/// Parse the backend's JSON into an [`ArticleSummary`]
pub fn parse_summary(raw: &str) -> Result<ArticleSummary> {
    let wire: WireSummary = serde_json::from_str(raw.trim())
        .map_err(|e| AdvisorError::InvalidResponse(format!("summary is not valid JSON: {}", e)))?;

    let takeaways = (1..=TAKEAWAY_COUNT)
        .map(|i| {
            wire.takeaways
                .get(&i.to_string())
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| AdvisorError::InvalidResponse(format!("takeaway {} missing", i)))
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = wire.summary.trim().to_string();
    let conclusion = wire.conclusion.trim().to_string();
    if summary.is_empty() || conclusion.is_empty() {
        return Err(AdvisorError::InvalidResponse(
            "summary or conclusion is blank".to_string(),
        ));
    }

    Ok(ArticleSummary {
        takeaways,
        summary,
        conclusion,
    })
}

/// Summarizes articles through an injected backend
pub struct ArticleSummarizer {
    backend: Arc<dyn GenerativeBackend>,
}

impl ArticleSummarizer {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub async fn summarize(&self, article: &ArticleSource) -> Result<ArticleSummary> {
        info!(title = %article.title, "summarizing article");
        let text = self.backend.generate(&build_request(article)).await?;
        debug!(bytes = text.len(), "summary response received");
        parse_summary(&text)
    }
}
