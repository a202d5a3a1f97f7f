//! Headline client for the RapidAPI news endpoint
//!
//! Endpoint: GET https://{host}/v1/topic-headlines

use crate::config::NewsConfig;
use crate::errors::{AdvisorError, Result};
use crate::news::types::{Article, NewsTab};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
}

/// News API client
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
    language: String,
    topic: String,
}

impl NewsClient {
    pub fn with_config(config: &NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AdvisorError::Http)?;

        Ok(Self {
            client,
            base_url: format!("https://{}", config.host),
            host: config.host.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            topic: config.topic.clone(),
        })
    }

    /// Point the client at a different origin (used against local fixtures)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn headlines_url(&self, tab: NewsTab) -> String {
        format!(
            "{}/v1/topic-headlines?country={}&language={}&topic={}",
            self.base_url,
            tab.country(),
            self.language,
            self.topic
        )
    }

    /// Fetch technology headlines for `tab`
    pub async fn fetch(&self, tab: NewsTab) -> Result<Vec<Article>> {
        let url = self.headlines_url(tab);
        debug!(%url, "fetching headlines");

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .map_err(|e| AdvisorError::NewsApi(format!("Failed to connect: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::NewsApi(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AdvisorError::NewsApi(format!("Failed to read response: {}", e)))?;

        let articles = parse_headlines(&body)?;
        info!(count = articles.len(), tab = ?tab, "headlines fetched");
        Ok(articles)
    }
}

/// Parse a headlines body; `data` may be an array or an index-keyed object.
/// Items that do not deserialize as an [`Article`] are skipped.
pub fn parse_headlines(body: &str) -> Result<Vec<Article>> {
    let response: HeadlinesResponse = serde_json::from_str(body)
        .map_err(|_| AdvisorError::NewsApi("Failed to parse response data".to_string()))?;

    let data = match (response.success, response.data) {
        (true, Some(data)) => data,
        _ => return Err(AdvisorError::NewsApi("No news data available".to_string())),
    };

    let items: Vec<Value> = match data {
        Value::Array(items) => items,
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by_key(|(key, _)| key.parse::<usize>().unwrap_or(usize::MAX));
            entries.into_iter().map(|(_, value)| value).collect()
        }
        _ => return Err(AdvisorError::NewsApi("No news data available".to_string())),
    };

    let mut articles = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mut article: Article = match serde_json::from_value(item) {
            Ok(article) => article,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed article");
                continue;
            }
        };
        // ids keep the position in the response, skipped items included
        article.id = format!("news-{}-{}", index, article.url);
        articles.push(article);
    }

    Ok(articles)
}
