//! News feed type definitions

use serde::{Deserialize, Serialize};

/// Which headline region to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsTab {
    /// India
    Local,
    /// United States
    Global,
}

impl NewsTab {
    /// Country code sent to the news API
    pub fn country(&self) -> &'static str {
        match self {
            NewsTab::Local => "in",
            NewsTab::Global => "us",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePublisher {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub favicon: Option<String>,
}

/// One headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// `news-<index>-<url>`, assigned on fetch
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: ArticlePublisher,
}

/// News screen layout: deal banners on top, stories below
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFeed {
    pub banners: Vec<Article>,
    pub stories: Vec<Article>,
}

/// Home screen digest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeDigest {
    pub latest: Vec<Article>,
    pub deal_banners: Vec<Article>,
}
