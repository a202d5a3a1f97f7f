//! Technology headlines and the feeds built from them

pub mod client;
pub mod feed;
pub mod saved;
pub mod types;

pub use client::{parse_headlines, NewsClient};
pub use feed::{arrange_news, filter_by_keywords, home_digest, is_deal, shuffle};
pub use saved::{find_by_url, SavedArticle, SavedArticleStore, SAVED_ARTICLES_FILE};
pub use types::{Article, ArticlePublisher, HomeDigest, NewsFeed, NewsTab};
