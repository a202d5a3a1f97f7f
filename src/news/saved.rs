//! Articles saved for later reading

use crate::errors::{AdvisorError, Result};
use crate::news::types::Article;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name inside the state directory
pub const SAVED_ARTICLES_FILE: &str = "saved_articles.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub saved_at: DateTime<Utc>,
}

impl SavedArticle {
    pub fn new(article: Article) -> Self {
        Self {
            article,
            saved_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.article.id
    }
}

/// The headline whose URL is `url`, ignoring surrounding whitespace and a
/// trailing slash
pub fn find_by_url<'a>(articles: &'a [Article], url: &str) -> Option<&'a Article> {
    let wanted = url.trim().trim_end_matches('/');
    articles
        .iter()
        .find(|a| a.url.trim().trim_end_matches('/') == wanted)
}

/// Saved articles persisted as a pretty-printed JSON array, keyed by article id
#[derive(Debug, Clone)]
pub struct SavedArticleStore {
    path: PathBuf,
}

impl SavedArticleStore {
    /// Store rooted at `state_dir`, created if missing
    pub fn open(state_dir: &Path) -> Result<Self> {
        if !state_dir.exists() {
            fs::create_dir_all(state_dir).map_err(|e| {
                AdvisorError::Storage(format!(
                    "Failed to create state directory {}: {}",
                    state_dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path: state_dir.join(SAVED_ARTICLES_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved articles in the order they were first saved
    pub fn list(&self) -> Result<Vec<SavedArticle>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|e| {
            AdvisorError::Storage(format!(
                "Corrupt saved articles file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write(&self, saved: &[SavedArticle]) -> Result<()> {
        let json = serde_json::to_string_pretty(saved)?;
        fs::write(&self.path, json)?;
        debug!(count = saved.len(), path = %self.path.display(), "saved articles written");
        Ok(())
    }

    /// Save `article`. An article with the same id is replaced in place.
    pub fn save(&self, article: Article) -> Result<()> {
        if article.id.trim().is_empty() {
            return Err(AdvisorError::Storage("Article has no id".to_string()));
        }

        let mut saved = self.list()?;
        let entry = SavedArticle::new(article);
        match saved.iter_mut().find(|s| s.id() == entry.id()) {
            Some(existing) => *existing = entry,
            None => saved.push(entry),
        }
        self.write(&saved)
    }

    /// Forget article `id`. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut saved = self.list()?;
        let before = saved.len();
        saved.retain(|s| s.id() != id);
        if saved.len() == before {
            return Ok(false);
        }
        self.write(&saved)?;
        Ok(true)
    }

    pub fn is_saved(&self, id: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|s| s.id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::ArticlePublisher;
    use tempfile::TempDir;

    fn article(id: &str, title: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://news.example/{}", id),
            date: None,
            thumbnail: None,
            description: String::new(),
            source: ArticlePublisher::default(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SavedArticleStore::open(dir.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(!store.is_saved("news-0-x").unwrap());
    }

    #[test]
    fn test_save_replaces_same_id() {
        let dir = TempDir::new().unwrap();
        let store = SavedArticleStore::open(dir.path()).unwrap();

        store.save(article("news-0-a", "First take")).unwrap();
        store.save(article("news-1-b", "Other story")).unwrap();
        store.save(article("news-0-a", "First take, updated")).unwrap();

        let saved = store.list().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id(), "news-0-a");
        assert_eq!(saved[0].article.title, "First take, updated");
        assert!(store.is_saved("news-1-b").unwrap());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = SavedArticleStore::open(&dir.path().join("nested")).unwrap();
        store.save(article("news-0-a", "Story")).unwrap();

        assert!(store.remove("news-0-a").unwrap());
        assert!(!store.remove("news-0-a").unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_article_without_id_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SavedArticleStore::open(dir.path()).unwrap();
        assert!(matches!(store.save(article("", "Story")), Err(AdvisorError::Storage(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_find_by_url() {
        let articles = vec![article("news-0-a", "A"), article("news-1-b", "B")];
        assert_eq!(
            find_by_url(&articles, " https://news.example/news-1-b/ ").map(|a| a.title.as_str()),
            Some("B")
        );
        assert!(find_by_url(&articles, "https://news.example/missing").is_none());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = SavedArticleStore::open(dir.path()).unwrap();
        fs::write(store.path(), "[{").unwrap();
        assert!(matches!(store.list(), Err(AdvisorError::Storage(_))));
    }
}
