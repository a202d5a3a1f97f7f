//! JSON-file storage for tracked products

use crate::errors::{AdvisorError, Result};
use crate::tracker::TrackedProduct;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name inside the state directory
pub const TRACKER_FILE: &str = "tracked_products.json";

/// Tracked products persisted as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct TrackerStore {
    path: PathBuf,
}

impl TrackerStore {
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
            path: state_dir.join(TRACKER_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tracked products, oldest first. A missing file is an empty list.
    pub fn list(&self) -> Result<Vec<TrackedProduct>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|e| {
            AdvisorError::Storage(format!("Corrupt tracker file {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, products: &[TrackedProduct]) -> Result<()> {
        let json = serde_json::to_string_pretty(products)?;
        fs::write(&self.path, json)?;
        debug!(count = products.len(), path = %self.path.display(), "tracker saved");
        Ok(())
    }

    /// Track `product`, replacing any entry with the same title
    pub fn add(&self, product: TrackedProduct) -> Result<()> {
        let mut products = self.list()?;
        match products.iter_mut().find(|p| p.title == product.title) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
        self.save(&products)
    }

    /// Stop tracking `title`. Returns whether anything was removed.
    pub fn remove(&self, title: &str) -> Result<bool> {
        let mut products = self.list()?;
        let before = products.len();
        products.retain(|p| p.title != title);
        if products.len() == before {
            return Ok(false);
        }
        self.save(&products)?;
        Ok(true)
    }

    pub fn is_tracking(&self, title: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|p| p.title == title))
    }

    /// Record a fresh price for `title`; the old price is kept
    pub fn update_price(&self, title: &str, new_price: f64) -> Result<()> {
        let mut products = self.list()?;
        let product = products
            .iter_mut()
            .find(|p| p.title == title)
            .ok_or_else(|| AdvisorError::Storage(format!("Not tracking '{}'", title)))?;
        product.new_price = new_price;
        self.save(&products)
    }
}
