//! Price tracking
//!
//! A tracked product remembers the price it had when tracking started and
//! the latest price seen since.

pub mod store;

pub use store::{TrackerStore, TRACKER_FILE};

use crate::errors::Result;
use crate::product::{ProductQuery, ProductRecord, ProductSearch, SearchError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedProduct {
    pub title: String,
    pub old_price: f64,
    pub new_price: f64,
    pub url: String,
    pub tracked_at: DateTime<Utc>,
}

impl TrackedProduct {
    /// Start tracking at the record's best price. `None` when neither
    /// marketplace price is known.
    pub fn from_record(record: &ProductRecord) -> Option<Self> {
        let price = record.best_price()?;
        Some(Self {
            title: record.identity.title.clone(),
            old_price: price,
            new_price: price,
            url: record.preferred_url().to_string(),
            tracked_at: Utc::now(),
        })
    }

    fn has_baseline(&self) -> bool {
        self.old_price.is_finite() && self.new_price.is_finite() && self.old_price != 0.0
    }

    /// Signed change since tracking started; negative is a drop
    pub fn price_change_percent(&self) -> f64 {
        if !self.has_baseline() {
            return 0.0;
        }
        (self.new_price - self.old_price) / self.old_price * 100.0
    }

    /// Whole-percent drop; negative when the price went up
    pub fn price_drop_percentage(&self) -> i64 {
        if !self.has_baseline() {
            return 0;
        }
        ((self.old_price - self.new_price) / self.old_price * 100.0).round() as i64
    }
}

/// The `n` products with the biggest drop, biggest first
pub fn top_price_drops(products: &[TrackedProduct], n: usize) -> Vec<TrackedProduct> {
    let mut sorted = products.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.price_drop_percentage()));
    sorted.truncate(n);
    sorted
}

/// Outcome of [`refresh_prices`]
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Titles whose price was updated
    pub updated: Vec<String>,
    /// Titles that kept their price, with the reason
    pub failed: Vec<(String, SearchError)>,
}

/// Re-run the product search for every tracked title and store the new best price
pub async fn refresh_prices(store: &TrackerStore, search: &ProductSearch) -> Result<RefreshReport> {
    let mut report = RefreshReport::default();

    for product in store.list()? {
        let query = match ProductQuery::new(&product.title) {
            Ok(query) => query,
            Err(_) => {
                report
                    .failed
                    .push((product.title, SearchError::ProductUnavailable));
                continue;
            }
        };

        let price = match search.search(&query).await {
            Ok(record) => record.best_price().ok_or(SearchError::ProductUnavailable),
            Err(e) => Err(e),
        };

        match price {
            Ok(price) => {
                store.update_price(&product.title, price)?;
                info!(title = %product.title, old = product.old_price, new = price, "price refreshed");
                report.updated.push(product.title);
            }
            Err(e) => {
                warn!(title = %product.title, error = %e, "price refresh failed");
                report.failed.push((product.title, e));
            }
        }
    }

    Ok(report)
}
