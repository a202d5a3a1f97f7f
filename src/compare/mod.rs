//! Side-by-side product comparison

use crate::errors::{AdvisorError, Result};
use crate::product::types::wire::SUB_RATINGS;
use crate::product::ProductRecord;

/// Products compared at once
pub const COMPARE_LIMIT: usize = 2;

/// Products picked for comparison, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct CompareList {
    products: Vec<ProductRecord>,
}

impl CompareList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record`; fails once [`COMPARE_LIMIT`] products are held
    pub fn add(&mut self, record: ProductRecord) -> Result<()> {
        if self.is_full() {
            return Err(AdvisorError::CompareFull {
                limit: COMPARE_LIMIT,
            });
        }
        self.products.push(record);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.products.clear();
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.products.len() >= COMPARE_LIMIT
    }
}

/// One labelled row; `values[i]` belongs to the i-th product.
/// `None` marks the unavailable sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
    /// Prices: the smallest value wins
    pub lower_is_better: bool,
}

impl ComparisonRow {
    fn collect(
        label: impl Into<String>,
        products: &[ProductRecord],
        f: impl Fn(&ProductRecord) -> f64,
    ) -> Self {
        Self {
            label: label.into(),
            values: products
                .iter()
                .map(|p| Some(f(p)).filter(|v| *v > 0.0))
                .collect(),
            lower_is_better: false,
        }
    }

    /// Index of the winning value, ignoring unavailable entries. The first
    /// product wins ties.
    pub fn best_index(&self) -> Option<usize> {
        let beats = |candidate: f64, current: f64| {
            if self.lower_is_better {
                candidate < current
            } else {
                candidate > current
            }
        };

        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
                Some((_, b)) if !beats(v, b) => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }
}

/// Rows for the comparison table. Sub-ratings are labelled with the first
/// product's specification names.
pub fn comparison_rows(products: &[ProductRecord]) -> Vec<ComparisonRow> {
    if products.is_empty() {
        return Vec::new();
    }

    let mut rows = vec![
        ComparisonRow {
            label: "Best price (INR)".to_string(),
            values: products.iter().map(ProductRecord::best_price).collect(),
            lower_is_better: true,
        },
        ComparisonRow::collect("User rating (/5)", products, |p| p.ratings.user_rating),
        ComparisonRow::collect("Expert rating (/5)", products, |p| p.ratings.expert_rating),
        ComparisonRow::collect("Overall (/100)", products, |p| p.ratings.overall),
        ComparisonRow::collect("Value for money (/100)", products, |p| p.ratings.value_for_money),
    ];

    for position in 0..SUB_RATINGS.len() {
        let name = &products[0].sub_ratings()[position].specification_name;
        rows.push(ComparisonRow::collect(
            format!("{} (/100)", name),
            products,
            |p| p.sub_ratings()[position].rating,
        ));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::types::fixtures::record_for;
    use crate::product::ProductQuery;

    fn record(name: &str) -> ProductRecord {
        record_for(&ProductQuery::new(name).unwrap())
    }

    #[test]
    fn test_compare_list() {
        let mut list = CompareList::new();
        assert!(list.is_empty());
        list.add(record("Pixel 8")).unwrap();
        list.add(record("iPhone 15")).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_full());
        assert!(list.products()[1].identity.title.starts_with("iPhone 15"));
        list.reset();
        assert!(list.is_empty());
    }

    #[test]
    fn test_third_product_rejected() {
        let mut list = CompareList::new();
        list.add(record("Pixel 8")).unwrap();
        list.add(record("iPhone 15")).unwrap();

        let err = list.add(record("Galaxy S24")).unwrap_err();
        assert!(matches!(err, AdvisorError::CompareFull { limit: 2 }));
        assert_eq!(err.to_string(), "You can only compare 2 products at a time.");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_rows() {
        let mut cheaper = record("Pixel 8");
        cheaper.identity.flipkart_price = 52_000.0;
        cheaper.ratings.overall = 90.0;
        cheaper.ratings.sub_ratings[2].rating = 0.0;
        let products = vec![record("iPhone 15"), cheaper];

        let rows = comparison_rows(&products);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].values, vec![Some(68_499.0), Some(52_000.0)]);
        assert_eq!(rows[3].label, "Overall (/100)");
        assert_eq!(rows[3].best_index(), Some(1));
        assert_eq!(rows[7].label, "Camera (/100)");
        assert_eq!(rows[7].values, vec![Some(86.0), None]);
        assert_eq!(rows[7].best_index(), Some(0));
    }

    #[test]
    fn test_lowest_price_wins() {
        let mut cheaper = record("Pixel 8");
        cheaper.identity.flipkart_price = 52_000.0;
        let rows = comparison_rows(&[record("iPhone 15"), cheaper]);

        assert!(rows[0].lower_is_better);
        assert_eq!(rows[0].best_index(), Some(1));
        assert!(rows[1..].iter().all(|row| !row.lower_is_better));
    }

    #[test]
    fn test_best_index_skips_unavailable_price() {
        let row = ComparisonRow {
            label: "Best price (INR)".to_string(),
            values: vec![None, Some(40_000.0)],
            lower_is_better: true,
        };
        assert_eq!(row.best_index(), Some(1));

        let empty = ComparisonRow {
            values: vec![None, None],
            ..row
        };
        assert_eq!(empty.best_index(), None);
    }

    #[test]
    fn test_no_products_no_rows() {
        assert!(comparison_rows(&[]).is_empty());
    }
}
