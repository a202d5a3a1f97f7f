//! Product search type definitions

use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Title the backend uses to say it has no data for the query
pub const UNAVAILABLE_TITLE: &str = "Product information unavailable";

/// Search path prefix for Amazon India
pub const AMAZON_SEARCH_PREFIX: &str = "https://www.amazon.in/s?k=";

/// Search path prefix for Flipkart
pub const FLIPKART_SEARCH_PREFIX: &str = "https://www.flipkart.com/search?q=";

/// Wire keys of the backend's JSON schema
pub mod wire {
    pub const IDENTITY: &str = "p1";
    pub const RATINGS: &str = "p2";
    pub const DETAIL: &str = "p3";
    pub const TAGS: &str = "p4";

    pub const TITLE: &str = "product_title";
    pub const AMAZON_PRICE: &str = "realtime_discounted_price_Amazon_india";
    pub const FLIPKART_PRICE: &str = "realtime_discounted_price_Flipkart_india";
    pub const AMAZON_URL: &str = "realtime_product_url_amazon_india";
    pub const FLIPKART_URL: &str = "realtime_product_url_flipkart_india";

    pub const USER_RATING: &str = "user_rating_out_of_5";
    pub const EXPERT_RATING: &str = "expert_rating_out_of_5";
    pub const SUB_RATINGS: [&str; 5] = [
        "rating_out_of_100_sp1",
        "rating_out_of_100_sp2",
        "rating_out_of_100_sp3",
        "rating_out_of_100_sp4",
        "rating_out_of_100_sp5",
    ];
    pub const SPEC_NAME: &str = "specification_name";
    pub const SUB_RATING_VALUE: &str = "rating";
    pub const OVERALL: &str = "rating_out_of_100_overall";
    pub const VALUE_FOR_MONEY: &str = "rating_out_of_100_value_for_money";

    pub const SPECIFICATIONS: &str = "all_product_details_specifications";
    pub const QUICK_TAKES: &str = "Quick_Take_on_all_specifications";
    pub const VERDICT: &str = "Overall_verdict_with_pros_cons";

    pub const TAG_KEYS: [&str; 6] = ["Tag1", "Tag2", "Tag3", "Tag4", "Tag5", "Tag6"];
}

/// A trimmed, non-empty free-text product query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductQuery(String);

impl ProductQuery {
    /// Trim and validate a raw query; blank input is a caller error
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AdvisorError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase whitespace-separated tokens joined by `+`
    pub fn slug(&self) -> String {
        self.0
            .split_whitespace()
            .map(|token| token.to_lowercase())
            .collect::<Vec<_>>()
            .join("+")
    }

    pub fn amazon_search_url(&self) -> String {
        format!("{}{}", AMAZON_SEARCH_PREFIX, self.slug())
    }

    pub fn flipkart_search_url(&self) -> String {
        format!("{}{}", FLIPKART_SEARCH_PREFIX, self.slug())
    }
}

impl std::fmt::Display for ProductQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Title, marketplace prices and search URLs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub title: String,
    pub amazon_price: f64,
    pub flipkart_price: f64,
    pub amazon_url: String,
    pub flipkart_url: String,
}

/// A named 0–100 rating for one specification area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRating {
    pub specification_name: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    /// 0–5
    pub user_rating: f64,
    /// 0–5
    pub expert_rating: f64,
    pub sub_ratings: [SubRating; 5],
    /// 0–100
    pub overall: f64,
    /// 0–100
    pub value_for_money: f64,
}

/// Ordered prose sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub specifications: [String; 5],
    pub quick_takes: [String; 5],
    pub verdict: [String; 6],
}

/// Six short descriptive labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tags(pub [String; 6]);

impl Tags {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Normalized result of one product search
///
/// A numeric field equal to 0 means "unavailable", never a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub identity: Identity,
    pub ratings: Ratings,
    pub detail: Detail,
    pub tags: Tags,
}

impl ProductRecord {
    /// Lowest marketplace price that is not the unavailable sentinel
    pub fn best_price(&self) -> Option<f64> {
        [self.identity.amazon_price, self.identity.flipkart_price]
            .into_iter()
            .filter(|p| *p > 0.0)
            .reduce(f64::min)
    }

    /// Search URL of the marketplace [`best_price`](Self::best_price) picked.
    /// Amazon on a tie or when neither price is known.
    pub fn preferred_url(&self) -> &str {
        let amazon = self.identity.amazon_price;
        let flipkart = self.identity.flipkart_price;
        if flipkart > 0.0 && (amazon <= 0.0 || flipkart < amazon) {
            &self.identity.flipkart_url
        } else {
            &self.identity.amazon_url
        }
    }

    pub fn sub_ratings(&self) -> &[SubRating] {
        &self.ratings.sub_ratings
    }

    /// Wire paths of numeric fields holding the 0 sentinel
    pub fn unavailable_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        let mut check = |section: &str, key: &str, value: f64| {
            if value == 0.0 {
                fields.push(format!("{}.{}", section, key));
            }
        };

        check(wire::IDENTITY, wire::AMAZON_PRICE, self.identity.amazon_price);
        check(wire::IDENTITY, wire::FLIPKART_PRICE, self.identity.flipkart_price);
        check(wire::RATINGS, wire::USER_RATING, self.ratings.user_rating);
        check(wire::RATINGS, wire::EXPERT_RATING, self.ratings.expert_rating);
        for (key, sub) in wire::SUB_RATINGS.iter().zip(self.ratings.sub_ratings.iter()) {
            check(wire::RATINGS, &format!("{}.{}", key, wire::SUB_RATING_VALUE), sub.rating);
        }
        check(wire::RATINGS, wire::OVERALL, self.ratings.overall);
        check(wire::RATINGS, wire::VALUE_FOR_MONEY, self.ratings.value_for_money);

        fields
    }

    /// Render in the backend's wire shape (`p1`..`p4`)
    pub fn to_wire_json(&self) -> Value {
        fn numbered(items: &[String]) -> Value {
            let map: Map<String, Value> = items
                .iter()
                .enumerate()
                .map(|(i, s)| ((i + 1).to_string(), Value::String(s.clone())))
                .collect();
            Value::Object(map)
        }

        let mut ratings = Map::new();
        ratings.insert(wire::USER_RATING.into(), json!(self.ratings.user_rating));
        ratings.insert(wire::EXPERT_RATING.into(), json!(self.ratings.expert_rating));
        for (key, sub) in wire::SUB_RATINGS.iter().zip(self.ratings.sub_ratings.iter()) {
            ratings.insert(
                (*key).into(),
                json!({
                    (wire::SPEC_NAME): sub.specification_name,
                    (wire::SUB_RATING_VALUE): sub.rating,
                }),
            );
        }
        ratings.insert(wire::OVERALL.into(), json!(self.ratings.overall));
        ratings.insert(wire::VALUE_FOR_MONEY.into(), json!(self.ratings.value_for_money));

        let tags: Map<String, Value> = wire::TAG_KEYS
            .iter()
            .zip(self.tags.iter())
            .map(|(k, t)| ((*k).to_string(), Value::String(t.clone())))
            .collect();

        json!({
            (wire::IDENTITY): {
                (wire::TITLE): self.identity.title,
                (wire::AMAZON_PRICE): self.identity.amazon_price,
                (wire::FLIPKART_PRICE): self.identity.flipkart_price,
                (wire::AMAZON_URL): self.identity.amazon_url,
                (wire::FLIPKART_URL): self.identity.flipkart_url,
            },
            (wire::RATINGS): Value::Object(ratings),
            (wire::DETAIL): {
                (wire::SPECIFICATIONS): numbered(&self.detail.specifications),
                (wire::QUICK_TAKES): numbered(&self.detail.quick_takes),
                (wire::VERDICT): numbered(&self.detail.verdict),
            },
            (wire::TAGS): Value::Object(tags),
        })
    }
}

/// Caller-visible terminal failures of a product search
///
/// Display text is suitable for end users.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Backend explicitly reported that it has no data
    #[error("Product data unavailable. Please try a different search.")]
    ProductUnavailable,

    /// Every attempt failed with a retry-worthy defect
    #[error("Unable to retrieve product information. Please try again later.")]
    RetriesExhausted { attempts: u32 },
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims() {
        let query = ProductQuery::new("  iPhone 15 \n").unwrap();
        assert_eq!(query.as_str(), "iPhone 15");
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(matches!(ProductQuery::new("   "), Err(AdvisorError::EmptyQuery)));
        assert!(matches!(ProductQuery::new(""), Err(AdvisorError::EmptyQuery)));
    }

    #[test]
    fn test_slug_urls() {
        let query = ProductQuery::new("boat Airdopes   131").unwrap();
        assert_eq!(query.slug(), "boat+airdopes+131");
        assert_eq!(
            query.amazon_search_url(),
            "https://www.amazon.in/s?k=boat+airdopes+131"
        );
        assert_eq!(
            query.flipkart_search_url(),
            "https://www.flipkart.com/search?q=boat+airdopes+131"
        );
    }

    #[test]
    fn test_best_price_skips_sentinel() {
        let query = ProductQuery::new("pixel 8").unwrap();
        let mut record = fixtures::record_for(&query);
        assert_eq!(record.best_price(), Some(68_499.0));

        record.identity.flipkart_price = 0.0;
        assert_eq!(record.best_price(), Some(69_900.0));

        record.identity.amazon_price = 0.0;
        assert_eq!(record.best_price(), None);
    }

    #[test]
    fn test_preferred_url_follows_cheaper_marketplace() {
        let query = ProductQuery::new("pixel 8").unwrap();
        let mut record = fixtures::record_for(&query);
        assert_eq!(record.preferred_url(), query.flipkart_search_url());

        record.identity.amazon_price = 65_000.0;
        assert_eq!(record.preferred_url(), query.amazon_search_url());

        // unavailable Amazon price never wins
        record.identity.amazon_price = 0.0;
        assert_eq!(record.preferred_url(), query.flipkart_search_url());

        record.identity.flipkart_price = 0.0;
        assert_eq!(record.preferred_url(), query.amazon_search_url());

        record.identity.amazon_price = 68_499.0;
        record.identity.flipkart_price = 68_499.0;
        assert_eq!(record.preferred_url(), query.amazon_search_url());
    }

    #[test]
    fn test_unavailable_fields() {
        let query = ProductQuery::new("pixel 8").unwrap();
        let mut record = fixtures::record_for(&query);
        assert!(record.unavailable_fields().is_empty());

        record.ratings.sub_ratings[2].rating = 0.0;
        record.identity.amazon_price = 0.0;
        assert_eq!(
            record.unavailable_fields(),
            vec![
                "p1.realtime_discounted_price_Amazon_india".to_string(),
                "p2.rating_out_of_100_sp3.rating".to_string(),
            ]
        );
    }

    #[test]
    fn test_wire_json_shape() {
        let query = ProductQuery::new("pixel 8").unwrap();
        let value = fixtures::record_for(&query).to_wire_json();
        assert_eq!(value["p1"]["realtime_product_url_flipkart_india"], "https://www.flipkart.com/search?q=pixel+8");
        assert_eq!(value["p2"]["rating_out_of_100_sp5"]["specification_name"], "Build");
        assert_eq!(value["p3"]["Overall_verdict_with_pros_cons"]["6"], "Verdict point 6");
        assert_eq!(value["p4"]["Tag2"], "photography");
    }

    #[test]
    fn test_search_error_messages_are_user_facing() {
        assert!(SearchError::ProductUnavailable.to_string().contains("different search"));
        assert!(SearchError::RetriesExhausted { attempts: 3 }
            .to_string()
            .contains("try again later"));
    }
}
