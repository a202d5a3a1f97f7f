//! Response validation and repair for product lookups
//!
//! Classifies raw backend text into a [`ParseOutcome`]:
//! 1. JSON parse (failure ⇒ `Malformed`)
//! 2. Explicit unavailable title (⇒ `Unavailable`, never retried)
//! 3. Structure and primitive types of every required field
//! 4. Numeric sanitation (unparseable numbers become the 0 sentinel)
//! 5. Marketplace URL contract and the no-foreign-URL rule

use crate::config::ZeroPolicy;
use crate::product::types::{
    wire, Detail, Identity, ProductQuery, ProductRecord, Ratings, SubRating, Tags,
    UNAVAILABLE_TITLE,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Result of validating one backend response
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Record passed every check
    Valid(ProductRecord),
    /// Not a JSON document
    Malformed(String),
    /// JSON, but missing/mistyped fields or a URL contract breach
    SchemaViolation(String),
    /// Backend said it has no data for the query
    Unavailable,
}

impl ParseOutcome {
    /// Whether another attempt may produce a different result
    pub fn is_retryable(&self) -> bool {
        matches!(self, ParseOutcome::Malformed(_) | ParseOutcome::SchemaViolation(_))
    }
}

/// Validate `raw` against the product schema for `query`
pub fn validate(raw: &str, query: &ProductQuery, zero_policy: ZeroPolicy) -> ParseOutcome {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, raw = %raw, "response is not valid JSON");
            return ParseOutcome::Malformed(e.to_string());
        }
    };

    if declares_unavailable(&value) {
        return ParseOutcome::Unavailable;
    }

    let mut reader = RecordReader::new(zero_policy);
    let record = match reader.read(&value) {
        Ok(record) => record,
        Err(violation) => return ParseOutcome::SchemaViolation(violation),
    };

    if !reader.sanitized.is_empty() {
        warn!(fields = ?reader.sanitized, "coerced unparseable numbers to the unavailable sentinel");
    }

    if let Err(violation) = check_urls(&record, query) {
        return ParseOutcome::SchemaViolation(violation);
    }

    ParseOutcome::Valid(record)
}

fn declares_unavailable(value: &Value) -> bool {
    value
        .get(wire::IDENTITY)
        .and_then(|p1| p1.get(wire::TITLE))
        .and_then(Value::as_str)
        .map(|title| title.trim() == UNAVAILABLE_TITLE)
        .unwrap_or(false)
}

/// Inclusive bounds for a numeric field; `None` upper bound means unbounded
type Bounds = (f64, Option<f64>);

const PRICE: Bounds = (0.0, None);
const OUT_OF_5: Bounds = (0.0, Some(5.0));
const OUT_OF_100: Bounds = (0.0, Some(100.0));

struct RecordReader {
    zero_policy: ZeroPolicy,
    /// Paths of numeric fields replaced by the 0 sentinel
    sanitized: Vec<String>,
}

impl RecordReader {
    fn new(zero_policy: ZeroPolicy) -> Self {
        Self {
            zero_policy,
            sanitized: Vec::new(),
        }
    }

    fn read(&mut self, value: &Value) -> Result<ProductRecord, String> {
        let root = value
            .as_object()
            .ok_or_else(|| "top-level value is not an object".to_string())?;

        let p1 = object(root, wire::IDENTITY, "")?;
        let identity = Identity {
            title: string(p1, wire::TITLE, wire::IDENTITY)?,
            amazon_price: self.number(p1, wire::AMAZON_PRICE, wire::IDENTITY, PRICE)?,
            flipkart_price: self.number(p1, wire::FLIPKART_PRICE, wire::IDENTITY, PRICE)?,
            amazon_url: string(p1, wire::AMAZON_URL, wire::IDENTITY)?,
            flipkart_url: string(p1, wire::FLIPKART_URL, wire::IDENTITY)?,
        };

        let p2 = object(root, wire::RATINGS, "")?;
        let mut sub_ratings = Vec::with_capacity(wire::SUB_RATINGS.len());
        for key in wire::SUB_RATINGS {
            let path = format!("{}.{}", wire::RATINGS, key);
            let sub = object(p2, key, wire::RATINGS)?;
            sub_ratings.push(SubRating {
                specification_name: string(sub, wire::SPEC_NAME, &path)?,
                rating: self.number(sub, wire::SUB_RATING_VALUE, &path, OUT_OF_100)?,
            });
        }
        let ratings = Ratings {
            user_rating: self.number(p2, wire::USER_RATING, wire::RATINGS, OUT_OF_5)?,
            expert_rating: self.number(p2, wire::EXPERT_RATING, wire::RATINGS, OUT_OF_5)?,
            sub_ratings: to_array(sub_ratings, wire::RATINGS)?,
            overall: self.number(p2, wire::OVERALL, wire::RATINGS, OUT_OF_100)?,
            value_for_money: self.number(p2, wire::VALUE_FOR_MONEY, wire::RATINGS, OUT_OF_100)?,
        };

        let p3 = object(root, wire::DETAIL, "")?;
        let detail = Detail {
            specifications: numbered::<5>(p3, wire::SPECIFICATIONS)?,
            quick_takes: numbered::<5>(p3, wire::QUICK_TAKES)?,
            verdict: numbered::<6>(p3, wire::VERDICT)?,
        };

        let p4 = object(root, wire::TAGS, "")?;
        let tags = wire::TAG_KEYS
            .iter()
            .map(|key| string(p4, key, wire::TAGS))
            .collect::<Result<Vec<_>, _>>()?;
        let tags = Tags(to_array(tags, wire::TAGS)?);

        Ok(ProductRecord {
            identity,
            ratings,
            detail,
            tags,
        })
    }

    /// Read a numeric field, applying sanitation and the zero policy
    fn number(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        parent: &str,
        (min, max): Bounds,
    ) -> Result<f64, String> {
        let path = join(parent, key);
        let raw = match obj.get(key) {
            None | Some(Value::Null) => return Err(format!("missing required field {}", path)),
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("nan") => f64::NAN,
            Some(other) => {
                return Err(format!("{} must be a number, got {}", path, type_name(other)))
            }
        };

        if !raw.is_finite() {
            self.sanitized.push(path);
            return Ok(0.0);
        }

        if raw == 0.0 && self.zero_policy == ZeroPolicy::Reject {
            return Err(format!("{} is 0, which marks missing data", path));
        }

        if raw < min || max.map(|m| raw > m).unwrap_or(false) {
            return Err(format!("{} = {} is out of range", path, raw));
        }

        Ok(raw)
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn object<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<&'a Map<String, Value>, String> {
    let path = join(parent, key);
    match obj.get(key) {
        None | Some(Value::Null) => Err(format!("missing required field {}", path)),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(format!("{} must be an object, got {}", path, type_name(other))),
    }
}

fn string(obj: &Map<String, Value>, key: &str, parent: &str) -> Result<String, String> {
    let path = join(parent, key);
    match obj.get(key) {
        None | Some(Value::Null) => Err(format!("missing required field {}", path)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(format!("{} is blank", path)),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(format!("{} must be a string, got {}", path, type_name(other))),
    }
}

/// Read an object keyed "1".."N" into an ordered array
fn numbered<const N: usize>(
    section: &Map<String, Value>,
    key: &str,
) -> Result<[String; N], String> {
    let parent = join(wire::DETAIL, key);
    let obj = object(section, key, wire::DETAIL)?;
    let items = (1..=N)
        .map(|i| string(obj, &i.to_string(), &parent))
        .collect::<Result<Vec<_>, _>>()?;
    to_array(items, &parent)
}

fn to_array<T, const N: usize>(items: Vec<T>, path: &str) -> Result<[T; N], String> {
    let len = items.len();
    items
        .try_into()
        .map_err(|_| format!("{} expected {} entries, got {}", path, N, len))
}

fn contains_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("http://") || lower.contains("https://") || lower.contains("www.")
}

fn check_urls(record: &ProductRecord, query: &ProductQuery) -> Result<(), String> {
    let expected_amazon = query.amazon_search_url();
    if record.identity.amazon_url != expected_amazon {
        return Err(format!(
            "{}.{} = {:?}, expected {:?}",
            wire::IDENTITY,
            wire::AMAZON_URL,
            record.identity.amazon_url,
            expected_amazon
        ));
    }

    let expected_flipkart = query.flipkart_search_url();
    if record.identity.flipkart_url != expected_flipkart {
        return Err(format!(
            "{}.{} = {:?}, expected {:?}",
            wire::IDENTITY,
            wire::FLIPKART_URL,
            record.identity.flipkart_url,
            expected_flipkart
        ));
    }

    let prose = std::iter::once(&record.identity.title)
        .chain(record.ratings.sub_ratings.iter().map(|s| &s.specification_name))
        .chain(record.detail.specifications.iter())
        .chain(record.detail.quick_takes.iter())
        .chain(record.detail.verdict.iter())
        .chain(record.tags.iter());

    for text in prose {
        if contains_url(text) {
            return Err(format!("unexpected URL in record text: {:?}", text));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::types::fixtures::record_for;
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    fn query() -> ProductQuery {
        ProductQuery::new("boat airdopes 131").unwrap()
    }

    fn valid_json() -> Value {
        record_for(&query()).to_wire_json()
    }

    fn check(value: &Value) -> ParseOutcome {
        validate(&value.to_string(), &query(), ZeroPolicy::Reject)
    }

    fn assert_violation(outcome: ParseOutcome, needle: &str) {
        match outcome {
            ParseOutcome::SchemaViolation(msg) => {
                assert!(msg.contains(needle), "{:?} does not mention {:?}", msg, needle)
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_record_accepted() {
        match check(&valid_json()) {
            ParseOutcome::Valid(record) => assert_eq!(record, record_for(&query())),
            other => panic!("expected Valid, got {:?}", other),
        }
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let raw = format!("\n  {}  \n", valid_json());
        assert!(matches!(
            validate(&raw, &query(), ZeroPolicy::Reject),
            ParseOutcome::Valid(_)
        ));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let raw = valid_json().to_string();
        let truncated = &raw[..raw.len() / 2];
        let outcome = validate(truncated, &query(), ZeroPolicy::Reject);
        assert!(matches!(outcome, ParseOutcome::Malformed(_)));
        assert!(outcome.is_retryable());
    }

    #[test]
    fn test_prose_is_malformed() {
        let outcome = validate("Sorry, I cannot help with that.", &query(), ZeroPolicy::Reject);
        assert!(matches!(outcome, ParseOutcome::Malformed(_)));
    }

    #[test]
    fn test_unavailable_title_short_circuits() {
        // Everything else is missing; the sentinel still wins
        let value = json!({ "p1": { "product_title": "Product information unavailable" } });
        let outcome = check(&value);
        assert_eq!(outcome, ParseOutcome::Unavailable);
        assert!(!outcome.is_retryable());
    }

    #[test]
    fn test_missing_sub_rating() {
        let mut value = valid_json();
        value["p2"].as_object_mut().unwrap().remove("rating_out_of_100_sp3");
        assert_violation(check(&value), "p2.rating_out_of_100_sp3");
    }

    #[test]
    fn test_missing_section() {
        let mut value = valid_json();
        value.as_object_mut().unwrap().remove("p4");
        assert_violation(check(&value), "p4");
    }

    #[test]
    fn test_null_field_is_missing() {
        let mut value = valid_json();
        value["p1"]["product_title"] = Value::Null;
        assert_violation(check(&value), "missing required field p1.product_title");
    }

    #[test]
    fn test_wrong_type_string_field() {
        let mut value = valid_json();
        value["p4"]["Tag3"] = json!(7);
        assert_violation(check(&value), "p4.Tag3 must be a string");
    }

    #[test]
    fn test_wrong_type_number_field() {
        let mut value = valid_json();
        value["p1"]["realtime_discounted_price_Amazon_india"] = json!("₹1,299");
        assert_violation(check(&value), "must be a number");
    }

    #[test]
    fn test_blank_string_rejected() {
        let mut value = valid_json();
        value["p3"]["Quick_Take_on_all_specifications"]["4"] = json!("   ");
        assert_violation(check(&value), "p3.Quick_Take_on_all_specifications.4 is blank");
    }

    #[test]
    fn test_missing_verdict_point() {
        let mut value = valid_json();
        value["p3"]["Overall_verdict_with_pros_cons"]
            .as_object_mut()
            .unwrap()
            .remove("6");
        assert_violation(check(&value), "Overall_verdict_with_pros_cons.6");
    }

    #[test]
    fn test_nan_number_becomes_sentinel() {
        let mut value = valid_json();
        value["p2"]["expert_rating_out_of_5"] = json!("NaN");
        value["p2"]["rating_out_of_100_sp1"]["rating"] = json!("nan");
        match check(&value) {
            ParseOutcome::Valid(record) => {
                assert_eq!(record.ratings.expert_rating, 0.0);
                assert_eq!(record.ratings.sub_ratings[0].rating, 0.0);
                assert_eq!(record.unavailable_fields().len(), 2);
            }
            other => panic!("expected Valid, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_zero_follows_policy() {
        let mut value = valid_json();
        value["p2"]["rating_out_of_100_value_for_money"] = json!(0);

        assert_violation(check(&value), "is 0");

        match validate(&value.to_string(), &query(), ZeroPolicy::Preserve) {
            ParseOutcome::Valid(record) => assert_eq!(
                record.unavailable_fields(),
                vec!["p2.rating_out_of_100_value_for_money".to_string()]
            ),
            other => panic!("expected Valid, got {:?}", other),
        }
    }

    #[test]
    fn test_rating_out_of_range() {
        let mut value = valid_json();
        value["p2"]["user_rating_out_of_5"] = json!(8.5);
        assert_violation(check(&value), "out of range");
    }

    #[test]
    fn test_url_contract() {
        let mut value = valid_json();
        assert_eq!(
            value["p1"]["realtime_product_url_amazon_india"],
            "https://www.amazon.in/s?k=boat+airdopes+131"
        );
        assert_eq!(
            value["p1"]["realtime_product_url_flipkart_india"],
            "https://www.flipkart.com/search?q=boat+airdopes+131"
        );

        value["p1"]["realtime_product_url_amazon_india"] =
            json!("https://www.amazon.in/boAt-Airdopes-131/dp/B08XYZ");
        assert_violation(check(&value), "realtime_product_url_amazon_india");

        let mut value = valid_json();
        value["p1"]["realtime_product_url_flipkart_india"] =
            json!("https://www.flipkart.com/search?q=boat%20airdopes%20131");
        assert_violation(check(&value), "realtime_product_url_flipkart_india");
    }

    #[test]
    fn test_foreign_url_rejected() {
        let mut value = valid_json();
        value["p3"]["all_product_details_specifications"]["2"] =
            json!("Full specs at https://www.gadgets360.com/boat");
        assert_violation(check(&value), "unexpected URL");
    }

    #[quickcheck]
    fn prop_string_fields_never_zero_filled(tag: i64) -> bool {
        // A mistyped string slot must fail, never become 0 or ""
        let mut value = valid_json();
        value["p4"]["Tag1"] = json!(tag);
        matches!(check(&value), ParseOutcome::SchemaViolation(_))
    }

    #[quickcheck]
    fn prop_only_numeric_fields_hold_sentinel(price: String) -> bool {
        let mut value = valid_json();
        value["p1"]["realtime_discounted_price_Flipkart_india"] = json!(price.clone());
        match check(&value) {
            ParseOutcome::Valid(record) => {
                price.trim().eq_ignore_ascii_case("nan")
                    && record.identity.flipkart_price == 0.0
                    && record.unavailable_fields()
                        == vec!["p1.realtime_discounted_price_Flipkart_india".to_string()]
            }
            ParseOutcome::SchemaViolation(_) => !price.trim().eq_ignore_ascii_case("nan"),
            _ => false,
        }
    }
}
