//! End-to-end product search against scripted backends
//!
//! Exercises the full prompt → validate → retry pipeline without network access.

mod common;

use common::{ok, record_json, transport_error, unavailable_json, ScriptedBackend};
use gadget_advisor::config::{SearchConfig, ZeroPolicy};
use gadget_advisor::product::{AttemptOutcome, ProductQuery, ProductSearch, SearchError};
use serde_json::json;

fn search(backend: std::sync::Arc<ScriptedBackend>) -> ProductSearch {
    ProductSearch::new(backend, SearchConfig::default())
}

fn query(text: &str) -> ProductQuery {
    ProductQuery::new(text).unwrap()
}

#[tokio::test]
async fn test_valid_first_answer_is_accepted() {
    let backend = ScriptedBackend::new(vec![ok(record_json("iPhone 15"))]);
    let record = search(backend.clone()).search(&query("iPhone 15")).await.unwrap();

    assert_eq!(backend.calls(), 1);
    assert_eq!(record.identity.title, "iPhone 15 (Black, 128 GB)");
    assert_eq!(record.best_price(), Some(68_499.0));
    assert_eq!(record.ratings.sub_ratings[2].specification_name, "Camera");
    assert_eq!(record.detail.verdict[5], "Verdict 6");
    assert!(record.unavailable_fields().is_empty());
}

#[tokio::test]
async fn test_recovers_on_third_attempt_after_garbage() {
    let backend = ScriptedBackend::new(vec![
        Ok("{\"p1\": {\"product_title\": \"iPhone".to_string()),
        Ok("Here is the product you asked for!".to_string()),
        ok(record_json("iPhone 15")),
    ]);
    let report = search(backend.clone())
        .search_with_report(&query("iPhone 15"))
        .await;

    assert!(report.outcome.is_ok());
    assert_eq!(report.calls(), 3);
    assert!(matches!(report.attempts[0], AttemptOutcome::Malformed(_)));
    assert!(matches!(report.attempts[1], AttemptOutcome::Malformed(_)));
    assert_eq!(report.attempts[2], AttemptOutcome::Accepted);
}

#[tokio::test]
async fn test_unavailable_title_stops_after_one_call() {
    let backend = ScriptedBackend::new(vec![ok(unavailable_json()), ok(record_json("zzqx 9000"))]);
    let result = search(backend.clone()).search(&query("zzqx 9000")).await;

    assert_eq!(result, Err(SearchError::ProductUnavailable));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_unavailable_after_failures_stops_immediately() {
    let backend = ScriptedBackend::new(vec![
        transport_error(),
        ok(unavailable_json()),
        ok(record_json("Pixel 8")),
    ]);
    let result = search(backend.clone()).search(&query("Pixel 8")).await;

    assert_eq!(result, Err(SearchError::ProductUnavailable));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_missing_sub_rating_exhausts_attempts() {
    let mut broken = record_json("Galaxy S24");
    broken["p2"].as_object_mut().unwrap().remove("rating_out_of_100_sp3");
    let backend = ScriptedBackend::new(vec![ok(broken.clone()), ok(broken.clone()), ok(broken)]);

    let report = search(backend.clone())
        .search_with_report(&query("Galaxy S24"))
        .await;

    assert_eq!(report.outcome, Err(SearchError::RetriesExhausted { attempts: 3 }));
    assert_eq!(backend.calls(), 3);
    for attempt in &report.attempts {
        match attempt {
            AttemptOutcome::SchemaViolation(reason) => {
                assert!(reason.contains("rating_out_of_100_sp3"), "{}", reason)
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_every_attempt_sends_the_same_request() {
    let backend = ScriptedBackend::new(vec![transport_error(), transport_error(), transport_error()]);
    let result = search(backend.clone()).search(&query("Sony WH-1000XM5")).await;

    assert_eq!(result, Err(SearchError::RetriesExhausted { attempts: 3 }));
    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| *r == requests[0]));
    assert!(requests[0].prompt_text().ends_with("Sony WH-1000XM5"));
}

#[tokio::test]
async fn test_url_slug_contract() {
    let backend = ScriptedBackend::new(vec![ok(record_json("boat airdopes 131"))]);
    let record = search(backend).search(&query("boat airdopes 131")).await.unwrap();
    assert_eq!(
        record.identity.amazon_url,
        "https://www.amazon.in/s?k=boat+airdopes+131"
    );
    assert_eq!(
        record.identity.flipkart_url,
        "https://www.flipkart.com/search?q=boat+airdopes+131"
    );
}

#[tokio::test]
async fn test_product_page_url_is_rejected() {
    let mut wrong = record_json("boat airdopes 131");
    wrong["p1"]["realtime_product_url_amazon_india"] =
        json!("https://www.amazon.in/boAt-Airdopes-131/dp/B08R5D5HFL");
    let backend = ScriptedBackend::new(vec![ok(wrong.clone()), ok(wrong.clone()), ok(wrong)]);

    let report = search(backend)
        .search_with_report(&query("boat airdopes 131"))
        .await;

    assert_eq!(report.outcome, Err(SearchError::RetriesExhausted { attempts: 3 }));
    assert!(report
        .attempts
        .iter()
        .all(|a| matches!(a, AttemptOutcome::SchemaViolation(_))));
}

#[tokio::test]
async fn test_nan_price_becomes_unavailable() {
    let mut answer = record_json("OnePlus 12");
    answer["p1"]["realtime_discounted_price_Amazon_india"] = json!("NaN");
    let backend = ScriptedBackend::new(vec![ok(answer)]);

    let record = search(backend).search(&query("OnePlus 12")).await.unwrap();
    assert_eq!(record.identity.amazon_price, 0.0);
    assert_eq!(record.best_price(), Some(68_499.0));
    assert_eq!(
        record.unavailable_fields(),
        vec!["p1.realtime_discounted_price_Amazon_india".to_string()]
    );
}

#[tokio::test]
async fn test_zero_policy_decides_literal_zeros() {
    let mut answer = record_json("Nothing Phone 2");
    answer["p2"]["rating_out_of_100_value_for_money"] = json!(0);

    let backend = ScriptedBackend::new(vec![ok(answer.clone())]);
    let rejected = search(backend.clone())
        .search_with_report(&query("Nothing Phone 2"))
        .await;
    assert!(matches!(rejected.attempts[0], AttemptOutcome::SchemaViolation(_)));

    let preserve = SearchConfig {
        zero_policy: ZeroPolicy::Preserve,
        ..SearchConfig::default()
    };
    let backend = ScriptedBackend::new(vec![ok(answer)]);
    let record = ProductSearch::new(backend.clone(), preserve)
        .search(&query("Nothing Phone 2"))
        .await
        .unwrap();
    assert_eq!(backend.calls(), 1);
    assert_eq!(record.ratings.value_for_money, 0.0);
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let config = SearchConfig {
        max_retries: 0,
        ..SearchConfig::default()
    };
    let backend = ScriptedBackend::new(vec![transport_error(), ok(record_json("Pixel 8"))]);
    let result = ProductSearch::new(backend.clone(), config)
        .search(&query("Pixel 8"))
        .await;

    assert_eq!(result, Err(SearchError::RetriesExhausted { attempts: 1 }));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_blank_query_never_reaches_backend() {
    assert!(ProductQuery::new("   ").is_err());
}
