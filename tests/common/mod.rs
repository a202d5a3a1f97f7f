//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use gadget_advisor::gemini::{GenerationRequest, GenerativeBackend};
use gadget_advisor::{AdvisorError, Result};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned responses in order and records every request it receives.
/// Once the script runs out it answers with non-JSON text.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Sorry, I can't help with that.".to_string()))
    }
}

pub fn transport_error() -> Result<String> {
    Err(AdvisorError::GenerationApi("HTTP 503: overloaded".to_string()))
}

fn slug(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("+")
}

fn numbered(prefix: &str, count: usize) -> Value {
    let map: serde_json::Map<String, Value> = (1..=count)
        .map(|i| (i.to_string(), json!(format!("{} {}", prefix, i))))
        .collect();
    Value::Object(map)
}

fn sub_rating(name: &str, rating: f64) -> Value {
    json!({ "specification_name": name, "rating": rating })
}

/// A complete, valid backend answer for `query`
pub fn record_json(query: &str) -> Value {
    let slug = slug(query);
    json!({
        "p1": {
            "product_title": format!("{} (Black, 128 GB)", query.trim()),
            "realtime_discounted_price_Amazon_india": 69900,
            "realtime_discounted_price_Flipkart_india": 68499,
            "realtime_product_url_amazon_india": format!("https://www.amazon.in/s?k={}", slug),
            "realtime_product_url_flipkart_india": format!("https://www.flipkart.com/search?q={}", slug),
        },
        "p2": {
            "user_rating_out_of_5": 4.4,
            "expert_rating_out_of_5": 4.2,
            "rating_out_of_100_sp1": sub_rating("Display", 88.0),
            "rating_out_of_100_sp2": sub_rating("Performance", 91.0),
            "rating_out_of_100_sp3": sub_rating("Camera", 84.0),
            "rating_out_of_100_sp4": sub_rating("Battery", 76.0),
            "rating_out_of_100_sp5": sub_rating("Build", 90.0),
            "rating_out_of_100_overall": 86,
            "rating_out_of_100_value_for_money": 72,
        },
        "p3": {
            "all_product_details_specifications": numbered("Specification", 5),
            "Quick_Take_on_all_specifications": numbered("Quick take", 5),
            "Overall_verdict_with_pros_cons": numbered("Verdict", 6),
        },
        "p4": {
            "Tag1": "daily use",
            "Tag2": "photography",
            "Tag3": "gaming",
            "Tag4": "premium",
            "Tag5": "all rounder",
            "Tag6": "battery",
        }
    })
}

pub fn ok(value: Value) -> Result<String> {
    Ok(value.to_string())
}

/// The backend's way of saying it has no data
pub fn unavailable_json() -> Value {
    let mut value = record_json("anything");
    value["p1"]["product_title"] = json!("Product information unavailable");
    value
}
