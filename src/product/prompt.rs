//! Outbound request construction for product lookups
//!
//! Pure: the same query always yields a byte-identical request.

use crate::gemini::{GenerationParams, GenerationRequest, OutputFormat};
use crate::product::types::{wire, ProductQuery, UNAVAILABLE_TITLE};
use serde_json::{json, Map, Value};

/// Bumped whenever the instruction block changes
pub const PROMPT_VERSION: &str = "product-lookup/v4";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 64;
const MAX_OUTPUT_TOKENS: u32 = 4096;

fn string_schema() -> Value {
    json!({ "type": "string" })
}

fn number_schema() -> Value {
    json!({ "type": "number" })
}

fn object_schema(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<Value> = properties.iter().map(|(k, _)| json!(k)).collect();
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn numbered_strings(count: usize) -> Value {
    let keys: Vec<String> = (1..=count).map(|i| i.to_string()).collect();
    object_schema(keys.iter().map(|k| (k.as_str(), string_schema())).collect())
}

/// JSON schema handed to the backend as `responseSchema`
pub fn response_schema() -> Value {
    let sub_rating = || {
        object_schema(vec![
            (wire::SPEC_NAME, string_schema()),
            (wire::SUB_RATING_VALUE, number_schema()),
        ])
    };

    let mut ratings = vec![
        (wire::USER_RATING, number_schema()),
        (wire::EXPERT_RATING, number_schema()),
    ];
    ratings.extend(wire::SUB_RATINGS.iter().map(|k| (*k, sub_rating())));
    ratings.push((wire::OVERALL, number_schema()));
    ratings.push((wire::VALUE_FOR_MONEY, number_schema()));

    object_schema(vec![
        (
            wire::IDENTITY,
            object_schema(vec![
                (wire::TITLE, string_schema()),
                (wire::AMAZON_PRICE, number_schema()),
                (wire::FLIPKART_PRICE, number_schema()),
                (wire::AMAZON_URL, string_schema()),
                (wire::FLIPKART_URL, string_schema()),
            ]),
        ),
        (wire::RATINGS, object_schema(ratings)),
        (
            wire::DETAIL,
            object_schema(vec![
                (wire::SPECIFICATIONS, numbered_strings(5)),
                (wire::QUICK_TAKES, numbered_strings(5)),
                (wire::VERDICT, numbered_strings(6)),
            ]),
        ),
        (
            wire::TAGS,
            object_schema(wire::TAG_KEYS.iter().map(|k| (*k, string_schema())).collect()),
        ),
    ])
}

/// Fixed instruction block preceding the user's query
pub fn instructions() -> String {
    let schema = serde_json::to_string_pretty(&response_schema()).unwrap_or_default();

    format!(
        r#"[{version}] You are a product data API. Take the product name below (optionally with conditions such as price range, brand, features or use case) and answer with a single JSON object that follows the schema exactly. Output JSON only: no prose, no markdown.

Data rules:
1. Prices are current discounted prices in Indian Rupees (INR) from Amazon India and Flipkart, each taken from its own marketplace.
2. Use trusted sources only (Amazon India, Flipkart, Gadgets360, 91mobiles, Kimovil, Nanoreview, Tom's Guide, Anandtech) for specifications and expert opinion.
3. Every field must hold real, non-empty data. Never return null, "NA", blanks or the number 0. When data is thin, estimate the closest plausible value instead.
4. All text is in English.
5. User and expert ratings are out of 5. Every other rating is out of 100.
6. The only URLs allowed anywhere in the answer are the two marketplace search URLs. Build the search term from the exact text after "Product:", including any qualifiers such as price range or colour: lowercase the words and join them with "+".
   Example for "Product: boat airdopes 131":
   {amazon}: "https://www.amazon.in/s?k=boat+airdopes+131"
   {flipkart}: "https://www.flipkart.com/search?q=boat+airdopes+131"
7. Tags in {tags} are 1 or 2 words naming a use case, audience or reason to buy, e.g. "parents", "photography", "huge battery", "daily use", "all rounder", "ai features", "value for money", "gaming".
8. If the product cannot be identified at all, set {title} to "{unavailable}".

Schema:
{schema}

Product: "#,
        version = PROMPT_VERSION,
        amazon = wire::AMAZON_URL,
        flipkart = wire::FLIPKART_URL,
        tags = wire::TAGS,
        title = wire::TITLE,
        unavailable = UNAVAILABLE_TITLE,
        schema = schema,
    )
}

/// Build the request for `query`; the query text is appended verbatim
pub fn build_request(query: &ProductQuery) -> GenerationRequest {
    GenerationRequest {
        instructions: instructions(),
        history: Vec::new(),
        query: query.as_str().to_string(),
        params: GenerationParams {
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            output_format: OutputFormat::Json,
            response_schema: Some(response_schema()),
        },
        safety: Vec::new(),
    }
}
