//! Request and wire types for the generative backend

use serde::{Deserialize, Serialize};

/// Conversation role of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of prior conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

/// Requested output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// MIME type sent as `responseMimeType`
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text/plain",
            OutputFormat::Json => "application/json",
        }
    }
}

/// Sampling and output parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub output_format: OutputFormat,
    /// Target structure handed to the backend; conformance is not guaranteed
    pub response_schema: Option<serde_json::Value>,
}

/// Harm-category filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

impl SafetySetting {
    pub fn new(category: &str, threshold: &str) -> Self {
        Self {
            category: category.to_string(),
            threshold: threshold.to_string(),
        }
    }
}

/// Outbound request, independent of the wire format
///
/// The final user turn is `instructions` followed directly by `query`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub instructions: String,
    pub history: Vec<ChatTurn>,
    pub query: String,
    pub params: GenerationParams,
    pub safety: Vec<SafetySetting>,
}

impl GenerationRequest {
    /// Text of the final user turn
    pub fn prompt_text(&self) -> String {
        format!("{}{}", self.instructions, self.query)
    }
}

// ---- wire format -------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRequest {
    pub contents: Vec<WireContent>,
    pub generation_config: WireGenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireContent {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WirePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireResponse {
    #[serde(default)]
    pub candidates: Vec<WireCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCandidate {
    #[serde(default)]
    pub content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl From<&GenerationRequest> for WireRequest {
    fn from(request: &GenerationRequest) -> Self {
        let mut contents: Vec<WireContent> = request
            .history
            .iter()
            .map(|turn| WireContent {
                role: Some(turn.role),
                parts: vec![WirePart { text: Some(turn.text.clone()) }],
            })
            .collect();

        contents.push(WireContent {
            role: Some(Role::User),
            parts: vec![WirePart { text: Some(request.prompt_text()) }],
        });

        let params = &request.params;
        Self {
            contents,
            generation_config: WireGenerationConfig {
                temperature: params.temperature,
                top_k: params.top_k,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
                response_mime_type: params.output_format.mime_type(),
                response_schema: params.response_schema.clone(),
            },
            safety_settings: request.safety.clone(),
        }
    }
}

impl WireResponse {
    /// Concatenated text parts of the first candidate
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}
