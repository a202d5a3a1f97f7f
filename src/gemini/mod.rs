//! Generative backend access
//!
//! - Backend-neutral request types
//! - The [`GenerativeBackend`] seam used by every feature
//! - The HTTP client for the Gemini API

pub mod client;
pub mod types;

pub use client::{GeminiClient, GenerativeBackend};
pub use types::{ChatTurn, GenerationParams, GenerationRequest, OutputFormat, Role, SafetySetting};
