//! Gadget Advisor - gadget lookups backed by a generative model
//!
//! A product name goes to the model with a fixed JSON schema; the reply is
//! validated and retried until it is a trustworthy [`product::ProductRecord`]
//! or the attempt budget runs out. Around that pipeline sit a chat advisor,
//! news headlines with article summaries, price tracking and comparison.
//!
//! # Modules
//!
//! - [`gemini`]: generation backend trait and the HTTP client
//! - [`product`]: prompt, validation and the retrying search
//! - [`summarizer`], [`advisor`]: the other two model-backed features
//! - [`news`], [`tracker`], [`compare`]: supporting views
//! - [`cli`]: argument parsing and terminal rendering for the binary

pub mod errors;
pub mod config;
pub mod gemini;
pub mod product;

// Re-export commonly used types
pub use errors::{AdvisorError, Result};

pub mod summarizer;
pub mod advisor;
pub mod news;
pub mod tracker;
pub mod compare;
pub mod cli;
