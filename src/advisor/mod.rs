//! Advisor Bot - conversational gadget assistant
//!
//! Keeps a running conversation seeded with a persona turn and a few worked
//! refusals, so out-of-domain questions (health in particular) are declined.

use crate::errors::{AdvisorError, Result};
use crate::gemini::{ChatTurn, GenerationParams, GenerationRequest, GenerativeBackend, OutputFormat};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

/// Shown instead of a reply when the backend fails
pub const APOLOGY: &str = "Sorry, I'm having trouble responding right now. Please try again later.";

const PERSONA: &str = "You are \"Mr. Advisor Bot\", a friendly, expert Indian gadget assistant. \
You understand what users need and suggest suitable gadgets, specifications and deals for their use case. \
Answer with current, real-time information (latest prices, most recent models, as of today), \
based on certified sources, in warm and simple English an 8th-grade Indian reader can follow. \
Use a friendly tone and positive emojis, and show that you understand the user's needs. \
Never give health-related advice and politely decline any question outside gadgets and technology.";

const GREETING_QUESTION: &str = "Hello, can you help me with gadget advice?";

const GREETING_REPLY: &str = "Hey there! 😊 I'm Mr. Advisor Bot, your personal gadget expert! \
How can I help you today with tech advice or product suggestions? \
I'm here to help you make the best decision on your next tech purchase! 😎";

const REFUSAL: &str = "Sorry, I can't help with health-related advice or out-of-domain requests. 😊 \
I'm Mr. Advisor Bot, your personal gadget expert! Ask me anything about tech or products \
and I'll help you make the best decision on your next purchase! 😎";

const REFUSED_QUESTIONS: [&str; 3] = [
    "give me health related advice?",
    "give me tips for weight loss",
    "i am having stomach pain any advice?",
];

/// Greetings the chat screen opens with
pub const INTRO_MESSAGES: [&str; 4] = [
    "Hey there! 😊 I'm Mr. Advisor, your personal gadget expert! I'm here to help you make the best decision on your next tech purchase! 😎",
    "What's the vibe! 👋 Need any advice? Mr. Advisor is here, let's go!",
    "Always be aware of what you buy 🥸. I'm here to make you a responsible purchaser 😜. Tell me what you're curious about!",
    "🫡 Hello Captain! In a sea of choices, let me, Mr. Advisor, a senior sailor in gadgets & tech, help you find the product. Let's dive! 😜🥽",
];

/// Pick one of the [`INTRO_MESSAGES`]
pub fn intro_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    INTRO_MESSAGES.choose(rng).copied().unwrap_or(INTRO_MESSAGES[0])
}

/// Persona turn plus the worked greeting and refusal examples
pub fn seeded_history() -> Vec<ChatTurn> {
    let mut history = vec![
        ChatTurn::model(PERSONA),
        ChatTurn::user(GREETING_QUESTION),
        ChatTurn::model(GREETING_REPLY),
    ];
    for question in REFUSED_QUESTIONS {
        history.push(ChatTurn::user(question));
        history.push(ChatTurn::model(REFUSAL));
    }
    history
}

fn chat_params() -> GenerationParams {
    GenerationParams {
        temperature: 0.9,
        top_k: 1,
        top_p: 1.0,
        max_output_tokens: 2048,
        output_format: OutputFormat::Text,
        response_schema: None,
    }
}

/// One conversation with the advisor
pub struct AdvisorBot {
    backend: Arc<dyn GenerativeBackend>,
    history: Vec<ChatTurn>,
    seeded_len: usize,
}

impl AdvisorBot {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        let history = seeded_history();
        let seeded_len = history.len();
        Self {
            backend,
            history,
            seeded_len,
        }
    }

    /// Full history including the seeded turns
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Turns exchanged since the conversation started
    pub fn conversation(&self) -> &[ChatTurn] {
        &self.history[self.seeded_len..]
    }

    /// Forget the conversation, keeping the seeded turns
    pub fn reset(&mut self) {
        self.history.truncate(self.seeded_len);
    }

    /// Send `message` and return the reply.
    ///
    /// History only grows when the backend answers.
    pub async fn reply(&mut self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AdvisorError::EmptyQuery);
        }

        let request = GenerationRequest {
            instructions: String::new(),
            history: self.history.clone(),
            query: message.to_string(),
            params: chat_params(),
            safety: Vec::new(),
        };

        let reply = self.backend.generate(&request).await?;
        let reply = reply.trim().to_string();
        info!(turns = self.conversation().len() + 2, "advisor replied");

        self.history.push(ChatTurn::user(message));
        self.history.push(ChatTurn::model(reply.clone()));
        Ok(reply)
    }

    /// Like [`reply`](Self::reply) but any failure becomes [`APOLOGY`]
    pub async fn reply_or_apology(&mut self, message: &str) -> String {
        match self.reply(message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "advisor reply failed");
                APOLOGY.to_string()
            }
        }
    }
}
