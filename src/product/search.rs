//! Retrying product search orchestrator
//!
//! Drives prompt → generation → validation across a bounded number of
//! attempts. Transport failures, malformed JSON and schema violations all
//! spend one attempt; an explicit "unavailable" answer stops immediately.

use crate::config::SearchConfig;
use crate::gemini::GenerativeBackend;
use crate::product::prompt;
use crate::product::state::{SearchEvent, SearchProgress, SearchState};
use crate::product::types::{ProductQuery, ProductRecord, SearchError};
use crate::product::validator::{self, ParseOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How one generation attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    Unavailable,
    Malformed(String),
    SchemaViolation(String),
    Transport(String),
}

/// Outcome of a search plus the per-attempt history
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: Result<ProductRecord, SearchError>,
    pub attempts: Vec<AttemptOutcome>,
}

impl SearchReport {
    /// Generation calls issued
    pub fn calls(&self) -> usize {
        self.attempts.len()
    }
}

/// Product search over an injected generative backend
pub struct ProductSearch {
    backend: Arc<dyn GenerativeBackend>,
    config: SearchConfig,
}

impl ProductSearch {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: SearchConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Look up `query`, returning a validated record or a caller-facing error
    pub async fn search(&self, query: &ProductQuery) -> Result<ProductRecord, SearchError> {
        self.search_with_report(query).await.outcome
    }

    /// Like [`search`](Self::search), also returning what each attempt produced
    pub async fn search_with_report(&self, query: &ProductQuery) -> SearchReport {
        let request = prompt::build_request(query);
        let mut attempts = Vec::new();
        let mut accepted: Option<ProductRecord> = None;
        let mut unavailable = false;

        let mut progress = SearchProgress::new(self.config.max_attempts());
        info!(query = %query, max_attempts = progress.max_attempts, "product search started");

        let mut event = SearchEvent::Submit;
        loop {
            progress = match progress.apply(event) {
                Ok(next) => next,
                Err(e) => {
                    error!(error = %e, "product search state machine rejected event");
                    break;
                }
            };
            debug!(state = ?progress.state, attempt = progress.attempt, "search state");

            event = match progress.state {
                SearchState::Requesting => match self.backend.generate(&request).await {
                    Ok(text) => {
                        accepted = None;
                        match validator::validate(&text, query, self.config.zero_policy) {
                            ParseOutcome::Valid(record) => {
                                attempts.push(AttemptOutcome::Accepted);
                                accepted = Some(record);
                            }
                            ParseOutcome::Unavailable => {
                                attempts.push(AttemptOutcome::Unavailable);
                                unavailable = true;
                            }
                            ParseOutcome::Malformed(reason) => {
                                warn!(attempt = progress.attempt, %reason, "malformed response");
                                attempts.push(AttemptOutcome::Malformed(reason));
                            }
                            ParseOutcome::SchemaViolation(reason) => {
                                warn!(attempt = progress.attempt, %reason, "schema violation");
                                attempts.push(AttemptOutcome::SchemaViolation(reason));
                            }
                        }
                        SearchEvent::ResponseReceived
                    }
                    Err(e) => {
                        warn!(attempt = progress.attempt, error = %e, "generation call failed");
                        attempts.push(AttemptOutcome::Transport(e.to_string()));
                        SearchEvent::TransportFailed
                    }
                },
                SearchState::Validating => {
                    if accepted.is_some() {
                        SearchEvent::RecordAccepted
                    } else if unavailable {
                        SearchEvent::ProductUnavailable
                    } else {
                        SearchEvent::RecordRejected
                    }
                }
                SearchState::Retrying => {
                    if self.config.retry_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    }
                    SearchEvent::Resubmit
                }
                SearchState::Done | SearchState::Failed | SearchState::Idle => break,
            };
        }

        let outcome = match (progress.state, accepted) {
            (SearchState::Done, Some(record)) => {
                info!(attempts = progress.attempt, title = %record.identity.title, "product search succeeded");
                Ok(record)
            }
            _ if unavailable => {
                info!(attempts = progress.attempt, "backend reported product unavailable");
                Err(SearchError::ProductUnavailable)
            }
            _ => {
                warn!(attempts = progress.attempt, "product search exhausted its attempts");
                Err(SearchError::RetriesExhausted {
                    attempts: progress.attempt,
                })
            }
        };

        SearchReport { outcome, attempts }
    }
}
