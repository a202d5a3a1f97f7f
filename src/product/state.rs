//! Product search state machine
//!
//! Valid transitions:
//! 1. Idle       → Requesting  (on: Submit)
//! 2. Requesting → Validating  (on: ResponseReceived)
//! 3. Requesting → Retrying    (on: TransportFailed, budget left)
//! 4. Requesting → Failed      (on: TransportFailed, budget spent)
//! 5. Validating → Done        (on: RecordAccepted)
//! 6. Validating → Failed      (on: ProductUnavailable)
//! 7. Validating → Retrying    (on: RecordRejected, budget left)
//! 8. Validating → Failed      (on: RecordRejected, budget spent)
//! 9. Retrying   → Requesting  (on: Resubmit)
//!
//! Done and Failed are terminal and accept no events.

use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    Idle,
    /// Generation call in flight
    Requesting,
    /// Classifying the response
    Validating,
    /// Waiting to resubmit the same payload
    Retrying,
    /// Record accepted (terminal)
    Done,
    /// Unavailable or out of attempts (terminal)
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEvent {
    Submit,
    ResponseReceived,
    TransportFailed,
    RecordAccepted,
    ProductUnavailable,
    RecordRejected,
    Resubmit,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Done | SearchState::Failed)
    }

    /// Next state for `event`; `budget_left` decides retry versus failure
    pub fn transition(&self, event: SearchEvent, budget_left: bool) -> Result<SearchState> {
        use SearchEvent::*;
        use SearchState::*;

        let next = match (self, event) {
            (Idle, Submit) => Requesting,
            (Requesting, ResponseReceived) => Validating,
            (Requesting, TransportFailed) | (Validating, RecordRejected) => {
                if budget_left {
                    Retrying
                } else {
                    Failed
                }
            }
            (Validating, RecordAccepted) => Done,
            (Validating, ProductUnavailable) => Failed,
            (Retrying, Resubmit) => Requesting,
            (from, event) => {
                return Err(AdvisorError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("{:?}", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next)
    }
}

/// Explicit state value threaded through one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    pub state: SearchState,
    /// Generation calls issued so far
    pub attempt: u32,
    pub max_attempts: u32,
}

impl SearchProgress {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            state: SearchState::Idle,
            attempt: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Another generation call is allowed
    pub fn has_budget(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Apply `event`, counting a new attempt whenever a call is issued
    pub fn apply(self, event: SearchEvent) -> Result<Self> {
        let state = self.state.transition(event, self.has_budget())?;
        let attempt = if state == SearchState::Requesting {
            self.attempt + 1
        } else {
            self.attempt
        };

        Ok(Self {
            state,
            attempt,
            max_attempts: self.max_attempts,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
