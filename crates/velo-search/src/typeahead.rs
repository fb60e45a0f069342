//! Search-as-you-type coordination.
//!
//! Each keystroke supersedes the previous one: the prior in-flight request
//! is cancelled, and the new request only proceeds once the input has been
//! stable for the debounce window. A response that arrives after the text
//! has changed again is discarded by query-text comparison.

use std::sync::Mutex;
use std::time::Duration;

use velo_data::cancel::CancelToken;

/// Default debounce window.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Handle for one typed query. Carries the cancel token wired to the
/// request it may issue.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub text: String,
    pub cancel: CancelToken,
}

/// Coordinates a search-as-you-type surface.
pub struct Typeahead {
    debounce: Duration,
    state: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    text: String,
    cancel: CancelToken,
}

impl Typeahead {
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce,
            state: Mutex::new(Inner {
                text: String::new(),
                cancel: CancelToken::new(),
            }),
        }
    }

    /// Record new input. Cancels whatever the previous ticket was doing
    /// and returns the ticket for this text.
    pub fn input(&self, text: &str) -> Ticket {
        let mut state = self.state.lock().unwrap();
        state.cancel.cancel();
        state.text = text.to_string();
        state.cancel = CancelToken::new();
        Ticket {
            text: text.to_string(),
            cancel: state.cancel.clone(),
        }
    }

    /// Wait out the debounce window.
    ///
    /// Returns true when the ticket survived (no newer input arrived) and
    /// its request should be issued now.
    pub async fn settle(&self, ticket: &Ticket) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.debounce) => self.is_current(ticket),
            _ = ticket.cancel.cancelled() => false,
        }
    }

    /// Whether a ticket still matches the latest input. A late-arriving
    /// response for a stale ticket must be discarded.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let state = self.state.lock().unwrap();
        !ticket.cancel.is_cancelled() && state.text == ticket.text
    }

    /// Abort the pending request outright (e.g. on navigation away).
    pub fn abort(&self) {
        let state = self.state.lock().unwrap();
        state.cancel.cancel();
    }
}

impl Default for Typeahead {
    fn default() -> Self {
        Self::new()
    }
}
