//! Quiet-period debounce for the search field.
//!
//! Keystrokes only schedule work; the fetch fires when [`DebouncedInput::poll`]
//! finds the quiet period elapsed. At most one fetch is ever scheduled: each
//! edit replaces the previous deadline.

use std::time::{Duration, Instant};

/// How long the field must stay untouched before a fetch fires.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Queries shorter than this never reach the server.
pub const MIN_QUERY_LEN: usize = 2;

/// Debounce state for one input field.
#[derive(Debug, Default)]
pub struct DebouncedInput {
    query: String,
    deadline: Option<Instant>,
}

impl DebouncedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current field contents, untrimmed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Record an edit at `now`. Returns true when the suggestion panel must
    /// clear immediately: the trimmed query fell below the minimum length,
    /// so no fetch is scheduled and any pending one is dropped.
    pub fn on_edit(&mut self, query: String, now: Instant) -> bool {
        self.query = query;
        if self.query.trim().len() < MIN_QUERY_LEN {
            self.deadline = None;
            return true;
        }
        self.deadline = Some(now + QUIET_PERIOD);
        false
    }

    /// Replace the field (voice transcript) and return the query to fetch
    /// right away, skipping the quiet period. `None` when still too short.
    pub fn set_query_immediate(&mut self, query: String) -> Option<String> {
        self.query = query;
        self.deadline = None;
        let trimmed = self.query.trim();
        if trimmed.len() < MIN_QUERY_LEN { None } else { Some(trimmed.to_string()) }
    }

    /// Fire the pending fetch if its quiet period has elapsed. One-shot: a
    /// fired deadline is consumed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                Some(self.query.trim().to_string())
            }
            _ => None,
        }
    }

    /// Drop the field contents and any pending fetch.
    pub fn reset(&mut self) {
        self.query.clear();
        self.deadline = None;
    }
}
