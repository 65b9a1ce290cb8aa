//! Suggestion dropdown state with stale-response guarding.
//!
//! In-flight fetches are never aborted, so completions can arrive out of
//! order. Every fetch takes a monotonically increasing sequence number from
//! [`SuggestionPanel::begin_request`]; a completion older than the latest
//! issued number is discarded without touching the panel.

use crate::api::types::Suggestion;

/// State behind the search suggestion dropdown.
#[derive(Debug, Default)]
pub struct SuggestionPanel {
    items: Vec<Suggestion>,
    visible: bool,
    selected: usize,
    issued_seq: u64,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Issue a sequence number for a new fetch.
    pub fn begin_request(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    /// Apply a completed fetch. Returns false when the response was stale
    /// (a newer request has since been issued) and was discarded. An empty
    /// result list hides the panel.
    pub fn apply_response(&mut self, seq: u64, items: Vec<Suggestion>) -> bool {
        if seq < self.issued_seq {
            return false;
        }
        if items.is_empty() {
            self.visible = false;
            self.items.clear();
        } else {
            self.items = items;
            self.visible = true;
            self.selected = 0;
        }
        true
    }

    /// A failed fetch hides the panel silently, unless a newer request is
    /// already outstanding, in which case the failure is ignored (it must
    /// not blank the newer request's panel).
    pub fn apply_failure(&mut self, seq: u64) {
        if seq >= self.issued_seq {
            self.visible = false;
        }
    }

    /// Hide without forgetting contents (focus moved away). A still-running
    /// fetch for the current query may legitimately re-show the panel.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Clear contents and invalidate every outstanding fetch; used when the
    /// query drops below the minimum length or the view changes.
    pub fn clear(&mut self) {
        self.items.clear();
        self.visible = false;
        self.selected = 0;
        self.issued_seq += 1;
    }

    pub fn select_next(&mut self) {
        if self.visible && self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.visible && self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Row under the cursor, the navigation target on Enter.
    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        if self.visible { self.items.get(self.selected) } else { None }
    }
}
