//! Bookmark badge on a resource page.
//!
//! The badge flips immediately on the key press for responsiveness, then
//! reconciles from the server's reply: whatever action the server reports
//! wins, regardless of what was displayed before.

use crate::api::types::BookmarkAction;

pub const BOOKMARK_FAILED: &str = "Failed to update bookmark";

/// Bookmark display state for the open resource.
#[derive(Debug, Default)]
pub struct BookmarkBadge {
    bookmarked: bool,
}

impl BookmarkBadge {
    pub fn new(bookmarked: bool) -> Self {
        Self { bookmarked }
    }

    pub fn is_bookmarked(&self) -> bool {
        self.bookmarked
    }

    /// Optimistic flip while the toggle request is in flight.
    pub fn flip(&mut self) {
        self.bookmarked = !self.bookmarked;
    }

    /// Reconcile from the server's action and return the toast text.
    pub fn apply(&mut self, action: BookmarkAction) -> &'static str {
        match action {
            BookmarkAction::Added => {
                self.bookmarked = true;
                "Added to bookmarks"
            }
            BookmarkAction::Removed => {
                self.bookmarked = false;
                "Removed from bookmarks"
            }
        }
    }

    /// Icon for the resource header.
    pub fn icon(&self) -> &'static str {
        if self.bookmarked { "★" } else { "☆" }
    }
}
