//! Star-rating widget on a resource page.
//!
//! One integer 1 to 5, overwritten on each selection and read once at
//! submit, plus a free-text comment. Submitting with no star picked is
//! blocked with a warning rather than a request.

use crate::api::types::RatingRequest;

pub const SELECT_RATING_WARNING: &str = "Please select a rating";
pub const RATING_FAILED: &str = "Failed to submit rating";

#[derive(Debug, Default)]
pub struct StarRating {
    stars: Option<u8>,
    pub comment: String,
}

impl StarRating {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the star count; values outside 1..=5 are ignored.
    pub fn select(&mut self, stars: u8) {
        if (1..=5).contains(&stars) {
            self.stars = Some(stars);
        }
    }

    pub fn stars(&self) -> Option<u8> {
        self.stars
    }

    /// Build the submission payload, or `None` when no star was picked.
    pub fn request(&self) -> Option<RatingRequest> {
        self.stars.map(|rating| RatingRequest { rating, comment: self.comment.trim().to_string() })
    }

    pub fn reset(&mut self) {
        self.stars = None;
        self.comment.clear();
    }

    /// Five-character star row for rendering, e.g. `★★★☆☆`.
    pub fn row(&self) -> String {
        let filled = self.stars.unwrap_or(0) as usize;
        "★".repeat(filled) + &"☆".repeat(5 - filled)
    }
}
