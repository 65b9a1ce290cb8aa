//! Study actions on course and library pages: bookmarking, progress
//! reporting, quiz attempts, resource rating, clinical calculators, and
//! module-topic navigation.
//!
//! Each submodule owns the view state for one widget and stays free of I/O;
//! the event loop wires them to the network.

pub mod bookmarks;
pub mod calculator;
pub mod progress;
pub mod quiz;
pub mod rating;
pub mod topics;

pub use bookmarks::BookmarkBadge;
pub use calculator::{CalculatorForm, CalculatorKind};
pub use progress::{LevelBadge, ReadingClock};
pub use quiz::QuizSheet;
pub use rating::StarRating;
pub use topics::{ExpandOutcome, ModuleNav};
