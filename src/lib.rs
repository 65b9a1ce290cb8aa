//! MediCore Desk - terminal client for the MediCore learning platform
//!
//! This library implements the client side of the platform's study surface:
//!
//! - Debounced search suggestions with a dropdown over the page
//! - An AI study assistant chat with intent classification and page context
//! - Study actions: bookmarks, reading progress, quizzes, resource ratings
//! - Conversation-history persistence between sessions
//!
//! Everything talks JSON over HTTP to the platform server; the TUI in [`tui`]
//! wires the pieces together.
//!
//! # Example
//!
//! ```no_run
//! use medicore_desk::assistant::{Intent, classify};
//!
//! assert_eq!(classify("explain the nephron to me"), Intent::Explain);
//! ```

pub mod api;
pub mod assistant;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod pages;
pub mod search;
pub mod storage;
pub mod study;
pub mod tui;
pub mod utils;
pub mod voice;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use assistant::{ChatFeed, ChatTurn, Intent};
pub use pages::Location;
