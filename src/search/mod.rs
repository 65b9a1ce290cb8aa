//! Debounced search-suggestion pipeline.
//!
//! Keystrokes feed [`debounce::DebouncedInput`]; the event loop polls it and
//! issues a fetch once the field has been quiet long enough. Results land in
//! [`suggestions::SuggestionPanel`], which discards stale completions by
//! sequence number.

pub mod debounce;
pub mod suggestions;

pub use debounce::DebouncedInput;
pub use suggestions::SuggestionPanel;
