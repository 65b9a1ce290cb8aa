//! Small shared helpers.

pub mod sanitize;

pub use sanitize::sanitize_for_display;
