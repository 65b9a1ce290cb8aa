//! Assistant chat: intent classification, page context derivation, and the
//! feed state behind the chat panel.

pub mod context;
pub mod conversation;
pub mod intent;

pub use context::{PageContext, PageView};
pub use conversation::{ChatFeed, ChatTurn};
pub use intent::{Intent, classify};
