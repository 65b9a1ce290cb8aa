//! Chat message intent classification.
//!
//! The platform routes an assistant message by a keyword heuristic. The
//! heuristic lives in one ordered rule table so the precedence (search wins
//! over explain wins over summarize) is explicit and testable instead of
//! being buried in nested conditionals.

use serde::{Deserialize, Serialize};

/// Intent label sent as the `type` field of a chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Search,
    Explain,
    Summarize,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Search => "search",
            Intent::Explain => "explain",
            Intent::Summarize => "summarize",
            Intent::General => "general",
        }
    }
}

/// Classification rules in precedence order. The first row with a matching
/// keyword wins.
const RULES: &[(Intent, &[&str])] = &[
    (Intent::Search, &["search", "find"]),
    (Intent::Explain, &["explain", "what is", "how does"]),
    (Intent::Summarize, &["summarize", "summary", "tldr"]),
];

/// Classify a chat message by case-insensitive substring match against the
/// rule table, falling back to [`Intent::General`].
pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    for (intent, keywords) in RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return *intent;
        }
    }
    Intent::General
}
