//! Chat feed state: bubbles, typing indicator, quick replies, delayed
//! follow-ups, and the persisted conversation history.
//!
//! The feed owns everything the chat panel renders. Network handlers call
//! one `apply_*` method per reply kind; each pushes sanitized assistant text
//! and leaves all other state untouched, so a failed call never disturbs
//! what is already on screen.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{
    ChatReply, ExplanationReply, RecommendationsReply, SearchAssistReply, StudyAssistReply,
    SummaryReply,
};
use crate::utils::sanitize::sanitize_for_display;

/// How many persisted turns are replayed into a fresh feed.
pub const REPLAYED_TURNS: usize = 5;

/// Delay before a chat reply's follow-up bubble appears.
const FOLLOW_UP_DELAY: Duration = Duration::from_millis(1000);
/// Explanations pause a little longer before their follow-up.
const EXPLAIN_FOLLOW_UP_DELAY: Duration = Duration::from_millis(1500);

/// Shown when the server cannot be reached at all.
pub const CONNECT_FALLBACK: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";
/// Shown when the server answered but declined and sent no message.
pub const ERROR_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

const WELCOME: &str = "Hi! I'm your AI study assistant. How can I help you today?";

/// One persisted conversation turn. Field names match the history file the
/// platform's web client kept in browser storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub ai: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One rendered chat bubble.
#[derive(Debug, Clone)]
pub struct ChatBubble {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set on assistant bubbles; the feedback endpoint references it.
    pub interaction_id: Option<String>,
}

#[derive(Debug)]
struct Followup {
    due: Instant,
    text: String,
}

/// State behind the chat panel.
#[derive(Debug)]
pub struct ChatFeed {
    pub open: bool,
    pub composer: String,
    bubbles: Vec<ChatBubble>,
    turns: Vec<ChatTurn>,
    awaiting_reply: bool,
    pending_user: Option<String>,
    quick_replies: Vec<String>,
    followups: Vec<Followup>,
}

impl ChatFeed {
    /// Build a feed from persisted history, replaying the most recent
    /// [`REPLAYED_TURNS`] turns after the standing welcome bubble.
    pub fn new(history: Vec<ChatTurn>) -> Self {
        let mut feed = Self {
            open: false,
            composer: String::new(),
            bubbles: Vec::new(),
            turns: Vec::new(),
            awaiting_reply: false,
            pending_user: None,
            quick_replies: Vec::new(),
            followups: Vec::new(),
        };
        feed.bubbles.push(ChatBubble {
            speaker: Speaker::Assistant,
            text: WELCOME.to_string(),
            timestamp: Utc::now(),
            interaction_id: None,
        });
        let replay_from = history.len().saturating_sub(REPLAYED_TURNS);
        for turn in &history[replay_from..] {
            feed.bubbles.push(ChatBubble {
                speaker: Speaker::User,
                text: turn.user.clone(),
                timestamp: turn.timestamp,
                interaction_id: None,
            });
            feed.bubbles.push(ChatBubble {
                speaker: Speaker::Assistant,
                text: turn.ai.clone(),
                timestamp: turn.timestamp,
                interaction_id: None,
            });
        }
        feed.turns = history;
        feed
    }

    pub fn bubbles(&self) -> &[ChatBubble] {
        &self.bubbles
    }

    /// Full conversation history, ready to persist.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.quick_replies
    }

    /// Trimmed composer contents, cleared; `None` when there is nothing to
    /// send (an empty composer never produces a request).
    pub fn take_composer(&mut self) -> Option<String> {
        let message = self.composer.trim().to_string();
        self.composer.clear();
        if message.is_empty() { None } else { Some(message) }
    }

    /// Record the outgoing user message and show the typing indicator.
    pub fn begin_exchange(&mut self, message: &str) {
        self.bubbles.push(ChatBubble {
            speaker: Speaker::User,
            text: message.to_string(),
            timestamp: Utc::now(),
            interaction_id: None,
        });
        self.pending_user = Some(message.to_string());
        self.awaiting_reply = true;
        self.quick_replies.clear();
    }

    fn push_assistant(&mut self, text: &str) {
        self.bubbles.push(ChatBubble {
            speaker: Speaker::Assistant,
            text: sanitize_for_display(text),
            timestamp: Utc::now(),
            interaction_id: Some(Uuid::new_v4().to_string()),
        });
        self.awaiting_reply = false;
    }

    /// Render a chat reply: assistant bubble, quick-reply buttons, optional
    /// delayed follow-up, and a history turn for the exchange.
    pub fn apply_chat_reply(&mut self, reply: ChatReply, now: Instant) {
        let text = reply.response.unwrap_or_else(|| ERROR_FALLBACK.to_string());
        self.push_assistant(&text);
        self.quick_replies = reply.suggestions;
        if let Some(follow_up) = reply.follow_up {
            self.followups.push(Followup { due: now + FOLLOW_UP_DELAY, text: follow_up });
        }
        if let Some(user) = self.pending_user.take() {
            self.turns.push(ChatTurn {
                user,
                ai: sanitize_for_display(&text),
                timestamp: Utc::now(),
            });
        }
    }

    pub fn apply_search_results(&mut self, reply: SearchAssistReply) {
        let mut lines = Vec::new();
        if reply.results.is_empty() {
            lines.push("I couldn't find anything matching that search.".to_string());
        } else {
            lines.push("Here's what I found:".to_string());
            for hit in &reply.results {
                match &hit.summary {
                    Some(summary) => lines.push(format!("• {} — {}", hit.title, summary)),
                    None => lines.push(format!("• {}", hit.title)),
                }
            }
        }
        if let Some(suggestion) = &reply.ai_suggestion {
            lines.push(String::new());
            lines.push(suggestion.clone());
        }
        self.push_assistant(&lines.join("\n"));
    }

    pub fn apply_summary(&mut self, reply: SummaryReply) {
        let mut lines = Vec::new();
        if let Some(summary) = &reply.summary {
            lines.push(summary.clone());
        }
        if !reply.key_points.is_empty() {
            lines.push(String::new());
            lines.push("Key points:".to_string());
            for point in &reply.key_points {
                lines.push(format!("• {point}"));
            }
        }
        if lines.is_empty() {
            lines.push(ERROR_FALLBACK.to_string());
        }
        self.push_assistant(&lines.join("\n"));
    }

    pub fn apply_explanation(&mut self, reply: ExplanationReply, now: Instant) {
        let text = reply.explanation.unwrap_or_else(|| ERROR_FALLBACK.to_string());
        self.push_assistant(&text);
        if let Some(follow_up) = reply.follow_up {
            self.followups.push(Followup { due: now + EXPLAIN_FOLLOW_UP_DELAY, text: follow_up });
        }
    }

    pub fn apply_recommendations(&mut self, reply: RecommendationsReply) {
        let mut lines = Vec::new();
        if reply.recommendations.is_empty() {
            lines.push("I don't have recommendations for this page yet.".to_string());
        } else {
            lines.push("You might find these useful:".to_string());
            for rec in &reply.recommendations {
                match &rec.reason {
                    Some(reason) => lines.push(format!("• {} — {}", rec.title, reason)),
                    None => lines.push(format!("• {}", rec.title)),
                }
            }
        }
        if let Some(insight) = &reply.ai_insight {
            lines.push(String::new());
            lines.push(insight.clone());
        }
        if let Some(tips) = &reply.study_tips {
            lines.push(String::new());
            lines.push(format!("Study tip: {tips}"));
        }
        self.push_assistant(&lines.join("\n"));
    }

    pub fn apply_study_assist(&mut self, reply: StudyAssistReply) {
        let mut lines = Vec::new();
        if !reply.study_plan.is_empty() {
            lines.push("Suggested study plan:".to_string());
            for (i, step) in reply.study_plan.iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, step));
            }
            if let Some(time) = &reply.estimated_time {
                lines.push(format!("Estimated time: {time}"));
            }
        }
        if !reply.tips.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("Tips:".to_string());
            for tip in &reply.tips {
                lines.push(format!("• {tip}"));
            }
        }
        if !reply.questions.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("Practice questions:".to_string());
            for question in &reply.questions {
                lines.push(format!("• {}", question.question));
                for option in &question.options {
                    lines.push(format!("    - {option}"));
                }
            }
        }
        if lines.is_empty() {
            lines.push(ERROR_FALLBACK.to_string());
        }
        self.push_assistant(&lines.join("\n"));
    }

    /// Render a failed assistant call: the server's own message for a
    /// rejection, a fixed fallback for transport trouble. The dropped
    /// exchange is not recorded in history.
    pub fn apply_error(&mut self, error: &ApiError) {
        let text = if error.is_rejection() {
            error.server_message().unwrap_or(ERROR_FALLBACK).to_string()
        } else {
            CONNECT_FALLBACK.to_string()
        };
        self.push_assistant(&text);
        self.pending_user = None;
    }

    /// Promote due follow-ups into bubbles. Returns true when anything was
    /// appended so the caller can mark the frame dirty.
    pub fn poll_followups(&mut self, now: Instant) -> bool {
        let mut appended = false;
        let mut remaining = Vec::new();
        for followup in self.followups.drain(..) {
            if followup.due <= now {
                self.bubbles.push(ChatBubble {
                    speaker: Speaker::Assistant,
                    text: sanitize_for_display(&followup.text),
                    timestamp: Utc::now(),
                    interaction_id: Some(Uuid::new_v4().to_string()),
                });
                appended = true;
            } else {
                remaining.push(followup);
            }
        }
        self.followups = remaining;
        if appended {
            self.awaiting_reply = false;
        }
        appended
    }

    /// Interaction id of the latest assistant bubble, the target for
    /// helpful / not-helpful feedback.
    pub fn last_interaction_id(&self) -> Option<&str> {
        self.bubbles
            .iter()
            .rev()
            .find(|b| b.speaker == Speaker::Assistant)
            .and_then(|b| b.interaction_id.as_deref())
    }

    /// Text of the latest assistant bubble, for copy-to-clipboard.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.bubbles
            .iter()
            .rev()
            .find(|b| b.speaker == Speaker::Assistant)
            .map(|b| b.text.as_str())
    }
}
