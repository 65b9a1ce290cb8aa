//! Request and response shapes for the platform endpoints.
//!
//! The server is an opaque collaborator: request shapes are fixed by this
//! client, response structs model only the fields the desk actually reads,
//! and unknown fields are ignored on decode. Action replies share the
//! platform convention of a `success` flag plus an optional `message`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assistant::intent::Intent;

/// Chat message sent to the assistant endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// JSON-encoded page context, produced by [`crate::assistant::context`].
    pub context: String,
    #[serde(rename = "type")]
    pub intent: Intent,
}

/// Assistant reply to a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    /// Quick-reply button labels.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Extra assistant bubble, shown after a short delay.
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAssistRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAssistReply {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<SearchHit>,
    #[serde(default)]
    pub ai_suggestion: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// What a summarize request points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Topic,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReply {
    pub success: bool,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub concept: String,
    /// Detail level; the platform default is "intermediate".
    pub level: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationReply {
    pub success: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsRequest {
    pub topic_id: Option<u64>,
    pub resource_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsReply {
    pub success: bool,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub ai_insight: Option<String>,
    #[serde(default)]
    pub study_tips: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Flavor of study help requested from the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyAssistKind {
    Plan,
    Tips,
    Quiz,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyAssistRequest {
    #[serde(rename = "type")]
    pub kind: StudyAssistKind,
    pub topic_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyAssistReply {
    pub success: bool,
    #[serde(default)]
    pub study_plan: Vec<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub questions: Vec<PracticeQuestion>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Feedback on a single assistant reply, keyed by its interaction id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub interaction_id: String,
    /// 5 for helpful, 1 for not helpful.
    pub rating: u8,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// One row of the search suggestion dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Category label, e.g. "title" or "author".
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    /// Navigation target as a platform URL path.
    pub url: String,
}

/// Which way a bookmark toggle landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkAction {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkReply {
    pub success: bool,
    #[serde(default)]
    pub action: Option<BookmarkAction>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reading-progress report for a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub topic_id: u64,
    pub progress_percentage: u8,
    /// Whole minutes spent in the current visit.
    pub time_spent: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReply {
    pub success: bool,
    #[serde(default)]
    pub new_level: Option<u32>,
    #[serde(default)]
    pub total_points: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStartReply {
    pub success: bool,
    #[serde(default)]
    pub attempt_id: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Quiz submission body: question id (stringified) to selected option value.
/// An empty map is a valid submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    pub success: bool,
    /// Percentage score, 0 to 100.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub correct_answers: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub new_level: Option<u32>,
    #[serde(default)]
    pub total_points: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Calculator result: an open-ended key/value object whose rows the form
/// renders as returned. A `color` key, when present, is a styling hint
/// rather than a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorReply {
    pub success: bool,
    #[serde(default)]
    pub result: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRequest {
    /// Stars, 1 to 5.
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Updated aggregate, when the server returns one: patched into the
    /// resource header in place of the old reload-the-page behavior.
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
}

/// Signed-in user as the desk displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub track: Option<String>,
    pub level: u32,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topic_count: Option<u32>,
}

/// One topic link inside a module dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub progress_percentage: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: u64,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizInfo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub passing_score: Option<f64>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// Full topic page payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub progress_percentage: u8,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub quiz: Option<QuizInfo>,
}

/// Library resource as listed under a topic or opened directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year_published: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub bookmarked: bool,
}
