//! Bridge between the synchronous event loop and the tokio runtime.
//!
//! Every user action issues at most one request. A helper clones the client,
//! spawns the call on the runtime, and sends the completed result over an
//! unbounded channel; the event loop drains the channel once per tick and
//! applies the result to view state. In-flight requests are never cancelled,
//! so completions arrive in arbitrary order. The suggestion path carries a
//! sequence number for the panel's staleness check.

use tokio::sync::mpsc::UnboundedSender;

use crate::api::types::{
    BookmarkReply, CalculatorReply, ChatReply, ChatRequest, ExplainRequest, ExplanationReply,
    FeedbackReply, FeedbackRequest, ModuleSummary, Profile, ProgressReply, ProgressUpdate,
    QuizInfo, QuizResults, QuizStartReply, RatingReply, RatingRequest, RecommendationsReply,
    RecommendationsRequest, ResourceSummary, SearchAssistReply, StudyAssistReply,
    StudyAssistRequest, Suggestion, SummarizeRequest, SummaryReply, TopicDetail, TopicSummary,
};
use crate::api::{ApiClient, ApiResult};
use crate::voice::{Transcriber, VoiceTarget};

/// A completed background operation, delivered to the event loop.
#[derive(Debug)]
pub enum NetEvent {
    Suggestions { seq: u64, result: ApiResult<Vec<Suggestion>> },
    Chat(ApiResult<ChatReply>),
    SearchAssist(ApiResult<SearchAssistReply>),
    Summary(ApiResult<SummaryReply>),
    Explanation(ApiResult<ExplanationReply>),
    Recommendations(ApiResult<RecommendationsReply>),
    StudyAssist(ApiResult<StudyAssistReply>),
    Feedback(ApiResult<FeedbackReply>),
    Bookmark(ApiResult<BookmarkReply>),
    Progress(ApiResult<ProgressReply>),
    QuizStart { quiz: QuizInfo, result: ApiResult<QuizStartReply> },
    QuizResults(ApiResult<QuizResults>),
    Rating(ApiResult<RatingReply>),
    Calculator(ApiResult<CalculatorReply>),
    ModuleTopics { module_id: u64, result: ApiResult<Vec<TopicSummary>> },
    Profile(ApiResult<Profile>),
    Modules(ApiResult<Vec<ModuleSummary>>),
    Topic(ApiResult<TopicDetail>),
    TopicResources { topic_id: u64, result: ApiResult<Vec<ResourceSummary>> },
    Resource(ApiResult<ResourceSummary>),
    Transcript { target: VoiceTarget, result: anyhow::Result<String> },
}

/// Sends completed operations back to the event loop. Send failures mean
/// the loop already shut down, so they are logged and dropped.
#[derive(Debug, Clone)]
pub struct NetHandle {
    client: ApiClient,
    tx: UnboundedSender<NetEvent>,
}

impl NetHandle {
    pub fn new(client: ApiClient, tx: UnboundedSender<NetEvent>) -> Self {
        Self { client, tx }
    }

    fn deliver(tx: &UnboundedSender<NetEvent>, event: NetEvent) {
        if tx.send(event).is_err() {
            tracing::debug!("event loop gone; dropping network result");
        }
    }

    pub fn fetch_suggestions(&self, seq: u64, query: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.search_suggestions(&query).await;
            Self::deliver(&tx, NetEvent::Suggestions { seq, result });
        });
    }

    pub fn send_chat(&self, request: ChatRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.send_chat(request).await;
            Self::deliver(&tx, NetEvent::Chat(result));
        });
    }

    pub fn search_assist(&self, query: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.search_assist(query).await;
            Self::deliver(&tx, NetEvent::SearchAssist(result));
        });
    }

    pub fn summarize(&self, request: SummarizeRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.summarize(request).await;
            Self::deliver(&tx, NetEvent::Summary(result));
        });
    }

    pub fn explain(&self, request: ExplainRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.explain(request).await;
            Self::deliver(&tx, NetEvent::Explanation(result));
        });
    }

    pub fn recommendations(&self, request: RecommendationsRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.recommendations(request).await;
            Self::deliver(&tx, NetEvent::Recommendations(result));
        });
    }

    pub fn study_assistant(&self, request: StudyAssistRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.study_assistant(request).await;
            Self::deliver(&tx, NetEvent::StudyAssist(result));
        });
    }

    pub fn send_feedback(&self, request: FeedbackRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.send_feedback(request).await;
            Self::deliver(&tx, NetEvent::Feedback(result));
        });
    }

    pub fn toggle_bookmark(&self, resource_id: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.toggle_bookmark(resource_id).await;
            Self::deliver(&tx, NetEvent::Bookmark(result));
        });
    }

    pub fn update_progress(&self, update: ProgressUpdate) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.update_progress(update).await;
            Self::deliver(&tx, NetEvent::Progress(result));
        });
    }

    pub fn start_quiz(&self, quiz: QuizInfo) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.start_quiz(quiz.id).await;
            Self::deliver(&tx, NetEvent::QuizStart { quiz, result });
        });
    }

    pub fn submit_quiz(
        &self,
        attempt_id: u64,
        answers: std::collections::BTreeMap<String, String>,
    ) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.submit_quiz(attempt_id, answers).await;
            Self::deliver(&tx, NetEvent::QuizResults(result));
        });
    }

    pub fn rate_resource(&self, resource_id: u64, request: RatingRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.rate_resource(resource_id, request).await;
            Self::deliver(&tx, NetEvent::Rating(result));
        });
    }

    pub fn calculate(
        &self,
        calculator: &'static str,
        inputs: std::collections::BTreeMap<String, f64>,
    ) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.calculate(calculator, &inputs).await;
            Self::deliver(&tx, NetEvent::Calculator(result));
        });
    }

    pub fn fetch_module_topics(&self, module_id: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.module_topics(module_id).await;
            Self::deliver(&tx, NetEvent::ModuleTopics { module_id, result });
        });
    }

    pub fn fetch_profile(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.profile().await;
            Self::deliver(&tx, NetEvent::Profile(result));
        });
    }

    pub fn fetch_modules(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.modules().await;
            Self::deliver(&tx, NetEvent::Modules(result));
        });
    }

    pub fn fetch_topic(&self, topic_id: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.topic_detail(topic_id).await;
            Self::deliver(&tx, NetEvent::Topic(result));
        });
    }

    pub fn fetch_topic_resources(&self, topic_id: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.topic_resources(topic_id).await;
            Self::deliver(&tx, NetEvent::TopicResources { topic_id, result });
        });
    }

    pub fn fetch_resource(&self, resource_id: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.resource_detail(resource_id).await;
            Self::deliver(&tx, NetEvent::Resource(result));
        });
    }

    pub fn transcribe(&self, transcriber: Transcriber, target: VoiceTarget) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = transcriber.capture().await;
            if let Err(e) = &result {
                tracing::warn!("voice capture failed: {e}");
            }
            Self::deliver(&tx, NetEvent::Transcript { target, result });
        });
    }
}
