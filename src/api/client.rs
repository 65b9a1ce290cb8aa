use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::*;

/// Per-request timeout. The UI never retries, so a hung call should fail
/// while the session is still worth saving.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the MediCore platform.
///
/// One instance is shared by cloning; every method issues exactly one call
/// and decodes only the fields the desk reads. Methods on flagged endpoints
/// (`success` in the body) convert a false flag into [`ApiError::Rejected`]
/// so callers handle exactly two failure kinds.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given server, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a response body the way the web client did: any JSON body that
    /// matches the expected shape counts, even on a 4xx/5xx status (the
    /// platform sends flagged rejections with error statuses). A non-success
    /// status with an unreadable body is a transport-kind failure.
    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => {
                Err(ApiError::Status { status_code: status.as_u16(), message: body })
            }
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.http.post(self.url(path)).send().await?;
        Self::decode(response).await
    }

    // ── Search ──────────────────────────────────────────────────────────

    /// Fetch dropdown suggestions for a query. The server returns an empty
    /// list for queries shorter than two characters.
    pub async fn search_suggestions(&self, query: &str) -> ApiResult<Vec<Suggestion>> {
        self.get_json("/library/api/search-suggestions", &[("q", query)]).await
    }

    pub async fn search_assist(&self, query: String) -> ApiResult<SearchAssistReply> {
        let reply: SearchAssistReply =
            self.post_json("/ai/search-assist", &SearchAssistRequest { query }).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    // ── Assistant ───────────────────────────────────────────────────────

    pub async fn send_chat(&self, request: ChatRequest) -> ApiResult<ChatReply> {
        let reply: ChatReply = self.post_json("/ai/chat", &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn summarize(&self, request: SummarizeRequest) -> ApiResult<SummaryReply> {
        let reply: SummaryReply = self.post_json("/ai/summarize", &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn explain(&self, request: ExplainRequest) -> ApiResult<ExplanationReply> {
        let reply: ExplanationReply = self.post_json("/ai/explain", &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn recommendations(
        &self,
        request: RecommendationsRequest,
    ) -> ApiResult<RecommendationsReply> {
        let reply: RecommendationsReply =
            self.post_json("/ai/recommendations", &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn study_assistant(
        &self,
        request: StudyAssistRequest,
    ) -> ApiResult<StudyAssistReply> {
        let reply: StudyAssistReply = self.post_json("/ai/study-assistant", &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn send_feedback(&self, request: FeedbackRequest) -> ApiResult<FeedbackReply> {
        let reply: FeedbackReply = self.post_json("/ai/feedback", &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    // ── Study actions ───────────────────────────────────────────────────

    pub async fn toggle_bookmark(&self, resource_id: u64) -> ApiResult<BookmarkReply> {
        let path = format!("/library/api/resource/{resource_id}/bookmark");
        let reply: BookmarkReply = self.post_empty(&path).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn update_progress(&self, update: ProgressUpdate) -> ApiResult<ProgressReply> {
        let reply: ProgressReply = self.post_json("/user/update-progress", &update).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn start_quiz(&self, quiz_id: u64) -> ApiResult<QuizStartReply> {
        let path = format!("/courses/quiz/{quiz_id}/start");
        let reply: QuizStartReply = self.post_empty(&path).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn submit_quiz(
        &self,
        attempt_id: u64,
        answers: BTreeMap<String, String>,
    ) -> ApiResult<QuizResults> {
        let path = format!("/courses/quiz-attempt/{attempt_id}/submit");
        let reply: QuizResults = self.post_json(&path, &QuizSubmission { answers }).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    /// Run one pharmacology calculator. The server re-validates the inputs
    /// and rejects non-positive values with its own message.
    pub async fn calculate(
        &self,
        calculator: &str,
        inputs: &BTreeMap<String, f64>,
    ) -> ApiResult<CalculatorReply> {
        let path = format!("/pharmacology/calculators/{calculator}");
        let reply: CalculatorReply = self.post_json(&path, inputs).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    pub async fn rate_resource(
        &self,
        resource_id: u64,
        request: RatingRequest,
    ) -> ApiResult<RatingReply> {
        let path = format!("/library/resource/{resource_id}/rate");
        let reply: RatingReply = self.post_json(&path, &request).await?;
        if !reply.success {
            return Err(ApiError::Rejected { message: reply.message });
        }
        Ok(reply)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub async fn module_topics(&self, module_id: u64) -> ApiResult<Vec<TopicSummary>> {
        let path = format!("/courses/api/modules/{module_id}/topics");
        self.get_json(&path, &[]).await
    }

    pub async fn profile(&self) -> ApiResult<Profile> {
        self.get_json("/user/api/profile", &[]).await
    }

    pub async fn modules(&self) -> ApiResult<Vec<ModuleSummary>> {
        self.get_json("/courses/api/modules", &[]).await
    }

    pub async fn topic_detail(&self, topic_id: u64) -> ApiResult<TopicDetail> {
        let path = format!("/courses/api/topic/{topic_id}");
        self.get_json(&path, &[]).await
    }

    pub async fn topic_resources(&self, topic_id: u64) -> ApiResult<Vec<ResourceSummary>> {
        let path = format!("/courses/api/topic/{topic_id}/resources");
        self.get_json(&path, &[]).await
    }

    pub async fn resource_detail(&self, resource_id: u64) -> ApiResult<ResourceSummary> {
        let path = format!("/library/api/resource/{resource_id}");
        self.get_json(&path, &[]).await
    }
}
