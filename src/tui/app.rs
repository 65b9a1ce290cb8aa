//! App controller: all mutable UI state and the event loop.
//!
//! One `App` per session owns every piece of view state (the pending
//! suggestion fetch, the chat feed, the open page, the overlays) and runs
//! the loop: drain completed network results, fire due deadlines (debounce,
//! follow-ups, toast expiry, the reading clock), redraw when dirty, then
//! translate the next key into an action. Network calls themselves run on
//! the tokio runtime through [`super::net::NetHandle`]; nothing here blocks.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::mpsc::UnboundedReceiver;

use super::events::{Action, Zone, poll_event};
use super::net::{NetEvent, NetHandle};
use super::rendering::{PageState, RenderState, render_ui};
use crate::api::types::{
    ChatRequest, ContentKind, ExplainRequest, FeedbackRequest, Profile, QuizResults,
    RecommendationsRequest, ResourceSummary, StudyAssistKind, StudyAssistRequest,
    SummarizeRequest, TopicDetail,
};
use crate::assistant::context::{PageContext, PageView};
use crate::assistant::{ChatFeed, ChatTurn, intent};
use crate::clipboard::copy_reply;
use crate::pages::Location;
use crate::search::{DebouncedInput, SuggestionPanel};
use crate::storage::history::save_history;
use crate::study::bookmarks::BOOKMARK_FAILED;
use crate::study::calculator::{CALCULATOR_FAILED, CALCULATOR_INPUT_WARNING};
use crate::study::rating::{RATING_FAILED, SELECT_RATING_WARNING};
use crate::study::topics::TOPICS_FAILED;
use crate::study::{BookmarkBadge, CalculatorForm, CalculatorKind, ExpandOutcome, LevelBadge,
    ModuleNav, QuizSheet, ReadingClock, StarRating};
use crate::voice::{Transcriber, VoiceTarget};

/// Duration for success toasts (milliseconds)
const TOAST_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error toasts (milliseconds)
const TOAST_ERROR_DURATION_MS: u64 = 5000;

/// How many lines a PageUp/PageDown scrolls the topic body.
const SCROLL_PAGE: usize = 10;

/// Feedback ratings sent for the thumbs on an assistant reply.
const FEEDBACK_HELPFUL: u8 = 5;
const FEEDBACK_UNHELPFUL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient toast with expiry.
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Which pane owns the keyboard while no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Browse,
    Search,
    Chat,
}

/// Modal overlays. At most one is open; it owns the keyboard.
#[derive(Debug)]
pub enum Overlay {
    Quiz(QuizSheet),
    QuizResults(QuizResults),
    LevelUp(u32),
    Rating,
    Calculator(CalculatorForm),
}

pub struct App {
    net: NetHandle,
    net_rx: UnboundedReceiver<NetEvent>,
    transcriber: Option<Transcriber>,
    history_path: PathBuf,

    // navigation
    location: Location,
    nav: ModuleNav,
    topic: Option<TopicDetail>,
    topic_scroll: usize,
    topic_resources: Vec<ResourceSummary>,
    resource_cursor: usize,
    resource: Option<ResourceSummary>,

    // session
    profile: Option<Profile>,
    level: LevelBadge,

    // search pipeline
    search: DebouncedInput,
    panel: SuggestionPanel,

    // assistant
    feed: ChatFeed,
    quick_reply_cursor: usize,

    // study widgets
    bookmark: BookmarkBadge,
    rating: StarRating,
    clock: Option<ReadingClock>,

    focus: Focus,
    overlay: Option<Overlay>,
    /// Level-up held back while the quiz-results modal is still up.
    pending_level_up: Option<u32>,
    mic_active: bool,
    toast: Option<Toast>,

    should_quit: bool,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(
        net: NetHandle,
        net_rx: UnboundedReceiver<NetEvent>,
        transcriber: Option<Transcriber>,
        history_path: PathBuf,
        history: Vec<ChatTurn>,
    ) -> Self {
        Self {
            net,
            net_rx,
            transcriber,
            history_path,
            location: Location::Modules,
            nav: ModuleNav::new(),
            topic: None,
            topic_scroll: 0,
            topic_resources: Vec::new(),
            resource_cursor: 0,
            resource: None,
            profile: None,
            level: LevelBadge::new(1),
            search: DebouncedInput::new(),
            panel: SuggestionPanel::new(),
            feed: ChatFeed::new(history),
            quick_reply_cursor: 0,
            bookmark: BookmarkBadge::new(false),
            rating: StarRating::new(),
            clock: None,
            focus: Focus::Browse,
            overlay: None,
            pending_level_up: None,
            mic_active: false,
            toast: None,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Kick off the initial reads for the session.
    pub fn load_initial(&mut self) {
        self.net.fetch_profile();
        self.net.fetch_modules();
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.drain_net_events(now);
            self.poll_deadlines(now);

            // Draw if dirty or if it's been >100ms (terminal resize handling)
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                let state = self.render_state();
                terminal.draw(|f| render_ui(f, &state))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.zone())?;
            self.handle_action(action, Instant::now());
        }

        save_history(&self.history_path, self.feed.turns())?;
        Ok(())
    }

    fn zone(&self) -> Zone {
        match &self.overlay {
            Some(Overlay::Quiz(_)) => Zone::Quiz,
            Some(Overlay::Rating) => Zone::Rating,
            Some(Overlay::Calculator(_)) => Zone::Calculator,
            Some(_) => Zone::Modal,
            None => match self.focus {
                Focus::Browse => Zone::Browse,
                Focus::Search => Zone::Search,
                Focus::Chat => Zone::Chat,
            },
        }
    }

    fn set_toast(&mut self, text: impl Into<String>, message_type: MessageType) {
        let duration = match message_type {
            MessageType::Success => TOAST_SUCCESS_DURATION_MS,
            MessageType::Error => TOAST_ERROR_DURATION_MS,
        };
        self.toast = Some(Toast {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration),
        });
        self.needs_redraw = true;
    }

    // ── Deadlines ───────────────────────────────────────────────────────

    fn poll_deadlines(&mut self, now: Instant) {
        if let Some(toast) = &self.toast
            && now >= toast.expires_at
        {
            self.toast = None;
            self.needs_redraw = true;
        }

        // quiet period elapsed: issue the suggestion fetch
        if let Some(query) = self.search.poll(now) {
            let seq = self.panel.begin_request();
            self.net.fetch_suggestions(seq, query);
        }

        if self.feed.poll_followups(now) {
            self.needs_redraw = true;
        }

        // periodic time-spent report while a topic is open
        if let Some(clock) = &mut self.clock {
            let percentage = self.topic.as_ref().map(|t| t.progress_percentage).unwrap_or(0);
            if let Some(update) = clock.tick(now, percentage) {
                self.net.update_progress(update);
            }
        }
    }

    // ── Network results ─────────────────────────────────────────────────

    fn drain_net_events(&mut self, now: Instant) {
        while let Ok(event) = self.net_rx.try_recv() {
            self.apply_net_event(event, now);
            self.needs_redraw = true;
        }
    }

    fn apply_net_event(&mut self, event: NetEvent, now: Instant) {
        match event {
            NetEvent::Suggestions { seq, result } => match result {
                Ok(items) => {
                    self.panel.apply_response(seq, items);
                }
                // transport failure hides the panel silently
                Err(_) => self.panel.apply_failure(seq),
            },

            NetEvent::Chat(result) => {
                self.quick_reply_cursor = 0;
                match result {
                    Ok(reply) => self.feed.apply_chat_reply(reply, now),
                    Err(e) => self.feed.apply_error(&e),
                }
            }
            NetEvent::SearchAssist(result) => match result {
                Ok(reply) => self.feed.apply_search_results(reply),
                Err(e) => self.feed.apply_error(&e),
            },
            NetEvent::Summary(result) => match result {
                Ok(reply) => self.feed.apply_summary(reply),
                Err(e) => self.feed.apply_error(&e),
            },
            NetEvent::Explanation(result) => match result {
                Ok(reply) => self.feed.apply_explanation(reply, now),
                Err(e) => self.feed.apply_error(&e),
            },
            NetEvent::Recommendations(result) => match result {
                Ok(reply) => self.feed.apply_recommendations(reply),
                Err(e) => self.feed.apply_error(&e),
            },
            NetEvent::StudyAssist(result) => match result {
                Ok(reply) => self.feed.apply_study_assist(reply),
                Err(e) => self.feed.apply_error(&e),
            },

            NetEvent::Feedback(result) => match result {
                Ok(reply) => {
                    let text =
                        reply.message.unwrap_or_else(|| "Thanks for the feedback!".to_string());
                    self.set_toast(text, MessageType::Success);
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or("Failed to send feedback");
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Bookmark(result) => match result {
                Ok(reply) => {
                    if let Some(action) = reply.action {
                        let toast = self.bookmark.apply(action);
                        self.set_toast(toast, MessageType::Success);
                    }
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or(BOOKMARK_FAILED);
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Progress(result) => match result {
                Ok(reply) => {
                    if let Some(points) = reply.total_points
                        && let Some(profile) = &mut self.profile
                    {
                        profile.total_points = points;
                    }
                    if self.level.observe(reply.new_level) {
                        self.show_level_up(self.level.level());
                    }
                }
                // progress reports are background traffic; no toast
                Err(e) => tracing::warn!("progress update failed: {e}"),
            },

            NetEvent::QuizStart { quiz, result } => match result {
                Ok(reply) => match reply.attempt_id {
                    Some(attempt_id) => {
                        self.overlay = Some(Overlay::Quiz(QuizSheet::new(quiz, attempt_id)));
                    }
                    None => self.set_toast("Failed to start quiz", MessageType::Error),
                },
                Err(e) => {
                    let text = e.server_message().unwrap_or("Failed to start quiz");
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::QuizResults(result) => match result {
                Ok(results) => {
                    if let Some(points) = results.total_points
                        && let Some(profile) = &mut self.profile
                    {
                        profile.total_points = points;
                    }
                    if self.level.observe(results.new_level) {
                        // shown after the results modal is dismissed
                        self.pending_level_up = Some(self.level.level());
                    }
                    self.overlay = Some(Overlay::QuizResults(results));
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or("Failed to submit quiz");
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Rating(result) => match result {
                Ok(reply) => {
                    // patch the aggregate in place instead of reloading
                    if let Some(resource) = &mut self.resource {
                        if reply.average_rating.is_some() {
                            resource.average_rating = reply.average_rating;
                        }
                        if reply.rating_count.is_some() {
                            resource.rating_count = reply.rating_count;
                        }
                    }
                    self.rating.reset();
                    if matches!(self.overlay, Some(Overlay::Rating)) {
                        self.overlay = None;
                    }
                    let text = reply.message.unwrap_or_else(|| "Thanks for rating!".to_string());
                    self.set_toast(text, MessageType::Success);
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or(RATING_FAILED);
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Calculator(result) => match result {
                Ok(reply) => {
                    // rows render inside the still-open form
                    if let Some(Overlay::Calculator(form)) = &mut self.overlay
                        && let Some(rows) = reply.result
                    {
                        form.apply_result(rows);
                    }
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or(CALCULATOR_FAILED);
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::ModuleTopics { module_id, result } => match result {
                Ok(topics) => self.nav.apply_topics(module_id, topics),
                Err(e) => {
                    self.nav.apply_failure(module_id);
                    let text = e.server_message().unwrap_or(TOPICS_FAILED);
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Profile(result) => match result {
                Ok(profile) => {
                    self.level = LevelBadge::new(profile.level);
                    self.profile = Some(profile);
                }
                Err(e) => tracing::warn!("profile load failed: {e}"),
            },

            NetEvent::Modules(result) => match result {
                Ok(modules) => self.nav.set_modules(modules),
                Err(e) => {
                    let text = e.server_message().unwrap_or("Failed to load modules");
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Topic(result) => match result {
                Ok(topic) => {
                    self.clock = Some(ReadingClock::new(topic.id, now));
                    self.topic_scroll = 0;
                    self.resource_cursor = 0;
                    self.topic_resources.clear();
                    self.net.fetch_topic_resources(topic.id);
                    self.location = Location::Topic { id: topic.id };
                    self.topic = Some(topic);
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or("Failed to load topic");
                    self.set_toast(text.to_string(), MessageType::Error);
                    self.location = Location::Modules;
                }
            },

            NetEvent::TopicResources { topic_id, result } => match result {
                Ok(resources) => {
                    if self.topic.as_ref().is_some_and(|t| t.id == topic_id) {
                        self.topic_resources = resources;
                        self.resource_cursor = 0;
                    }
                }
                Err(e) => tracing::warn!("topic resources load failed: {e}"),
            },

            NetEvent::Resource(result) => match result {
                Ok(resource) => {
                    self.bookmark = BookmarkBadge::new(resource.bookmarked);
                    self.rating.reset();
                    self.location = Location::Resource { id: resource.id };
                    self.resource = Some(resource);
                }
                Err(e) => {
                    let text = e.server_message().unwrap_or("Failed to load resource");
                    self.set_toast(text.to_string(), MessageType::Error);
                }
            },

            NetEvent::Transcript { target, result } => {
                self.mic_active = false;
                match result {
                    Ok(transcript) => match target {
                        VoiceTarget::Chat => {
                            self.feed.composer = transcript;
                        }
                        VoiceTarget::Search => {
                            // transcript bypasses the quiet period
                            if let Some(query) = self.search.set_query_immediate(transcript) {
                                let seq = self.panel.begin_request();
                                self.net.fetch_suggestions(seq, query);
                            }
                        }
                    },
                    Err(_) => self.set_toast("Voice input failed", MessageType::Error),
                }
            }
        }
    }

    fn show_level_up(&mut self, level: u32) {
        if self.overlay.is_none() {
            self.overlay = Some(Overlay::LevelUp(level));
        } else {
            self.pending_level_up = Some(level);
        }
    }

    // ── Actions ─────────────────────────────────────────────────────────

    fn handle_action(&mut self, action: Action, now: Instant) {
        if action == Action::None {
            return;
        }
        self.needs_redraw = true;

        if action == Action::Quit {
            self.should_quit = true;
            return;
        }

        match self.zone() {
            Zone::Browse => self.handle_browse(action),
            Zone::Search => self.handle_search(action, now),
            Zone::Chat => self.handle_chat(action),
            Zone::Quiz => self.handle_quiz(action),
            Zone::Rating => self.handle_rating(action),
            Zone::Calculator => self.handle_calculator(action),
            Zone::Modal => {
                if action == Action::Back {
                    self.overlay = None;
                    if let Some(level) = self.pending_level_up.take() {
                        self.overlay = Some(Overlay::LevelUp(level));
                    }
                }
            }
        }
    }

    fn handle_browse(&mut self, action: Action) {
        match action {
            Action::FocusSearch => self.focus = Focus::Search,
            Action::OpenChat => {
                self.feed.open = true;
                self.focus = Focus::Chat;
            }
            Action::Back => self.go_back(),
            Action::MoveUp | Action::MoveDown | Action::Submit => {
                self.handle_page_navigation(action)
            }
            Action::PageUp => {
                self.topic_scroll = self.topic_scroll.saturating_sub(SCROLL_PAGE);
            }
            Action::PageDown => self.scroll_topic_down(),
            Action::ToggleBookmark => self.toggle_bookmark(),
            Action::OpenRating => {
                if self.resource.is_some() {
                    self.overlay = Some(Overlay::Rating);
                }
            }
            Action::OpenCalculator => {
                self.overlay = Some(Overlay::Calculator(CalculatorForm::new(CalculatorKind::Dose)));
            }
            Action::StartQuiz => self.start_quiz(),
            Action::SummarizePage => self.summarize_page(),
            Action::ExplainPage => self.explain_page(),
            Action::Recommend => self.recommend(),
            Action::StudyPlan => self.study_plan(),
            _ => {}
        }
    }

    fn handle_page_navigation(&mut self, action: Action) {
        match &self.location {
            Location::Modules => match action {
                Action::MoveUp => {
                    if self.nav.expanded_topics().is_some() {
                        self.nav.topic_cursor_previous();
                    } else {
                        self.nav.cursor_previous();
                    }
                }
                Action::MoveDown => {
                    if self.nav.expanded_topics().is_some() {
                        self.nav.topic_cursor_next();
                    } else {
                        self.nav.cursor_next();
                    }
                }
                Action::Submit => {
                    // open the selected topic link, otherwise toggle the dropdown
                    if let Some(topic) = self.nav.selected_topic() {
                        let id = topic.id;
                        self.navigate(Location::Topic { id });
                    } else if let ExpandOutcome::NeedsFetch(module_id) = self.nav.toggle_expand() {
                        self.net.fetch_module_topics(module_id);
                    }
                }
                _ => {}
            },
            Location::Topic { .. } => match action {
                Action::MoveUp => self.resource_cursor = self.resource_cursor.saturating_sub(1),
                Action::MoveDown => {
                    if self.resource_cursor + 1 < self.topic_resources.len() {
                        self.resource_cursor += 1;
                    }
                }
                Action::Submit => {
                    if let Some(resource) = self.topic_resources.get(self.resource_cursor) {
                        let id = resource.id;
                        self.navigate(Location::Resource { id });
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Scroll the topic body down; reaching the end reports completion,
    /// once per visit.
    fn scroll_topic_down(&mut self) {
        let Some(topic) = &mut self.topic else {
            return;
        };
        let max_scroll = topic.content.lines().count().saturating_sub(1);
        self.topic_scroll = (self.topic_scroll + SCROLL_PAGE).min(max_scroll);

        if self.topic_scroll == max_scroll
            && let Some(clock) = &mut self.clock
            && let Some(update) = clock.complete(Instant::now())
        {
            topic.progress_percentage = 100;
            topic.completed = true;
            self.net.update_progress(update);
        }
    }

    fn go_back(&mut self) {
        match &self.location {
            Location::Resource { .. } => {
                self.resource = None;
                self.location = match &self.topic {
                    Some(topic) => Location::Topic { id: topic.id },
                    None => Location::Modules,
                };
            }
            Location::Topic { .. } => {
                self.topic = None;
                self.clock = None;
                self.topic_resources.clear();
                self.location = Location::Modules;
            }
            Location::Modules => {
                if self.nav.expanded_module().is_some() {
                    self.nav.toggle_expand();
                } else {
                    self.should_quit = true;
                }
            }
            _ => self.location = Location::Modules,
        }
    }

    fn navigate(&mut self, location: Location) {
        match location {
            Location::Topic { id } => self.net.fetch_topic(id),
            Location::Resource { id } => self.net.fetch_resource(id),
            Location::Modules => self.location = Location::Modules,
            other => {
                // pages the desk has no view for
                self.set_toast(
                    format!("Open {} in the web app", other.path()),
                    MessageType::Success,
                );
            }
        }
    }

    fn toggle_bookmark(&mut self) {
        let Some(resource) = &self.resource else {
            return;
        };
        // flip now for responsiveness; the reply's action reconciles
        self.bookmark.flip();
        self.net.toggle_bookmark(resource.id);
    }

    fn start_quiz(&mut self) {
        let quiz = self.topic.as_ref().and_then(|t| t.quiz.clone());
        match quiz {
            Some(quiz) => self.net.start_quiz(quiz),
            None => self.set_toast("No quiz on this topic", MessageType::Error),
        }
    }

    fn summarize_page(&mut self) {
        let request = match (&self.resource, &self.topic) {
            (Some(resource), _) => {
                Some(SummarizeRequest { kind: ContentKind::Resource, id: resource.id })
            }
            (None, Some(topic)) => {
                Some(SummarizeRequest { kind: ContentKind::Topic, id: topic.id })
            }
            (None, None) => None,
        };
        match request {
            Some(request) => {
                self.open_chat_with("Summarize this page");
                self.net.summarize(request);
            }
            None => self.set_toast("Nothing to summarize here", MessageType::Error),
        }
    }

    fn explain_page(&mut self) {
        let concept = match (&self.resource, &self.topic) {
            (Some(resource), _) => resource.title.clone(),
            (None, Some(topic)) => topic.title.clone(),
            (None, None) => {
                self.set_toast("Nothing to explain here", MessageType::Error);
                return;
            }
        };
        let context = self.page_context().to_json();
        self.open_chat_with(&format!("Explain {concept}"));
        self.net.explain(ExplainRequest {
            concept,
            level: "intermediate".to_string(),
            context,
        });
    }

    fn recommend(&mut self) {
        let topic_id = self.topic.as_ref().map(|t| t.id);
        let resource_id = self.resource.as_ref().map(|r| r.id);
        if topic_id.is_none() && resource_id.is_none() {
            self.set_toast("Open a topic or resource first", MessageType::Error);
            return;
        }
        self.open_chat_with("Recommend resources");
        self.net.recommendations(RecommendationsRequest { topic_id, resource_id });
    }

    fn study_plan(&mut self) {
        let topic_id = self.topic.as_ref().map(|t| t.id);
        self.open_chat_with("Make me a study plan");
        self.net.study_assistant(StudyAssistRequest { kind: StudyAssistKind::Plan, topic_id });
    }

    /// Open the chat panel with a quick-action message already sent.
    fn open_chat_with(&mut self, message: &str) {
        self.feed.open = true;
        self.focus = Focus::Chat;
        self.feed.begin_exchange(message);
    }

    // ── Search zone ─────────────────────────────────────────────────────

    fn handle_search(&mut self, action: Action, now: Instant) {
        match action {
            Action::Back => {
                self.panel.hide();
                self.focus = Focus::Browse;
            }
            Action::Input(c) => {
                let mut query = self.search.query().to_string();
                query.push(c);
                self.edit_search(query, now);
            }
            Action::DeleteChar => {
                let mut query = self.search.query().to_string();
                query.pop();
                self.edit_search(query, now);
            }
            Action::MoveUp => self.panel.select_previous(),
            Action::MoveDown => self.panel.select_next(),
            Action::Submit => {
                // a selected suggestion row navigates; otherwise the raw
                // query goes to the assistant's search
                if let Some(suggestion) = self.panel.selected_suggestion() {
                    let target = Location::parse(&suggestion.url);
                    self.panel.hide();
                    self.focus = Focus::Browse;
                    self.navigate(target);
                } else {
                    let query = self.search.query().trim().to_string();
                    if !query.is_empty() {
                        self.panel.clear();
                        self.search.reset();
                        self.open_chat_with(&query);
                        self.net.search_assist(query);
                    }
                }
            }
            Action::Voice => self.start_voice(VoiceTarget::Search),
            _ => {}
        }
    }

    fn edit_search(&mut self, query: String, now: Instant) {
        if self.search.on_edit(query, now) {
            self.panel.clear();
        }
    }

    fn start_voice(&mut self, target: VoiceTarget) {
        match &self.transcriber {
            Some(transcriber) => {
                self.mic_active = true;
                self.net.transcribe(transcriber.clone(), target);
            }
            None => self.set_toast("No voice transcriber configured", MessageType::Error),
        }
    }

    // ── Chat zone ───────────────────────────────────────────────────────

    fn handle_chat(&mut self, action: Action) {
        match action {
            Action::Back => {
                self.feed.open = false;
                self.focus = Focus::Browse;
            }
            Action::Input(c) => self.feed.composer.push(c),
            Action::DeleteChar => {
                self.feed.composer.pop();
            }
            Action::MoveUp => {
                self.quick_reply_cursor = self.quick_reply_cursor.saturating_sub(1);
            }
            Action::MoveDown => {
                if self.quick_reply_cursor + 1 < self.feed.quick_replies().len() {
                    self.quick_reply_cursor += 1;
                }
            }
            Action::Submit => self.send_chat_message(),
            Action::CopyReply => match self.feed.last_assistant_text() {
                Some(text) => match copy_reply(text) {
                    Ok(()) => self.set_toast("✓ Reply copied", MessageType::Success),
                    Err(e) => self.set_toast(format!("✗ {e}"), MessageType::Error),
                },
                None => self.set_toast("✗ No reply to copy", MessageType::Error),
            },
            Action::FeedbackHelpful => self.send_feedback(FEEDBACK_HELPFUL),
            Action::FeedbackUnhelpful => self.send_feedback(FEEDBACK_UNHELPFUL),
            Action::Voice => self.start_voice(VoiceTarget::Chat),
            _ => {}
        }
    }

    fn send_chat_message(&mut self) {
        // an empty composer sends the selected quick reply instead
        let message = match self.feed.take_composer() {
            Some(message) => message,
            None => match self.feed.quick_replies().get(self.quick_reply_cursor) {
                Some(reply) => reply.clone(),
                None => return,
            },
        };

        let request = ChatRequest {
            context: self.page_context().to_json(),
            intent: intent::classify(&message),
            message: message.clone(),
        };
        self.feed.begin_exchange(&message);
        self.net.send_chat(request);
    }

    fn send_feedback(&mut self, rating: u8) {
        let Some(interaction_id) = self.feed.last_interaction_id() else {
            return;
        };
        self.net.send_feedback(FeedbackRequest {
            interaction_id: interaction_id.to_string(),
            rating,
            feedback: String::new(),
        });
    }

    fn page_context(&self) -> PageContext {
        let view = PageView {
            track: self.profile.as_ref().and_then(|p| p.track.as_deref()),
            topic: self.topic.as_ref(),
            resource: self.resource.as_ref(),
        };
        PageContext::derive(&self.location, &view)
    }

    // ── Quiz zone ───────────────────────────────────────────────────────

    fn handle_quiz(&mut self, action: Action) {
        let Some(Overlay::Quiz(sheet)) = &mut self.overlay else {
            return;
        };
        match action {
            Action::Back => {
                self.overlay = None;
            }
            Action::MoveUp => sheet.previous_question(),
            Action::MoveDown => sheet.next_question(),
            Action::SelectOption(index) => sheet.select_option(index),
            // unanswered questions are simply absent from the map
            Action::Submit => self.net.submit_quiz(sheet.attempt_id(), sheet.answers()),
            _ => {}
        }
    }

    // ── Calculator zone ─────────────────────────────────────────────────

    fn handle_calculator(&mut self, action: Action) {
        let Some(Overlay::Calculator(form)) = &mut self.overlay else {
            return;
        };
        match action {
            Action::Back => {
                self.overlay = None;
            }
            Action::MoveUp => form.previous_field(),
            Action::MoveDown => form.next_field(),
            Action::Input(c) => form.push_char(c),
            Action::DeleteChar => form.delete_char(),
            Action::CycleCalculator => form.cycle_kind(),
            Action::Submit => match form.payload() {
                Some(inputs) => self.net.calculate(form.kind().slug(), inputs),
                None => self.set_toast(CALCULATOR_INPUT_WARNING, MessageType::Error),
            },
            _ => {}
        }
    }

    // ── Rating zone ─────────────────────────────────────────────────────

    fn handle_rating(&mut self, action: Action) {
        match action {
            Action::Back => {
                self.overlay = None;
            }
            Action::MoveUp => {
                let stars = self.rating.stars().unwrap_or(0);
                self.rating.select(stars + 1);
            }
            Action::MoveDown => {
                if let Some(stars) = self.rating.stars() {
                    self.rating.select(stars - 1);
                }
            }
            Action::Input(c) => self.rating.comment.push(c),
            Action::DeleteChar => {
                self.rating.comment.pop();
            }
            Action::Submit => match (self.rating.request(), &self.resource) {
                (Some(request), Some(resource)) => {
                    self.net.rate_resource(resource.id, request);
                }
                (None, _) => self.set_toast(SELECT_RATING_WARNING, MessageType::Error),
                _ => {}
            },
            _ => {}
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render_state(&self) -> RenderState<'_> {
        let page = match (&self.location, &self.topic, &self.resource) {
            (Location::Resource { .. }, _, Some(resource)) => PageState::Resource {
                resource,
                bookmark: &self.bookmark,
            },
            (Location::Topic { .. }, Some(topic), _) => PageState::Topic {
                topic,
                scroll: self.topic_scroll,
                resources: &self.topic_resources,
                resource_cursor: self.resource_cursor,
            },
            (Location::Modules, _, _) => PageState::Modules { nav: &self.nav },
            (other, _, _) => PageState::Loading { path: other.path() },
        };

        RenderState {
            search_query: self.search.query(),
            searching: self.focus == Focus::Search,
            mic_active: self.mic_active,
            panel: &self.panel,
            profile: self.profile.as_ref(),
            level: self.level.level(),
            page,
            feed: &self.feed,
            quick_reply_cursor: self.quick_reply_cursor,
            overlay: self.overlay.as_ref(),
            rating: &self.rating,
            toast: self.toast.as_ref(),
            zone: self.zone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::api::ApiClient;
    use crate::api::error::ApiError;
    use serde_json::json;

    use crate::api::types::{
        BookmarkAction, BookmarkReply, CalculatorReply, ModuleSummary, ProgressReply, QuizInfo,
        QuizStartReply, RatingReply, Suggestion, TopicSummary,
    };
    use crate::assistant::conversation::Speaker;

    fn app() -> App {
        // port 1 never answers; tests that spawn requests only assert on
        // local state, not on completions
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let net = NetHandle::new(client, tx);
        App::new(net, rx, None, PathBuf::from("/tmp/unused-history.json"), Vec::new())
    }

    fn suggestion(text: &str, url: &str) -> Suggestion {
        Suggestion { kind: "title".to_string(), text: text.to_string(), url: url.to_string() }
    }

    fn sample_topic(id: u64) -> TopicDetail {
        TopicDetail {
            id,
            title: "Renal Physiology".to_string(),
            module_name: Some("Organ Systems".to_string()),
            content: (0..40).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"),
            progress_percentage: 20,
            completed: false,
            quiz: None,
        }
    }

    fn sample_resource(id: u64) -> ResourceSummary {
        ResourceSummary {
            id,
            title: "Gray's Anatomy".to_string(),
            description: None,
            resource_type: Some("book".to_string()),
            author: Some("Henry Gray".to_string()),
            year_published: Some(1858),
            average_rating: Some(4.0),
            rating_count: Some(10),
            bookmarked: false,
        }
    }

    #[tokio::test]
    async fn test_short_query_never_schedules_a_fetch() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::FocusSearch, now);
        app.handle_action(Action::Input('s'), now);

        // quiet period elapses with nothing scheduled
        app.poll_deadlines(now + Duration::from_millis(500));
        assert!(!app.panel.is_visible());
    }

    #[tokio::test]
    async fn test_rapid_keystrokes_issue_single_fetch_for_final_query() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::FocusSearch, now);
        app.handle_action(Action::Input('s'), now);
        app.handle_action(Action::Input('e'), now + Duration::from_millis(50));
        app.handle_action(Action::Input('p'), now + Duration::from_millis(100));

        assert_eq!(app.search.poll(now + Duration::from_millis(350)), None);
        assert_eq!(
            app.search.poll(now + Duration::from_millis(401)),
            Some("sep".to_string())
        );
    }

    #[tokio::test]
    async fn test_stale_suggestion_response_is_discarded() {
        let mut app = app();
        let now = Instant::now();
        let old_seq = app.panel.begin_request();
        let new_seq = app.panel.begin_request();

        app.apply_net_event(
            NetEvent::Suggestions {
                seq: new_seq,
                result: Ok(vec![suggestion("b", "/library/resource/2")]),
            },
            now,
        );
        app.apply_net_event(
            NetEvent::Suggestions {
                seq: old_seq,
                result: Ok(vec![suggestion("a", "/library/resource/1")]),
            },
            now,
        );

        assert_eq!(app.panel.items().len(), 1);
        assert_eq!(app.panel.items()[0].text, "b");
    }

    #[tokio::test]
    async fn test_suggestion_failure_hides_panel_silently() {
        let mut app = app();
        let now = Instant::now();
        let seq = app.panel.begin_request();
        app.apply_net_event(
            NetEvent::Suggestions { seq, result: Ok(vec![suggestion("a", "/x")]) },
            now,
        );
        assert!(app.panel.is_visible());

        let seq = app.panel.begin_request();
        app.apply_net_event(
            NetEvent::Suggestions {
                seq,
                result: Err(ApiError::Status { status_code: 500, message: String::new() }),
            },
            now,
        );
        assert!(!app.panel.is_visible());
        assert!(app.toast.is_none(), "suggestion failures are silent");
    }

    #[tokio::test]
    async fn test_leaving_search_hides_panel() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::FocusSearch, now);
        let seq = app.panel.begin_request();
        app.apply_net_event(
            NetEvent::Suggestions { seq, result: Ok(vec![suggestion("a", "/x")]) },
            now,
        );
        assert!(app.panel.is_visible());

        app.handle_action(Action::Back, now);
        assert!(!app.panel.is_visible());
        assert_eq!(app.zone(), Zone::Browse);
    }

    #[tokio::test]
    async fn test_activating_suggestion_row_leaves_search() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::FocusSearch, now);
        let seq = app.panel.begin_request();
        app.apply_net_event(
            NetEvent::Suggestions {
                seq,
                result: Ok(vec![suggestion("Gray's", "/library/resource/5")]),
            },
            now,
        );

        app.handle_action(Action::Submit, now);
        assert!(!app.panel.is_visible());
        assert_eq!(app.zone(), Zone::Browse);
    }

    #[tokio::test]
    async fn test_plain_search_submit_routes_to_chat() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::FocusSearch, now);
        for c in "sepsis management".chars() {
            app.handle_action(Action::Input(c), now);
        }
        app.handle_action(Action::Submit, now);

        assert!(app.feed.open);
        assert!(app.feed.is_awaiting_reply());
        assert_eq!(app.search.query(), "");
        assert_eq!(app.zone(), Zone::Chat);
    }

    #[tokio::test]
    async fn test_bookmark_reply_reconciles_regardless_of_prior_state() {
        let mut app = app();
        let now = Instant::now();
        app.resource = Some(sample_resource(5));
        app.bookmark = BookmarkBadge::new(true);

        app.apply_net_event(
            NetEvent::Bookmark(Ok(BookmarkReply {
                success: true,
                action: Some(BookmarkAction::Added),
                message: None,
            })),
            now,
        );
        assert!(app.bookmark.is_bookmarked());

        app.apply_net_event(
            NetEvent::Bookmark(Ok(BookmarkReply {
                success: true,
                action: Some(BookmarkAction::Removed),
                message: None,
            })),
            now,
        );
        assert!(!app.bookmark.is_bookmarked());
        assert!(app.toast.is_some());
    }

    #[tokio::test]
    async fn test_level_up_modal_fires_exactly_once() {
        let mut app = app();
        let now = Instant::now();
        let reply = ProgressReply {
            success: true,
            new_level: Some(3),
            total_points: None,
            message: None,
        };

        app.apply_net_event(NetEvent::Progress(Ok(reply.clone())), now);
        assert!(matches!(app.overlay, Some(Overlay::LevelUp(3))));

        // dismiss, then the same level again: no second celebration
        app.handle_action(Action::Back, now);
        assert!(app.overlay.is_none());
        app.apply_net_event(NetEvent::Progress(Ok(reply)), now);
        assert!(app.overlay.is_none());
    }

    #[tokio::test]
    async fn test_quiz_level_up_waits_for_results_modal() {
        let mut app = app();
        let now = Instant::now();
        let results = QuizResults {
            success: true,
            score: Some(80.0),
            passed: Some(true),
            correct_answers: Some(4),
            total_questions: Some(5),
            new_level: Some(2),
            total_points: Some(150),
            message: None,
        };

        app.apply_net_event(NetEvent::QuizResults(Ok(results)), now);
        assert!(matches!(app.overlay, Some(Overlay::QuizResults(_))));

        app.handle_action(Action::Back, now);
        assert!(matches!(app.overlay, Some(Overlay::LevelUp(2))));
        app.handle_action(Action::Back, now);
        assert!(app.overlay.is_none());
    }

    #[tokio::test]
    async fn test_quiz_start_opens_sheet() {
        let mut app = app();
        let now = Instant::now();
        let quiz = QuizInfo {
            id: 9,
            title: "Quiz".to_string(),
            passing_score: None,
            questions: Vec::new(),
        };

        app.apply_net_event(
            NetEvent::QuizStart {
                quiz,
                result: Ok(QuizStartReply { success: true, attempt_id: Some(77), message: None }),
            },
            now,
        );
        match &app.overlay {
            Some(Overlay::Quiz(sheet)) => assert_eq!(sheet.attempt_id(), 77),
            other => panic!("expected quiz overlay, got {other:?}"),
        }
        assert_eq!(app.zone(), Zone::Quiz);
    }

    #[tokio::test]
    async fn test_rating_reply_patches_aggregate_without_reload() {
        let mut app = app();
        let now = Instant::now();
        app.resource = Some(sample_resource(5));
        app.overlay = Some(Overlay::Rating);
        app.rating.select(5);

        app.apply_net_event(
            NetEvent::Rating(Ok(RatingReply {
                success: true,
                message: None,
                average_rating: Some(4.2),
                rating_count: Some(11),
            })),
            now,
        );

        let resource = app.resource.as_ref().unwrap();
        assert_eq!(resource.average_rating, Some(4.2));
        assert_eq!(resource.rating_count, Some(11));
        assert!(app.overlay.is_none());
        assert_eq!(app.rating.stars(), None, "widget resets after submit");
    }

    #[tokio::test]
    async fn test_rating_submit_without_stars_is_blocked() {
        let mut app = app();
        let now = Instant::now();
        app.resource = Some(sample_resource(5));
        app.overlay = Some(Overlay::Rating);

        app.handle_action(Action::Submit, now);
        let toast = app.toast.as_ref().expect("warning toast");
        assert_eq!(toast.text, SELECT_RATING_WARNING);
        assert!(matches!(app.overlay, Some(Overlay::Rating)));
    }

    #[tokio::test]
    async fn test_module_expand_flow() {
        let mut app = app();
        let now = Instant::now();
        app.nav.set_modules(vec![ModuleSummary {
            id: 1,
            name: "Anatomy".to_string(),
            description: None,
            topic_count: Some(1),
        }]);

        app.handle_action(Action::Submit, now);
        app.apply_net_event(
            NetEvent::ModuleTopics {
                module_id: 1,
                result: Ok(vec![TopicSummary {
                    id: 10,
                    title: "Bones".to_string(),
                    completed: false,
                    progress_percentage: None,
                }]),
            },
            now,
        );

        assert_eq!(app.nav.expanded_topics().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scrolling_to_bottom_completes_topic_once() {
        let mut app = app();
        let now = Instant::now();
        app.apply_net_event(NetEvent::Topic(Ok(sample_topic(7))), now);
        assert_eq!(app.zone(), Zone::Browse);

        // 40 lines of content; scroll to the end
        for _ in 0..6 {
            app.handle_action(Action::PageDown, now);
        }
        let topic = app.topic.as_ref().unwrap();
        assert_eq!(topic.progress_percentage, 100);
        assert!(topic.completed);

        // the once-per-visit guard lives in the clock
        assert!(app.clock.as_mut().unwrap().complete(now).is_none());
    }

    #[tokio::test]
    async fn test_chat_send_classifies_intent_and_records_exchange() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenChat, now);
        assert_eq!(app.zone(), Zone::Chat);

        for c in "explain the kidney".chars() {
            app.handle_action(Action::Input(c), now);
        }
        app.handle_action(Action::Submit, now);

        assert!(app.feed.is_awaiting_reply());
        assert!(app.feed.composer.is_empty());
    }

    #[tokio::test]
    async fn test_empty_composer_without_quick_replies_sends_nothing() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenChat, now);
        app.handle_action(Action::Submit, now);
        assert!(!app.feed.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_voice_without_transcriber_warns() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::FocusSearch, now);
        app.handle_action(Action::Voice, now);
        assert!(!app.mic_active);
        assert!(app.toast.as_ref().unwrap().text.contains("transcriber"));
    }

    #[tokio::test]
    async fn test_search_transcript_fetches_immediately() {
        let mut app = app();
        let now = Instant::now();
        app.apply_net_event(
            NetEvent::Transcript {
                target: VoiceTarget::Search,
                result: Ok("cardiology".to_string()),
            },
            now,
        );
        assert_eq!(app.search.query(), "cardiology");
        assert!(!app.mic_active);
        // immediate fetch bypassed the quiet period: no pending deadline
        assert_eq!(app.search.poll(now + Duration::from_millis(400)), None);
    }

    #[tokio::test]
    async fn test_chat_transcript_replaces_composer() {
        let mut app = app();
        let now = Instant::now();
        app.feed.composer = "half-typ".to_string();
        app.apply_net_event(
            NetEvent::Transcript {
                target: VoiceTarget::Chat,
                result: Ok("what is shock".to_string()),
            },
            now,
        );
        assert_eq!(app.feed.composer, "what is shock");
    }

    #[tokio::test]
    async fn test_calculator_opens_from_browse_with_dose_form() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenCalculator, now);

        match &app.overlay {
            Some(Overlay::Calculator(form)) => assert_eq!(form.kind(), CalculatorKind::Dose),
            other => panic!("expected calculator overlay, got {other:?}"),
        }
        assert_eq!(app.zone(), Zone::Calculator);
    }

    #[tokio::test]
    async fn test_calculator_blocks_invalid_input_with_warning() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenCalculator, now);
        app.handle_action(Action::Input('x'), now);

        app.handle_action(Action::Submit, now);
        let toast = app.toast.as_ref().expect("warning toast");
        assert_eq!(toast.text, CALCULATOR_INPUT_WARNING);
        assert!(matches!(app.overlay, Some(Overlay::Calculator(_))));
    }

    #[tokio::test]
    async fn test_calculator_result_fills_rows_in_open_form() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenCalculator, now);

        app.apply_net_event(
            NetEvent::Calculator(Ok(CalculatorReply {
                success: true,
                result: Some(
                    json!({"single_dose": 350.0, "daily_dose": 1050.0})
                        .as_object()
                        .unwrap()
                        .clone(),
                ),
                message: None,
            })),
            now,
        );

        match &app.overlay {
            Some(Overlay::Calculator(form)) => {
                assert_eq!(form.result().len(), 2);
                assert!(form.result().iter().any(|(key, value)| {
                    key == "Single Dose" && value == "350.0"
                }));
            }
            other => panic!("expected calculator overlay, got {other:?}"),
        }
        assert_eq!(app.zone(), Zone::Calculator, "form stays open to show the result");
    }

    #[tokio::test]
    async fn test_calculator_rejection_surfaces_server_message() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenCalculator, now);

        app.apply_net_event(
            NetEvent::Calculator(Err(ApiError::Rejected {
                message: Some("Please enter valid numeric values".to_string()),
            })),
            now,
        );

        assert_eq!(app.toast.as_ref().unwrap().text, "Please enter valid numeric values");
        assert!(matches!(app.overlay, Some(Overlay::Calculator(_))));
    }

    #[tokio::test]
    async fn test_tab_cycles_calculator_kind() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::OpenCalculator, now);
        app.handle_action(Action::CycleCalculator, now);

        match &app.overlay {
            Some(Overlay::Calculator(form)) => assert_eq!(form.kind(), CalculatorKind::Drip),
            other => panic!("expected calculator overlay, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_explain_page_opens_chat_and_sends_immediately() {
        let mut app = app();
        let now = Instant::now();
        app.apply_net_event(NetEvent::Topic(Ok(sample_topic(7))), now);

        app.handle_action(Action::ExplainPage, now);
        assert!(app.feed.open);
        assert!(app.feed.is_awaiting_reply(), "page-level explain sends without editing");
        assert_eq!(app.zone(), Zone::Chat);
        let last_user =
            app.feed.bubbles().iter().rev().find(|b| b.speaker == Speaker::User).unwrap();
        assert_eq!(last_user.text, "Explain Renal Physiology");
    }

    #[tokio::test]
    async fn test_back_walks_resource_topic_modules() {
        let mut app = app();
        let now = Instant::now();
        app.apply_net_event(NetEvent::Topic(Ok(sample_topic(7))), now);
        app.apply_net_event(NetEvent::Resource(Ok(sample_resource(5))), now);
        assert_eq!(app.location, Location::Resource { id: 5 });

        app.handle_action(Action::Back, now);
        assert_eq!(app.location, Location::Topic { id: 7 });
        app.handle_action(Action::Back, now);
        assert_eq!(app.location, Location::Modules);
        app.handle_action(Action::Back, now);
        assert!(app.should_quit);
    }
}
