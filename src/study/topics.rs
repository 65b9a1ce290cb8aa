//! Module list with expandable topic dropdowns.
//!
//! At most one module is expanded at a time. Topics are fetched lazily on
//! first expansion and cached; re-expanding a module reuses the cache
//! instead of refetching.

use std::collections::HashMap;

use crate::api::types::{ModuleSummary, TopicSummary};

pub const TOPICS_FAILED: &str = "Failed to load topics";

/// What an expand request should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Dropdown closed.
    Collapsed,
    /// Dropdown opened from cache; no request needed.
    Opened,
    /// Dropdown opened empty; fetch topics for this module.
    NeedsFetch(u64),
}

#[derive(Debug, Default)]
pub struct ModuleNav {
    modules: Vec<ModuleSummary>,
    cursor: usize,
    expanded: Option<u64>,
    topic_cursor: usize,
    cache: HashMap<u64, Vec<TopicSummary>>,
}

impl ModuleNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_modules(&mut self, modules: Vec<ModuleSummary>) {
        self.modules = modules;
        self.cursor = 0;
        self.expanded = None;
        self.topic_cursor = 0;
    }

    pub fn modules(&self) -> &[ModuleSummary] {
        &self.modules
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expanded_module(&self) -> Option<u64> {
        self.expanded
    }

    pub fn cursor_next(&mut self) {
        if self.cursor + 1 < self.modules.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Toggle the dropdown for the module under the cursor. Expanding a
    /// module collapses any other open one.
    pub fn toggle_expand(&mut self) -> ExpandOutcome {
        let Some(module) = self.modules.get(self.cursor) else {
            return ExpandOutcome::Collapsed;
        };
        if self.expanded == Some(module.id) {
            self.expanded = None;
            return ExpandOutcome::Collapsed;
        }
        self.expanded = Some(module.id);
        self.topic_cursor = 0;
        if self.cache.contains_key(&module.id) {
            ExpandOutcome::Opened
        } else {
            ExpandOutcome::NeedsFetch(module.id)
        }
    }

    /// Store fetched topics. The dropdown shows them if that module is
    /// still the expanded one.
    pub fn apply_topics(&mut self, module_id: u64, topics: Vec<TopicSummary>) {
        self.cache.insert(module_id, topics);
    }

    /// A failed fetch collapses the dropdown it was opened for.
    pub fn apply_failure(&mut self, module_id: u64) {
        if self.expanded == Some(module_id) {
            self.expanded = None;
        }
    }

    /// Topics visible in the open dropdown, if any are loaded.
    pub fn expanded_topics(&self) -> Option<&[TopicSummary]> {
        let id = self.expanded?;
        self.cache.get(&id).map(Vec::as_slice)
    }

    pub fn topic_cursor(&self) -> usize {
        self.topic_cursor
    }

    pub fn topic_cursor_next(&mut self) {
        if let Some(topics) = self.expanded_topics()
            && self.topic_cursor + 1 < topics.len()
        {
            self.topic_cursor += 1;
        }
    }

    pub fn topic_cursor_previous(&mut self) {
        if self.topic_cursor > 0 {
            self.topic_cursor -= 1;
        }
    }

    /// Topic link under the cursor inside the open dropdown.
    pub fn selected_topic(&self) -> Option<&TopicSummary> {
        self.expanded_topics()?.get(self.topic_cursor)
    }
}
