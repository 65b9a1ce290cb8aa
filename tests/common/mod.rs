//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const HISTORY_FILE: &str = "conversation-history.json";

/// Builder for a data directory the binary reads via `MEDICORE_DESK_DATA_DIR`
pub struct DataDirBuilder {
    temp_dir: TempDir,
}

impl DataDirBuilder {
    /// Create a new builder with an empty data directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the data directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write the history file with raw content
    pub fn with_history(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(HISTORY_FILE), content)
            .expect("Failed to write history file");
        self
    }

    /// Write the history file from turn builders
    pub fn with_turns(self, turns: &[TurnBuilder]) -> Self {
        let body = turns.iter().map(|t| t.to_json()).collect::<Vec<_>>().join(",");
        self.with_history(&format!("[{body}]"))
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

/// One persisted conversation turn
pub struct TurnBuilder {
    user: String,
    ai: String,
    timestamp: String,
}

impl TurnBuilder {
    pub fn new(user: &str, ai: &str) -> Self {
        Self {
            user: user.to_string(),
            ai: ai.to_string(),
            timestamp: "2026-08-29T10:00:00Z".to_string(),
        }
    }

    pub fn at(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({
            "user": self.user,
            "ai": self.ai,
            "timestamp": self.timestamp,
        })
        .to_string()
    }
}
