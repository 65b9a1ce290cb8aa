//! Conversation-history persistence: load/save with atomic writes.
//!
//! The history file is a display cache, not a record of truth: the desk
//! replays the tail of it into the chat panel on startup and rewrites the
//! whole file on exit. A missing or unreadable file therefore degrades to an
//! empty history instead of an error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assistant::ChatTurn;

const HISTORY_FILENAME: &str = "conversation-history.json";

/// Overrides the data directory; used by tests and scripted runs.
pub const DATA_DIR_ENV: &str = "MEDICORE_DESK_DATA_DIR";

/// Resolve the platform data directory for the desk, honoring the
/// environment override.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::data_dir().context("Failed to resolve platform data directory")?;
    Ok(base.join("medicore-desk"))
}

/// Default location of the history file.
pub fn default_history_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(HISTORY_FILENAME))
}

/// Load persisted conversation turns. Missing file means a fresh start; an
/// unparseable file is logged and treated the same way rather than blocking
/// startup over a display cache.
pub fn load_history(path: &Path) -> Result<Vec<ChatTurn>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path).context("Failed to read conversation history")?;
    match serde_json::from_str(&raw) {
        Ok(turns) => Ok(turns),
        Err(e) => {
            tracing::warn!("discarding unreadable conversation history: {e}");
            Ok(Vec::new())
        }
    }
}

/// Save conversation turns atomically (temp file + rename).
pub fn save_history(path: &Path, turns: &[ChatTurn]) -> Result<()> {
    let parent = path.parent().context("History path has no parent directory")?;
    fs::create_dir_all(parent).context("Failed to create data directory")?;

    let temp = parent.join(format!("{HISTORY_FILENAME}.tmp"));
    let json = serde_json::to_string_pretty(turns).context("Failed to serialize history")?;
    fs::write(&temp, json).context("Failed to write history temp file")?;
    fs::rename(&temp, path).context("Failed to rename history temp file")?;

    Ok(())
}
