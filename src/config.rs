//! Desk configuration, resolved from command-line flags and environment.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::storage::history::default_history_path;

/// Server base URL when neither flag nor environment provides one. Matches
/// the platform's development server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Environment fallback for the server URL.
pub const SERVER_URL_ENV: &str = "MEDICORE_DESK_SERVER";
/// Environment fallback for the voice transcriber command line.
pub const TRANSCRIBER_ENV: &str = "MEDICORE_DESK_TRANSCRIBER";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform server base URL, e.g. `http://localhost:5000`.
    pub server_url: String,
    /// Where the conversation history file lives.
    pub history_path: PathBuf,
    /// External transcriber command line; `None` disables voice input.
    pub transcriber_command: Option<String>,
}

impl Config {
    /// Resolve configuration: explicit flag, then environment variable, then
    /// the built-in default.
    pub fn resolve(server_flag: Option<String>) -> Result<Self> {
        let server_url = server_flag
            .or_else(|| env::var(SERVER_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let transcriber_command =
            env::var(TRANSCRIBER_ENV).ok().filter(|cmd| !cmd.trim().is_empty());

        Ok(Self { server_url, history_path: default_history_path()?, transcriber_command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable fallbacks are covered by the CLI integration
    // tests, which run the binary in its own process; mutating process-wide
    // env vars from parallel unit tests would race.

    #[test]
    fn test_flag_takes_precedence() {
        let config = Config::resolve(Some("https://medicore.example.org".to_string())).unwrap();
        assert_eq!(config.server_url, "https://medicore.example.org");
    }

    #[test]
    fn test_history_path_has_expected_filename() {
        let config = Config::resolve(Some(DEFAULT_SERVER_URL.to_string())).unwrap();
        assert!(config.history_path.ends_with("conversation-history.json"));
    }
}
