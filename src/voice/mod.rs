//! Voice input via an external transcriber command.
//!
//! The desk has no microphone access of its own. When a transcriber command
//! is configured, a mic action runs it once and takes its stdout as the
//! transcript: a single-shot capture, no interim results, no transcript
//! history. The transcript replaces the chat composer, or replaces the
//! search query and fetches suggestions right away.

use anyhow::{Context, Result, bail};
use tokio::process::Command;

/// Where a finished transcript lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTarget {
    Chat,
    Search,
}

/// One-shot speech capture through a configured external command.
#[derive(Debug, Clone)]
pub struct Transcriber {
    program: String,
    args: Vec<String>,
}

impl Transcriber {
    /// Parse a transcriber command line, e.g. `"whisper-cli --once"`.
    /// Returns `None` for an empty configuration (voice input disabled).
    pub fn from_command(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self { program, args: parts.collect() })
    }

    /// Run one capture session and return the trimmed transcript.
    pub async fn capture(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .with_context(|| format!("Failed to run transcriber '{}'", self.program))?;

        if !output.status.success() {
            bail!("Transcriber '{}' exited with {}", self.program, output.status);
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            bail!("Transcriber produced no speech");
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_splits_program_and_args() {
        let t = Transcriber::from_command("whisper-cli --once --lang en").unwrap();
        assert_eq!(t.program, "whisper-cli");
        assert_eq!(t.args, vec!["--once", "--lang", "en"]);
    }

    #[test]
    fn test_empty_command_disables_voice() {
        assert!(Transcriber::from_command("").is_none());
        assert!(Transcriber::from_command("   ").is_none());
    }

    #[tokio::test]
    async fn test_capture_takes_stdout_as_transcript() {
        let t = Transcriber::from_command("echo what is sepsis").unwrap();
        assert_eq!(t.capture().await.unwrap(), "what is sepsis");
    }

    #[tokio::test]
    async fn test_failing_command_is_an_error() {
        let t = Transcriber::from_command("false").unwrap();
        assert!(t.capture().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let t = Transcriber::from_command("medicore-desk-no-such-transcriber").unwrap();
        let err = t.capture().await.unwrap_err();
        assert!(err.to_string().contains("Failed to run transcriber"));
    }

    #[tokio::test]
    async fn test_silent_capture_is_an_error() {
        let t = Transcriber::from_command("true").unwrap();
        let err = t.capture().await.unwrap_err();
        assert!(err.to_string().contains("no speech"));
    }
}
