//! Copying assistant replies to the system clipboard.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Hard cap on copied text. A chat bubble near this size means something
/// upstream went wrong, and huge payloads can wedge X11 clipboard managers.
const MAX_COPY_SIZE: usize = 1024 * 1024;

/// Clipboard seam; tests substitute a mock so they never touch the real
/// clipboard (headless CI has none).
trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Nothing to copy");
    }
    if text.len() > MAX_COPY_SIZE {
        anyhow::bail!("Text too large for clipboard ({} bytes)", text.len());
    }
    Ok(())
}

#[cfg(test)]
fn copy_with_sink(text: &str, sink: &mut dyn ClipboardSink) -> Result<()> {
    validate(text)?;
    sink.set_text(text)
}

/// Copy an assistant reply to the system clipboard.
///
/// Fails when there is nothing to copy, the text is unreasonably large, or
/// the platform clipboard is unavailable (e.g. headless sessions).
pub fn copy_reply(text: &str) -> Result<()> {
    validate(text)?;
    SystemClipboard::new()?.set_text(text)
}
