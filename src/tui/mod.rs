// Interactive terminal client for the MediCore platform.
mod app;
mod events;
mod layout;
mod net;
mod rendering;
mod terminal;

use anyhow::{Context, Result};
pub use app::App;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::storage::history::load_history;
use crate::tui::net::NetHandle;
use crate::tui::terminal::TerminalGuard;
use crate::voice::Transcriber;

/// Run the interactive TUI against the configured server.
pub fn run_interactive(config: Config) -> Result<()> {
    // The event loop is synchronous; requests run on this runtime and
    // complete through the channel.
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let _enter = runtime.enter();

    let client = ApiClient::new(&config.server_url)
        .with_context(|| format!("invalid server url: {}", config.server_url))?;
    let (tx, rx) = mpsc::unbounded_channel();
    let net = NetHandle::new(client, tx);
    let transcriber = config.transcriber_command.as_deref().and_then(Transcriber::from_command);
    let history = load_history(&config.history_path)?;

    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(net, rx, transcriber, config.history_path.clone(), history);
    app.load_initial();
    let res = app.run(guard.terminal_mut());
    guard.restore()?;

    res
}
