use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::storage::history::{data_dir, load_history};
use crate::tui::run_interactive;

#[derive(Parser)]
#[command(name = "medicore-desk")]
#[command(version = "0.1.0")]
#[command(about = "Terminal client for the MediCore learning platform", long_about = None)]
pub struct Cli {
    /// Platform server URL (overrides MEDICORE_DESK_SERVER)
    #[arg(long)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the persisted assistant conversation history
    History {
        /// Only show the most recent N turns
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.server.clone())?;

    match &cli.command {
        Some(Commands::History { limit }) => {
            show_history(&config, *limit)?;
        }
        None => {
            init_telemetry()?;
            run_interactive(config)?;
        }
    }

    Ok(())
}

/// Log to a file in the data directory; raw mode owns the screen, so
/// stderr output would corrupt the UI.
fn init_telemetry() -> Result<()> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir).context("Failed to create data directory")?;
    let log_file = fs::File::create(dir.join("medicore-desk.log"))
        .context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Ok(())
}

fn show_history(config: &Config, limit: Option<usize>) -> Result<()> {
    let turns = load_history(&config.history_path)?;

    if turns.is_empty() {
        println!("No conversation history at {}", config.history_path.display());
        return Ok(());
    }

    let shown = limit.unwrap_or(turns.len()).min(turns.len());
    let skipped = turns.len() - shown;
    if skipped > 0 {
        println!("({skipped} earlier turns omitted)");
        println!();
    }

    for turn in &turns[skipped..] {
        println!("[{}]", turn.timestamp.format("%Y-%m-%d %H:%M:%S"));
        println!("You: {}", turn.user);
        println!("AI:  {}", turn.ai);
        println!();
    }
    println!("{} turns total", turns.len());

    Ok(())
}
