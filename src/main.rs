//! Focus Timer - a single countdown with presets and a session journal
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use anyhow::Context;
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;

use focus_timer::{
    config::Config,
    shell::{LocalClock, Renderer, Shell},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout stays clean for the shell
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let preset = config
        .initial_preset()
        .context("Invalid starting preset")?;
    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: preset={}, minutes={}, tick={}ms",
        preset.id, preset.minutes, config.tick_ms
    );

    let state = Arc::new(AppState::new(preset, config.tick_period()));
    let renderer = Renderer::new(config.json, Box::new(LocalClock { style: config.clock_style() }));
    let shell = Shell::new(Arc::clone(&state), renderer, config.follow);

    let mut output = stdout();
    tokio::select! {
        result = shell.run(BufReader::new(stdin()), &mut output) => {
            result.context("Shell failed")?;
        }
        result = shutdown_signal() => {
            result.context("Failed to install signal handler")?;
            info!("Shutdown signal received");
        }
    }

    state.shutdown()?;
    info!("Focus timer stopped");
    Ok(())
}
