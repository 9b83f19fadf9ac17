//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::shell::ClockStyle;
use crate::state::{default_preset, find_preset, Preset, StateError};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A countdown focus timer with presets and a session journal")]
#[command(version)]
pub struct Config {
    /// Preset to start on (see the `presets` command)
    #[arg(short, long, conflicts_with = "custom")]
    pub preset: Option<String>,

    /// Start on a custom session of this many minutes (clamped to 1-120)
    #[arg(short, long, allow_negative_numbers = true)]
    pub custom: Option<f64>,

    /// Milliseconds between ticks; each tick removes one second
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Clock style for journal times (default: from LC_ALL, LC_TIME or LANG)
    #[arg(long, value_enum)]
    pub clock: Option<ClockStyle>,

    /// Render status and journal as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the countdown on every tick
    #[arg(short, long)]
    pub follow: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Resolve the preset the timer starts on
    pub fn initial_preset(&self) -> Result<Preset, StateError> {
        if let Some(raw) = self.custom {
            return Ok(Preset::custom(raw));
        }
        match &self.preset {
            Some(id) => find_preset(id).ok_or_else(|| StateError::UnknownPreset(id.clone())),
            None => Ok(default_preset()),
        }
    }

    /// Clock style from the flag, falling back to the locale environment
    pub fn clock_style(&self) -> ClockStyle {
        self.clock.unwrap_or_else(ClockStyle::from_env)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
