//! Timer state structure and derived views

use serde::{Deserialize, Serialize};

use super::preset::{clamp_custom_minutes, Preset};

/// Mutable countdown state owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub selected_preset: Preset,
    /// Last chosen custom value, kept while a named preset is active
    pub custom_minutes: u32,
    pub remaining_ms: u64,
    pub is_running: bool,
    /// Natural completions so far
    pub cycle_count: u64,
    pub session_notes: String,
}

impl TimerState {
    /// Create an idle state at the full duration of `preset`
    pub fn new(preset: Preset) -> Self {
        Self {
            custom_minutes: clamp_custom_minutes(f64::from(preset.minutes)),
            remaining_ms: preset.duration_ms(),
            selected_preset: preset,
            is_running: false,
            cycle_count: 0,
            session_notes: String::new(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.selected_preset.duration_ms()
    }

    /// Fraction of the countdown already elapsed, clamped to [0, 1]
    pub fn progress_fraction(&self) -> f64 {
        let duration = self.duration_ms();
        if duration == 0 {
            return 1.0;
        }
        (1.0 - self.remaining_ms as f64 / duration as f64).clamp(0.0, 1.0)
    }

    /// Remaining time as mm:ss
    pub fn remaining_display(&self) -> String {
        format_mm_ss(self.remaining_ms)
    }

    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.remaining_ms == 0 {
            Phase::Completed
        } else if self.remaining_ms >= self.duration_ms() {
            Phase::Idle
        } else {
            Phase::Paused
        }
    }
}

/// Countdown phase, derived from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
        }
    }
}

/// Serializable view of the state for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub preset: Preset,
    pub custom_minutes: u32,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub progress: f64,
    pub remaining_display: String,
    pub phase: Phase,
    pub is_running: bool,
    pub cycle_count: u64,
    pub session_notes: String,
    pub journal_len: usize,
}

impl TimerSnapshot {
    pub fn capture(state: &TimerState, journal_len: usize) -> Self {
        Self {
            preset: state.selected_preset.clone(),
            custom_minutes: state.custom_minutes,
            remaining_ms: state.remaining_ms,
            duration_ms: state.duration_ms(),
            progress: state.progress_fraction(),
            remaining_display: state.remaining_display(),
            phase: state.phase(),
            is_running: state.is_running,
            cycle_count: state.cycle_count,
            session_notes: state.session_notes.clone(),
            journal_len,
        }
    }
}

/// Format milliseconds as mm:ss, rounding partial seconds up. Minutes are not capped at 59.
pub fn format_mm_ss(ms: u64) -> String {
    let total_seconds = ms.div_ceil(1000);
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
