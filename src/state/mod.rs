//! State management module
//!
//! This module contains the countdown engine, its data types and the shared
//! state that owns the engine lifecycle.

pub mod app_state;
pub mod engine;
pub mod error;
pub mod journal;
pub mod preset;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{Schedule, TickOutcome, TimerEngine, TICK_MS};
pub use error::StateError;
pub use journal::{Journal, SessionRecord};
pub use preset::{catalog, clamp_custom_minutes, default_preset, find_preset, Preset, CUSTOM_PRESET_ID};
pub use timer_state::{format_mm_ss, Phase, TimerSnapshot, TimerState};
