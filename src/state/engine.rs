//! Countdown engine: all state transitions and the session journal
//!
//! The engine never owns a timer. Every operation returns a [`Schedule`]
//! directive and whoever owns the engine arms or disarms its ticker.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{
    journal::{Journal, SessionRecord},
    preset::{clamp_custom_minutes, default_preset, Preset},
    timer_state::{Phase, TimerSnapshot, TimerState},
};

/// Milliseconds removed from the countdown on every tick
pub const TICK_MS: u64 = 1000;

/// What the owner must do with its tick scheduler after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Arm,
    Disarm,
    Keep,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub schedule: Schedule,
    /// Present only when this tick completed the countdown
    pub completed: Option<SessionRecord>,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    journal: Journal,
}

impl TimerEngine {
    /// Start idle on the first catalog preset
    pub fn new() -> Self {
        Self::with_preset(default_preset())
    }

    pub fn with_preset(preset: Preset) -> Self {
        Self {
            state: TimerState::new(preset),
            journal: Journal::new(),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::capture(&self.state, self.journal.len())
    }

    pub fn select_preset(&mut self, preset: Preset) -> Schedule {
        info!("Selecting preset {} ({} min)", preset.id, preset.minutes);
        self.state.custom_minutes = clamp_custom_minutes(f64::from(preset.minutes));
        self.state.selected_preset = preset;
        self.stop_and_refill()
    }

    /// Switch to a custom preset built from an unvalidated minute value
    pub fn set_custom_minutes(&mut self, raw: f64) -> Schedule {
        let preset = Preset::custom(raw);
        let minutes = preset.minutes;
        if f64::from(minutes) != raw {
            debug!("Custom minutes {} coerced to {}", raw, minutes);
        }
        info!("Selecting custom preset ({} min)", minutes);
        self.state.custom_minutes = minutes;
        self.state.selected_preset = preset;
        self.stop_and_refill()
    }

    pub fn toggle_run(&mut self) -> Schedule {
        if self.state.is_running {
            self.state.is_running = false;
            info!("Paused with {} remaining", self.state.remaining_display());
            return Schedule::Disarm;
        }

        // A zero-length preset has nothing to count down
        if self.state.duration_ms() == 0 {
            warn!("Refusing to start {}: zero duration", self.state.selected_preset.label);
            return Schedule::Keep;
        }

        if self.state.remaining_ms == 0 {
            debug!("Restarting finished countdown");
            self.state.remaining_ms = self.state.duration_ms();
        }
        self.state.is_running = true;
        info!(
            "Running {} with {} remaining",
            self.state.selected_preset.label,
            self.state.remaining_display()
        );
        Schedule::Arm
    }

    pub fn reset(&mut self) -> Schedule {
        info!("Resetting {}", self.state.selected_preset.label);
        self.stop_and_refill()
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Utc::now())
    }

    /// Advance the countdown by one tick, stamping a completion with `now`
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.state.is_running {
            debug!("Ignoring tick while not running");
            return TickOutcome {
                schedule: Schedule::Keep,
                completed: None,
            };
        }

        let next = self.state.remaining_ms.saturating_sub(TICK_MS);
        self.state.remaining_ms = next;
        if next > 0 {
            return TickOutcome {
                schedule: Schedule::Keep,
                completed: None,
            };
        }

        self.state.is_running = false;
        self.state.cycle_count += 1;
        let record = self.journal.record(
            &self.state.selected_preset.label,
            self.state.selected_preset.minutes,
            now,
        );
        info!(
            "Completed {} ({} min), cycle {}",
            record.preset_label, record.duration_minutes, self.state.cycle_count
        );
        TickOutcome {
            schedule: Schedule::Disarm,
            completed: Some(record),
        }
    }

    pub fn set_session_notes(&mut self, text: impl Into<String>) {
        self.state.session_notes = text.into();
    }

    fn stop_and_refill(&mut self) -> Schedule {
        self.state.is_running = false;
        self.state.remaining_ms = self.state.duration_ms();
        Schedule::Disarm
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::preset::{catalog, find_preset};

    fn run_ticks(engine: &mut TimerEngine, count: u64) -> Vec<TickOutcome> {
        (0..count).map(|_| engine.tick()).collect()
    }

    #[test]
    fn test_initial_state_is_deep_focus_idle() {
        let engine = TimerEngine::new();
        assert_eq!(engine.state().selected_preset.label, "Deep Focus");
        assert_eq!(engine.state().remaining_ms, 3_000_000);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn test_select_preset_stops_and_refills() {
        let mut engine = TimerEngine::new();
        engine.toggle_run();
        run_ticks(&mut engine, 3);

        for preset in catalog() {
            let minutes = preset.minutes;
            assert_eq!(engine.select_preset(preset.clone()), Schedule::Disarm);
            assert_eq!(engine.state().remaining_ms, preset.duration_ms());
            assert!(!engine.state().is_running);
            assert_eq!(engine.state().custom_minutes, minutes);
            assert_eq!(engine.phase(), Phase::Idle);
        }
    }

    #[test]
    fn test_custom_minutes_clamped() {
        let mut engine = TimerEngine::new();
        for (raw, expected) in [(150.0, 120), (0.0, 1), (-4.0, 1), (12.7, 13), (45.0, 45)] {
            engine.set_custom_minutes(raw);
            assert_eq!(engine.state().custom_minutes, expected);
            assert_eq!(engine.state().selected_preset.id, "custom");
            assert_eq!(engine.state().remaining_ms, u64::from(expected) * 60_000);
        }
    }

    #[test]
    fn test_custom_minutes_idempotent() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(30.2);
        let once = engine.state().clone();
        engine.set_custom_minutes(30.2);
        assert_eq!(engine.state(), &once);
    }

    #[test]
    fn test_custom_minutes_retained_after_clamp_scenarios() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(150.0);
        assert_eq!(engine.state().remaining_ms, 7_200_000);
        engine.set_custom_minutes(0.0);
        assert_eq!(engine.state().remaining_ms, 60_000);
    }

    #[test]
    fn test_toggle_arms_and_disarms() {
        let mut engine = TimerEngine::new();
        assert_eq!(engine.toggle_run(), Schedule::Arm);
        assert_eq!(engine.phase(), Phase::Running);
        engine.tick();
        assert_eq!(engine.toggle_run(), Schedule::Disarm);
        assert_eq!(engine.phase(), Phase::Paused);
        assert_eq!(engine.toggle_run(), Schedule::Arm);
        assert_eq!(engine.state().remaining_ms, 3_000_000 - TICK_MS);
    }

    #[test]
    fn test_reset_twice_matches_once() {
        let mut engine = TimerEngine::new();
        engine.toggle_run();
        run_ticks(&mut engine, 10);
        engine.reset();
        let once = engine.state().clone();
        engine.reset();
        assert_eq!(engine.state(), &once);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_stray_tick_is_noop() {
        let mut engine = TimerEngine::new();
        let before = engine.state().clone();
        let outcome = engine.tick();
        assert_eq!(outcome.schedule, Schedule::Keep);
        assert!(outcome.completed.is_none());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_completion_after_exact_ticks() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(2.0);
        engine.toggle_run();

        let outcomes = run_ticks(&mut engine, 119);
        assert!(outcomes.iter().all(|o| o.completed.is_none()));
        assert_eq!(engine.state().remaining_ms, 1000);

        let last = engine.tick();
        assert_eq!(last.schedule, Schedule::Disarm);
        let record = last.completed.unwrap();
        assert_eq!(record.preset_label, "Custom");
        assert_eq!(record.duration_minutes, 2);
        assert_eq!(engine.state().remaining_ms, 0);
        assert!(!engine.state().is_running);
        assert_eq!(engine.state().cycle_count, 1);
        assert_eq!(engine.journal().len(), 1);
        assert_eq!(engine.phase(), Phase::Completed);

        // Further ticks are ignored once stopped
        engine.tick();
        assert_eq!(engine.state().cycle_count, 1);
    }

    #[test]
    fn test_pause_and_reset_never_journal() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(1.0);
        engine.toggle_run();
        run_ticks(&mut engine, 59);
        engine.toggle_run();
        engine.reset();
        engine.toggle_run();
        run_ticks(&mut engine, 30);
        engine.reset();

        assert_eq!(engine.state().cycle_count, 0);
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn test_restart_after_completion_refills() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(1.0);
        engine.toggle_run();
        run_ticks(&mut engine, 60);
        assert_eq!(engine.phase(), Phase::Completed);

        assert_eq!(engine.toggle_run(), Schedule::Arm);
        assert!(engine.state().is_running);
        assert_eq!(engine.state().remaining_ms, 60_000);
    }

    #[test]
    fn test_pomodoro_scenario() {
        let mut engine = TimerEngine::new();
        assert_eq!(engine.state().selected_preset.label, "Deep Focus");

        engine.select_preset(find_preset("pomodoro").unwrap());
        assert_eq!(engine.state().remaining_ms, 1_500_000);
        assert_eq!(engine.state().remaining_display(), "25:00");

        engine.toggle_run();
        run_ticks(&mut engine, 1500);
        assert_eq!(engine.state().remaining_ms, 0);
        assert_eq!(engine.state().cycle_count, 1);

        let entry = engine.journal().latest().unwrap();
        assert_eq!(entry.preset_label, "Pomodoro");
        assert_eq!(entry.duration_minutes, 25);
    }

    #[test]
    fn test_journal_front_is_most_recent_completion() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(1.0);
        engine.toggle_run();
        run_ticks(&mut engine, 60);

        engine.select_preset(find_preset("short-break").unwrap());
        engine.toggle_run();
        run_ticks(&mut engine, 300);

        let labels: Vec<_> = engine
            .journal()
            .iter()
            .map(|r| r.preset_label.clone())
            .collect();
        assert_eq!(labels, vec!["Short Break", "Custom"]);
        assert_eq!(engine.state().cycle_count, 2);
    }

    #[test]
    fn test_custom_minutes_kept_for_named_preset_sync() {
        let mut engine = TimerEngine::new();
        engine.set_custom_minutes(33.0);
        engine.select_preset(find_preset("long-break").unwrap());
        assert_eq!(engine.state().custom_minutes, 15);
    }

    #[test]
    fn test_zero_minute_preset_never_runs() {
        let zero = Preset {
            minutes: 0,
            ..Preset::custom(1.0)
        };
        let mut engine = TimerEngine::with_preset(zero);
        assert_eq!(engine.toggle_run(), Schedule::Keep);
        assert!(!engine.state().is_running);
        assert_eq!(engine.state().remaining_ms, 0);

        let outcome = engine.tick();
        assert!(outcome.completed.is_none());
        assert_eq!(engine.state().cycle_count, 0);
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn test_custom_preset_from_zero_is_one_minute() {
        let mut engine = TimerEngine::with_preset(Preset::custom(0.0));
        assert_eq!(engine.state().remaining_ms, 60_000);
        assert_eq!(engine.toggle_run(), Schedule::Arm);
        assert!(engine.state().remaining_ms > 0);
    }

    #[test]
    fn test_oversized_preset_keeps_custom_minutes_in_range() {
        let mut engine = TimerEngine::new();
        engine.select_preset(Preset::custom(500.0));
        assert_eq!(engine.state().custom_minutes, 120);

        let long = Preset {
            minutes: 500,
            ..default_preset()
        };
        engine.select_preset(long.clone());
        assert_eq!(engine.state().custom_minutes, 120);
        assert_eq!(engine.state().remaining_ms, long.duration_ms());

        let engine = TimerEngine::with_preset(long);
        assert_eq!(engine.state().custom_minutes, 120);
    }

    #[test]
    fn test_session_notes_verbatim() {
        let mut engine = TimerEngine::new();
        engine.set_session_notes("  refactor parser\n");
        assert_eq!(engine.state().session_notes, "  refactor parser\n");
        engine.reset();
        assert_eq!(engine.state().session_notes, "  refactor parser\n");
    }
}
