//! Shared application state: the engine, its ticker and change notifications

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    engine::{Schedule, TimerEngine},
    error::StateError,
    journal::SessionRecord,
    preset::{find_preset, Preset},
    timer_state::TimerSnapshot,
};
use crate::tasks::Ticker;

/// Engine plus the ticker slot, guarded together so arming follows each transition atomically
#[derive(Debug)]
struct EngineSlot {
    engine: TimerEngine,
    ticker: Option<Ticker>,
    /// Bumped on every arm; ticks from older generations are stale
    generation: u64,
}

/// Owner of the engine lifecycle. Dropping it disarms any running ticker.
#[derive(Debug)]
pub struct AppState {
    slot: Mutex<EngineSlot>,
    pub tick_period: Duration,
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Natural completions, one message per journal entry
    pub completion_tx: broadcast::Sender<SessionRecord>,
    /// Latest snapshot after every mutation or tick
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    pub fn new(preset: Preset, tick_period: Duration) -> Self {
        let engine = TimerEngine::with_preset(preset);
        let (completion_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            slot: Mutex::new(EngineSlot {
                engine,
                ticker: None,
                generation: 0,
            }),
            tick_period,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            completion_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    fn lock_slot(&self) -> Result<MutexGuard<'_, EngineSlot>, StateError> {
        self.slot.lock().map_err(|_| StateError::LockPoisoned("engine"))
    }

    /// Apply an engine operation, act on its schedule directive and notify watchers
    pub fn update_engine<F>(self: &Arc<Self>, action: &str, updater: F) -> Result<TimerSnapshot, StateError>
    where
        F: FnOnce(&mut TimerEngine) -> Schedule,
    {
        let mut slot = self.lock_slot()?;
        let schedule = updater(&mut slot.engine);
        self.apply_schedule(&mut slot, schedule);
        let snapshot = slot.engine.snapshot();
        drop(slot);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn apply_schedule(self: &Arc<Self>, slot: &mut EngineSlot, schedule: Schedule) {
        match schedule {
            Schedule::Arm => {
                // Release the previous ticker before arming a new one
                slot.ticker = None;
                slot.generation += 1;
                slot.ticker = Some(Ticker::arm(
                    Arc::downgrade(self),
                    slot.generation,
                    self.tick_period,
                ));
            }
            Schedule::Disarm => {
                if let Some(ticker) = slot.ticker.take() {
                    debug!("Ticker generation {} disarmed", ticker.generation());
                }
            }
            Schedule::Keep => {}
        }
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }
    }

    /// Select a catalog preset by id
    pub fn select_preset(self: &Arc<Self>, id: &str) -> Result<TimerSnapshot, StateError> {
        let preset = find_preset(id).ok_or_else(|| StateError::UnknownPreset(id.to_string()))?;
        self.update_engine("select", |engine| engine.select_preset(preset))
    }

    pub fn set_custom_minutes(self: &Arc<Self>, raw: f64) -> Result<TimerSnapshot, StateError> {
        self.update_engine("custom", |engine| engine.set_custom_minutes(raw))
    }

    pub fn toggle_run(self: &Arc<Self>) -> Result<TimerSnapshot, StateError> {
        self.update_engine("toggle", TimerEngine::toggle_run)
    }

    pub fn reset(self: &Arc<Self>) -> Result<TimerSnapshot, StateError> {
        self.update_engine("reset", TimerEngine::reset)
    }

    pub fn set_session_notes(self: &Arc<Self>, text: &str) -> Result<TimerSnapshot, StateError> {
        self.update_engine("notes", |engine| {
            engine.set_session_notes(text);
            Schedule::Keep
        })
    }

    /// Deliver one tick from the ticker of `generation`.
    /// Returns whether that ticker should keep running.
    pub fn deliver_tick(self: &Arc<Self>, generation: u64) -> Result<bool, StateError> {
        let mut slot = self.lock_slot()?;
        if slot.ticker.is_none() || slot.generation != generation {
            warn!("Dropping stale tick from generation {}", generation);
            return Ok(false);
        }

        let outcome = slot.engine.tick();
        self.apply_schedule(&mut slot, outcome.schedule);
        let snapshot = slot.engine.snapshot();
        drop(slot);

        debug!("Tick: {} remaining", snapshot.remaining_display);
        self.publish(snapshot);

        if let Some(record) = outcome.completed {
            // No subscribers is fine, the journal already holds the record
            if self.completion_tx.send(record).is_err() {
                debug!("No completion listeners");
            }
        }

        Ok(outcome.schedule == Schedule::Keep)
    }

    pub fn get_snapshot(&self) -> Result<TimerSnapshot, StateError> {
        self.lock_slot().map(|slot| slot.engine.snapshot())
    }

    /// Journal entries, most recent first
    pub fn get_journal(&self) -> Result<Vec<SessionRecord>, StateError> {
        self.lock_slot().map(|slot| slot.engine.journal().to_vec())
    }

    /// Whether a ticker is currently armed
    pub fn is_armed(&self) -> Result<bool, StateError> {
        self.lock_slot().map(|slot| slot.ticker.is_some())
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<SessionRecord> {
        self.completion_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Release the ticker ahead of teardown
    pub fn shutdown(&self) -> Result<(), StateError> {
        let mut slot = self.lock_slot()?;
        if slot.ticker.take().is_some() {
            info!("Disarmed running countdown on shutdown");
        }
        Ok(())
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
