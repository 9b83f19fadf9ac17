//! Countdown ticker task

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, error};

use crate::state::AppState;

/// Handle to an armed tick task. Dropping it aborts the task.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a task that delivers one tick per `period`, first tick one period from now.
    /// Must be called from within a tokio runtime.
    pub fn arm(state: Weak<AppState>, generation: u64, period: Duration) -> Self {
        debug!("Arming ticker generation {} every {:?}", generation, period);
        let handle = tokio::spawn(tick_task(state, generation, period));
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn tick_task(state: Weak<AppState>, generation: u64, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        // The owner is gone, nothing left to drive
        let Some(state) = state.upgrade() else {
            debug!("Ticker generation {} outlived its state", generation);
            break;
        };

        match state.deliver_tick(generation) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("Failed to deliver tick: {}", e);
                break;
            }
        }
    }

    debug!("Ticker generation {} finished", generation);
}
