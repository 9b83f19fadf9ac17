//! Focus Timer - a single countdown with presets and a session journal
//!
//! The [`state::TimerEngine`] holds every transition of the countdown. The
//! [`state::AppState`] owns the engine together with its ticker task, and the
//! [`shell`] relays user commands and renders the result.

pub mod config;
pub mod shell;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use shell::Shell;
pub use state::{AppState, TimerEngine};
pub use utils::signals::shutdown_signal;
