//! Errors surfaced by the shared state layer

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Failed to lock {0} state")]
    LockPoisoned(&'static str),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
}
