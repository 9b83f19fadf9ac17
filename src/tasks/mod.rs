//! Background tasks module
//!
//! This module contains the periodic tick task that drives a running countdown.

pub mod ticker;

// Re-export main types
pub use ticker::Ticker;
