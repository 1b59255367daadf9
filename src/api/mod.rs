//! Tracking session API
//!
//! Callback-based interface wiring location sources to the arbiter and
//! fanning accepted fixes out to registered consumers.

pub mod tracker;
pub mod types;

pub use tracker::FixTracker;
pub use types::{
    CallbackHandle, EventCallback, FixCallback, TrackerError, TrackerEvent, TrackerResult,
    TrackerState,
};
