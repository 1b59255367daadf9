//! Location-fix arbitration
//!
//! Maintains the single best-known geographic fix for a tracking session.
//! Providers push candidate fixes; a deterministic policy decides whether
//! each one replaces the currently trusted fix, and accepted fixes fan out
//! to registered consumers.

pub mod core;
pub mod algorithms;
pub mod arbiter;
pub mod validation;
pub mod source;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{LocationFix, DEBOUNCE_WINDOW_MS, FRESHNESS_WINDOW_MS};
pub use arbiter::{AcceptReason, ArbiterPolicy, Decision, LocationArbiter, RejectReason};
pub use algorithms::distance::{enu_displacement, great_circle_m};
pub use validation::{check_fix, FixError};
pub use source::{LocationSource, MockLocationSource, SourceError, SourceResult, SourceStatus};
pub use api::{
    CallbackHandle, EventCallback, FixCallback, FixTracker, TrackerError, TrackerEvent,
    TrackerResult, TrackerState,
};
pub use utils::{ConfigError, TrackerConfig};
