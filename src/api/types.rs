//! Tracker API types

use std::fmt;

use crate::arbiter::{AcceptReason, PolicyError, RejectReason};
use crate::core::LocationFix;
use crate::source::SourceError;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Tracker error types
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// Operation requires a started session
    NotStarted,
    /// The session is already running
    AlreadyStarted,
    /// A source with this provider id is already attached
    DuplicateSource { provider: String },
    /// Callback handle does not match any registration
    UnknownCallback { handle_id: u32 },
    /// Policy thresholds failed validation
    InvalidPolicy { error: PolicyError },
    /// A source failed while being drained
    SourceFailure { error: SourceError },
}

impl From<PolicyError> for TrackerError {
    fn from(error: PolicyError) -> Self {
        TrackerError::InvalidPolicy { error }
    }
}

impl From<SourceError> for TrackerError {
    fn from(error: SourceError) -> Self {
        TrackerError::SourceFailure { error }
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::NotStarted => {
                write!(f, "Tracking session not started")
            }
            TrackerError::AlreadyStarted => {
                write!(f, "Tracking session already running")
            }
            TrackerError::DuplicateSource { provider } => {
                write!(f, "Source '{}' already attached", provider)
            }
            TrackerError::UnknownCallback { handle_id } => {
                write!(f, "Unknown callback handle {}", handle_id)
            }
            TrackerError::InvalidPolicy { error } => {
                write!(f, "{}", error)
            }
            TrackerError::SourceFailure { error } => {
                write!(f, "{}", error)
            }
        }
    }
}

impl std::error::Error for TrackerError {}

/// Session counters
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    /// Whether a session is running
    pub started: bool,
    /// Candidates routed through the arbiter
    pub fixes_evaluated: u32,
    /// Candidates that became the best fix
    pub fixes_accepted: u32,
    /// Candidates discarded by the policy
    pub fixes_rejected: u32,
    /// Timestamp of the most recently accepted fix
    pub last_accept_time_ms: Option<u64>,
    /// Number of attached sources
    pub attached_sources: u8,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            started: false,
            fixes_evaluated: 0,
            fixes_accepted: 0,
            fixes_rejected: 0,
            last_accept_time_ms: None,
            attached_sources: 0,
        }
    }
}

/// Events emitted while a session runs
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// A candidate replaced the best fix
    FixAccepted {
        fix: LocationFix,
        reason: AcceptReason,
        /// Great-circle distance from the previous best, when one existed
        displacement_m: Option<f64>,
    },
    /// A candidate was discarded
    FixRejected {
        provider: String,
        reason: RejectReason,
    },
    /// A source stopped delivering
    SourceUnhealthy {
        provider: String,
        error: SourceError,
    },
}

/// Callback invoked with every newly accepted fix
pub type FixCallback = Box<dyn Fn(LocationFix) + Send>;

/// Callback invoked with every session event
pub type EventCallback = Box<dyn Fn(TrackerEvent) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub(crate) fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}
