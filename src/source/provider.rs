//! Location source trait and status

use crate::core::LocationFix;
use crate::source::error::SourceResult;

/// Abstraction over a subsystem that produces location fixes
///
/// Implementations wrap whatever delivery mechanism the platform offers
/// (push callbacks buffered into a queue, polled hardware, a replay
/// script). All methods are non-blocking.
pub trait LocationSource {
    /// Take the next pending fix from this source
    ///
    /// Returns Ok(Some(fix)) when a fix is waiting, Ok(None) when the
    /// queue is empty, Err when the source is unhealthy.
    fn poll_fix(&mut self) -> SourceResult<Option<LocationFix>>;

    /// The most recent fix this source ever produced, if any
    ///
    /// Used to seed a new tracking session before live updates arrive.
    fn last_known(&self) -> Option<LocationFix>;

    /// Current source status
    fn status(&self) -> SourceStatus;

    /// Whether the source is currently able to deliver fixes
    fn is_active(&self) -> bool;

    /// Provider identifier for fixes from this source
    fn id(&self) -> &str;
}

/// Health and throughput information for a source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub provider: String,
    pub active: bool,
    pub last_fix_time_ms: Option<u64>,
    pub fixes_delivered: u32,
    pub error_count: u32,
}

impl SourceStatus {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            active: false,
            last_fix_time_ms: None,
            fixes_delivered: 0,
            error_count: 0,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.active && self.error_count < 10
    }
}
