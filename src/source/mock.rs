//! Mock location source for testing and development

use std::collections::VecDeque;

use crate::core::LocationFix;
use crate::source::error::{SourceError, SourceResult};
use crate::source::provider::{LocationSource, SourceStatus};

/// Scripted location source
///
/// Fixes are queued up front and handed out one per poll, which makes
/// arbitration sequences deterministic in tests. Connection loss can be
/// toggled to exercise error paths.
pub struct MockLocationSource {
    provider: String,
    status: SourceStatus,
    queue: VecDeque<LocationFix>,
    last_known: Option<LocationFix>,
    connected: bool,
}

impl MockLocationSource {
    /// Create an empty mock source for the given provider
    pub fn new(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        let mut status = SourceStatus::new(provider.clone());
        status.active = true;

        Self {
            provider,
            status,
            queue: VecDeque::new(),
            last_known: None,
            connected: true,
        }
    }

    /// Create a mock source pre-loaded with a fix script
    pub fn with_script(
        provider: impl Into<String>,
        fixes: impl IntoIterator<Item = LocationFix>,
    ) -> Self {
        let mut source = Self::new(provider);
        source.queue.extend(fixes);
        source
    }

    /// Queue a fix for a later poll
    pub fn push_fix(&mut self, fix: LocationFix) {
        self.queue.push_back(fix);
    }

    /// Set the fix reported by `last_known`
    pub fn set_last_known(&mut self, fix: LocationFix) {
        self.last_known = Some(fix);
    }

    /// Simulate losing the platform subsystem
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.status.active = false;
    }

    /// Restore the connection
    pub fn reconnect(&mut self) {
        self.connected = true;
        self.status.active = true;
    }

    /// Number of fixes still queued
    pub fn queued_fix_count(&self) -> usize {
        self.queue.len()
    }
}

impl LocationSource for MockLocationSource {
    fn poll_fix(&mut self) -> SourceResult<Option<LocationFix>> {
        if !self.connected {
            self.status.error_count += 1;
            return Err(SourceError::ConnectionLost {
                provider: self.provider.clone(),
            });
        }

        match self.queue.pop_front() {
            Some(fix) => {
                self.status.fixes_delivered += 1;
                self.status.last_fix_time_ms = Some(fix.timestamp_ms);
                self.last_known = Some(fix.clone());
                Ok(Some(fix))
            }
            None => Ok(None),
        }
    }

    fn last_known(&self) -> Option<LocationFix> {
        self.last_known.clone()
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }

    fn is_active(&self) -> bool {
        self.connected
    }

    fn id(&self) -> &str {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(timestamp_ms: u64) -> LocationFix {
        LocationFix::new(timestamp_ms, 25.0, "mock", 47.6, -122.3)
    }

    #[test]
    fn test_empty_source_polls_none() {
        let mut source = MockLocationSource::new("mock");

        assert_eq!(source.poll_fix(), Ok(None));
        assert!(source.last_known().is_none());
    }

    #[test]
    fn test_scripted_fixes_come_out_in_order() {
        let mut source =
            MockLocationSource::with_script("mock", vec![fix(1_000), fix(2_000), fix(3_000)]);

        assert_eq!(source.queued_fix_count(), 3);
        assert_eq!(source.poll_fix().unwrap().unwrap().timestamp_ms, 1_000);
        assert_eq!(source.poll_fix().unwrap().unwrap().timestamp_ms, 2_000);
        assert_eq!(source.poll_fix().unwrap().unwrap().timestamp_ms, 3_000);
        assert_eq!(source.poll_fix(), Ok(None));
    }

    #[test]
    fn test_poll_updates_last_known_and_status() {
        let mut source = MockLocationSource::with_script("mock", vec![fix(1_000)]);
        source.poll_fix().unwrap();

        assert_eq!(source.last_known().unwrap().timestamp_ms, 1_000);
        let status = source.status();
        assert_eq!(status.fixes_delivered, 1);
        assert_eq!(status.last_fix_time_ms, Some(1_000));
        assert!(status.is_healthy());
    }

    #[test]
    fn test_disconnected_source_errors() {
        let mut source = MockLocationSource::with_script("mock", vec![fix(1_000)]);
        source.disconnect();

        assert!(matches!(
            source.poll_fix(),
            Err(SourceError::ConnectionLost { .. })
        ));
        assert!(!source.is_active());

        source.reconnect();
        assert_eq!(source.poll_fix().unwrap().unwrap().timestamp_ms, 1_000);
    }

    #[test]
    fn test_seeded_last_known_survives_without_polls() {
        let mut source = MockLocationSource::new("mock");
        source.set_last_known(fix(500));

        assert_eq!(source.last_known().unwrap().timestamp_ms, 500);
    }
}
