//! Callback-driven tracking session
//!
//! Hosts one arbiter, any number of attached sources, and the consumers
//! that want to hear about accepted fixes. The hosting application either
//! lets the tracker drain its sources with [`pump`](FixTracker::pump) or
//! wires a platform push callback straight into
//! [`submit`](FixTracker::submit).
//!
//! All evaluation is synchronous on the calling thread; the tracker holds
//! no locks and expects a single writer.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::algorithms::distance::great_circle_m;
use crate::api::types::{
    CallbackHandle, EventCallback, FixCallback, TrackerError, TrackerEvent, TrackerResult,
    TrackerState,
};
use crate::arbiter::{Decision, LocationArbiter};
use crate::core::LocationFix;
use crate::source::LocationSource;
use crate::utils::config::TrackerConfig;

/// Callback-driven location tracking session
pub struct FixTracker {
    arbiter: LocationArbiter,
    sources: Vec<Box<dyn LocationSource>>,
    config: TrackerConfig,
    state: TrackerState,
    callback_counter: u32,
    fix_callbacks: HashMap<CallbackHandle, FixCallback>,
    event_callbacks: HashMap<CallbackHandle, EventCallback>,
}

impl FixTracker {
    /// Create a tracker from a validated configuration
    pub fn new(config: TrackerConfig) -> TrackerResult<Self> {
        config.policy.validate()?;

        Ok(Self {
            arbiter: LocationArbiter::with_policy(config.policy.clone()),
            sources: Vec::new(),
            config,
            state: TrackerState::default(),
            callback_counter: 0,
            fix_callbacks: HashMap::new(),
            event_callbacks: HashMap::new(),
        })
    }

    /// Attach a location source
    ///
    /// Provider ids must be unique across attached sources.
    pub fn attach_source(&mut self, source: Box<dyn LocationSource>) -> TrackerResult<()> {
        if self.sources.iter().any(|s| s.id() == source.id()) {
            return Err(TrackerError::DuplicateSource {
                provider: source.id().to_string(),
            });
        }

        debug!(provider = source.id(), "source attached");
        self.sources.push(source);
        self.state.attached_sources = self.sources.len() as u8;
        Ok(())
    }

    /// Register a callback for accepted fixes
    pub fn register_fix_callback(&mut self, callback: FixCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.fix_callbacks.insert(handle, callback);
        handle
    }

    /// Register a callback for session events
    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.event_callbacks.insert(handle, callback);
        handle
    }

    /// Remove a previously registered callback
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> TrackerResult<()> {
        let removed = self.fix_callbacks.remove(&handle).is_some()
            || self.event_callbacks.remove(&handle).is_some();

        if removed {
            Ok(())
        } else {
            Err(TrackerError::UnknownCallback {
                handle_id: handle.id(),
            })
        }
    }

    /// Start the tracking session
    ///
    /// When seeding is enabled, each source's last known fix is offered to
    /// the arbiter so consumers get a position before live updates arrive.
    pub fn start(&mut self) -> TrackerResult<()> {
        if self.state.started {
            return Err(TrackerError::AlreadyStarted);
        }

        self.state.started = true;
        info!(sources = self.sources.len(), "tracking session started");

        if self.config.seed_from_last_known {
            let seeds: Vec<LocationFix> = self
                .sources
                .iter()
                .filter_map(|s| s.last_known())
                .collect();
            for fix in seeds {
                self.handle_candidate(fix);
            }
        }

        Ok(())
    }

    /// Stop the session and clear registrations
    pub fn stop(&mut self) {
        info!(
            accepted = self.state.fixes_accepted,
            rejected = self.state.fixes_rejected,
            "tracking session stopped"
        );

        self.arbiter.reset();
        self.fix_callbacks.clear();
        self.event_callbacks.clear();
        self.state = TrackerState {
            attached_sources: self.sources.len() as u8,
            ..TrackerState::default()
        };
    }

    /// Offer one externally delivered candidate fix
    ///
    /// Entry point for applications that receive platform push callbacks
    /// themselves instead of attaching sources.
    pub fn submit(&mut self, candidate: LocationFix) -> TrackerResult<Decision> {
        if !self.state.started {
            return Err(TrackerError::NotStarted);
        }

        Ok(self.handle_candidate(candidate))
    }

    /// Drain every attached source once
    ///
    /// Each source is polled until it reports an empty queue. Unhealthy
    /// sources raise an event and are skipped for the rest of the pass.
    /// Returns the number of candidates evaluated.
    pub fn pump(&mut self) -> TrackerResult<u32> {
        if !self.state.started {
            return Err(TrackerError::NotStarted);
        }

        let mut candidates = Vec::new();
        let mut failures = Vec::new();

        for source in &mut self.sources {
            loop {
                match source.poll_fix() {
                    Ok(Some(fix)) => candidates.push(fix),
                    Ok(None) => break,
                    Err(error) => {
                        failures.push((source.id().to_string(), error));
                        break;
                    }
                }
            }
        }

        for (provider, error) in failures {
            self.emit_event(TrackerEvent::SourceUnhealthy { provider, error });
        }

        let processed = candidates.len() as u32;
        for fix in candidates {
            self.handle_candidate(fix);
        }

        Ok(processed)
    }

    /// The fix currently considered authoritative
    pub fn current_best(&self) -> Option<&LocationFix> {
        self.arbiter.current_best()
    }

    /// Session counters
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Number of registered (fix, event) callbacks
    pub fn callback_count(&self) -> (usize, usize) {
        (self.fix_callbacks.len(), self.event_callbacks.len())
    }

    fn handle_candidate(&mut self, candidate: LocationFix) -> Decision {
        let provider = candidate.provider.clone();
        let previous = self.arbiter.current_best().cloned();
        let decision = self.arbiter.evaluate(candidate);

        self.state.fixes_evaluated += 1;

        match &decision {
            Decision::Accepted { reason, best } => {
                self.state.fixes_accepted += 1;
                self.state.last_accept_time_ms = Some(best.timestamp_ms);

                let displacement_m = previous.map(|prev| great_circle_m(&prev, best));
                for callback in self.fix_callbacks.values() {
                    callback(best.clone());
                }
                self.emit_event(TrackerEvent::FixAccepted {
                    fix: best.clone(),
                    reason: *reason,
                    displacement_m,
                });
            }
            Decision::Rejected { reason, .. } => {
                self.state.fixes_rejected += 1;
                self.emit_event(TrackerEvent::FixRejected {
                    provider,
                    reason: reason.clone(),
                });
            }
        }

        decision
    }

    fn emit_event(&self, event: TrackerEvent) {
        for callback in self.event_callbacks.values() {
            callback(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::arbiter::AcceptReason;
    use crate::source::MockLocationSource;

    fn fix(timestamp_ms: u64, accuracy_m: f32, provider: &str) -> LocationFix {
        LocationFix::new(timestamp_ms, accuracy_m, provider, 47.6062, -122.3321)
    }

    fn started_tracker() -> FixTracker {
        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();
        tracker.start().unwrap();
        tracker
    }

    #[test]
    fn test_invalid_policy_is_rejected_at_construction() {
        let mut config = TrackerConfig::default();
        config.policy.freshness_window_ms = 0;

        assert!(matches!(
            FixTracker::new(config),
            Err(TrackerError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn test_submit_requires_started_session() {
        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();

        assert_eq!(
            tracker.submit(fix(0, 50.0, "network")),
            Err(TrackerError::NotStarted)
        );
    }

    #[test]
    fn test_double_start_is_an_error() {
        let mut tracker = started_tracker();
        assert_eq!(tracker.start(), Err(TrackerError::AlreadyStarted));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();
        tracker
            .attach_source(Box::new(MockLocationSource::new("network")))
            .unwrap();

        let result = tracker.attach_source(Box::new(MockLocationSource::new("network")));
        assert!(matches!(
            result,
            Err(TrackerError::DuplicateSource { .. })
        ));
    }

    #[test]
    fn test_submit_routes_through_arbiter() {
        let mut tracker = started_tracker();

        assert!(tracker.submit(fix(0, 50.0, "network")).unwrap().accepted());
        // Inside the debounce window
        assert!(!tracker.submit(fix(3_000, 5.0, "network")).unwrap().accepted());

        let state = tracker.state();
        assert_eq!(state.fixes_evaluated, 2);
        assert_eq!(state.fixes_accepted, 1);
        assert_eq!(state.fixes_rejected, 1);
        assert_eq!(state.last_accept_time_ms, Some(0));
    }

    #[test]
    fn test_pump_drains_sources_in_attachment_order() {
        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();
        tracker
            .attach_source(Box::new(MockLocationSource::with_script(
                "network",
                vec![fix(0, 50.0, "network"), fix(15_000, 10.0, "network")],
            )))
            .unwrap();
        tracker.start().unwrap();

        assert_eq!(tracker.pump().unwrap(), 2);
        assert_eq!(tracker.current_best().unwrap().accuracy_m, 10.0);
        assert_eq!(tracker.pump().unwrap(), 0);
    }

    #[test]
    fn test_fix_callbacks_hear_accepted_fixes_only() {
        let (tx, rx) = mpsc::channel();
        let mut tracker = started_tracker();
        tracker.register_fix_callback(Box::new(move |fix| {
            tx.send(fix.timestamp_ms).unwrap();
        }));

        tracker.submit(fix(0, 50.0, "network")).unwrap();
        tracker.submit(fix(3_000, 5.0, "network")).unwrap(); // debounced
        tracker.submit(fix(15_000, 10.0, "network")).unwrap();

        let heard: Vec<u64> = rx.try_iter().collect();
        assert_eq!(heard, vec![0, 15_000]);
    }

    #[test]
    fn test_events_carry_displacement_and_reasons() {
        let (tx, rx) = mpsc::channel();
        let mut tracker = started_tracker();
        tracker.register_event_callback(Box::new(move |event| {
            tx.send(event).unwrap();
        }));

        tracker.submit(fix(0, 50.0, "network")).unwrap();
        tracker.submit(fix(15_000, 10.0, "network")).unwrap();

        let events: Vec<TrackerEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);

        match &events[0] {
            TrackerEvent::FixAccepted {
                reason,
                displacement_m,
                ..
            } => {
                assert_eq!(*reason, AcceptReason::FirstFix);
                assert!(displacement_m.is_none());
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match &events[1] {
            TrackerEvent::FixAccepted {
                reason,
                displacement_m,
                ..
            } => {
                assert_eq!(*reason, AcceptReason::MoreAccurate);
                assert_eq!(*displacement_m, Some(0.0));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_start_seeds_from_last_known() {
        let mut source = MockLocationSource::new("network");
        source.set_last_known(fix(1_000, 40.0, "network"));

        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();
        tracker.attach_source(Box::new(source)).unwrap();
        tracker.start().unwrap();

        assert_eq!(tracker.current_best().unwrap().timestamp_ms, 1_000);
        assert_eq!(tracker.state().fixes_accepted, 1);
    }

    #[test]
    fn test_seeding_can_be_disabled() {
        let mut source = MockLocationSource::new("network");
        source.set_last_known(fix(1_000, 40.0, "network"));

        let config = TrackerConfig {
            seed_from_last_known: false,
            ..TrackerConfig::default()
        };
        let mut tracker = FixTracker::new(config).unwrap();
        tracker.attach_source(Box::new(source)).unwrap();
        tracker.start().unwrap();

        assert!(tracker.current_best().is_none());
    }

    #[test]
    fn test_unhealthy_source_raises_event_and_pump_continues() {
        let (tx, rx) = mpsc::channel();

        let mut dead = MockLocationSource::with_script("gps", vec![fix(0, 5.0, "gps")]);
        dead.disconnect();
        let live =
            MockLocationSource::with_script("network", vec![fix(0, 50.0, "network")]);

        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();
        tracker.attach_source(Box::new(dead)).unwrap();
        tracker.attach_source(Box::new(live)).unwrap();
        tracker.register_event_callback(Box::new(move |event| {
            if let TrackerEvent::SourceUnhealthy { provider, .. } = event {
                tx.send(provider).unwrap();
            }
        }));
        tracker.start().unwrap();

        assert_eq!(tracker.pump().unwrap(), 1);
        assert_eq!(tracker.current_best().unwrap().provider, "network");
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["gps".to_string()]);
    }

    #[test]
    fn test_unregister_callback() {
        let mut tracker = started_tracker();
        let handle = tracker.register_fix_callback(Box::new(|_| {}));

        assert_eq!(tracker.callback_count(), (1, 0));
        tracker.unregister_callback(handle).unwrap();
        assert_eq!(tracker.callback_count(), (0, 0));
        assert!(matches!(
            tracker.unregister_callback(handle),
            Err(TrackerError::UnknownCallback { .. })
        ));
    }

    #[test]
    fn test_stop_clears_session_but_keeps_sources() {
        let mut tracker = FixTracker::new(TrackerConfig::default()).unwrap();
        tracker
            .attach_source(Box::new(MockLocationSource::new("network")))
            .unwrap();
        tracker.start().unwrap();
        tracker.submit(fix(0, 50.0, "network")).unwrap();
        tracker.register_fix_callback(Box::new(|_| {}));

        tracker.stop();

        assert!(!tracker.state().started);
        assert!(tracker.current_best().is_none());
        assert_eq!(tracker.callback_count(), (0, 0));
        assert_eq!(tracker.state().attached_sources, 1);
    }
}
