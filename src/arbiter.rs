//! Location-fix arbitration
//!
//! Decides whether a newly reported fix should replace the currently
//! trusted one. The policy balances two failure modes: accepting noisy
//! fixes degrades the displayed position, while ignoring genuine movement
//! leaves it stale. A debounce window suppresses update storms from rapid
//! provider callbacks and a freshness window bounds how long a degraded
//! fix stays trusted. Displacement beyond a threshold separates real
//! relocation from jitter.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algorithms::distance::great_circle_m;
use crate::core::{
    LocationFix, ACCURACY_TOLERANCE_M, DEBOUNCE_WINDOW_MS, FRESHNESS_WINDOW_MS,
    MOVEMENT_THRESHOLD_M,
};
use crate::validation::{check_fix, FixError};

/// Tunable thresholds for the arbitration policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbiterPolicy {
    /// Minimum interval before a new fix is considered at all (ms)
    pub debounce_window_ms: i64,
    /// Age beyond which the held fix is presumed invalidated by movement (ms)
    pub freshness_window_ms: i64,
    /// Displacement treated as genuine relocation rather than jitter (meters)
    pub movement_threshold_m: f64,
    /// Accuracy loss tolerated when the provider is unchanged (meters)
    pub accuracy_tolerance_m: f32,
}

impl Default for ArbiterPolicy {
    fn default() -> Self {
        Self {
            debounce_window_ms: DEBOUNCE_WINDOW_MS,
            freshness_window_ms: FRESHNESS_WINDOW_MS,
            movement_threshold_m: MOVEMENT_THRESHOLD_M,
            accuracy_tolerance_m: ACCURACY_TOLERANCE_M,
        }
    }
}

impl ArbiterPolicy {
    /// Validate threshold relationships
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.debounce_window_ms < 0 {
            return Err(PolicyError {
                parameter: "debounce_window_ms",
                value: self.debounce_window_ms.to_string(),
                reason: "debounce window cannot be negative",
            });
        }
        if self.freshness_window_ms <= self.debounce_window_ms {
            return Err(PolicyError {
                parameter: "freshness_window_ms",
                value: self.freshness_window_ms.to_string(),
                reason: "freshness window must exceed the debounce window",
            });
        }
        if !(self.movement_threshold_m > 0.0) {
            return Err(PolicyError {
                parameter: "movement_threshold_m",
                value: self.movement_threshold_m.to_string(),
                reason: "movement threshold must be positive",
            });
        }
        if !(self.accuracy_tolerance_m >= 0.0) {
            return Err(PolicyError {
                parameter: "accuracy_tolerance_m",
                value: self.accuracy_tolerance_m.to_string(),
                reason: "accuracy tolerance cannot be negative",
            });
        }
        Ok(())
    }
}

/// Rejected policy parameter
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyError {
    pub parameter: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid policy parameter {} = {}: {}",
            self.parameter, self.value, self.reason
        )
    }
}

impl std::error::Error for PolicyError {}

/// Why a candidate fix replaced the current best
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptReason {
    /// No fix was held yet; any fix beats no fix
    FirstFix,
    /// The held fix aged past the freshness window
    CurrentBestStale,
    /// Candidate reported a strictly smaller error radius
    MoreAccurate,
    /// Comparable accuracy and displacement beyond the movement threshold
    MovementDetected,
    /// Same provider with accuracy loss inside the tolerance
    SameProviderWithinTolerance,
}

/// Why a candidate fix was discarded
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Candidate arrived inside the debounce window
    Debounced,
    /// Candidate predates the held fix beyond the freshness window
    SignificantlyOlder,
    /// Tie-breaking found no improvement over the held fix
    NotBetter,
    /// Candidate carried non-finite or out-of-range fields
    Malformed(FixError),
}

/// Outcome of evaluating one candidate fix
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The candidate became the new best fix
    Accepted {
        reason: AcceptReason,
        best: LocationFix,
    },
    /// The candidate was discarded; the previous best (if any) stands
    Rejected {
        reason: RejectReason,
        best: Option<LocationFix>,
    },
}

impl Decision {
    /// Whether the candidate was accepted
    pub fn accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }

    /// The fix considered authoritative after the evaluation
    ///
    /// None only when a malformed candidate arrived before any fix was held.
    pub fn best(&self) -> Option<&LocationFix> {
        match self {
            Decision::Accepted { best, .. } => Some(best),
            Decision::Rejected { best, .. } => best.as_ref(),
        }
    }
}

/// Maintains the single best-known fix for a tracking session
///
/// `current_best` is owned exclusively by the arbiter and mutated only
/// through [`evaluate`](LocationArbiter::evaluate). The arbiter never
/// fabricates or interpolates fixes; the held value is always one that a
/// caller previously submitted.
///
/// Evaluation is synchronous and lock-free. Callers with concurrent
/// provider callbacks must serialize access.
#[derive(Debug)]
pub struct LocationArbiter {
    policy: ArbiterPolicy,
    current_best: Option<LocationFix>,
}

impl Default for LocationArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationArbiter {
    /// Create an arbiter with the default policy thresholds
    pub fn new() -> Self {
        Self {
            policy: ArbiterPolicy::default(),
            current_best: None,
        }
    }

    /// Create an arbiter with custom thresholds
    pub fn with_policy(policy: ArbiterPolicy) -> Self {
        Self {
            policy,
            current_best: None,
        }
    }

    /// The active policy thresholds
    pub fn policy(&self) -> &ArbiterPolicy {
        &self.policy
    }

    /// The fix currently considered authoritative
    pub fn current_best(&self) -> Option<&LocationFix> {
        self.current_best.as_ref()
    }

    /// Whether any fix has been accepted this session
    pub fn has_fix(&self) -> bool {
        self.current_best.is_some()
    }

    /// Begin a new tracking session, dropping the held fix
    pub fn reset(&mut self) {
        self.current_best = None;
    }

    /// Decide whether `candidate` replaces the current best fix
    ///
    /// Deterministic over the held fix and the candidate; mutates the held
    /// fix on acceptance and nothing otherwise. The check order is load
    /// bearing: the debounce test runs before the staleness comparisons.
    pub fn evaluate(&mut self, candidate: LocationFix) -> Decision {
        if let Err(err) = check_fix(&candidate) {
            warn!(provider = %candidate.provider, %err, "discarding malformed candidate fix");
            return Decision::Rejected {
                reason: RejectReason::Malformed(err),
                best: self.current_best.clone(),
            };
        }

        let Some(best) = &self.current_best else {
            // Any fix beats no fix
            debug!(provider = %candidate.provider, "accepting first fix of session");
            self.current_best = Some(candidate.clone());
            return Decision::Accepted {
                reason: AcceptReason::FirstFix,
                best: candidate,
            };
        };

        let time_delta = candidate.timestamp_ms as i64 - best.timestamp_ms as i64;

        if time_delta < self.policy.debounce_window_ms {
            debug!(time_delta_ms = time_delta, "candidate inside debounce window");
            return self.reject(RejectReason::Debounced);
        }

        if time_delta > self.policy.freshness_window_ms {
            // The user has likely moved since the held fix was taken
            debug!(time_delta_ms = time_delta, "held fix stale, replacing");
            return self.accept(candidate, AcceptReason::CurrentBestStale);
        }

        if time_delta < -self.policy.freshness_window_ms {
            debug!(time_delta_ms = time_delta, "candidate significantly older");
            return self.reject(RejectReason::SignificantlyOlder);
        }

        let accuracy_delta = candidate.accuracy_m - best.accuracy_m;
        let is_newer = time_delta > 0;
        let is_less_accurate = accuracy_delta > 0.0;
        let is_significantly_less_accurate = accuracy_delta > self.policy.accuracy_tolerance_m;
        let same_provider = candidate.same_provider(best);
        let distance_m = great_circle_m(best, &candidate);

        if accuracy_delta < 0.0 {
            return self.accept(candidate, AcceptReason::MoreAccurate);
        }
        if is_newer && !is_less_accurate && distance_m > self.policy.movement_threshold_m {
            return self.accept(candidate, AcceptReason::MovementDetected);
        }
        if is_newer && !is_significantly_less_accurate && same_provider {
            return self.accept(candidate, AcceptReason::SameProviderWithinTolerance);
        }

        debug!(
            accuracy_delta_m = accuracy_delta as f64,
            distance_m, same_provider, "candidate no better than held fix"
        );
        self.reject(RejectReason::NotBetter)
    }

    fn accept(&mut self, candidate: LocationFix, reason: AcceptReason) -> Decision {
        debug!(?reason, provider = %candidate.provider, "fix accepted");
        self.current_best = Some(candidate.clone());
        Decision::Accepted {
            reason,
            best: candidate,
        }
    }

    fn reject(&self, reason: RejectReason) -> Decision {
        Decision::Rejected {
            reason,
            best: self.current_best.clone(),
        }
    }
}
